pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::FileHost;
pub use config::cli::LocalStorage;
pub use config::toml_config::AnalyzerConfig;
pub use crate::core::{analyzer::Analyzer, LandmarkStore};
pub use utils::error::{AnalyzerError, Result};
