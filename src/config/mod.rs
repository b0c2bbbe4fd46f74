pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_args::{CliConfig, Command};

#[cfg(feature = "cli")]
mod cli_args {
    use crate::config::cli::RecordFormat;
    use crate::utils::error::{AnalyzerError, Result};
    use crate::utils::validation::{validate_file_extension, validate_path, Validate};
    use clap::{Parser, Subcommand};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "molar-analyzer")]
    #[command(about = "Landmark distances and surgical depth for mandibular molar CBCT analysis")]
    pub struct CliConfig {
        /// TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// Landmark file (.json or .csv with label,x,y,z)
        #[arg(short, long)]
        pub landmarks: Option<String>,

        /// Canal centreline file (.json or .csv, points in order)
        #[arg(long)]
        pub canal: Option<String>,

        /// Voxel spacing as sx,sy,sz
        #[arg(long, value_delimiter = ',')]
        pub spacing: Vec<f64>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
    pub enum Command {
        /// List landmarks in file order
        List,
        /// Place a landmark and save the file
        Add {
            label: String,
            #[arg(allow_negative_numbers = true)]
            x: f64,
            #[arg(allow_negative_numbers = true)]
            y: f64,
            #[arg(allow_negative_numbers = true)]
            z: f64,
        },
        /// Move a landmark (label or lm-<n>) and save the file
        Move {
            landmark: String,
            #[arg(allow_negative_numbers = true)]
            x: f64,
            #[arg(allow_negative_numbers = true)]
            y: f64,
            #[arg(allow_negative_numbers = true)]
            z: f64,
        },
        /// Delete a landmark (label or lm-<n>) and save the file
        Remove { landmark: String },
        /// Euclidean distance between two landmarks
        Distance {
            #[arg(long)]
            from: String,
            #[arg(long)]
            to: String,
        },
        /// Distance from a landmark to the canal, or from every landmark when omitted
        Canal {
            #[arg(long)]
            from: Option<String>,
        },
        /// Bone crest to nerve depth with complexity prediction
        War {
            #[arg(long)]
            bone: String,
            #[arg(long)]
            nerve: String,
            /// Tooth under analysis: 38, 48, mandible or nerve
            #[arg(long)]
            tooth: Option<String>,
        },
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            for (field, path) in [("landmarks", &self.landmarks), ("canal", &self.canal)] {
                if let Some(path) = path {
                    validate_path(field, path)?;
                    validate_file_extension(field, path, &RecordFormat::EXTENSIONS)?;
                }
            }

            if !self.spacing.is_empty() && self.spacing.len() != 3 {
                return Err(AnalyzerError::InvalidConfigValueError {
                    field: "spacing".to_string(),
                    value: format!("{:?}", self.spacing),
                    reason: "Expected three values: sx,sy,sz".to_string(),
                });
            }

            Ok(())
        }
    }

}
