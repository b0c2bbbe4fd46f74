use crate::config::cli::RecordFormat;
use crate::core::analyzer::AnalysisSettings;
use crate::core::assessment::DepthThresholds;
use crate::core::planes::PlaneSettings;
use crate::core::{TargetTooth, VolumeSpacing};
use crate::utils::error::{AnalyzerError, Result};
use crate::utils::validation::{validate_file_extension, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub classification: DepthThresholds,
    pub planes: PlaneSettings,
    pub io: IoConfig,
    pub volume: VolumeConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IoConfig {
    pub landmarks_path: Option<String>,
    pub canal_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Voxel spacing (sx, sy, sz) of the CBCT volume the points were picked in.
    pub spacing: Option<[f64; 3]>,
    /// Segment code of the analysed tooth: 38, 48, mandible or nerve.
    pub target: Option<String>,
}

impl AnalyzerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AnalyzerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CASE_DIR})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AnalyzerError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn analysis_settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            thresholds: self.classification,
            planes: self.planes.clone(),
        }
    }

    pub fn volume_spacing(&self) -> Result<Option<VolumeSpacing>> {
        self.volume
            .spacing
            .map(|[sx, sy, sz]| VolumeSpacing::new(sx, sy, sz))
            .transpose()
    }

    pub fn target(&self) -> Result<Option<TargetTooth>> {
        self.volume.target.as_deref().map(|t| t.parse::<TargetTooth>()).transpose()
    }
}

impl Validate for AnalyzerConfig {
    fn validate(&self) -> Result<()> {
        self.classification.validate()?;
        self.planes.validate()?;

        for (field, path) in [
            ("io.landmarks_path", &self.io.landmarks_path),
            ("io.canal_path", &self.io.canal_path),
        ] {
            if let Some(path) = path {
                validate_path(field, path)?;
                validate_file_extension(field, path, &RecordFormat::EXTENSIONS)?;
            }
        }

        self.volume_spacing()?;
        self.target()?;
        Ok(())
    }
}
