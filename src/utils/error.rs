use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Landmark not found: {id}")]
    NotFound { id: String },

    #[error("No landmark labelled '{label}'")]
    LabelNotFound { label: String },

    #[error("Canal path needs at least 2 points, got {points}")]
    EmptyPath { points: usize },

    #[error("Invalid position ({x}, {y}, {z}): coordinates must be finite")]
    InvalidPosition { x: f64, y: f64, z: f64 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl AnalyzerError {
    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    /// 給使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NotFound { id } => format!("Landmark {} no longer exists", id),
            Self::LabelNotFound { label } => format!("Place the '{}' point first", label),
            Self::EmptyPath { .. } => "The canal trace is too short to measure against".to_string(),
            Self::InvalidPosition { .. } => "The picked point is outside the volume".to_string(),
            Self::IoError(e) => format!("Could not access file: {}", e),
            Self::SerializationError(_) | Self::CsvError(_) => {
                "The landmark file is malformed".to_string()
            }
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Refresh the landmark list and pick an existing landmark",
            Self::LabelNotFound { .. } => "Place the landmark on the image before measuring",
            Self::EmptyPath { .. } => "Trace at least two points along the mandibular canal",
            Self::InvalidPosition { .. } => "Pick the point again inside the CBCT volume",
            Self::IoError(_) => "Check that the path exists and is readable",
            Self::SerializationError(_) | Self::CsvError(_) => {
                "Each record needs label, x, y and z fields"
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration file and try again"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_mention_context() {
        let err = AnalyzerError::not_found("lm-3");
        assert_eq!(err.to_string(), "Landmark not found: lm-3");
        assert!(err.user_friendly_message().contains("lm-3"));

        let err = AnalyzerError::EmptyPath { points: 1 };
        assert!(err.to_string().contains("got 1"));
        assert!(err.recovery_suggestion().contains("two points"));
    }
}
