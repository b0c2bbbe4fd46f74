use crate::core::{LandmarkRecord, LandmarkRepository};
use crate::utils::error::{AnalyzerError, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Csv,
}

impl RecordFormat {
    pub const EXTENSIONS: [&'static str; 2] = ["json", "csv"];

    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(RecordFormat::Json),
            Some("csv") => Ok(RecordFormat::Csv),
            _ => Err(AnalyzerError::InvalidConfigValueError {
                field: "path".to_string(),
                value: path.display().to_string(),
                reason: format!(
                    "Landmark files must end in one of: {}",
                    Self::EXTENSIONS.join(", ")
                ),
            }),
        }
    }
}

/// Landmark files on the local disk, resolved relative to `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn full_path(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}

impl LandmarkRepository for LocalStorage {
    fn load(&self, path: &Path) -> Result<Vec<LandmarkRecord>> {
        let full_path = self.full_path(path);
        tracing::debug!("Reading landmarks from {}", full_path.display());

        match RecordFormat::from_path(&full_path)? {
            RecordFormat::Json => {
                let data = fs::read(&full_path)?;
                Ok(serde_json::from_slice(&data)?)
            }
            RecordFormat::Csv => {
                let mut reader = csv::ReaderBuilder::new()
                    .trim(csv::Trim::All)
                    .from_path(&full_path)?;
                let records = reader
                    .deserialize()
                    .collect::<std::result::Result<Vec<LandmarkRecord>, _>>()?;
                Ok(records)
            }
        }
    }

    fn save(&self, path: &Path, records: &[LandmarkRecord]) -> Result<()> {
        let full_path = self.full_path(path);
        let format = RecordFormat::from_path(&full_path)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        match format {
            RecordFormat::Json => {
                let data = serde_json::to_vec_pretty(records)?;
                fs::write(&full_path, data)?;
            }
            RecordFormat::Csv => {
                let mut writer = csv::Writer::from_path(&full_path)?;
                for record in records {
                    writer.serialize(record)?;
                }
                writer.flush()?;
            }
        }

        tracing::debug!("Wrote {} records to {}", records.len(), full_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn records() -> Vec<LandmarkRecord> {
        vec![
            LandmarkRecord { label: "apex".into(), x: 12.0, y: 34.0, z: 5.0 },
            LandmarkRecord { label: "crest".into(), x: -1.5, y: 0.25, z: 9.0 },
        ]
    }

    #[test]
    fn test_json_and_csv_files() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        for name in ["case/landmarks.json", "case/landmarks.csv"] {
            storage.save(Path::new(name), &records()).unwrap();
            assert_eq!(storage.load(Path::new(name)).unwrap(), records());
        }
    }

    #[test]
    fn test_csv_header_and_whitespace() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("pts.csv"),
            "label, x, y, z\napex, 1.0, 2.0, 3.0\n",
        )
        .unwrap();

        let storage = LocalStorage::new(temp_dir.path());
        let loaded = storage.load(Path::new("pts.csv")).unwrap();
        assert_eq!(loaded[0].label, "apex");
        assert_eq!(loaded[0].z, 3.0);
    }

    #[test]
    fn test_unknown_extension_and_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        assert!(matches!(
            storage.save(Path::new("pts.mrk.txt"), &records()),
            Err(AnalyzerError::InvalidConfigValueError { .. })
        ));
        assert!(matches!(
            storage.load(Path::new("missing.json")),
            Err(AnalyzerError::IoError(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("bad.json"), r#"[{"label": "a", "x": 1}]"#).unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        assert!(matches!(
            storage.load(Path::new("bad.json")),
            Err(AnalyzerError::SerializationError(_))
        ));
    }
}
