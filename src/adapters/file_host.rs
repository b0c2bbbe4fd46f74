use crate::core::{
    CanalPath, DepthAssessment, HostAdapter, LandmarkRepository, MeasurementResult,
    ReferencePlane, VolumeSpacing,
};
use crate::utils::error::{AnalyzerError, Result};
use std::path::PathBuf;

/// Host that reads the canal trace from disk and prints results to the terminal.
pub struct FileHost<R: LandmarkRepository> {
    repository: R,
    canal_path: Option<PathBuf>,
    spacing: VolumeSpacing,
    planes: Vec<ReferencePlane>,
}

impl<R: LandmarkRepository> FileHost<R> {
    pub fn new(repository: R, canal_path: Option<PathBuf>, spacing: VolumeSpacing) -> Self {
        Self {
            repository,
            canal_path,
            spacing,
            planes: Vec::new(),
        }
    }

    /// Planes from the most recent depth assessment.
    pub fn planes(&self) -> &[ReferencePlane] {
        &self.planes
    }
}

impl<R: LandmarkRepository> HostAdapter for FileHost<R> {
    fn volume_spacing(&self) -> VolumeSpacing {
        self.spacing
    }

    fn canal_trace(&self) -> Result<CanalPath> {
        let path = self
            .canal_path
            .as_ref()
            .ok_or_else(|| AnalyzerError::ConfigError {
                message: "No canal trace file given (use --canal or io.canal_path)".to_string(),
            })?;
        let records = self.repository.load(path)?;
        let canal = CanalPath::from_records(&records)?;
        tracing::debug!(
            "Canal trace {} has {} points over {:.2} mm",
            path.display(),
            canal.len(),
            canal.length()
        );
        Ok(canal)
    }

    fn display_result(&mut self, result: &MeasurementResult) {
        println!("📏 {}", result);
    }

    fn display_assessment(&mut self, assessment: &DepthAssessment) {
        tracing::debug!("Result colour {}", assessment.complexity.highlight_color());
        println!("{}", assessment);
    }

    fn display_planes(&mut self, planes: &[ReferencePlane]) {
        for plane in planes {
            tracing::debug!(
                "Plane {} at z = {:.2} (half size {:.1})",
                plane.name,
                plane.center.z,
                plane.point1.x - plane.center.x
            );
        }
        self.planes = planes.to_vec();
    }

    fn display_error(&mut self, error: &AnalyzerError) {
        eprintln!("❌ {}", error.user_friendly_message());
        eprintln!("💡 {}", error.recovery_suggestion());
    }
}
