use crate::domain::model::{
    CanalPath, DepthAssessment, LandmarkRecord, MeasurementResult, ReferencePlane, VolumeSpacing,
};
use crate::utils::error::{AnalyzerError, Result};
use std::path::Path;

/// The viewer that owns the CBCT volume, picking and rendering.
pub trait HostAdapter {
    fn volume_spacing(&self) -> VolumeSpacing;
    fn canal_trace(&self) -> Result<CanalPath>;
    fn display_result(&mut self, result: &MeasurementResult);
    fn display_assessment(&mut self, assessment: &DepthAssessment);
    fn display_planes(&mut self, planes: &[ReferencePlane]);
    fn display_error(&mut self, error: &AnalyzerError);
}

/// Where landmark sets are saved between sessions.
pub trait LandmarkRepository {
    fn load(&self, path: &Path) -> Result<Vec<LandmarkRecord>>;
    fn save(&self, path: &Path, records: &[LandmarkRecord]) -> Result<()>;
}
