pub mod analyzer;
pub mod assessment;
pub mod distance;
pub mod landmark_store;
pub mod planes;

pub use crate::domain::model::{
    checked_position, ensure_finite, CanalPath, Complexity, DepthAssessment, Landmark, LandmarkId,
    LandmarkRecord, MeasurementResult, MeasurementTarget, Position, Real, ReferencePlane,
    TargetTooth, Vec3, VolumeSpacing, MAX_COORDINATE,
};
pub use crate::domain::ports::{HostAdapter, LandmarkRepository};
pub use crate::utils::error::Result;
pub use landmark_store::LandmarkStore;
