use crate::core::assessment::{assess, DepthThresholds};
use crate::core::distance::{closest_point_on_path, distances_to_path, point_distance};
use crate::core::planes::{war_line_planes, PlaneSettings};
use crate::core::{
    DepthAssessment, HostAdapter, Landmark, LandmarkId, LandmarkRepository, LandmarkStore,
    MeasurementResult, MeasurementTarget, Position, Real, TargetTooth,
};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::Utc;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisSettings {
    pub thresholds: DepthThresholds,
    pub planes: PlaneSettings,
}

impl Validate for AnalysisSettings {
    fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        self.planes.validate()
    }
}

/// One analysis session: the landmark store plus the host that feeds and displays it.
///
/// Every call runs to completion on the caller's thread. Failures are handed
/// to [`HostAdapter::display_error`] and returned; the store is left as it was.
pub struct Analyzer<H: HostAdapter> {
    store: LandmarkStore,
    host: H,
    settings: AnalysisSettings,
    target: Option<TargetTooth>,
}

impl<H: HostAdapter> Analyzer<H> {
    pub fn new(host: H) -> Self {
        Self::with_settings(host, AnalysisSettings::default())
    }

    pub fn with_settings(host: H, settings: AnalysisSettings) -> Self {
        Self {
            store: LandmarkStore::new(),
            host,
            settings,
            target: None,
        }
    }

    pub fn store(&self) -> &LandmarkStore {
        &self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn select_target(&mut self, target: Option<TargetTooth>) {
        if let Some(t) = target {
            tracing::info!("🦷 Target: {}", t);
        }
        self.target = target;
    }

    pub fn on_user_pick(&mut self, label: &str, position: Position) -> Result<Landmark> {
        let result = self.store.add(label, position);
        self.report(result)
    }

    pub fn move_landmark(&mut self, id: LandmarkId, position: Position) -> Result<Landmark> {
        let result = self.store.move_to(id, position);
        self.report(result)
    }

    pub fn remove_landmark(&mut self, id: LandmarkId) -> Result<Landmark> {
        let result = self.store.remove(id);
        self.report(result)
    }

    /// Looks a landmark up by `lm-<n>` id or label.
    pub fn resolve(&mut self, key: &str) -> Result<LandmarkId> {
        let result = self.store.resolve(key).map(|l| l.id);
        self.report(result)
    }

    pub fn measure_between(&mut self, from: LandmarkId, to: LandmarkId) -> Result<MeasurementResult> {
        let result = self.compute_between(from, to);
        let measurement = self.report(result)?;
        self.check_resolution(measurement.distance);
        self.host.display_result(&measurement);
        Ok(measurement)
    }

    pub fn measure_to_canal(&mut self, from: LandmarkId) -> Result<MeasurementResult> {
        let result = self.compute_to_canal(from);
        let measurement = self.report(result)?;
        self.check_resolution(measurement.distance);
        self.host.display_result(&measurement);
        Ok(measurement)
    }

    /// Canal distance for every landmark, computed against one snapshot of the store.
    pub fn measure_all_to_canal(&mut self) -> Result<Vec<MeasurementResult>> {
        let snapshot = self.store.snapshot();
        let result = self
            .host
            .canal_trace()
            .and_then(|path| distances_to_path(&snapshot, &path));
        let projections = self.report(result)?;

        let computed_at = Utc::now();
        let measurements: Vec<_> = projections
            .into_iter()
            .map(|(landmark, projection)| MeasurementResult {
                from: landmark.id,
                target: MeasurementTarget::CanalPath {
                    segment_index: projection.segment_index,
                    closest_point: projection.closest_point,
                },
                distance: projection.distance,
                computed_at,
            })
            .collect();

        for measurement in &measurements {
            self.host.display_result(measurement);
        }
        tracing::info!("📏 Measured {} landmarks against the canal", measurements.len());
        Ok(measurements)
    }

    /// Surgical depth between bone crest and nerve; also pushes the two reference planes.
    pub fn assess_depth(&mut self, bone: LandmarkId, nerve: LandmarkId) -> Result<DepthAssessment> {
        let result = self
            .store
            .get(bone)
            .and_then(|b| Ok((b.clone(), self.store.get(nerve)?.clone())));
        let (bone, nerve) = self.report(result)?;

        let planes = war_line_planes(&bone, &nerve, &self.settings.planes);
        self.host.display_planes(&planes);

        let assessment = assess(&bone, &nerve, &self.settings.thresholds, self.target);
        tracing::info!(
            "🦷 Surgical depth {:.2} mm: {}",
            assessment.depth_mm,
            assessment.complexity
        );
        self.host.display_assessment(&assessment);
        Ok(assessment)
    }

    pub fn save_landmarks<R: LandmarkRepository>(&mut self, repository: &R, path: &Path) -> Result<usize> {
        let records = self.store.to_records();
        let result = repository.save(path, &records);
        self.report(result)?;
        tracing::info!("💾 Saved {} landmarks to {}", records.len(), path.display());
        Ok(records.len())
    }

    /// Appends the landmarks stored at `path` to the session.
    pub fn load_landmarks<R: LandmarkRepository>(
        &mut self,
        repository: &R,
        path: &Path,
    ) -> Result<Vec<LandmarkId>> {
        let result = repository
            .load(path)
            .and_then(|records| self.store.extend_from_records(&records));
        let ids = self.report(result)?;
        tracing::info!("📂 Loaded {} landmarks from {}", ids.len(), path.display());
        Ok(ids)
    }

    /// Ends the session, dropping every landmark.
    pub fn close(&mut self) {
        tracing::debug!("Closing session with {} landmarks", self.store.len());
        self.store.clear();
    }

    fn compute_between(&self, from: LandmarkId, to: LandmarkId) -> Result<MeasurementResult> {
        let a = self.store.get(from)?;
        let b = self.store.get(to)?;
        Ok(MeasurementResult {
            from,
            target: MeasurementTarget::Landmark { id: to },
            distance: point_distance(a, b),
            computed_at: Utc::now(),
        })
    }

    fn compute_to_canal(&self, from: LandmarkId) -> Result<MeasurementResult> {
        let landmark = self.store.get(from)?;
        let path = self.host.canal_trace()?;
        let projection = closest_point_on_path(&landmark.position, &path)?;
        Ok(MeasurementResult {
            from,
            target: MeasurementTarget::CanalPath {
                segment_index: projection.segment_index,
                closest_point: projection.closest_point,
            },
            distance: projection.distance,
            computed_at: Utc::now(),
        })
    }

    fn check_resolution(&self, distance: Real) {
        let spacing = self.host.volume_spacing();
        if distance > 0.0 && distance < spacing.finest() {
            tracing::warn!(
                "⚠️ Distance {:.3} is below the voxel spacing {:.3}",
                distance,
                spacing.finest()
            );
        }
    }

    fn report<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            tracing::warn!("❌ {}", e);
            self.host.display_error(e);
        }
        result
    }
}
