use crate::core::{ensure_finite, Landmark, LandmarkId, LandmarkRecord, Position};
use crate::utils::error::{AnalyzerError, Result};
use chrono::Utc;
use std::collections::BTreeMap;

/// Owning collection of the landmarks placed in the current session.
///
/// Ids come from a monotonically increasing counter, so key order in the map
/// is insertion order and an id is never handed out twice.
#[derive(Debug, Default, Clone)]
pub struct LandmarkStore {
    landmarks: BTreeMap<LandmarkId, Landmark>,
    next_id: u64,
}

impl LandmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: impl Into<String>, position: Position) -> Result<Landmark> {
        ensure_finite(&position)?;

        self.next_id += 1;
        let landmark = Landmark {
            id: LandmarkId(self.next_id),
            label: label.into(),
            position,
            created_at: Utc::now(),
        };

        tracing::debug!(
            "Added landmark {} '{}' at ({:.2}, {:.2}, {:.2})",
            landmark.id,
            landmark.label,
            position.x,
            position.y,
            position.z
        );
        self.landmarks.insert(landmark.id, landmark.clone());
        Ok(landmark)
    }

    pub fn remove(&mut self, id: LandmarkId) -> Result<Landmark> {
        let removed = self
            .landmarks
            .remove(&id)
            .ok_or_else(|| AnalyzerError::not_found(id))?;
        tracing::debug!("Removed landmark {} '{}'", removed.id, removed.label);
        Ok(removed)
    }

    pub fn get(&self, id: LandmarkId) -> Result<&Landmark> {
        self.landmarks
            .get(&id)
            .ok_or_else(|| AnalyzerError::not_found(id))
    }

    /// Moves an existing landmark. Results computed earlier keep their old values.
    pub fn move_to(&mut self, id: LandmarkId, position: Position) -> Result<Landmark> {
        ensure_finite(&position)?;
        let landmark = self
            .landmarks
            .get_mut(&id)
            .ok_or_else(|| AnalyzerError::not_found(id))?;
        landmark.position = position;
        tracing::debug!("Moved landmark {} '{}'", landmark.id, landmark.label);
        Ok(landmark.clone())
    }

    /// First landmark, in insertion order, carrying `label`.
    pub fn find_by_label(&self, label: &str) -> Result<&Landmark> {
        self.landmarks
            .values()
            .find(|l| l.label == label)
            .ok_or_else(|| AnalyzerError::LabelNotFound {
                label: label.to_string(),
            })
    }

    /// Accepts either an `lm-<n>` id or a label. An id that matches nothing
    /// is retried as a label before reporting `NotFound`.
    pub fn resolve(&self, key: &str) -> Result<&Landmark> {
        match key.parse::<LandmarkId>() {
            Ok(id) => self.get(id).or_else(|e| self.find_by_label(key).map_err(|_| e)),
            Err(_) => self.find_by_label(key),
        }
    }

    pub fn list(&self) -> impl Iterator<Item = &Landmark> + '_ {
        self.landmarks.values()
    }

    /// Immutable copy for batch measurements.
    pub fn snapshot(&self) -> Vec<Landmark> {
        self.landmarks.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Drops every landmark. The id counter keeps running.
    pub fn clear(&mut self) {
        self.landmarks.clear();
    }

    pub fn to_records(&self) -> Vec<LandmarkRecord> {
        self.landmarks.values().map(Landmark::to_record).collect()
    }

    /// Adds every record or none of them.
    pub fn extend_from_records(&mut self, records: &[LandmarkRecord]) -> Result<Vec<LandmarkId>> {
        let positions = records
            .iter()
            .map(LandmarkRecord::position)
            .collect::<Result<Vec<_>>>()?;

        let mut ids = Vec::with_capacity(records.len());
        for (record, position) in records.iter().zip(positions) {
            ids.push(self.add(record.label.clone(), position)?.id);
        }
        Ok(ids)
    }
}
