use crate::core::distance::vertical_depth;
use crate::core::{Complexity, DepthAssessment, Landmark, Real, TargetTooth};
use crate::utils::error::{AnalyzerError, Result};
use crate::utils::validation::{validate_positive_finite, Validate};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Band limits for the bone crest to nerve vertical depth, in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthThresholds {
    /// Depths strictly below this are high complexity.
    pub high_below_mm: Real,
    /// Depths strictly below this (and not high) are moderate.
    pub moderate_below_mm: Real,
}

impl Default for DepthThresholds {
    fn default() -> Self {
        Self {
            high_below_mm: 2.0,
            moderate_below_mm: 5.0,
        }
    }
}

impl DepthThresholds {
    pub fn classify(&self, depth_mm: Real) -> Complexity {
        if depth_mm < self.high_below_mm {
            Complexity::High
        } else if depth_mm < self.moderate_below_mm {
            Complexity::Moderate
        } else {
            Complexity::Low
        }
    }
}

impl Validate for DepthThresholds {
    fn validate(&self) -> Result<()> {
        validate_positive_finite("classification.high_below_mm", self.high_below_mm)?;
        validate_positive_finite("classification.moderate_below_mm", self.moderate_below_mm)?;
        if self.high_below_mm >= self.moderate_below_mm {
            return Err(AnalyzerError::InvalidConfigValueError {
                field: "classification.moderate_below_mm".to_string(),
                value: self.moderate_below_mm.to_string(),
                reason: format!(
                    "Must be greater than high_below_mm ({})",
                    self.high_below_mm
                ),
            });
        }
        Ok(())
    }
}

/// Winter's WAR-line style depth: vertical distance from the alveolar crest
/// (amber line) down to the inferior alveolar nerve (red line).
pub fn assess(
    bone: &Landmark,
    nerve: &Landmark,
    thresholds: &DepthThresholds,
    target: Option<TargetTooth>,
) -> DepthAssessment {
    let depth_mm = vertical_depth(bone, nerve);
    let complexity = thresholds.classify(depth_mm);
    tracing::debug!(
        "Depth {:.2} mm between {} and {} classified as {:?}",
        depth_mm,
        bone.id,
        nerve.id,
        complexity
    );

    DepthAssessment {
        target,
        bone: bone.id,
        nerve: nerve.id,
        depth_mm,
        complexity,
        computed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LandmarkStore, Position};

    #[test]
    fn test_classification_boundaries() {
        let t = DepthThresholds::default();
        assert_eq!(t.classify(0.0), Complexity::High);
        assert_eq!(t.classify(1.99), Complexity::High);
        assert_eq!(t.classify(2.0), Complexity::Moderate);
        assert_eq!(t.classify(4.99), Complexity::Moderate);
        assert_eq!(t.classify(5.0), Complexity::Low);
        assert_eq!(t.classify(12.0), Complexity::Low);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(DepthThresholds::default().validate().is_ok());

        let inverted = DepthThresholds {
            high_below_mm: 5.0,
            moderate_below_mm: 2.0,
        };
        assert!(inverted.validate().is_err());

        let negative = DepthThresholds {
            high_below_mm: -1.0,
            moderate_below_mm: 2.0,
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_assess_uses_vertical_depth_only() {
        let mut store = LandmarkStore::new();
        let bone = store.add("bone", Position::new(0.0, 0.0, 10.0)).unwrap();
        let nerve = store.add("nerve", Position::new(30.0, -20.0, 7.0)).unwrap();

        let result = assess(&bone, &nerve, &DepthThresholds::default(), None);
        assert_eq!(result.bone, bone.id);
        assert_eq!(result.nerve, nerve.id);
        assert!((result.depth_mm - 3.0).abs() < 1e-12);
        assert_eq!(result.complexity, Complexity::Moderate);
    }

    #[test]
    fn test_assess_keeps_target() {
        let mut store = LandmarkStore::new();
        let bone = store.add("bone", Position::new(0.0, 0.0, 0.5)).unwrap();
        let nerve = store.add("nerve", Position::new(0.0, 0.0, 0.0)).unwrap();
        let result = assess(
            &bone,
            &nerve,
            &DepthThresholds::default(),
            Some(TargetTooth::LowerRightWisdom),
        );
        assert_eq!(result.target, Some(TargetTooth::LowerRightWisdom));
        assert_eq!(result.complexity, Complexity::High);
    }
}
