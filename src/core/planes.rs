use crate::core::{Landmark, Position, Real, ReferencePlane, Vec3};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_finite, validate_range, Validate,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneSettings {
    /// Half the edge length; large enough to cut through the whole jaw.
    pub half_size_mm: Real,
    pub opacity: f32,
    pub amber_name: String,
    pub amber_color: [f32; 3],
    pub red_name: String,
    pub red_color: [f32; 3],
}

impl Default for PlaneSettings {
    fn default() -> Self {
        Self {
            half_size_mm: 60.0,
            opacity: 0.3,
            amber_name: "Amber_Line_Plane".to_string(),
            amber_color: [1.0, 0.6, 0.0],
            red_name: "Red_Line_Plane".to_string(),
            red_color: [1.0, 0.0, 0.0],
        }
    }
}

impl Validate for PlaneSettings {
    fn validate(&self) -> Result<()> {
        validate_positive_finite("planes.half_size_mm", self.half_size_mm)?;
        validate_range("planes.opacity", self.opacity, 0.0, 1.0)?;
        validate_non_empty_string("planes.amber_name", &self.amber_name)?;
        validate_non_empty_string("planes.red_name", &self.red_name)?;
        for (field, color) in [
            ("planes.amber_color", self.amber_color),
            ("planes.red_color", self.red_color),
        ] {
            for channel in color {
                validate_range(field, channel, 0.0, 1.0)?;
            }
        }
        Ok(())
    }
}

impl ReferencePlane {
    /// Axial square plane (normal +z) centred on `center`.
    pub fn axial(
        name: impl Into<String>,
        center: Position,
        half_size: Real,
        color: [f32; 3],
        opacity: f32,
    ) -> Self {
        let s = half_size;
        Self {
            name: name.into(),
            center,
            normal: Vec3::z(),
            origin: Position::new(center.x - s, center.y - s, center.z),
            point1: Position::new(center.x + s, center.y - s, center.z),
            point2: Position::new(center.x - s, center.y + s, center.z),
            color,
            opacity,
        }
    }
}

/// Amber plane at the bone crest level, red plane at the nerve level.
pub fn war_line_planes(
    bone: &Landmark,
    nerve: &Landmark,
    settings: &PlaneSettings,
) -> [ReferencePlane; 2] {
    [
        ReferencePlane::axial(
            settings.amber_name.clone(),
            bone.position,
            settings.half_size_mm,
            settings.amber_color,
            settings.opacity,
        ),
        ReferencePlane::axial(
            settings.red_name.clone(),
            nerve.position,
            settings.half_size_mm,
            settings.red_color,
            settings.opacity,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LandmarkStore;

    #[test]
    fn test_axial_plane_corners() {
        let plane = ReferencePlane::axial("p", Position::new(10.0, 20.0, -3.0), 60.0, [1.0, 0.0, 0.0], 0.3);
        assert_eq!(plane.origin, Position::new(-50.0, -40.0, -3.0));
        assert_eq!(plane.point1, Position::new(70.0, -40.0, -3.0));
        assert_eq!(plane.point2, Position::new(-50.0, 80.0, -3.0));
        assert_eq!(plane.normal, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_war_line_planes_follow_landmark_levels() {
        let mut store = LandmarkStore::new();
        let bone = store.add("bone", Position::new(0.0, 0.0, 12.0)).unwrap();
        let nerve = store.add("nerve", Position::new(1.0, 1.0, 4.0)).unwrap();

        let [amber, red] = war_line_planes(&bone, &nerve, &PlaneSettings::default());
        assert_eq!(amber.name, "Amber_Line_Plane");
        assert_eq!(amber.color, [1.0, 0.6, 0.0]);
        assert_eq!(amber.origin.z, 12.0);
        assert_eq!(red.name, "Red_Line_Plane");
        assert_eq!(red.point2.z, 4.0);
        assert_eq!(red.opacity, 0.3);
    }

    #[test]
    fn test_plane_settings_validation() {
        assert!(PlaneSettings::default().validate().is_ok());

        let mut settings = PlaneSettings::default();
        settings.opacity = 1.5;
        assert!(settings.validate().is_err());

        let mut settings = PlaneSettings::default();
        settings.red_color = [2.0, 0.0, 0.0];
        assert!(settings.validate().is_err());

        let mut settings = PlaneSettings::default();
        settings.amber_name = " ".to_string();
        assert!(settings.validate().is_err());
    }
}
