use crate::utils::error::{AnalyzerError, Result};
use chrono::{DateTime, Utc};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type Real = f64;
pub type Vec3 = Vector3<Real>;

/// 宿主座標系中的位置，單位與宿主一致 (通常為 mm)
pub type Position = Point3<Real>;

/// Builds a position, rejecting non-finite or out-of-range components.
pub fn checked_position(x: Real, y: Real, z: Real) -> Result<Position> {
    let position = Position::new(x, y, z);
    ensure_finite(&position)?;
    Ok(position)
}

/// Largest accepted coordinate magnitude. Squared differences of bounded
/// coordinates stay well inside `f64` range, so every distance is finite.
pub const MAX_COORDINATE: Real = 1e150;

/// Rejects NaN, infinite and out-of-range components.
pub fn ensure_finite(position: &Position) -> Result<()> {
    if position
        .coords
        .iter()
        .all(|c| c.is_finite() && c.abs() <= MAX_COORDINATE)
    {
        Ok(())
    } else {
        Err(AnalyzerError::InvalidPosition {
            x: position.x,
            y: position.y,
            z: position.z,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkId(pub(crate) u64);

impl LandmarkId {
    const PREFIX: &'static str = "lm-";
}

impl fmt::Display for LandmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl FromStr for LandmarkId {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        s.strip_prefix(Self::PREFIX)
            .and_then(|n| n.parse::<u64>().ok())
            .map(LandmarkId)
            .ok_or_else(|| AnalyzerError::not_found(s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub id: LandmarkId,
    pub label: String,
    pub position: Position,
    pub created_at: DateTime<Utc>,
}

impl Landmark {
    pub fn to_record(&self) -> LandmarkRecord {
        LandmarkRecord {
            label: self.label.clone(),
            x: self.position.x,
            y: self.position.y,
            z: self.position.z,
        }
    }
}

/// Persisted form of a landmark. Ids and timestamps are session-local and not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkRecord {
    pub label: String,
    pub x: Real,
    pub y: Real,
    pub z: Real,
}

impl LandmarkRecord {
    pub fn position(&self) -> Result<Position> {
        checked_position(self.x, self.y, self.z)
    }
}

/// Ordered polyline approximating the mandibular canal centreline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Position>", into = "Vec<Position>")]
pub struct CanalPath {
    points: Vec<Position>,
}

impl CanalPath {
    pub fn new(points: Vec<Position>) -> Result<Self> {
        for point in &points {
            ensure_finite(point)?;
        }
        Ok(Self { points })
    }

    pub fn from_records(records: &[LandmarkRecord]) -> Result<Self> {
        let points = records
            .iter()
            .map(LandmarkRecord::position)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Position] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive point pairs. Empty for paths with fewer than two points.
    pub fn segments(&self) -> impl Iterator<Item = (&Position, &Position)> + '_ {
        self.points.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Arc length along the polyline.
    pub fn length(&self) -> Real {
        self.segments().map(|(a, b)| (b - a).norm()).sum()
    }
}

impl TryFrom<Vec<Position>> for CanalPath {
    type Error = AnalyzerError;

    fn try_from(points: Vec<Position>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<CanalPath> for Vec<Position> {
    fn from(path: CanalPath) -> Self {
        path.points
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MeasurementTarget {
    Landmark { id: LandmarkId },
    CanalPath {
        segment_index: usize,
        closest_point: Position,
    },
}

/// 量測結果；輸入改變時產生新的結果，不會就地更新
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    pub from: LandmarkId,
    pub target: MeasurementTarget,
    pub distance: Real,
    pub computed_at: DateTime<Utc>,
}

impl fmt::Display for MeasurementResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            MeasurementTarget::Landmark { id } => {
                write!(f, "{} -> {}: {:.2} mm", self.from, id, self.distance)
            }
            MeasurementTarget::CanalPath { segment_index, .. } => write!(
                f,
                "{} -> canal (segment {}): {:.2} mm",
                self.from, segment_index, self.distance
            ),
        }
    }
}

/// Voxel spacing reported by the host volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeSpacing {
    pub sx: Real,
    pub sy: Real,
    pub sz: Real,
}

impl VolumeSpacing {
    pub fn new(sx: Real, sy: Real, sz: Real) -> Result<Self> {
        for (field, value) in [("sx", sx), ("sy", sy), ("sz", sz)] {
            crate::utils::validation::validate_positive_finite(field, value)?;
        }
        Ok(Self { sx, sy, sz })
    }

    /// Finest spacing along any axis; distances below it are sub-voxel.
    pub fn finest(&self) -> Real {
        self.sx.min(self.sy).min(self.sz)
    }

    pub fn is_isotropic(&self) -> bool {
        let tol = 1e-9 * self.sx.max(self.sy).max(self.sz);
        (self.sx - self.sy).abs() <= tol && (self.sy - self.sz).abs() <= tol
    }
}

impl Default for VolumeSpacing {
    fn default() -> Self {
        Self {
            sx: 1.0,
            sy: 1.0,
            sz: 1.0,
        }
    }
}

/// Surgical complexity band derived from the bone-to-nerve vertical depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    High,
    Moderate,
    Low,
}

impl Complexity {
    /// Display colour used by the host for the result panel.
    pub fn highlight_color(&self) -> &'static str {
        match self {
            Complexity::High => "#ffcccc",
            Complexity::Moderate => "#fff4cc",
            Complexity::Low => "#ccffcc",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Complexity::High => write!(f, "HIGH COMPLEXITY (Red)"),
            Complexity::Moderate => write!(f, "MODERATE COMPLEXITY (Amber)"),
            Complexity::Low => write!(f, "LOW COMPLEXITY (White)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthAssessment {
    pub target: Option<TargetTooth>,
    pub bone: LandmarkId,
    pub nerve: LandmarkId,
    pub depth_mm: Real,
    pub complexity: Complexity,
    pub computed_at: DateTime<Utc>,
}

impl fmt::Display for DepthAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(target) = self.target {
            writeln!(f, "Target: {}", target)?;
        }
        write!(
            f,
            "Surgical Depth: {:.2} mm\nPrediction: {}",
            self.depth_mm, self.complexity
        )
    }
}

/// Flat square plane handed to the host for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePlane {
    pub name: String,
    pub center: Position,
    pub normal: Vec3,
    pub origin: Position,
    pub point1: Position,
    pub point2: Position,
    pub color: [f32; 3],
    pub opacity: f32,
}

/// Teeth and structures the host may select as the analysis target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetTooth {
    LowerLeftWisdom,
    LowerRightWisdom,
    Mandible,
    Nerve,
}

impl TargetTooth {
    pub const ALL: [TargetTooth; 4] = [
        TargetTooth::LowerLeftWisdom,
        TargetTooth::LowerRightWisdom,
        TargetTooth::Mandible,
        TargetTooth::Nerve,
    ];

    /// Segment code used by dental segmentation output (FDI numbering for teeth).
    pub fn code(&self) -> &'static str {
        match self {
            TargetTooth::LowerLeftWisdom => "38",
            TargetTooth::LowerRightWisdom => "48",
            TargetTooth::Mandible => "mandible",
            TargetTooth::Nerve => "nerve",
        }
    }
}

impl fmt::Display for TargetTooth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetTooth::LowerLeftWisdom => write!(f, "Lower Left Wisdom (38)"),
            TargetTooth::LowerRightWisdom => write!(f, "Lower Right Wisdom (48)"),
            TargetTooth::Mandible => write!(f, "Mandible (Bone)"),
            TargetTooth::Nerve => write!(f, "Inferior Alveolar Nerve"),
        }
    }
}

impl FromStr for TargetTooth {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim().to_ascii_lowercase();
        TargetTooth::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| AnalyzerError::InvalidConfigValueError {
                field: "target".to_string(),
                value: s.to_string(),
                reason: "Expected one of 38, 48, mandible, nerve".to_string(),
            })
    }
}
