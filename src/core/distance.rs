//! Distance engine: pure functions over landmarks and canal paths.
//!
//! Distances are returned in the units of the input coordinates. The host is
//! responsible for supplying positions already scaled by the volume spacing.

use crate::core::{CanalPath, Landmark, Position, Real};
use crate::utils::error::{AnalyzerError, Result};

/// Closest approach of a point to a canal path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathProjection {
    pub segment_index: usize,
    pub closest_point: Position,
    pub distance: Real,
}

pub fn point_distance(a: &Landmark, b: &Landmark) -> Real {
    euclidean(&a.position, &b.position)
}

pub fn point_to_path_distance(p: &Landmark, path: &CanalPath) -> Result<Real> {
    Ok(closest_point_on_path(&p.position, path)?.distance)
}

/// 垂直深度：只比較 z 軸 (軸向切面高度差)
pub fn vertical_depth(a: &Landmark, b: &Landmark) -> Real {
    (a.position.z - b.position.z).abs()
}

pub fn euclidean(a: &Position, b: &Position) -> Real {
    (b - a).norm()
}

/// Projects `p` onto every segment and keeps the nearest. Ties go to the lowest segment index.
pub fn closest_point_on_path(p: &Position, path: &CanalPath) -> Result<PathProjection> {
    if path.len() < 2 {
        return Err(AnalyzerError::EmptyPath { points: path.len() });
    }

    let mut best: Option<PathProjection> = None;
    for (segment_index, (a, b)) in path.segments().enumerate() {
        let closest_point = closest_point_on_segment(p, a, b);
        let distance = euclidean(p, &closest_point);
        if best.map_or(true, |current| distance < current.distance) {
            best = Some(PathProjection {
                segment_index,
                closest_point,
                distance,
            });
        }
    }

    best.ok_or(AnalyzerError::EmptyPath { points: path.len() })
}

/// Zero-length segments collapse to their start point.
pub fn closest_point_on_segment(p: &Position, a: &Position, b: &Position) -> Position {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return *a;
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}

/// Canal distance for each landmark of a snapshot, in snapshot order.
pub fn distances_to_path(
    landmarks: &[Landmark],
    path: &CanalPath,
) -> Result<Vec<(Landmark, PathProjection)>> {
    landmarks
        .iter()
        .map(|l| Ok((l.clone(), closest_point_on_path(&l.position, path)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LandmarkStore;

    const EPS: f64 = 1e-9;

    fn sample_landmarks() -> Vec<Landmark> {
        let mut store = LandmarkStore::new();
        let coords = [
            (0.0, 0.0, 0.0),
            (12.0, 34.0, 5.0),
            (-3.5, 2.25, 8.0),
            (1e3, -1e3, 0.5),
            (0.1, 0.1, 0.1),
            (0.0, 0.0, 0.0),
        ];
        for (i, (x, y, z)) in coords.into_iter().enumerate() {
            store.add(format!("p{}", i), Position::new(x, y, z)).unwrap();
        }
        store.snapshot()
    }

    fn path(points: &[(f64, f64, f64)]) -> CanalPath {
        CanalPath::new(points.iter().map(|&(x, y, z)| Position::new(x, y, z)).collect()).unwrap()
    }

    #[test]
    fn test_point_distance_is_symmetric_and_zero_on_self() {
        let landmarks = sample_landmarks();
        for a in &landmarks {
            assert_eq!(point_distance(a, a), 0.0);
            for b in &landmarks {
                assert_eq!(point_distance(a, b), point_distance(b, a));
            }
        }
        // coincident but distinct landmarks
        assert_eq!(point_distance(&landmarks[0], &landmarks[5]), 0.0);
    }

    #[test]
    fn test_triangle_inequality() {
        let landmarks = sample_landmarks();
        for a in &landmarks {
            for b in &landmarks {
                for c in &landmarks {
                    let direct = point_distance(a, c);
                    let detour = point_distance(a, b) + point_distance(b, c);
                    assert!(direct <= detour + EPS * detour.max(1.0));
                }
            }
        }
    }

    #[test]
    fn test_point_distance_value() {
        let landmarks = sample_landmarks();
        let d = euclidean(&Position::new(0.0, 0.0, 0.0), &Position::new(3.0, 4.0, 12.0));
        assert!((d - 13.0).abs() < EPS);
        assert!((point_distance(&landmarks[0], &landmarks[4]) - (0.03f64).sqrt()).abs() < EPS);
    }

    #[test]
    fn test_single_segment_path_distance() {
        let mut store = LandmarkStore::new();
        let p = store.add("p", Position::new(5.0, 5.0, 0.0)).unwrap();
        let canal = path(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0)]);

        assert!((point_to_path_distance(&p, &canal).unwrap() - 5.0).abs() < EPS);
        let proj = closest_point_on_path(&p.position, &canal).unwrap();
        assert_eq!(proj.segment_index, 0);
        assert_eq!(proj.closest_point, Position::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_apex_to_canal_scenario() {
        let mut store = LandmarkStore::new();
        let apex = store.add("apex", Position::new(12.0, 34.0, 5.0)).unwrap();
        let canal = path(&[(12.0, 34.0, 0.0), (12.0, 34.0, -5.0)]);
        assert!((point_to_path_distance(&apex, &canal).unwrap() - 5.0).abs() < EPS);
    }

    #[test]
    fn test_short_paths_fail_with_empty_path() {
        let mut store = LandmarkStore::new();
        let p = store.add("p", Position::new(1.0, 1.0, 1.0)).unwrap();

        let empty = CanalPath::default();
        assert!(matches!(
            point_to_path_distance(&p, &empty),
            Err(AnalyzerError::EmptyPath { points: 0 })
        ));

        let single = path(&[(0.0, 0.0, 0.0)]);
        assert!(matches!(
            point_to_path_distance(&p, &single),
            Err(AnalyzerError::EmptyPath { points: 1 })
        ));
    }

    #[test]
    fn test_projection_clamps_to_segment_ends() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(10.0, 0.0, 0.0);
        assert_eq!(closest_point_on_segment(&Position::new(-4.0, 3.0, 0.0), &a, &b), a);
        assert_eq!(closest_point_on_segment(&Position::new(13.0, 4.0, 0.0), &a, &b), b);
    }

    #[test]
    fn test_zero_length_segment_is_point_distance() {
        let canal = path(&[(1.0, 1.0, 1.0), (1.0, 1.0, 1.0)]);
        let proj = closest_point_on_path(&Position::new(1.0, 1.0, 4.0), &canal).unwrap();
        assert!((proj.distance - 3.0).abs() < EPS);
    }

    #[test]
    fn test_multi_segment_picks_nearest() {
        // L-shaped canal: along x then down in z
        let canal = path(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (10.0, 0.0, -10.0)]);
        let proj = closest_point_on_path(&Position::new(11.0, 0.0, -6.0), &canal).unwrap();
        assert_eq!(proj.segment_index, 1);
        assert!((proj.distance - 1.0).abs() < EPS);

        // the shared vertex is equidistant to both segments; first one wins
        let corner = closest_point_on_path(&Position::new(12.0, 0.0, 2.0), &canal).unwrap();
        assert_eq!(corner.segment_index, 0);
    }

    #[test]
    fn test_distances_stay_finite_at_coordinate_limits() {
        use crate::core::MAX_COORDINATE;

        let mut store = LandmarkStore::new();
        let origin = store.add("origin", Position::origin()).unwrap();
        let far = store
            .add("far", Position::new(MAX_COORDINATE, -MAX_COORDINATE, MAX_COORDINATE))
            .unwrap();
        assert!(store.add("too far", Position::new(1e200, 0.0, 0.0)).is_err());

        let d = point_distance(&origin, &far);
        assert!(d.is_finite() && d > 0.0);

        let canal = path(&[(-MAX_COORDINATE, 1.0, 0.0), (MAX_COORDINATE, 1.0, 0.0)]);
        let on_path = point_to_path_distance(&origin, &canal).unwrap();
        assert!(on_path.is_finite());
        assert!((on_path - 1.0).abs() < 1.0);

        assert!(CanalPath::new(vec![
            Position::new(-1e200, 1.0, 0.0),
            Position::new(1e200, 1.0, 0.0)
        ])
        .is_err());
    }

    #[test]
    fn test_vertical_depth_ignores_xy() {
        let mut store = LandmarkStore::new();
        let bone = store.add("bone", Position::new(10.0, 20.0, 3.0)).unwrap();
        let nerve = store.add("nerve", Position::new(-5.0, 7.0, -1.5)).unwrap();
        assert!((vertical_depth(&bone, &nerve) - 4.5).abs() < EPS);
        assert_eq!(vertical_depth(&bone, &nerve), vertical_depth(&nerve, &bone));
    }

    #[test]
    fn test_distances_to_path_follows_snapshot_order() {
        let landmarks = sample_landmarks();
        let canal = path(&[(0.0, 0.0, 0.0), (0.0, 0.0, 1.0)]);
        let results = distances_to_path(&landmarks, &canal).unwrap();
        assert_eq!(results.len(), landmarks.len());
        assert_eq!(results[0].0.label, "p0");
        assert_eq!(results[0].1.distance, 0.0);

        assert!(distances_to_path(&landmarks, &CanalPath::default()).is_err());
    }
}
