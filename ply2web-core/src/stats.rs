//! Summary statistics printed after a point cloud is loaded

use crate::mesh::Mesh;
use crate::point::*;
use crate::point_cloud::Bounds;
use serde::Serialize;
use std::fmt;

/// Per-axis median of a point set
///
/// For an even number of points the two middle values of each axis are
/// averaged. An axis holding a NaN has a NaN median, matching the mean.
/// Returns `None` for an empty set.
pub fn median_point(points: &[Point3f]) -> Option<Point3f> {
    if points.is_empty() {
        return None;
    }

    let mut axis = Vec::with_capacity(points.len());
    let mut median = [0.0f32; 3];
    for (i, m) in median.iter_mut().enumerate() {
        axis.clear();
        axis.extend(points.iter().map(|p| p[i]));
        if axis.iter().any(|v| v.is_nan()) {
            *m = f32::NAN;
            continue;
        }
        axis.sort_by(|a, b| a.total_cmp(b));

        let mid = axis.len() / 2;
        *m = if axis.len() % 2 == 0 {
            (axis[mid - 1] + axis[mid]) / 2.0
        } else {
            axis[mid]
        };
    }

    Some(Point3f::new(median[0], median[1], median[2]))
}

/// Per-axis arithmetic mean of a point set, accumulated in `f64`
pub fn mean_point(points: &[Point3f]) -> Option<Point3f> {
    if points.is_empty() {
        return None;
    }

    let sum = points.iter().fold(Point3d::origin().coords, |acc, p| {
        acc + p.coords.cast::<f64>()
    });
    let mean = sum / points.len() as f64;
    Some(Point3f::from(mean.cast::<f32>()))
}

/// Length of the axis-aligned bounding box diagonal
pub fn bounding_diagonal(points: &[Point3f]) -> Option<f32> {
    Bounds::from_points(points).map(|b| b.diagonal())
}

/// Statistics of a loaded mesh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshStats {
    pub n_points: usize,
    pub n_faces: usize,
    pub has_rgb: bool,
    pub bounds: Bounds,
    pub center: Point3f,
    pub median: Point3f,
    pub mean: Point3f,
    pub diagonal: f32,
}

impl MeshStats {
    /// Compute statistics, `None` when the mesh has no points
    pub fn from_mesh(mesh: &Mesh) -> Option<Self> {
        let points = mesh.points.as_slice();
        let bounds = Bounds::from_points(points)?;

        Some(Self {
            n_points: mesh.n_points(),
            n_faces: mesh.n_faces(),
            has_rgb: mesh.has_rgb(),
            bounds,
            center: bounds.center(),
            median: median_point(points)?,
            mean: mean_point(points)?,
            diagonal: bounding_diagonal(points)?,
        })
    }
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "points={} faces={} rgb={} median=({:.4}, {:.4}, {:.4}) mean=({:.4}, {:.4}, {:.4}) diagonal={:.4}",
            self.n_points,
            self.n_faces,
            self.has_rgb,
            self.median.x,
            self.median.y,
            self.median.z,
            self.mean.x,
            self.mean.y,
            self.mean.z,
            self.diagonal
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn even_set() -> Vec<Point3f> {
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 2.0, 3.0),
            Point3f::new(2.0, 4.0, 1.0),
            Point3f::new(10.0, -1.0, 5.0),
        ]
    }

    fn odd_set() -> Vec<Point3f> {
        vec![
            Point3f::new(3.0, 1.0, 2.0),
            Point3f::new(1.0, 5.0, 0.0),
            Point3f::new(2.0, 2.0, 9.0),
        ]
    }

    // Reference values from numpy.median(points, axis=0) / numpy.mean(points, axis=0)
    #[test]
    fn test_median_even_count() {
        let median = median_point(&even_set()).unwrap();
        assert_relative_eq!(median.x, 1.5);
        assert_relative_eq!(median.y, 1.0);
        assert_relative_eq!(median.z, 2.0);
    }

    #[test]
    fn test_median_odd_count() {
        let median = median_point(&odd_set()).unwrap();
        assert_eq!(median, Point3f::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_mean() {
        let mean = mean_point(&even_set()).unwrap();
        assert_relative_eq!(mean.x, 3.25, epsilon = 1e-6);
        assert_relative_eq!(mean.y, 1.25, epsilon = 1e-6);
        assert_relative_eq!(mean.z, 2.25, epsilon = 1e-6);

        let mean = mean_point(&odd_set()).unwrap();
        assert_relative_eq!(mean.x, 2.0, epsilon = 1e-6);
        assert_relative_eq!(mean.y, 8.0 / 3.0, epsilon = 1e-6);
        assert_relative_eq!(mean.z, 11.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mean_large_offset_keeps_precision() {
        let points: Vec<Point3f> = (0..1000)
            .map(|i| Point3f::new(100_000.0 + (i % 2) as f32, 0.0, 0.0))
            .collect();
        let mean = mean_point(&points).unwrap();
        assert_relative_eq!(mean.x, 100_000.5, epsilon = 1e-3);
    }

    #[test]
    fn test_nan_axis_propagates_like_mean() {
        let points = vec![
            Point3f::new(f32::NAN, 1.0, 5.0),
            Point3f::new(1.0, 2.0, 6.0),
            Point3f::new(2.0, 3.0, 7.0),
        ];
        let median = median_point(&points).unwrap();
        let mean = mean_point(&points).unwrap();
        assert!(median.x.is_nan());
        assert!(mean.x.is_nan());
        assert_relative_eq!(median.y, 2.0);
        assert_relative_eq!(median.z, 6.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(median_point(&[]).is_none());
        assert!(mean_point(&[]).is_none());
        assert!(bounding_diagonal(&[]).is_none());
        assert!(MeshStats::from_mesh(&Mesh::new()).is_none());
    }

    #[test]
    fn test_bounding_diagonal() {
        // min (0,-1,0), max (10,4,5)
        let diagonal = bounding_diagonal(&even_set()).unwrap();
        assert_relative_eq!(diagonal, (100.0f32 + 25.0 + 25.0).sqrt(), epsilon = 1e-5);
    }

    #[test]
    fn test_mesh_stats() {
        let mesh = Mesh::from_points(odd_set());
        let stats = MeshStats::from_mesh(&mesh).unwrap();
        assert_eq!(stats.n_points, 3);
        assert_eq!(stats.n_faces, 0);
        assert!(!stats.has_rgb);
        assert_eq!(stats.center, Point3f::new(2.0, 3.0, 4.5));
        assert_eq!(stats.median, Point3f::new(2.0, 2.0, 2.0));

        let line = stats.to_string();
        assert!(line.starts_with("points=3 faces=0 rgb=false"));
        assert!(line.contains("median=(2.0000, 2.0000, 2.0000)"));
    }

    #[test]
    fn test_mesh_stats_serializes() {
        let stats = MeshStats::from_mesh(&Mesh::from_points(odd_set())).unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["n_points"], 3);
        assert_eq!(json["has_rgb"], false);
        assert!(json["median"].is_array());
    }
}
