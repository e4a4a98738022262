//! Mesh data structures
//!
//! A [`Mesh`] is what a PLY file loads into: the vertex positions, any face
//! lists, and a set of named per-point arrays. Colors read from the file are
//! stored as the [`RGB_ARRAY`] array.

use crate::error::{Error, Result};
use crate::point::*;
use crate::point_cloud::{Bounds, ColoredPointCloud3f, PointCloud};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the per-point color array
pub const RGB_ARRAY: &str = "RGB";

/// A named per-point array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointData {
    Rgb(Vec<[u8; 3]>),
    Scalars(Vec<f32>),
}

impl PointData {
    pub fn len(&self) -> usize {
        match self {
            PointData::Rgb(values) => values.len(),
            PointData::Scalars(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Points with optional faces and named point data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub points: PointCloud<Point3f>,
    pub faces: Vec<Vec<usize>>,
    pub point_data: BTreeMap<String, PointData>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Point3f>) -> Self {
        Self {
            points: PointCloud::from_points(points),
            ..Self::default()
        }
    }

    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Attach a per-point array; its length must match the point count
    pub fn add_point_data(&mut self, name: impl Into<String>, data: PointData) -> Result<()> {
        let name = name.into();
        if data.len() != self.n_points() {
            return Err(Error::InvalidData(format!(
                "array '{}' has {} values but the mesh has {} points",
                name,
                data.len(),
                self.n_points()
            )));
        }
        self.point_data.insert(name, data);
        Ok(())
    }

    pub fn point_data(&self, name: &str) -> Option<&PointData> {
        self.point_data.get(name)
    }

    /// The RGB array, if present
    pub fn rgb(&self) -> Option<&[[u8; 3]]> {
        match self.point_data.get(RGB_ARRAY) {
            Some(PointData::Rgb(colors)) => Some(colors),
            _ => None,
        }
    }

    pub fn has_rgb(&self) -> bool {
        self.rgb().is_some()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.points.bounds()
    }

    /// Pair each point with the color stored in the array `name`
    pub fn colored_points(&self, name: &str) -> Result<ColoredPointCloud3f> {
        let colors = match self.point_data.get(name) {
            Some(PointData::Rgb(colors)) => colors,
            Some(PointData::Scalars(_)) => {
                return Err(Error::InvalidData(format!(
                    "array '{}' holds scalars, not RGB triples",
                    name
                )))
            }
            None => return Err(Error::MissingArray(name.to_string())),
        };

        Ok(self
            .points
            .iter()
            .zip(colors)
            .map(|(p, c)| ColoredPoint3f::new(*p, *c))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        Mesh::from_points(vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        ])
    }

    #[test]
    fn test_add_point_data_length_mismatch() {
        let mut mesh = triangle();
        let err = mesh
            .add_point_data(RGB_ARRAY, PointData::Rgb(vec![[0, 0, 0]]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(!mesh.has_rgb());
    }

    #[test]
    fn test_colored_points() {
        let mut mesh = triangle();
        mesh.add_point_data(
            RGB_ARRAY,
            PointData::Rgb(vec![[255, 0, 0], [0, 255, 0], [0, 0, 255]]),
        )
        .unwrap();

        let colored = mesh.colored_points(RGB_ARRAY).unwrap();
        assert_eq!(colored.len(), 3);
        assert_eq!(colored[1].color, [0, 255, 0]);
        assert_eq!(colored[2].position, Point3f::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_colored_points_missing_array() {
        let mesh = triangle();
        match mesh.colored_points(RGB_ARRAY) {
            Err(Error::MissingArray(name)) => assert_eq!(name, "RGB"),
            other => panic!("expected MissingArray, got {:?}", other),
        }
    }

    #[test]
    fn test_colored_points_rejects_scalars() {
        let mut mesh = triangle();
        mesh.add_point_data("intensity", PointData::Scalars(vec![0.1, 0.2, 0.3]))
            .unwrap();
        assert!(matches!(
            mesh.colored_points("intensity"),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        assert!(Mesh::new().bounds().is_none());
    }
}
