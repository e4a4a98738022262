//! PLY format support

use ply2web_core::{Error, Mesh, PointData, Point3f, Result, RGB_ARRAY};
use ply_rs::{
    parser::Parser,
    ply::{DefaultElement, Property},
};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Color property names, checked in order
const COLOR_PROPERTIES: [[&str; 3]; 2] = [
    ["red", "green", "blue"],
    ["diffuse_red", "diffuse_green", "diffuse_blue"],
];

pub struct PlyReader;

impl PlyReader {
    /// Read a mesh from a PLY file on disk
    pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mesh = Self::read_mesh_from_reader(&mut BufReader::new(file))?;
        log::debug!("read {} points from {}", mesh.n_points(), path.display());
        Ok(mesh)
    }

    /// Read a mesh from any buffered source (ASCII or binary PLY)
    pub fn read_mesh_from_reader<R: BufRead>(reader: &mut R) -> Result<Mesh> {
        let parser = Parser::<DefaultElement>::new();
        let ply = parser.read_ply(reader)?;

        let vertices = ply
            .payload
            .get("vertex")
            .ok_or_else(|| Error::InvalidData("PLY file has no vertex element".to_string()))?;

        let mut points = Vec::with_capacity(vertices.len());
        for vertex in vertices {
            let x = extract_property_value(vertex, "x")?;
            let y = extract_property_value(vertex, "y")?;
            let z = extract_property_value(vertex, "z")?;
            points.push(Point3f::new(x, y, z));
        }

        let mut mesh = Mesh::from_points(points);

        if let Some(colors) = extract_colors(vertices) {
            mesh.add_point_data(RGB_ARRAY, PointData::Rgb(colors))?;
        }

        if let Some(faces) = ply.payload.get("face") {
            mesh.faces = faces
                .iter()
                .map(extract_face_indices)
                .collect::<Result<Vec<_>>>()?;
        }

        Ok(mesh)
    }
}

/// Extract a property value as f32 from a PLY element
fn extract_property_value(element: &DefaultElement, name: &str) -> Result<f32> {
    scalar_as_f32(element.get(name)).ok_or_else(|| {
        Error::InvalidData(format!("Property '{}' not found or invalid type", name))
    })
}

fn scalar_as_f32(property: Option<&Property>) -> Option<f32> {
    match property? {
        Property::Char(v) => Some(*v as f32),
        Property::UChar(v) => Some(*v as f32),
        Property::Short(v) => Some(*v as f32),
        Property::UShort(v) => Some(*v as f32),
        Property::Int(v) => Some(*v as f32),
        Property::UInt(v) => Some(*v as f32),
        Property::Float(v) => Some(*v),
        Property::Double(v) => Some(*v as f32),
        _ => None,
    }
}

/// Convert a color channel to a byte; floating point channels are in `[0, 1]`
fn channel_as_u8(property: Option<&Property>) -> Option<u8> {
    let value = match property? {
        Property::UChar(v) => return Some(*v),
        Property::Float(v) => *v * 255.0,
        Property::Double(v) => (*v * 255.0) as f32,
        other => scalar_as_f32(Some(other))?,
    };
    Some(value.round().clamp(0.0, 255.0) as u8)
}

/// Read the per-vertex colors, `None` unless every vertex carries all three channels
fn extract_colors(vertices: &[DefaultElement]) -> Option<Vec<[u8; 3]>> {
    let first = vertices.first()?;
    let names = COLOR_PROPERTIES
        .iter()
        .find(|names| names.iter().all(|n| first.contains_key(*n)))?;

    vertices
        .iter()
        .map(|v| {
            Some([
                channel_as_u8(v.get(names[0]))?,
                channel_as_u8(v.get(names[1]))?,
                channel_as_u8(v.get(names[2]))?,
            ])
        })
        .collect()
}

/// Extract face indices from a PLY face element
fn extract_face_indices(element: &DefaultElement) -> Result<Vec<usize>> {
    let indices = match element
        .get("vertex_indices")
        .or_else(|| element.get("vertex_index"))
    {
        Some(Property::ListChar(v)) => v.iter().map(|&i| i as usize).collect(),
        Some(Property::ListUChar(v)) => v.iter().map(|&i| i as usize).collect(),
        Some(Property::ListShort(v)) => v.iter().map(|&i| i as usize).collect(),
        Some(Property::ListUShort(v)) => v.iter().map(|&i| i as usize).collect(),
        Some(Property::ListInt(v)) => v.iter().map(|&i| i as usize).collect(),
        Some(Property::ListUInt(v)) => v.iter().map(|&i| i as usize).collect(),
        _ => {
            return Err(Error::InvalidData("Face indices not found".to_string()));
        }
    };
    Ok(indices)
}
