//! I/O operations for point clouds
//!
//! PLY is the only supported format. Meshes can be read from a path or from
//! any buffered reader.

pub mod ply;

pub use ply::PlyReader;

use ply2web_core::{Error, Mesh, Result};
use std::path::Path;

/// Auto-detect format and read a mesh
pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        Some("ply") => PlyReader::read_mesh(path),
        _ => Err(Error::UnsupportedFormat(format!(
            "Unsupported point cloud format: {:?}",
            path.extension()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_mesh_rejects_other_extensions() {
        let err = read_mesh("cloud.xyz").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_read_mesh_missing_file() {
        let err = read_mesh("definitely/not/here.ply").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_read_mesh_uppercase_extension() {
        let mut file = tempfile::Builder::new().suffix(".PLY").tempfile().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"ply\nformat ascii 1.0\nelement vertex 2\nproperty float x\nproperty float y\nproperty float z\nend_header\n0 0 0\n1 2 3\n",
        )
        .unwrap();

        let mesh = read_mesh(file.path()).unwrap();
        assert_eq!(mesh.n_points(), 2);
        assert!(!mesh.has_rgb());
    }
}
