//! Uploaded files: stored in a scoped temporary file, then read back as a mesh

use crate::error::ApiError;
use ply2web_core::Mesh;
use std::io::Write;
use std::path::Path;

/// Name used when the browser sends no file name
pub const DEFAULT_UPLOAD_NAME: &str = "upload.ply";

/// Last path component of a client-supplied file name
pub fn sanitize_file_name(name: Option<&str>) -> String {
    name.and_then(|n| {
        // Browsers on Windows may send a full path
        let n = n.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(n);
        Path::new(n).file_name().and_then(|f| f.to_str())
    })
    .filter(|n| !n.is_empty())
    .unwrap_or(DEFAULT_UPLOAD_NAME)
    .to_string()
}

/// Write `bytes` to a temporary file ending in `file_name` and run `f` on its path
///
/// The file is deleted when this returns. Failing to store the bytes is
/// [`ApiError::Storage`]; an error from `f` is [`ApiError::BadUpload`].
pub fn with_temp_upload<T, F>(file_name: &str, bytes: &[u8], f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Path) -> ply2web_core::Result<T>,
{
    let mut file = tempfile::Builder::new()
        .prefix("ply2web-")
        .suffix(file_name)
        .tempfile()
        .map_err(ApiError::Storage)?;
    file.write_all(bytes)
        .and_then(|_| file.flush())
        .map_err(ApiError::Storage)?;
    f(file.path()).map_err(ApiError::BadUpload)
}

/// Store an upload and read it with the format its name implies
pub fn read_upload(file_name: &str, bytes: &[u8]) -> Result<Mesh, ApiError> {
    with_temp_upload(file_name, bytes, |path| ply2web_io::read_mesh(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ply2web_core::Error;

    const TRIANGLE: &str = "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
end_header
0 0 0
1 0 0
0 1 0
";

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name(Some("scan.ply")), "scan.ply");
        assert_eq!(sanitize_file_name(Some("../../etc/scan.ply")), "scan.ply");
        assert_eq!(sanitize_file_name(Some("C:\\Users\\me\\scan.ply")), "scan.ply");
        assert_eq!(sanitize_file_name(Some("")), DEFAULT_UPLOAD_NAME);
        assert_eq!(sanitize_file_name(None), DEFAULT_UPLOAD_NAME);
    }

    #[test]
    fn test_read_upload() {
        let mesh = read_upload("triangle.ply", TRIANGLE.as_bytes()).unwrap();
        assert_eq!(mesh.n_points(), 3);
    }

    #[test]
    fn test_temp_file_is_removed() {
        let path = with_temp_upload("triangle.ply", TRIANGLE.as_bytes(), |path| {
            assert!(path.exists());
            assert!(path.to_string_lossy().ends_with("triangle.ply"));
            Ok(path.to_path_buf())
        })
        .unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = read_upload("notes.txt", b"hello").unwrap_err();
        assert!(matches!(err, ApiError::BadUpload(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_unwritable_temp_file_is_a_server_error() {
        // A name with a directory separator makes the suffix point into a missing directory
        let err = with_temp_upload("missing-dir/cloud.ply", TRIANGLE.as_bytes(), |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, ApiError::Storage(_)));
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
