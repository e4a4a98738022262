//! Core data structures for ply2web
//!
//! This crate provides the point and mesh types shared by the reader, the
//! renderers and the web server, plus the summary statistics shown after a
//! point cloud is loaded.

pub mod point;
pub mod point_cloud;
pub mod mesh;
pub mod stats;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use mesh::*;
pub use stats::*;
pub use error::*;
