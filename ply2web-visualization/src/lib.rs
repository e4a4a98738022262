//! Visualization and rendering for ply2web
//!
//! - [`Plotter`]: the scene, holding named mesh actors and a camera
//! - [`Rasterizer`]: CPU point splatting used for screenshots, animations
//!   and the web view
//! - [`OrbitAnimation`]: camera keyframes around the mesh center, exported
//!   as an animated GIF
//! - [`DesktopViewer`]: interactive window rendered with wgpu

pub mod camera;
pub mod config;
pub mod plotter;
pub mod rasterizer;
pub mod animation;
pub mod gpu;
pub mod viewer;

pub use camera::*;
pub use config::*;
pub use plotter::*;
pub use rasterizer::*;
pub use animation::*;
pub use viewer::*;
