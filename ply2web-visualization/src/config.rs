//! Rendering configuration

use ply2web_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted width or height for off-screen renders
pub const MAX_WINDOW_DIMENSION: u32 = 16384;

/// Settings shared by the off-screen renderer, the desktop window and the web view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Splat size in pixels
    pub point_size: f32,
    pub background_color: [u8; 3],
    /// Color of points that are added without an RGB array
    pub default_point_color: [u8; 3],
    /// Width and height of screenshots, animations and the desktop window
    pub window_size: [u32; 2],
    pub animation: AnimationConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            point_size: 5.0,
            background_color: [76, 76, 76],
            default_point_color: [173, 216, 230],
            window_size: [1024, 768],
            animation: AnimationConfig::default(),
        }
    }
}

/// Orbit animation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Number of keyframes in one full turn
    pub frames: usize,
    /// Camera elevation above the reset view, in degrees
    pub elevation: f32,
    /// Delay between frames in milliseconds
    pub frame_delay_ms: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frames: 36,
            elevation: 0.0,
            frame_delay_ms: 100,
        }
    }
}

impl RenderConfig {
    /// Load from a TOML file; missing keys keep their defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => {}
            _ => {
                return Err(Error::UnsupportedFormat(format!(
                    "config must be a .toml file: {}",
                    path.display()
                )))
            }
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| Error::InvalidData(e.to_string()))?;
        let [width, height] = config.window_size;
        if !(1..=MAX_WINDOW_DIMENSION).contains(&width) || !(1..=MAX_WINDOW_DIMENSION).contains(&height) {
            return Err(Error::InvalidData(format!(
                "window_size {}x{} outside 1..={}",
                width, height, MAX_WINDOW_DIMENSION
            )));
        }
        Ok(config)
    }
}
