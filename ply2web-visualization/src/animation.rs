//! Orbit animation around the mesh center, exported as an animated GIF

use crate::camera::Camera;
use crate::config::AnimationConfig;
use crate::plotter::Plotter;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame};
use ply2web_core::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// NeuQuant sampling factor; 1 is best quality, 30 fastest
const GIF_QUANTIZER_SPEED: i32 = 10;

/// One full turn of the camera around its focal point
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitAnimation {
    pub frames: usize,
    /// Degrees above the starting view
    pub elevation: f32,
    pub delay_ms: u32,
}

impl OrbitAnimation {
    pub fn new(frames: usize) -> Self {
        Self {
            frames,
            ..Self::from(&AnimationConfig::default())
        }
    }

    /// Cameras evenly spaced over 360 degrees of azimuth around `camera`'s focal point
    pub fn keyframes(&self, camera: &Camera) -> Result<Vec<Camera>> {
        if self.frames == 0 {
            return Err(Error::InvalidData(
                "an orbit animation needs at least one frame".to_string(),
            ));
        }

        let mut start = camera.clone();
        start.orbit(0.0, self.elevation);

        let step = 360.0 / self.frames as f32;
        Ok((0..self.frames)
            .map(|i| {
                let mut keyframe = start.clone();
                keyframe.orbit(step * i as f32, 0.0);
                keyframe
            })
            .collect())
    }

    /// Render every keyframe at the configured window size and encode a looping GIF
    pub fn encode_gif<W: Write>(&self, plotter: &Plotter, writer: W) -> Result<()> {
        let keyframes = self.keyframes(plotter.camera())?;
        let [width, height] = plotter.config().window_size;

        let mut encoder = GifEncoder::new_with_speed(writer, GIF_QUANTIZER_SPEED);
        encoder.set_repeat(Repeat::Infinite).map_err(image_error)?;

        for (i, camera) in keyframes.iter().enumerate() {
            let rgba = DynamicImage::ImageRgb8(plotter.render_with_camera(camera, width, height))
                .into_rgba8();
            let frame = Frame::from_parts(rgba, 0, 0, Delay::from_numer_denom_ms(self.delay_ms, 1));
            encoder.encode_frame(frame).map_err(image_error)?;
            log::debug!("encoded frame {}/{}", i + 1, keyframes.len());
        }
        Ok(())
    }

    pub fn write_gif<P: AsRef<Path>>(&self, plotter: &Plotter, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.encode_gif(plotter, &mut writer)?;
        writer.flush()?;
        log::info!("saved {}-frame animation to {}", self.frames, path.display());
        Ok(())
    }
}

impl From<&AnimationConfig> for OrbitAnimation {
    fn from(config: &AnimationConfig) -> Self {
        Self {
            frames: config.frames,
            elevation: config.elevation,
            delay_ms: config.frame_delay_ms,
        }
    }
}

fn image_error(e: image::ImageError) -> Error {
    Error::Image(e.to_string())
}
