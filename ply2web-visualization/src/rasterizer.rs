//! CPU point splatting
//!
//! Points are projected with a view-projection matrix and drawn as square
//! splats. A depth buffer keeps the nearest point per pixel.

use image::{Rgb, RgbImage};
use nalgebra::Matrix4;
use ply2web_core::Point3f;
use std::borrow::Cow;

/// Colors for a batch of points
#[derive(Debug, Clone)]
pub enum PointColors<'a> {
    Solid([u8; 3]),
    PerPoint(Cow<'a, [[u8; 3]]>),
}

impl PointColors<'_> {
    pub fn get(&self, index: usize) -> [u8; 3] {
        match self {
            PointColors::Solid(color) => *color,
            PointColors::PerPoint(colors) => colors[index],
        }
    }
}

/// Off-screen target with a depth buffer
pub struct Rasterizer {
    image: RgbImage,
    depth: Vec<f32>,
    point_size: u32,
}

impl Rasterizer {
    pub fn new(width: u32, height: u32, background: [u8; 3], point_size: f32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            image: RgbImage::from_pixel(width, height, Rgb(background)),
            depth: vec![f32::INFINITY; width as usize * height as usize],
            point_size: point_size.round().max(1.0) as u32,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Project and splat `points`; points outside the clip volume are skipped
    pub fn draw_points(&mut self, view_proj: &Matrix4<f32>, points: &[Point3f], colors: &PointColors<'_>) {
        let width = self.width() as i64;
        let height = self.height() as i64;
        let size = self.point_size as i64;
        let lo = -(size / 2);
        let hi = size - size / 2;

        for (i, point) in points.iter().enumerate() {
            let clip = view_proj * point.to_homogeneous();
            if clip.w <= 0.0 {
                continue;
            }
            let ndc = clip.xyz() / clip.w;
            if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z < -1.0 || ndc.z > 1.0 {
                continue;
            }

            let px = ((ndc.x + 1.0) * 0.5 * width as f32).floor() as i64;
            let py = ((1.0 - ndc.y) * 0.5 * height as f32).floor() as i64;
            let color = Rgb(colors.get(i));

            for y in (py + lo).max(0)..(py + hi).min(height) {
                for x in (px + lo).max(0)..(px + hi).min(width) {
                    let index = (y * width + x) as usize;
                    if ndc.z < self.depth[index] {
                        self.depth[index] = ndc.z;
                        self.image.put_pixel(x as u32, y as u32, color);
                    }
                }
            }
        }
    }

    pub fn finish(self) -> RgbImage {
        self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKGROUND: [u8; 3] = [10, 20, 30];

    #[test]
    fn test_empty_frame_is_background() {
        let image = Rasterizer::new(8, 4, BACKGROUND, 1.0).finish();
        assert_eq!(image.dimensions(), (8, 4));
        assert!(image.pixels().all(|p| p.0 == BACKGROUND));
    }

    #[test]
    fn test_identity_projection_hits_center() {
        let mut raster = Rasterizer::new(10, 10, BACKGROUND, 1.0);
        raster.draw_points(
            &Matrix4::identity(),
            &[Point3f::new(0.0, 0.0, 0.0)],
            &PointColors::Solid([255, 0, 0]),
        );
        let image = raster.finish();
        assert_eq!(image.get_pixel(5, 5).0, [255, 0, 0]);
        assert_eq!(image.pixels().filter(|p| p.0 != BACKGROUND).count(), 1);
    }

    #[test]
    fn test_nearest_point_wins() {
        let mut raster = Rasterizer::new(10, 10, BACKGROUND, 3.0);
        let points = [Point3f::new(0.0, 0.0, 0.5), Point3f::new(0.0, 0.0, -0.5)];
        let colors = vec![[255, 0, 0], [0, 255, 0]];
        raster.draw_points(&Matrix4::identity(), &points, &PointColors::PerPoint(Cow::Owned(colors)));
        let image = raster.finish();
        assert_eq!(image.get_pixel(5, 5).0, [0, 255, 0]);
        assert_eq!(image.pixels().filter(|p| p.0 != BACKGROUND).count(), 9);
    }

    #[test]
    fn test_clipped_points_are_skipped() {
        let mut raster = Rasterizer::new(10, 10, BACKGROUND, 1.0);
        raster.draw_points(
            &Matrix4::identity(),
            &[Point3f::new(2.0, 0.0, 0.0), Point3f::new(0.0, 0.0, 1.5)],
            &PointColors::Solid([255, 255, 255]),
        );
        assert!(raster.finish().pixels().all(|p| p.0 == BACKGROUND));
    }

    #[test]
    fn test_splat_is_clamped_at_edges() {
        let mut raster = Rasterizer::new(4, 4, BACKGROUND, 5.0);
        raster.draw_points(
            &Matrix4::identity(),
            &[Point3f::new(-1.0, 1.0, 0.0)],
            &PointColors::Solid([1, 2, 3]),
        );
        let image = raster.finish();
        assert_eq!(image.get_pixel(0, 0).0, [1, 2, 3]);
    }
}
