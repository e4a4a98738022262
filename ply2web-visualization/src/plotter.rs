//! Scene management: named mesh actors viewed through one camera

use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::rasterizer::{PointColors, Rasterizer};
use image::RgbImage;
use ply2web_core::{Bounds, Error, Mesh, MeshStats, PointData, Result, RGB_ARRAY};
use std::borrow::Cow;
use std::path::Path;

/// How an actor's points are colored
#[derive(Debug, Clone, PartialEq)]
pub enum Coloring {
    /// Every point uses the configured default color
    Solid,
    /// Colors are read from an RGB point-data array
    Rgb(String),
    /// A scalar point-data array mapped from blue (low) to red (high)
    Scalars(String),
}

/// A mesh placed in the scene
#[derive(Debug, Clone)]
pub struct Actor {
    pub name: String,
    pub mesh: Mesh,
    pub coloring: Coloring,
}

impl Actor {
    /// Per-point colors for rendering
    pub fn colors(&self, default_color: [u8; 3]) -> PointColors<'_> {
        match &self.coloring {
            Coloring::Solid => PointColors::Solid(default_color),
            Coloring::Rgb(name) => match self.mesh.point_data(name) {
                Some(PointData::Rgb(colors)) => PointColors::PerPoint(Cow::Borrowed(colors)),
                _ => PointColors::Solid(default_color),
            },
            Coloring::Scalars(name) => match self.mesh.point_data(name) {
                Some(PointData::Scalars(values)) => {
                    PointColors::PerPoint(Cow::Owned(scalar_colormap(values)))
                }
                _ => PointColors::Solid(default_color),
            },
        }
    }
}

/// Map scalars onto a blue-to-red ramp over their range
fn scalar_colormap(values: &[f32]) -> Vec<[u8; 3]> {
    let (min, max) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;

    values
        .iter()
        .map(|&v| {
            let t = if range > 0.0 { (v - min) / range } else { 0.5 };
            [(t * 255.0) as u8, 128, ((1.0 - t) * 255.0) as u8]
        })
        .collect()
}

/// Options for [`Plotter::add_mesh`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshOptions<'a> {
    /// Actor name; an existing actor with the same name is replaced
    pub name: Option<&'a str>,
    /// Point-data array used for coloring
    pub scalars: Option<&'a str>,
    /// Interpret `scalars` as RGB triples
    pub rgb: bool,
}

impl<'a> MeshOptions<'a> {
    /// Color by the `RGB` array read from the file
    pub fn rgb(name: Option<&'a str>) -> Self {
        Self {
            name,
            scalars: Some(RGB_ARRAY),
            rgb: true,
        }
    }

    pub fn plain(name: Option<&'a str>) -> Self {
        Self {
            name,
            scalars: None,
            rgb: false,
        }
    }
}

/// A scene of mesh actors and the camera that views them
#[derive(Debug, Clone)]
pub struct Plotter {
    actors: Vec<Actor>,
    camera: Camera,
    config: RenderConfig,
    next_id: usize,
    latest: Option<String>,
}

impl Plotter {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            actors: Vec::new(),
            camera: Camera::default(),
            config,
            next_id: 0,
            latest: None,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, name: &str) -> Option<&Actor> {
        self.actors.iter().find(|a| a.name == name)
    }

    /// Add a mesh to the scene
    ///
    /// Fails with [`Error::MissingArray`] when `scalars` names an array the
    /// mesh does not have, and with [`Error::InvalidData`] when `rgb` is set
    /// but the array is not RGB.
    pub fn add_mesh(&mut self, mesh: Mesh, options: MeshOptions<'_>) -> Result<&Actor> {
        let coloring = match options.scalars {
            None => Coloring::Solid,
            Some(array) => match (mesh.point_data(array), options.rgb) {
                (None, _) => return Err(Error::MissingArray(array.to_string())),
                (Some(PointData::Rgb(_)), _) => Coloring::Rgb(array.to_string()),
                (Some(PointData::Scalars(_)), false) => Coloring::Scalars(array.to_string()),
                (Some(PointData::Scalars(_)), true) => {
                    return Err(Error::InvalidData(format!(
                        "array '{}' is not an RGB array",
                        array
                    )))
                }
            },
        };

        Ok(self.insert_actor(mesh, options.name, coloring))
    }

    /// Add a mesh colored by its `RGB` array, or uncolored when that fails
    pub fn add_mesh_with_fallback(&mut self, mesh: Mesh, name: Option<&str>) -> &Actor {
        let coloring = match mesh.colored_points(RGB_ARRAY) {
            Ok(_) => Coloring::Rgb(RGB_ARRAY.to_string()),
            Err(e) => {
                log::warn!("{}, rendering without colors", e);
                Coloring::Solid
            }
        };
        self.insert_actor(mesh, name, coloring)
    }

    fn insert_actor(&mut self, mesh: Mesh, name: Option<&str>, coloring: Coloring) -> &Actor {
        let name = match name {
            Some(name) => name.to_string(),
            None => {
                self.next_id += 1;
                format!("Mesh-{}", self.next_id)
            }
        };

        self.latest = Some(name.clone());
        let actor = Actor { name, mesh, coloring };
        let index = match self.actors.iter().position(|a| a.name == actor.name) {
            Some(index) => {
                self.actors[index] = actor;
                index
            }
            None => {
                self.actors.push(actor);
                self.actors.len() - 1
            }
        };
        &self.actors[index]
    }

    /// Combined bounds of every actor
    pub fn bounds(&self) -> Option<Bounds> {
        self.actors
            .iter()
            .filter_map(|a| a.mesh.bounds())
            .reduce(|a, b| a.union(&b))
    }

    /// Fit the camera to everything in the scene
    pub fn reset_camera(&mut self) {
        let bounds = self.bounds();
        self.camera.reset(bounds.as_ref());
    }

    /// Flip the camera's up vector for scans stored upside down
    pub fn set_upside_down(&mut self, upside_down: bool) {
        if upside_down == (self.camera.view_up.z < 0.0) {
            return;
        }
        self.camera.flip_up();
        self.reset_camera();
    }

    /// Statistics of the most recently added actor
    pub fn stats(&self) -> Option<MeshStats> {
        let latest = self.latest.as_deref()?;
        self.actor(latest).and_then(|a| MeshStats::from_mesh(&a.mesh))
    }

    pub fn render(&self, width: u32, height: u32) -> RgbImage {
        self.render_with_camera(&self.camera, width, height)
    }

    /// Render the scene through `camera` instead of the plotter's own
    pub fn render_with_camera(&self, camera: &Camera, width: u32, height: u32) -> RgbImage {
        let mut raster = Rasterizer::new(
            width,
            height,
            self.config.background_color,
            self.config.point_size,
        );
        let view_proj = camera.view_projection(raster.width() as f32 / raster.height() as f32);

        for actor in &self.actors {
            let colors = actor.colors(self.config.default_point_color);
            raster.draw_points(&view_proj, actor.mesh.points.as_slice(), &colors);
        }
        raster.finish()
    }

    /// Render at the configured window size and save; format from the extension
    pub fn screenshot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let [width, height] = self.config.window_size;
        self.render(width, height)
            .save(path)
            .map_err(|e| Error::Image(format!("{}: {}", path.display(), e)))?;
        log::info!("saved screenshot to {}", path.display());
        Ok(())
    }
}

impl Default for Plotter {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}
