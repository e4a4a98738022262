//! Interactive desktop window
//!
//! Left drag orbits the camera, the wheel zooms, `r` resets the view and
//! `Escape` closes the window.

use crate::gpu::{plotter_vertices, PointCloudRenderer};
use crate::plotter::Plotter;
use ply2web_core::{Error, Result};
use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

/// Degrees of orbit per pixel of mouse drag
const ORBIT_SENSITIVITY: f32 = 0.3;
/// Zoom factor per wheel line
const ZOOM_STEP: f32 = 1.1;

/// Mouse state between events
#[derive(Debug, Default)]
struct DragState {
    last_position: Option<PhysicalPosition<f64>>,
    left_pressed: bool,
}

impl DragState {
    /// Orbit angles for a cursor move, `None` unless dragging
    fn drag(&mut self, position: PhysicalPosition<f64>) -> Option<(f32, f32)> {
        let delta = self.last_position.map(|last| {
            (
                -((position.x - last.x) as f32) * ORBIT_SENSITIVITY,
                ((position.y - last.y) as f32) * ORBIT_SENSITIVITY,
            )
        });
        self.last_position = Some(position);
        if self.left_pressed {
            delta
        } else {
            None
        }
    }
}

fn zoom_factor(delta: MouseScrollDelta) -> f32 {
    let lines = match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
    };
    ZOOM_STEP.powf(lines)
}

/// Desktop window showing a plotter's scene
pub struct DesktopViewer {
    plotter: Plotter,
    title: String,
}

impl DesktopViewer {
    pub fn new(plotter: Plotter) -> Self {
        Self {
            plotter,
            title: "ply2web".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Open the window and block until it is closed
    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()
            .map_err(|e| Error::Visualization(format!("Failed to create event loop: {}", e)))?;
        let [width, height] = self.plotter.config().window_size;
        let window = WindowBuilder::new()
            .with_title(&self.title)
            .with_inner_size(LogicalSize::new(width as f64, height as f64))
            .build(&event_loop)
            .map_err(|e| Error::Visualization(format!("Failed to create window: {}", e)))?;

        let config = self.plotter.config().clone();
        let mut renderer = pollster::block_on(PointCloudRenderer::new(
            &window,
            config.background_color,
            config.point_size,
        ))?;
        let vertices = plotter_vertices(&self.plotter);
        renderer.set_points(&vertices);
        log::info!("desktop viewer showing {} points", vertices.len());

        let mut drag = DragState::default();
        let mut render_error = None;

        event_loop
            .run(|event, target| {
                target.set_control_flow(ControlFlow::Wait);

                let Event::WindowEvent { event, .. } = event else {
                    return;
                };
                match event {
                    WindowEvent::CloseRequested => target.exit(),
                    WindowEvent::Resized(size) => {
                        renderer.resize(size.width, size.height);
                        window.request_redraw();
                    }
                    WindowEvent::MouseInput {
                        state,
                        button: MouseButton::Left,
                        ..
                    } => {
                        drag.left_pressed = state == ElementState::Pressed;
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        if let Some((azimuth, elevation)) = drag.drag(position) {
                            self.plotter.camera_mut().orbit(azimuth, elevation);
                            window.request_redraw();
                        }
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        self.plotter.camera_mut().zoom(zoom_factor(delta));
                        window.request_redraw();
                    }
                    WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                        match event.logical_key.as_ref() {
                            Key::Named(NamedKey::Escape) => target.exit(),
                            Key::Character("r") | Key::Character("R") => {
                                self.plotter.reset_camera();
                                window.request_redraw();
                            }
                            _ => {}
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let camera = self.plotter.camera();
                        renderer.update_camera(camera.view_projection(renderer.aspect_ratio()));
                        if let Err(e) = renderer.render() {
                            log::error!("render error: {}", e);
                            render_error = Some(e);
                            target.exit();
                        }
                    }
                    _ => {}
                }
            })
            .map_err(|e| Error::Visualization(format!("Event loop error: {}", e)))?;

        match render_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
