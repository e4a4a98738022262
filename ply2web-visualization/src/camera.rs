//! Camera utilities for 3D visualization

use nalgebra::{Matrix4, Perspective3, Point3, Unit, UnitQuaternion, Vector3};
use ply2web_core::Bounds;

/// Direction from the focal point to the camera after a reset
const ISOMETRIC_DIRECTION: [f32; 3] = [1.0, 1.0, 1.0];

/// Reset directions closer than this to `view_up` are replaced
const MAX_UP_ALIGNMENT: f32 = 0.999;

/// Highest elevation [`Camera::orbit`] reaches, in degrees
pub const MAX_ELEVATION_DEGREES: f32 = 89.0;

/// A perspective camera looking at a focal point
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub focal_point: Point3<f32>,
    pub view_up: Vector3<f32>,
    /// Vertical field of view in radians
    pub view_angle: f32,
    /// Radius of the bounding sphere the camera was last fitted to
    pub scene_radius: f32,
}

impl Camera {
    pub fn new(position: Point3<f32>, focal_point: Point3<f32>, view_up: Vector3<f32>) -> Self {
        Self {
            position,
            focal_point,
            view_up,
            view_angle: 30f32.to_radians(),
            scene_radius: 1.0,
        }
    }

    /// Distance between the camera and the focal point
    pub fn distance(&self) -> f32 {
        (self.position - self.focal_point).norm()
    }

    /// Unit vector from the camera towards the focal point
    pub fn direction(&self) -> Vector3<f32> {
        (self.focal_point - self.position).normalize()
    }

    /// Fit the camera to `bounds`, looking along the isometric diagonal
    ///
    /// The camera keeps its `view_up`. Empty or degenerate bounds are treated
    /// as a sphere of radius 0.5 around their center.
    pub fn reset(&mut self, bounds: Option<&Bounds>) {
        let (center, radius) = match bounds {
            Some(b) if b.diagonal() > f32::EPSILON => (b.center(), b.diagonal() / 2.0),
            Some(b) => (b.center(), 0.5),
            None => (Point3::origin(), 0.5),
        };

        let mut direction = Vector3::from(ISOMETRIC_DIRECTION).normalize();
        if direction.dot(&self.view_up.normalize()).abs() > MAX_UP_ALIGNMENT {
            direction = Vector3::new(1.0, -1.0, 0.0).normalize();
        }

        let distance = radius / (self.view_angle / 2.0).sin();
        self.focal_point = center;
        self.position = center + direction * distance;
        self.scene_radius = radius;
    }

    /// Angle between the view ray and the plane normal to `view_up`, in degrees
    ///
    /// Positive when the camera sits above the focal point.
    pub fn elevation(&self) -> f32 {
        let up = self.view_up.normalize();
        (-self.direction()).dot(&up).clamp(-1.0, 1.0).asin().to_degrees()
    }

    /// Rotate the camera around the focal point
    ///
    /// `azimuth` turns around `view_up`, `elevation` tilts towards it; both
    /// in degrees. The resulting elevation is clamped to
    /// `±MAX_ELEVATION_DEGREES` so the camera never passes over a pole.
    pub fn orbit(&mut self, azimuth: f32, elevation: f32) {
        let up = Unit::new_normalize(self.view_up);
        let current = self.elevation();
        let mut offset = self.position - self.focal_point;

        if azimuth != 0.0 {
            offset = UnitQuaternion::from_axis_angle(&up, azimuth.to_radians()) * offset;
        }

        let target = (current + elevation).clamp(-MAX_ELEVATION_DEGREES, MAX_ELEVATION_DEGREES);
        let delta = target - current;
        if elevation != 0.0 && delta != 0.0 {
            let right = (-offset).cross(&up);
            if right.norm() > f32::EPSILON {
                let tilt =
                    UnitQuaternion::from_axis_angle(&Unit::new_normalize(right), -delta.to_radians());
                offset = tilt * offset;
            }
        }

        self.position = self.focal_point + offset;
    }

    /// Move towards the focal point; factors above 1 zoom in
    pub fn zoom(&mut self, factor: f32) {
        if factor <= 0.0 {
            return;
        }
        let offset = self.position - self.focal_point;
        self.position = self.focal_point + offset / factor;
    }

    /// Invert the up vector
    pub fn flip_up(&mut self) {
        self.view_up = -self.view_up;
    }

    /// Near and far clipping distances covering the fitted scene
    pub fn clipping_range(&self) -> (f32, f32) {
        let distance = self.distance();
        let near = (distance - self.scene_radius * 1.5).max(distance * 0.01).max(1e-4);
        let far = (distance + self.scene_radius * 1.5).max(near * 2.0);
        (near, far)
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.focal_point, &self.view_up)
    }

    /// OpenGL-style projection (clip depth in `[-1, 1]`)
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Matrix4<f32> {
        let (near, far) = self.clipping_range();
        Perspective3::new(aspect_ratio, self.view_angle, near, far).to_homogeneous()
    }

    pub fn view_projection(&self, aspect_ratio: f32) -> Matrix4<f32> {
        self.projection_matrix(aspect_ratio) * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self::new(Point3::origin(), Point3::origin(), Vector3::z());
        camera.reset(None);
        camera
    }
}
