//! Scene camera matrices read by the pick pass.

use glam::{Mat4, Vec3};

/// The scene camera.
///
/// The pick pass only reads the current view and projection matrices; it
/// never navigates the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    /// Creates a camera from explicit matrices.
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self { view, projection }
    }

    /// Creates a perspective camera looking from `eye` at `target`.
    ///
    /// `fov_y` is in radians.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3, fov_y: f32, aspect: f32) -> Self {
        Self {
            view: Mat4::look_at_rh(eye, target, up),
            projection: Mat4::perspective_rh(fov_y, aspect, 0.1, 1000.0),
        }
    }

    /// Returns the current view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// Sets the view matrix.
    pub fn set_view_matrix(&mut self, view: Mat4) {
        self.view = view;
    }

    /// Returns the current projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Sets the projection matrix.
    pub fn set_projection_matrix(&mut self, projection: Mat4) {
        self.projection = projection;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::look_at(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::ZERO,
            Vec3::Y,
            std::f32::consts::FRAC_PI_4,
            1.0,
        )
    }
}
