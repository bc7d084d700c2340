use glam::{Mat4, Vec3};

use crate::scene::transform::Transform;

/// Perspective camera owned by a single viewport.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Vertical field of view, radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub transform: Transform,

    projection_matrix: Mat4,
    view_matrix: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            fov: fov_degrees.to_radians(),
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 },
            near,
            far,
            transform: Transform::new(),
            projection_matrix: Mat4::IDENTITY,
            view_matrix: Mat4::IDENTITY,
        };
        cam.update_projection_matrix();
        cam
    }

    #[inline]
    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Applies a new aspect ratio. Non-finite or non-positive values are
    /// ignored and the previous projection is kept.
    pub fn set_aspect(&mut self, aspect: f32) -> bool {
        if !aspect.is_finite() || aspect <= 0.0 {
            return false;
        }
        self.aspect = aspect;
        self.update_projection_matrix();
        true
    }

    pub fn update_projection_matrix(&mut self) {
        // perspective_rh targets WGPU/Vulkan depth (0 to 1)
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
    }

    /// View matrix = inverse of the camera's world transform.
    pub fn update_view_matrix(&mut self) {
        self.view_matrix = Mat4::from(self.transform.matrix()).inverse();
    }

    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }
}
