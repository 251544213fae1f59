use glam::{Mat4, Vec3};

/// Projection mode used by the wireframe preview.
///
/// The ray tracer is always a pinhole camera; only the preview honours
/// orthographic mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// Camera for 3D rendering
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub projection: Projection,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 16.0 / 9.0)
    }
}

impl Camera {
    /// Create a new camera
    pub fn new(position: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fov_y: 45.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 100.0,
            projection: Projection::Perspective,
        }
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov_degrees(mut self, degrees: f32) -> Self {
        self.fov_y = degrees.to_radians();
        self
    }

    /// Unit vector from the camera towards its target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Get the view matrix (world → camera space)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the inverse view matrix (camera → world space)
    pub fn inverse_view_matrix(&self) -> Mat4 {
        self.view_matrix().inverse()
    }

    /// Get the projection matrix (camera → clip space)
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
            }
            Projection::Orthographic => {
                // Size the view volume so the target plane matches the perspective framing
                let distance = (self.target - self.position).length().max(self.near);
                let half_h = distance * (self.fov_y * 0.5).tan();
                let half_w = half_h * self.aspect;
                Mat4::orthographic_rh_gl(-half_w, half_w, -half_h, half_h, self.near, self.far)
            }
        }
    }

    /// Get the combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update aspect ratio (e.g., on output resize)
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }
}
