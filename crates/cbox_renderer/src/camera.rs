//! Pinhole ray generation.

use cbox_math::{Camera, Mat4, Ray, Vec3};

/// Generates one primary ray per pixel for a fixed image size.
///
/// The aspect ratio comes from the image, not from the camera, so the
/// picture is never stretched.
#[derive(Clone, Debug)]
pub struct RayGenerator {
    origin: Vec3,
    inv_view: Mat4,
    width: f32,
    height: f32,
    /// aspect × tan(fov / 2)
    scale_x: f32,
    /// tan(fov / 2)
    scale_y: f32,
}

impl RayGenerator {
    pub fn new(camera: &Camera, width: u32, height: u32) -> Self {
        let width = width.max(1) as f32;
        let height = height.max(1) as f32;
        let scale_y = (camera.fov_y * 0.5).tan();

        Self {
            origin: camera.position,
            inv_view: camera.inverse_view_matrix(),
            width,
            height,
            scale_x: width / height * scale_y,
            scale_y,
        }
    }

    /// Ray through the center of pixel `(x, y)`, counted from the top-left.
    pub fn ray_for_pixel(&self, x: u32, y: u32) -> Ray {
        let ndc_x = 2.0 * (x as f32 + 0.5) / self.width - 1.0;
        let ndc_y = 1.0 - 2.0 * (y as f32 + 0.5) / self.height;

        let dir_camera = Vec3::new(ndc_x * self.scale_x, ndc_y * self.scale_y, -1.0);
        let dir_world = self.inv_view.transform_vector3(dir_camera);

        Ray::new(self.origin, dir_world)
    }
}
