// Transform utilities for Mat4
//
// Extends glam::Mat4 with the pieces the ray tracer needs on top of
// transform_point3/transform_vector3/inverse.

use glam::{Mat3, Mat4, Vec3};

/// Build a model matrix as translate × rotate-X × rotate-Y × rotate-Z × scale.
///
/// `rotation` holds Euler angles in radians.
pub fn trs_euler(translation: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_translation(translation)
        * Mat4::from_rotation_x(rotation.x)
        * Mat4::from_rotation_y(rotation.y)
        * Mat4::from_rotation_z(rotation.z)
        * Mat4::from_scale(scale)
}

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Inverse-transpose of the upper 3x3 block, for transforming normals.
    fn normal_matrix(&self) -> Mat3;

    /// Length of the longest basis axis of the linear part.
    fn max_axis_scale(&self) -> f32;
}

impl Mat4Ext for Mat4 {
    fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(*self).inverse().transpose()
    }

    fn max_axis_scale(&self) -> f32 {
        self.x_axis
            .truncate()
            .length()
            .max(self.y_axis.truncate().length())
            .max(self.z_axis.truncate().length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_trs_identity() {
        let m = trs_euler(Vec3::ZERO, Vec3::ZERO, Vec3::ONE);
        assert_eq!(m, Mat4::IDENTITY);
    }

    #[test]
    fn test_trs_order_scale_before_translate() {
        let m = trs_euler(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, Vec3::splat(2.0));
        let p = m.transform_point3(Vec3::X);

        // Scaled first, then translated
        assert!((p - Vec3::new(12.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_trs_rotation_order() {
        // Z is applied first, then Y: X -> Y (about Z) -> Y (about Y leaves Y fixed)
        let m = trs_euler(Vec3::ZERO, Vec3::new(0.0, FRAC_PI_2, FRAC_PI_2), Vec3::ONE);
        let v = m.transform_vector3(Vec3::X);
        assert!((v - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_normal_matrix_anisotropic_scale() {
        let m = Mat4::from_scale(Vec3::new(4.0, 1.0, 1.0));
        let n = m.normal_matrix();

        // A 45 degree plane normal tilts towards the squashed axis
        let normal = (n * Vec3::new(1.0, 1.0, 0.0)).normalize();
        let tangent = m.transform_vector3(Vec3::new(1.0, -1.0, 0.0));
        assert!(normal.dot(tangent).abs() < 1e-5);
    }

    #[test]
    fn test_max_axis_scale() {
        let m = trs_euler(
            Vec3::new(5.0, 5.0, 5.0),
            Vec3::new(0.3, 0.2, 0.1),
            Vec3::new(1.0, -3.0, 2.0),
        );
        assert!((m.max_axis_scale() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_mat4_inverse_roundtrip() {
        let mat = trs_euler(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.5, 0.1, 0.0), Vec3::splat(2.0));
        let point = Vec3::new(5.0, 3.0, 2.0);
        let back = mat.inverse().transform_point3(mat.transform_point3(point));

        assert!((back - point).length() < 1e-4);
    }
}
