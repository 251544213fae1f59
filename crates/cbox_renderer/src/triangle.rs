//! Möller-Trumbore ray-triangle intersection.

use cbox_math::Vec3;

/// Determinant threshold below which a ray is treated as parallel to the triangle.
pub const DETERMINANT_EPSILON: f32 = 1e-6;

/// Parametric distance and barycentric weights of a triangle hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Barycentric {
    pub t: f32,
    /// Weight of `v1`
    pub u: f32,
    /// Weight of `v2`
    pub v: f32,
}

impl Barycentric {
    /// Weight of `v0`.
    pub fn w(&self) -> f32 {
        1.0 - self.u - self.v
    }

    /// Interpolate a per-vertex attribute.
    pub fn interpolate(&self, a0: Vec3, a1: Vec3, a2: Vec3) -> Vec3 {
        a0 * self.w() + a1 * self.u + a2 * self.v
    }
}

/// Intersect a ray with the triangle `(v0, v1, v2)`.
///
/// Returns `None` for parallel rays, degenerate triangles and hits outside
/// the triangle. The returned `t` may be negative or tiny; callers apply
/// their own range.
pub fn intersect_triangle(
    origin: Vec3,
    direction: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<Barycentric> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = direction.cross(edge2);
    let a = edge1.dot(h);

    if a.abs() < DETERMINANT_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if !t.is_finite() {
        return None;
    }

    Some(Barycentric { t, u, v })
}
