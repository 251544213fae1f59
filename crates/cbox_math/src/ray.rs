use crate::Vec3;

/// A ray in 3D space with an origin and a unit-length direction.
///
/// Every ray the renderer passes between stages (primary, shadow,
/// reflection, refraction) goes through [`Ray::new`], which normalizes the
/// direction. A zero direction stays zero and never hits anything.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray. `direction` is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the unit direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// True when the direction collapsed to zero during normalization.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation_normalizes() {
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 4.0, 0.0));

        assert_eq!(ray.origin, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(ray.direction, Vec3::Y);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_degenerate_direction() {
        let ray = Ray::new(Vec3::ONE, Vec3::ZERO);
        assert!(ray.is_degenerate());
        assert!(!Ray::new(Vec3::ONE, Vec3::Z).is_degenerate());
    }

    #[test]
    fn test_ray_getters() {
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, -2.0));

        assert_eq!(ray.origin(), ray.origin);
        assert_eq!(ray.direction(), Vec3::NEG_Z);
    }
}
