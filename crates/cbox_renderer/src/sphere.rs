//! Analytic sphere primitive.

use cbox_core::Material;
use cbox_math::{Interval, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable, PrimitiveFlags};

/// Smallest radius a flattened sphere may have.
pub const MIN_RADIUS: f32 = 1e-4;

/// A world-space sphere.
#[derive(Clone, Debug)]
pub struct SpherePrimitive {
    center: Vec3,
    radius: f32,
    material: Material,
    flags: PrimitiveFlags,
}

impl SpherePrimitive {
    /// Create a new sphere. The radius is floored at [`MIN_RADIUS`].
    pub fn new(center: Vec3, radius: f32, material: Material, flags: PrimitiveFlags) -> Self {
        let radius = if radius.is_finite() {
            radius.abs().max(MIN_RADIUS)
        } else {
            MIN_RADIUS
        };

        Self {
            center,
            radius,
            material,
            flags,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Hittable for SpherePrimitive {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        if a < 1e-12 {
            return false;
        }
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(root);
        let outward_normal = (rec.p - self.center) / self.radius;
        rec.set_face_normals(ray, outward_normal, outward_normal);
        rec.material = &self.material;
        rec.light_marker = self.flags.light_marker;

        true
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn flags(&self) -> PrimitiveFlags {
        self.flags
    }
}
