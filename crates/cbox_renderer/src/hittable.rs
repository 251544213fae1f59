//! Hittable trait and HitRecord for ray-primitive intersection.

use cbox_core::Material;
use cbox_math::{Interval, Ray, Vec3};

/// Material referenced by `HitRecord::default()`.
static DEFAULT_MATERIAL: Material = Material::DEFAULT;

/// Record of a ray-primitive intersection.
#[derive(Clone, Debug)]
pub struct HitRecord<'a> {
    /// Parameter t along the world-space ray
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Flat normal, facing against the ray. Used to offset secondary rays.
    pub geometric_normal: Vec3,
    /// Interpolated normal, facing against the ray. Used for lighting.
    pub shading_normal: Vec3,
    /// Whether the ray hit the outside of the surface
    pub front_face: bool,
    /// Material of the primitive that was hit
    pub material: &'a Material,
    /// Whether the primitive is light-marker geometry
    pub light_marker: bool,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            t: f32::INFINITY,
            p: Vec3::ZERO,
            geometric_normal: Vec3::Y,
            shading_normal: Vec3::Y,
            front_face: true,
            material: &DEFAULT_MATERIAL,
            light_marker: false,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Orient both normals against the ray.
    ///
    /// `outward_geometric` decides which side was hit; the shading normal is
    /// flipped along with it.
    pub fn set_face_normals(&mut self, ray: &Ray, outward_geometric: Vec3, outward_shading: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_geometric) < 0.0;

        if self.front_face {
            self.geometric_normal = outward_geometric;
            self.shading_normal = outward_shading;
        } else {
            self.geometric_normal = -outward_geometric;
            self.shading_normal = -outward_shading;
        }
    }
}

/// Per-primitive flags resolved when the scene is flattened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrimitiveFlags {
    /// Renders full-bright white and never casts shadows
    pub light_marker: bool,
    /// Invisible to primary rays only
    pub hidden: bool,
}

/// Trait for flattened primitives that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this primitive strictly inside `ray_t`.
    ///
    /// Returns true if hit, and fills in the hit record with the closest hit.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;

    fn material(&self) -> &Material;

    fn flags(&self) -> PrimitiveFlags;

    /// Whether this primitive can block a shadow ray.
    fn casts_shadow(&self) -> bool {
        !self.flags().light_marker && self.material().casts_shadow()
    }
}
