//! Transformed triangle-mesh primitive.
//!
//! The source mesh stays in object space and is shared between snapshots.
//! Rays are moved into object space with the inverse model matrix, tested
//! there, and the hit is carried back to world space. The world-space `t`
//! is recomputed from the world hit point because a non-uniform scale
//! changes distances along the ray differently per axis.

use std::sync::Arc;

use cbox_core::{Material, Mesh};
use cbox_math::{Interval, Mat3, Mat4, Mat4Ext, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable, PrimitiveFlags};
use crate::triangle::intersect_triangle;

/// A mesh placed in the world by a model matrix.
#[derive(Clone, Debug)]
pub struct MeshPrimitive {
    mesh: Arc<Mesh>,
    model: Mat4,
    inv_model: Mat4,
    normal_matrix: Mat3,
    material: Material,
    flags: PrimitiveFlags,
}

impl MeshPrimitive {
    /// Create a mesh primitive, precomputing the inverse and normal matrices.
    pub fn new(mesh: Arc<Mesh>, model: Mat4, material: Material, flags: PrimitiveFlags) -> Self {
        Self {
            inv_model: model.inverse(),
            normal_matrix: model.normal_matrix(),
            mesh,
            model,
            material,
            flags,
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn model(&self) -> Mat4 {
        self.model
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }
}

impl Hittable for MeshPrimitive {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let local_origin = self.inv_model.transform_point3(ray.origin());
        let local_dir = self
            .inv_model
            .transform_vector3(ray.direction())
            .normalize_or_zero();
        if local_dir == Vec3::ZERO || !local_origin.is_finite() {
            return false;
        }

        let mut hit_anything = false;
        let mut closest = ray_t.max;

        for face in &self.mesh.faces {
            let verts = &face.vertices;
            if verts.len() < 3 {
                continue;
            }

            // Fan around the first vertex
            for i in 1..verts.len() - 1 {
                let (a, b, c) = (&verts[0], &verts[i], &verts[i + 1]);
                let Some(bary) =
                    intersect_triangle(local_origin, local_dir, a.position, b.position, c.position)
                else {
                    continue;
                };
                if bary.t <= 0.0 {
                    continue;
                }

                let world_p = self.model.transform_point3(local_origin + local_dir * bary.t);
                let t = (world_p - ray.origin()).dot(ray.direction());
                if !ray_t.with_max(closest).surrounds(t) {
                    continue;
                }

                let Some(geometric) = (self.normal_matrix * face.normal).try_normalize() else {
                    continue;
                };
                let shading = (self.normal_matrix * bary.interpolate(a.normal, b.normal, c.normal))
                    .try_normalize()
                    .unwrap_or(geometric);

                hit_anything = true;
                closest = t;
                rec.t = t;
                rec.p = world_p;
                rec.set_face_normals(ray, geometric, shading);
                rec.material = &self.material;
                rec.light_marker = self.flags.light_marker;
            }
        }

        hit_anything
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn flags(&self) -> PrimitiveFlags {
        self.flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EPSILON;
    use cbox_core::{Face, Vertex};
    use cbox_math::{trs_euler, Vec2};

    fn plain(mesh: Mesh, model: Mat4) -> MeshPrimitive {
        MeshPrimitive::new(
            Arc::new(mesh),
            model,
            Material::default(),
            PrimitiveFlags::default(),
        )
    }

    #[test]
    fn test_quad_hit_in_world_space() {
        let prim = plain(
            Mesh::quad(1.0),
            Mat4::from_translation(Vec3::new(0.0, 0.0, -4.0)),
        );
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut rec = HitRecord::default();

        assert!(prim.hit(&ray, Interval::above(EPSILON), &mut rec));
        assert!((rec.t - 4.0).abs() < 1e-4);
        assert!((rec.p - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-4);
        assert!(rec.front_face);
        assert!((rec.geometric_normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_world_t_under_anisotropic_scale() {
        // Local t differs from world t by the z stretch
        let model = trs_euler(
            Vec3::new(0.0, 0.0, -6.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(5.0, 0.5, 3.0),
        );
        let prim = plain(Mesh::cube(), model);
        let origin = Vec3::new(0.3, 0.1, 0.0);
        let ray = Ray::new(origin, Vec3::NEG_Z);
        let mut rec = HitRecord::default();

        assert!(prim.hit(&ray, Interval::above(EPSILON), &mut rec));
        // Front face of the scaled cube sits at z = -6 + 3
        assert!((rec.t - 3.0).abs() < 1e-3, "t = {}", rec.t);
        assert!((ray.at(rec.t) - rec.p).length() < 1e-3);
    }

    #[test]
    fn test_normal_matrix_keeps_normals_perpendicular() {
        let model = trs_euler(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 45f32.to_radians()),
            Vec3::new(4.0, 1.0, 1.0),
        );
        let prim = plain(Mesh::cube(), model);
        let ray = Ray::new(Vec3::new(10.0, 10.0, 0.0), Vec3::new(-1.0, -1.0, 0.0));
        let mut rec = HitRecord::default();

        assert!(prim.hit(&ray, Interval::above(EPSILON), &mut rec));
        assert!((rec.geometric_normal.length() - 1.0).abs() < 1e-4);
        assert!(rec.geometric_normal.dot(ray.direction()) < 0.0);
    }

    #[test]
    fn test_hit_from_behind_flips_normals() {
        let prim = plain(Mesh::quad(1.0), Mat4::IDENTITY);
        let ray = Ray::new(Vec3::new(0.2, 0.2, -3.0), Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(prim.hit(&ray, Interval::above(EPSILON), &mut rec));
        assert!(!rec.front_face);
        assert!((rec.geometric_normal - Vec3::NEG_Z).length() < 1e-5);
        assert!((rec.shading_normal - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_polygon_face_fan_triangulated() {
        let corner = |x: f32, y: f32| Vertex::new(Vec3::new(x, y, 0.0), Vec3::Z, Vec2::ZERO);
        let pentagon = Face::new(vec![
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.5, 0.5),
            corner(0.0, 1.5),
            corner(-1.5, 0.5),
        ]);
        let prim = plain(
            Mesh::new("pentagon", vec![pentagon]),
            Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0)),
        );

        // A point only covered by the last fan triangle
        let ray = Ray::new(Vec3::new(-1.2, 0.5, 0.0), Vec3::NEG_Z);
        let mut rec = HitRecord::default();
        assert!(prim.hit(&ray, Interval::above(EPSILON), &mut rec));
        assert!((rec.t - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_nearest_face_wins() {
        let prim = plain(Mesh::cube(), Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut rec = HitRecord::default();

        assert!(prim.hit(&ray, Interval::above(EPSILON), &mut rec));
        assert!((rec.t - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_range_limits_hits() {
        let prim = plain(Mesh::quad(1.0), Mat4::from_translation(Vec3::new(0.0, 0.0, -4.0)));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut rec = HitRecord::default();

        assert!(!prim.hit(&ray, Interval::new(EPSILON, 3.0), &mut rec));
    }
}
