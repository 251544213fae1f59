//! Flattened, immutable render snapshot of a scene graph.
//!
//! A [`RenderScene`] is rebuilt for every render from the editable
//! [`Scene`]. Workers only ever read it, so it can be shared across the
//! thread pool without locks.

use cbox_core::{Color, Light, Scene, Shape};
use cbox_math::{Camera, Interval, Mat4Ext, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable, PrimitiveFlags};
use crate::mesh::MeshPrimitive;
use crate::sphere::SpherePrimitive;
use crate::EPSILON;

/// Render-ready primitives, lights and camera.
#[derive(Clone, Debug)]
pub struct RenderScene {
    pub camera: Camera,
    pub ambient_light: Color,
    pub background_color: Color,
    pub lights: Vec<Light>,
    spheres: Vec<SpherePrimitive>,
    meshes: Vec<MeshPrimitive>,
}

impl RenderScene {
    /// Create an empty snapshot.
    pub fn new(camera: Camera, ambient_light: Color, background_color: Color) -> Self {
        Self {
            camera,
            ambient_light,
            background_color,
            lights: Vec::new(),
            spheres: Vec::new(),
            meshes: Vec::new(),
        }
    }

    /// Flatten a scene graph. The source scene is only read.
    ///
    /// Nodes are visited depth first. Each node with geometry produces one
    /// primitive: sphere-shaped geometry becomes an analytic sphere at the
    /// object's world position, anything else a transformed mesh.
    pub fn from_scene(scene: &Scene) -> Self {
        let mut snapshot = Self::new(scene.camera, scene.ambient_light, scene.background_color);
        snapshot.lights = scene.lights();

        for id in scene.traverse() {
            let Some(node) = scene.node(id) else {
                continue;
            };
            let Some(geometry) = &node.geometry else {
                continue;
            };

            let world = scene.world_transform(id);
            let model = world * geometry.transform.to_matrix();
            let flags = PrimitiveFlags {
                light_marker: geometry.light_marker,
                hidden: geometry.hidden,
            };

            match geometry.shape {
                Shape::Sphere => {
                    let center = model.transform_point3(Vec3::ZERO);
                    let radius =
                        geometry.transform.scale.abs().max_element() * world.max_axis_scale();
                    log::debug!(
                        "Flattened sphere '{}': center {:?}, radius {:.3}",
                        node.name,
                        center,
                        radius
                    );
                    snapshot.add_sphere(SpherePrimitive::new(
                        center,
                        radius,
                        geometry.material,
                        flags,
                    ));
                }
                Shape::Mesh => {
                    log::debug!(
                        "Flattened mesh '{}': {} triangles",
                        node.name,
                        geometry.mesh.triangle_count()
                    );
                    snapshot.add_mesh(MeshPrimitive::new(
                        geometry.mesh.clone(),
                        model,
                        geometry.material,
                        flags,
                    ));
                }
            }
        }

        snapshot
    }

    pub fn add_sphere(&mut self, sphere: SpherePrimitive) {
        self.spheres.push(sphere);
    }

    pub fn add_mesh(&mut self, mesh: MeshPrimitive) {
        self.meshes.push(mesh);
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn spheres(&self) -> &[SpherePrimitive] {
        &self.spheres
    }

    pub fn meshes(&self) -> &[MeshPrimitive] {
        &self.meshes
    }

    pub fn primitive_count(&self) -> usize {
        self.spheres.len() + self.meshes.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangle_count()).sum()
    }

    fn primitives(&self) -> impl Iterator<Item = &dyn Hittable> {
        self.spheres
            .iter()
            .map(|s| s as &dyn Hittable)
            .chain(self.meshes.iter().map(|m| m as &dyn Hittable))
    }

    /// Nearest hit along `ray` beyond [`EPSILON`].
    ///
    /// `primary` is true for camera rays only; hidden primitives are skipped
    /// for those.
    pub fn intersect(&self, ray: &Ray, primary: bool) -> Option<HitRecord<'_>> {
        let mut rec = HitRecord::default();
        let mut closest = f32::INFINITY;
        let mut hit_anything = false;

        for prim in self.primitives() {
            if primary && prim.flags().hidden {
                continue;
            }
            if prim.hit(ray, Interval::new(EPSILON, closest), &mut rec) {
                hit_anything = true;
                closest = rec.t;
            }
        }

        hit_anything.then_some(rec)
    }

    /// Whether anything blocks the light from `point`.
    ///
    /// The origin is pushed off the surface along `geometric_normal`, on the
    /// side `light_dir` points to. Light markers and transparent primitives
    /// never block.
    pub fn occluded(
        &self,
        point: Vec3,
        geometric_normal: Vec3,
        light_dir: Vec3,
        max_distance: f32,
    ) -> bool {
        let range = Interval::new(EPSILON, max_distance - EPSILON);
        if range.size() <= 0.0 {
            return false;
        }

        let origin = offset_origin(point, geometric_normal, light_dir);
        let ray = Ray::new(origin, light_dir);
        let mut rec = HitRecord::default();

        self.primitives()
            .filter(|prim| prim.casts_shadow())
            .any(|prim| prim.hit(&ray, range, &mut rec))
    }
}

/// Move `point` off its surface by [`EPSILON`] towards the side `direction` leaves on.
pub fn offset_origin(point: Vec3, geometric_normal: Vec3, direction: Vec3) -> Vec3 {
    if direction.dot(geometric_normal) > 0.0 {
        point + geometric_normal * EPSILON
    } else {
        point - geometric_normal * EPSILON
    }
}
