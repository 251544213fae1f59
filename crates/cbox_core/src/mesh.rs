//! Mesh geometry for the cbox scene graph.
//!
//! A mesh is an ordered list of faces, each carrying its own vertices
//! (position, normal, texture coordinate). Faces produced by the factories
//! and the OBJ loader are triangles; the renderer fan-triangulates anything
//! larger from vertex 0.

use std::collections::HashMap;
use std::f32::consts::PI;

use cbox_math::{Vec2, Vec3};

/// Positions closer than this are treated as the same vertex when smoothing.
const WELD_EPSILON: f32 = 1e-5;

/// A single face corner.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// A planar polygon with a precomputed flat normal.
#[derive(Clone, Debug)]
pub struct Face {
    pub vertices: Vec<Vertex>,
    /// Unit flat normal: cross(v1 - v0, v2 - v0)
    pub normal: Vec3,
}

impl Face {
    /// Normal substituted when the winding gives no usable direction.
    pub const DEFAULT_NORMAL: Vec3 = Vec3::Y;

    /// Create a face, computing its flat normal.
    pub fn new(vertices: Vec<Vertex>) -> Self {
        let normal = Self::flat_normal(&vertices).unwrap_or(Self::DEFAULT_NORMAL);
        Self { vertices, normal }
    }

    /// Flat normal from the first three vertices, or `None` for degenerate faces.
    pub fn flat_normal(vertices: &[Vertex]) -> Option<Vec3> {
        if vertices.len() < 3 {
            return None;
        }
        let e1 = vertices[1].position - vertices[0].position;
        let e2 = vertices[2].position - vertices[0].position;
        let n = e1.cross(e2).normalize_or_zero();
        (n != Vec3::ZERO && n.is_finite()).then_some(n)
    }

    /// Number of triangles after fan triangulation.
    pub fn triangle_count(&self) -> usize {
        self.vertices.len().saturating_sub(2)
    }
}

/// A named collection of faces.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub name: String,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, faces: Vec<Face>) -> Self {
        Self {
            name: name.into(),
            faces,
        }
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(Face::triangle_count).sum()
    }

    /// Get the number of face corners in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.faces.iter().map(|f| f.vertices.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Average of all face corner positions.
    pub fn center(&self) -> Vec3 {
        let count = self.vertex_count();
        if count == 0 {
            return Vec3::ZERO;
        }
        let sum: Vec3 = self
            .faces
            .iter()
            .flat_map(|f| f.vertices.iter())
            .map(|v| v.position)
            .sum();
        sum / count as f32
    }

    /// Compute smooth vertex normals by averaging face normals.
    ///
    /// Corners whose positions coincide (within `WELD_EPSILON`) share the
    /// normalized sum of the flat normals of every face that touches them.
    pub fn compute_normals(&mut self) {
        let key = |p: Vec3| {
            let q = (p / WELD_EPSILON).round();
            [q.x as i64, q.y as i64, q.z as i64]
        };

        let mut accumulated: HashMap<[i64; 3], Vec3> = HashMap::new();
        for face in &self.faces {
            for vertex in &face.vertices {
                *accumulated.entry(key(vertex.position)).or_insert(Vec3::ZERO) += face.normal;
            }
        }

        for face in &mut self.faces {
            for vertex in &mut face.vertices {
                let sum = accumulated
                    .get(&key(vertex.position))
                    .copied()
                    .unwrap_or(Vec3::ZERO);
                vertex.normal = sum.try_normalize().unwrap_or(face.normal);
            }
        }
    }

    /// Build a UV sphere centered at the origin with outward winding.
    pub fn uv_sphere(radius: f32, stacks: usize, slices: usize) -> Self {
        let stacks = stacks.max(3);
        let slices = slices.max(3);

        let mut verts = Vec::with_capacity((stacks + 1) * (slices + 1));
        for i in 0..=stacks {
            let v = i as f32 / stacks as f32;
            let (st, ct) = (v * PI).sin_cos();

            for j in 0..=slices {
                let u = j as f32 / slices as f32;
                let (sp, cp) = (u * 2.0 * PI).sin_cos();

                let n = Vec3::new(st * cp, ct, st * sp).normalize();
                verts.push(Vertex::new(n * radius, n, Vec2::new(u, 1.0 - v)));
            }
        }

        let mut faces = Vec::with_capacity(stacks * slices * 2);
        let mut add_tri = |a: usize, b: usize, c: usize| {
            let mut corners = vec![verts[a], verts[b], verts[c]];
            let n = (corners[1].position - corners[0].position)
                .cross(corners[2].position - corners[0].position);
            if n.dot(corners[0].position) < 0.0 {
                corners.swap(1, 2);
            }
            faces.push(Face::new(corners));
        };

        let stride = slices + 1;
        for i in 0..stacks {
            for j in 0..slices {
                let i0 = i * stride + j;
                let i1 = i0 + 1;
                let i2 = (i + 1) * stride + j;
                let i3 = i2 + 1;

                // The pole rows would otherwise produce zero-area triangles
                if i != 0 {
                    add_tri(i0, i2, i1);
                }
                if i != stacks - 1 {
                    add_tri(i1, i2, i3);
                }
            }
        }

        Self::new("Sphere", faces)
    }

    /// Build an axis-aligned box of the given size, centered at the origin,
    /// with smoothed corner normals. Used as visible light-marker geometry.
    pub fn light_box(width: f32, height: f32, depth: f32) -> Self {
        let mut mesh = Self::cuboid("LightBox", Vec3::new(width, height, depth) * 0.5);
        mesh.compute_normals();
        mesh
    }

    /// Build a cube spanning [-1, 1] on every axis with flat normals.
    pub fn cube() -> Self {
        Self::cuboid("Cube", Vec3::ONE)
    }

    /// Build a square in the XY plane facing +Z.
    pub fn quad(half_size: f32) -> Self {
        let h = half_size;
        let corners = [
            Vertex::new(Vec3::new(-h, -h, 0.0), Vec3::Z, Vec2::new(0.0, 0.0)),
            Vertex::new(Vec3::new(h, -h, 0.0), Vec3::Z, Vec2::new(1.0, 0.0)),
            Vertex::new(Vec3::new(h, h, 0.0), Vec3::Z, Vec2::new(1.0, 1.0)),
            Vertex::new(Vec3::new(-h, h, 0.0), Vec3::Z, Vec2::new(0.0, 1.0)),
        ];
        let faces = vec![
            Face::new(vec![corners[0], corners[1], corners[2]]),
            Face::new(vec![corners[0], corners[2], corners[3]]),
        ];
        Self::new("Quad", faces)
    }

    fn cuboid(name: &str, half: Vec3) -> Self {
        let (w, h, d) = (half.x, half.y, half.z);
        let p = [
            Vec3::new(-w, -h, d),
            Vec3::new(w, -h, d),
            Vec3::new(w, h, d),
            Vec3::new(-w, h, d),
            Vec3::new(-w, -h, -d),
            Vec3::new(w, -h, -d),
            Vec3::new(w, h, -d),
            Vec3::new(-w, h, -d),
        ];

        // Counter-clockwise seen from outside
        let quads: [([usize; 4], Vec3); 6] = [
            ([0, 1, 2, 3], Vec3::Z),
            ([5, 4, 7, 6], Vec3::NEG_Z),
            ([4, 0, 3, 7], Vec3::NEG_X),
            ([1, 5, 6, 2], Vec3::X),
            ([3, 2, 6, 7], Vec3::Y),
            ([4, 5, 1, 0], Vec3::NEG_Y),
        ];

        let uv = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];

        let mut faces = Vec::with_capacity(12);
        for (idx, normal) in quads {
            let c: Vec<Vertex> = idx
                .iter()
                .zip(uv)
                .map(|(&i, t)| Vertex::new(p[i], normal, t))
                .collect();
            faces.push(Face::new(vec![c[0], c[1], c[2]]));
            faces.push(Face::new(vec![c[0], c[2], c[3]]));
        }

        Self::new(name, faces)
    }
}
