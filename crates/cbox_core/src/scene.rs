//! Scene graph types for cbox.
//!
//! The scene is an arena of nodes addressed by stable [`NodeId`]s. Each
//! node stores its parent's id rather than a pointer, and removed nodes
//! leave a tombstone so outstanding ids never alias a different node.
//!
//! The renderer never holds on to a `Scene`: it flattens one into an
//! immutable snapshot per render, so edits here only show up in the next
//! render.

use std::sync::Arc;

use cbox_math::{trs_euler, Camera, Mat4, Vec3};

use crate::light::Light;
use crate::material::{Color, Material};
use crate::mesh::Mesh;

/// Object transform components, composed as T × Rx × Ry × Rz × S.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with only translation.
    pub fn from_translation(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Convert to a 4x4 model matrix.
    pub fn to_matrix(&self) -> Mat4 {
        trs_euler(self.position, self.rotation, self.scale)
    }
}

/// How the renderer should intersect a piece of geometry.
///
/// Decided when the geometry is authored, never inferred from names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Shape {
    /// Intersect every triangle of the mesh.
    #[default]
    Mesh,
    /// Intersect an analytic sphere at the object's position with radius
    /// equal to its largest absolute scale. The mesh is only used for the
    /// wireframe preview.
    Sphere,
}

/// Renderable geometry attached to a scene node.
#[derive(Clone, Debug)]
pub struct Geometry {
    /// Shared, immutable source geometry
    pub mesh: Arc<Mesh>,
    pub shape: Shape,
    pub material: Material,
    pub transform: Transform,
    /// Visible stand-in for a light: renders white and casts no shadow
    pub light_marker: bool,
    /// Skipped by camera rays but still seen by secondary rays
    pub hidden: bool,
}

impl Geometry {
    /// Wrap a triangle mesh.
    pub fn mesh(mesh: Arc<Mesh>) -> Self {
        Self {
            mesh,
            shape: Shape::Mesh,
            material: Material::default(),
            transform: Transform::default(),
            light_marker: false,
            hidden: false,
        }
    }

    /// A unit sphere, tagged so the renderer intersects it analytically.
    pub fn sphere() -> Self {
        Self {
            shape: Shape::Sphere,
            ..Self::mesh(Arc::new(Mesh::uv_sphere(1.0, 24, 48)))
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Set Euler rotation in degrees.
    pub fn with_rotation_degrees(mut self, degrees: Vec3) -> Self {
        self.transform.rotation = Vec3::new(
            degrees.x.to_radians(),
            degrees.y.to_radians(),
            degrees.z.to_radians(),
        );
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn as_light_marker(mut self) -> Self {
        self.light_marker = true;
        self
    }

    pub fn as_hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// Stable handle to a node in a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node in the scene hierarchy.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    /// Local transform relative to the parent
    pub transform: Mat4,
    pub geometry: Option<Geometry>,
    pub light: Option<Light>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    fn new(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            geometry: None,
            light: None,
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The editable scene: node hierarchy, camera, and global lighting terms.
#[derive(Clone, Debug)]
pub struct Scene {
    pub name: String,
    pub camera: Camera,
    pub ambient_light: Color,
    pub background_color: Color,
    nodes: Vec<Option<SceneNode>>,
    root: NodeId,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("Scene")
    }
}

impl Scene {
    /// Create an empty scene with a single root node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            camera: Camera::default(),
            ambient_light: Color::splat(0.1),
            background_color: Color::ZERO,
            nodes: vec![Some(SceneNode::new("Root", None))],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Add an empty child under `parent` and return its id.
    ///
    /// A stale `parent` id falls back to the root.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let parent = if self.node(parent).is_some() {
            parent
        } else {
            log::warn!("Parent {:?} no longer exists, attaching to root", parent);
            self.root
        };

        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(SceneNode::new(name, Some(parent))));
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Add a child carrying geometry.
    pub fn add_geometry(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        geometry: Geometry,
    ) -> NodeId {
        let id = self.add_child(parent, name);
        if let Some(node) = self.node_mut(id) {
            node.geometry = Some(geometry);
        }
        id
    }

    /// Add a child carrying a point light.
    pub fn add_light(&mut self, parent: NodeId, name: impl Into<String>, light: Light) -> NodeId {
        let id = self.add_child(parent, name);
        if let Some(node) = self.node_mut(id) {
            node.light = Some(light);
        }
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Mutable access to a node's geometry, if it has any.
    pub fn geometry_mut(&mut self, id: NodeId) -> Option<&mut Geometry> {
        self.node_mut(id).and_then(|n| n.geometry.as_mut())
    }

    /// Remove a node and its whole subtree. The root cannot be removed.
    ///
    /// Returns false if `id` is the root or no longer exists.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root {
            return false;
        }
        let Some(parent) = self.node(id).map(|n| n.parent) else {
            return false;
        };

        if let Some(p) = parent.and_then(|p| self.node_mut(p)) {
            p.children.retain(|&c| c != id);
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) {
                stack.extend(node.children);
            }
        }
        true
    }

    /// Find the first node with the given name in depth-first order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.traverse()
            .into_iter()
            .find(|&id| self.node(id).is_some_and(|n| n.name == name))
    }

    /// Composed transform from the node's local space to world space.
    pub fn world_transform(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.node(c)) {
            matrix = node.transform * matrix;
            current = node.parent;
        }
        matrix
    }

    /// All live node ids in depth-first pre-order, starting at the root.
    pub fn traverse(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.node(id) {
                order.push(id);
                // Reverse so the first child is visited first
                stack.extend(node.children.iter().rev());
            }
        }
        order
    }

    /// Point lights with positions resolved to world space.
    pub fn lights(&self) -> Vec<Light> {
        self.traverse()
            .into_iter()
            .filter_map(|id| {
                let node = self.node(id)?;
                let light = node.light?;
                Some(Light {
                    position: self.world_transform(id).transform_point3(light.position),
                    ..light
                })
            })
            .collect()
    }

    /// Number of live nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    /// Number of nodes carrying geometry.
    pub fn geometry_count(&self) -> usize {
        self.nodes
            .iter()
            .flatten()
            .filter(|n| n.geometry.is_some())
            .count()
    }

    /// Total triangle count across all mesh-shaped geometry.
    pub fn total_triangle_count(&self) -> usize {
        self.nodes
            .iter()
            .flatten()
            .filter_map(|n| n.geometry.as_ref())
            .filter(|g| g.shape == Shape::Mesh)
            .map(|g| g.mesh.triangle_count())
            .sum()
    }
}
