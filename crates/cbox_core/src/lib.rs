//! cbox Core - Scene graph and asset loading for the Cornell box renderer.
//!
//! This crate provides:
//!
//! - **Scene graph types**: `Scene`, `SceneNode`, `Geometry`, `Mesh`
//! - **Materials and lights**: Phong `Material` with mirror/glass terms, point `Light`
//! - **Scene authoring**: procedural meshes, the `CornellRoom` builder and `demo_scene`
//! - **OBJ support**: triangle meshes loaded through `tobj`
//!
//! # Example
//!
//! ```ignore
//! use cbox_core::{demo_scene, load_obj, Geometry};
//!
//! let (mut scene, _room) = demo_scene();
//! let teapot = load_obj("teapot.obj")?;
//! scene.add_geometry(scene.root(), "Teapot", Geometry::mesh(teapot.into()));
//! println!("{} nodes, {} triangles", scene.node_count(), scene.total_triangle_count());
//! ```

pub mod cornell;
pub mod light;
pub mod material;
pub mod mesh;
pub mod obj;
pub mod scene;

// Re-export commonly used types
pub use cornell::{demo_scene, CornellRoom, Wall};
pub use light::Light;
pub use material::{Color, Material};
pub use mesh::{Face, Mesh, Vertex};
pub use obj::{load_obj, load_obj_buf, LoadError, LoadResult};
pub use scene::{Geometry, NodeId, Scene, SceneNode, Shape, Transform};
