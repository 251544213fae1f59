//! Cornell box room builder and the reference demo scene.

use std::sync::Arc;

use cbox_math::Vec3;

use crate::light::Light;
use crate::material::{Color, Material};
use crate::mesh::Mesh;
use crate::scene::{Geometry, NodeId, Scene};

/// One of the six room walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Wall {
    Left,
    Right,
    Back,
    Floor,
    Ceiling,
    Front,
}

impl Wall {
    pub const ALL: [Wall; 6] = [
        Wall::Left,
        Wall::Right,
        Wall::Back,
        Wall::Floor,
        Wall::Ceiling,
        Wall::Front,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Wall::Left => "LeftWall",
            Wall::Right => "RightWall",
            Wall::Back => "BackWall",
            Wall::Floor => "Floor",
            Wall::Ceiling => "Ceiling",
            Wall::Front => "FrontWall",
        }
    }

    pub fn default_color(self) -> Color {
        match self {
            Wall::Left => Color::new(1.0, 0.0, 0.0),
            Wall::Right => Color::new(0.0, 0.15, 1.0),
            _ => Color::splat(0.7),
        }
    }

    /// Position and Euler rotation (degrees) that turn a +Z facing quad
    /// into this wall, facing into the room.
    fn placement(self, half: f32) -> (Vec3, Vec3) {
        match self {
            Wall::Left => (Vec3::new(-half, 0.0, 0.0), Vec3::new(0.0, 90.0, 0.0)),
            Wall::Right => (Vec3::new(half, 0.0, 0.0), Vec3::new(0.0, -90.0, 0.0)),
            Wall::Back => (Vec3::new(0.0, 0.0, -half), Vec3::ZERO),
            Wall::Floor => (Vec3::new(0.0, -half, 0.0), Vec3::new(-90.0, 0.0, 0.0)),
            Wall::Ceiling => (Vec3::new(0.0, half, 0.0), Vec3::new(90.0, 0.0, 0.0)),
            Wall::Front => (Vec3::new(0.0, 0.0, half), Vec3::new(0.0, 180.0, 0.0)),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Handles to the walls of a room added to a [`Scene`].
///
/// The front wall is hidden from camera rays so the camera can look in
/// from outside, while reflections inside the room still see it.
#[derive(Clone, Debug)]
pub struct CornellRoom {
    size: f32,
    node: NodeId,
    walls: [NodeId; 6],
}

impl CornellRoom {
    /// Add a room of edge length `size`, centered at the origin, under the scene root.
    pub fn build(scene: &mut Scene, size: f32) -> Self {
        let half = size * 0.5;
        let quad = Arc::new(Mesh::quad(half));
        let node = scene.add_child(scene.root(), "CornellRoom");

        let walls = Wall::ALL.map(|wall| {
            let (position, rotation) = wall.placement(half);
            let mut geometry = Geometry::mesh(quad.clone())
                .with_material(Material::new(wall.default_color()))
                .with_position(position)
                .with_rotation_degrees(rotation);
            geometry.hidden = wall == Wall::Front;
            scene.add_geometry(node, wall.name(), geometry)
        });

        Self { size, node, walls }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// The group node holding the walls.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn wall_node(&self, wall: Wall) -> NodeId {
        self.walls[wall.index()]
    }

    /// Current material of a wall, or `None` if the wall was removed.
    pub fn wall_material(&self, scene: &Scene, wall: Wall) -> Option<Material> {
        scene
            .node(self.wall_node(wall))
            .and_then(|n| n.geometry.as_ref())
            .map(|g| g.material)
    }

    pub fn set_wall_color(&self, scene: &mut Scene, wall: Wall, color: Color) {
        if let Some(g) = scene.geometry_mut(self.wall_node(wall)) {
            g.material.diffuse_color = color;
        }
    }

    /// Set mirror reflectivity; the wall becomes a mirror when it is > 0.
    pub fn set_wall_reflectivity(&self, scene: &mut Scene, wall: Wall, reflectivity: f32) {
        if let Some(g) = scene.geometry_mut(self.wall_node(wall)) {
            g.material.set_reflectivity(reflectivity);
        }
    }

    /// Set transparency; the wall becomes transparent when it is > 0.
    pub fn set_wall_transparency(&self, scene: &mut Scene, wall: Wall, transparency: f32) {
        if let Some(g) = scene.geometry_mut(self.wall_node(wall)) {
            g.material.set_transparency(transparency);
        }
    }
}

/// The reference room: a 15 unit box, one warm top light with a visible
/// marker panel, two spheres and two boxes, viewed through the hidden front wall.
pub fn demo_scene() -> (Scene, CornellRoom) {
    let mut scene = Scene::new("CornellBox");
    let room = CornellRoom::build(&mut scene, 15.0);
    let root = scene.root();

    let top = scene.add_light(
        root,
        "TopLight",
        Light::new(Vec3::new(0.0, 7.0, 0.0), Color::new(1.0, 1.0, 0.9), 1.5),
    );
    if let Some(node) = scene.node_mut(top) {
        node.geometry = Some(
            Geometry::mesh(Arc::new(Mesh::light_box(6.0, 0.15, 6.0)))
                .with_material(Material::new(Color::ONE))
                .with_position(Vec3::new(0.0, 7.4, 0.0))
                .as_light_marker(),
        );
    }

    scene.add_geometry(
        root,
        "Sphere_A",
        Geometry::sphere()
            .with_material(Material::new(Color::new(0.98, 0.78, 0.18)))
            .with_position(Vec3::new(2.6, -3.5, 1.2))
            .with_scale(Vec3::splat(2.0)),
    );
    scene.add_geometry(
        root,
        "Sphere_B",
        Geometry::sphere()
            .with_material(Material::new(Color::new(0.25, 0.85, 0.75)))
            .with_position(Vec3::new(-3.5, 1.3, -2.6))
            .with_scale(Vec3::splat(1.3)),
    );

    let mut cube = Mesh::cube();
    cube.compute_normals();
    let cube = Arc::new(cube);

    scene.add_geometry(
        root,
        "Cube_A",
        Geometry::mesh(cube.clone())
            .with_material(Material::new(Color::new(0.92, 0.92, 0.94)))
            .with_position(Vec3::new(-3.5, -3.7, -2.6))
            .with_rotation_degrees(Vec3::new(0.0, 18.0, 0.0))
            .with_scale(Vec3::new(2.8, -3.7, 2.8)),
    );
    scene.add_geometry(
        root,
        "Cube_B",
        Geometry::mesh(cube)
            .with_material(Material::new(Color::new(0.70, 0.55, 0.95)))
            .with_position(Vec3::new(3.0, -6.75, 1.2))
            .with_rotation_degrees(Vec3::new(0.0, -22.0, 0.0))
            .with_scale(Vec3::new(3.5, 1.2, 3.5)),
    );

    scene.camera.position = Vec3::new(-1.9, 2.6, 38.2);
    scene.camera.target = Vec3::new(-1.7, 0.0, 0.0);

    (scene, room)
}
