//! Example: Render the demo room with a mirrored back wall and a glass sphere.
//!
//! Run with: cargo run --release --example mirror_room -- mirror_room.png

use std::env;

use cbox_core::{demo_scene, Color, Geometry, Material, Wall};
use cbox_math::Vec3;
use cbox_renderer::{render_scene, RenderConfig};

fn main() {
    env_logger::init();

    let output = env::args()
        .nth(1)
        .unwrap_or_else(|| "mirror_room.png".to_string());

    let (mut scene, room) = demo_scene();
    room.set_wall_reflectivity(&mut scene, Wall::Back, 0.8);

    let root = scene.root();
    scene.add_geometry(
        root,
        "GlassBall",
        Geometry::sphere()
            .with_material(Material::new(Color::new(0.9, 0.95, 1.0)).with_transparency(0.9, 1.5))
            .with_position(Vec3::new(-0.5, -5.5, 3.5))
            .with_scale(Vec3::splat(2.0)),
    );

    println!(
        "Scene '{}': {} nodes, {} triangles",
        scene.name,
        scene.node_count(),
        scene.total_triangle_count()
    );

    let start = std::time::Instant::now();
    let pixels = render_scene(640, 480, &scene, &RenderConfig::default());
    println!("Rendered in {:.2?}", start.elapsed());

    if let Err(e) = pixels.save(&output) {
        eprintln!("Failed to save {}: {}", output, e);
        std::process::exit(1);
    }
    println!("Saved {}", output);
}
