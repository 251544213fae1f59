//! Example: Load and inspect an OBJ file.
//!
//! Run with: cargo run --example load_obj -- models/cube.obj

use std::env;

use cbox_core::load_obj;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: load_obj <path-to-obj-file>");
        println!("\nExample:");
        println!("  cargo run --example load_obj -- models/cube.obj");
        return;
    }

    let path = &args[1];
    println!("Loading OBJ file: {}", path);

    match load_obj(path) {
        Ok(mesh) => {
            println!("\n=== Mesh: {} ===", mesh.name);
            println!("Faces: {}", mesh.faces.len());
            println!("Triangles: {}", mesh.triangle_count());
            println!("Corners: {}", mesh.vertex_count());

            let center = mesh.center();
            println!("Center: ({:.3}, {:.3}, {:.3})", center.x, center.y, center.z);
        }
        Err(e) => {
            eprintln!("Failed to load {}: {}", path, e);
            std::process::exit(1);
        }
    }
}
