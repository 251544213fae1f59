use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use cbox_core::{demo_scene, load_obj, Color, Geometry, Material, Scene, Wall};
use cbox_math::Vec3;
use cbox_renderer::{render_scene, render_wireframe, RenderConfig};
use clap::Parser;
use log::LevelFilter;

mod cli;

use cli::{Args, Finish};

fn init_logger(level: LevelFilter) {
    let mut builder = env_logger::Builder::from_default_env();
    if env::var_os("RUST_LOG").is_none() {
        builder.filter_level(level);
    }
    builder.init();
}

fn model_material(finish: Finish) -> Material {
    match finish {
        Finish::Diffuse => Material::default(),
        Finish::Mirror => Material::new(Color::new(0.8, 0.8, 1.0)).with_reflectivity(0.8),
        Finish::Glass => Material::new(Color::new(0.9, 1.0, 0.9)).with_transparency(0.7, 1.5),
    }
}

fn add_models(scene: &mut Scene, args: &Args) -> Result<()> {
    let material = model_material(args.finish);

    for path in &args.models {
        let mut mesh =
            load_obj(path).with_context(|| format!("Failed to load model {}", path.display()))?;
        mesh.compute_normals();

        let name = mesh.name.clone();
        let geometry = Geometry::mesh(Arc::new(mesh))
            .with_material(material)
            .with_scale(Vec3::splat(args.model_scale));
        scene.add_geometry(scene.root(), name, geometry);
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)
            .with_context(|| format!("Failed to read render config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let config = load_config(&args)?;

    let (mut scene, room) = demo_scene();
    if let Some(reflectivity) = args.mirror_wall {
        room.set_wall_reflectivity(&mut scene, Wall::Back, reflectivity);
    }
    add_models(&mut scene, &args)?;

    log::info!(
        "Scene '{}': {} nodes, {} with geometry, {} triangles",
        scene.name,
        scene.node_count(),
        scene.geometry_count(),
        scene.total_triangle_count()
    );

    let pixels = if args.wireframe {
        render_wireframe(args.width, args.height, &scene)
    } else {
        render_scene(args.width, args.height, &scene, &config)
    };

    pixels
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
