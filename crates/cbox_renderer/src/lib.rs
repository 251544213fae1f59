//! cbox Renderer - CPU Whitted-style ray tracing
//!
//! Renders a flattened snapshot of a `cbox_core::Scene` with Phong direct
//! lighting, hard shadows, mirror reflection and Fresnel glass. Buckets
//! are traced in parallel with rayon; there is no acceleration structure,
//! every ray is tested against every primitive.
//!
//! # Example
//!
//! ```ignore
//! use cbox_core::demo_scene;
//! use cbox_renderer::{render, RenderScene};
//!
//! let (scene, _room) = demo_scene();
//! let snapshot = RenderScene::from_scene(&scene);
//! render(800, 600, &snapshot).save("cornell.png")?;
//! ```

mod bucket;
mod camera;
mod hittable;
mod mesh;
mod output;
mod renderer;
mod scene;
mod shading;
mod sphere;
mod triangle;
mod wireframe;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::RayGenerator;
pub use hittable::{HitRecord, Hittable, PrimitiveFlags};
pub use mesh::MeshPrimitive;
pub use output::{color_to_rgb8, encode_channel, OutputError, OutputResult, PixelBuffer, GAMMA};
pub use renderer::{
    render, render_image, render_pixel, render_scene, render_with_config, ConfigError,
    ConfigResult, ImageBuffer, RenderConfig, MAX_DEPTH,
};
pub use scene::{offset_origin, RenderScene};
pub use shading::{attenuation, reflect, refract, schlick, shade_direct, trace_ray};
pub use sphere::SpherePrimitive;
pub use triangle::{intersect_triangle, Barycentric};
pub use wireframe::render_wireframe;

/// Re-export common math and material types
pub use cbox_core::{Color, Light, Material};
pub use cbox_math::{Interval, Ray, Vec3};

/// Minimum hit distance for every ray, and the offset applied to secondary
/// ray origins.
pub const EPSILON: f32 = 1e-3;
