//! Render entry points and configuration.
//!
//! A render flattens nothing itself: callers hand in a [`RenderScene`]
//! snapshot, which is only read while the buckets run in parallel.

use std::fs;
use std::path::Path;
use std::time::Instant;

use cbox_core::{Color, Scene};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bucket::{render_buckets, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::camera::RayGenerator;
use crate::output::PixelBuffer;
use crate::scene::RenderScene;
use crate::shading::trace_ray;

/// Recursion limit for reflection and refraction rays.
pub const MAX_DEPTH: u32 = 6;

/// Errors that can occur while loading a render configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid render config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum ray recursion depth; camera rays are depth 0
    pub max_depth: u32,
    /// Edge length of a render bucket in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    /// Load a config from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Linear, unclamped render output.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let b = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let i = i as u32;
            self.set(b.x + i % b.width, b.y + i / b.width, *color);
        }
    }
}

/// Color of a single pixel: one camera ray, no supersampling.
pub fn render_pixel(
    rays: &RayGenerator,
    scene: &RenderScene,
    x: u32,
    y: u32,
    config: &RenderConfig,
) -> Color {
    let ray = rays.ray_for_pixel(x, y);
    trace_ray(scene, &ray, 0, config.max_depth)
}

/// Render the snapshot to linear colors.
pub fn render_image(
    width: u32,
    height: u32,
    scene: &RenderScene,
    config: &RenderConfig,
) -> ImageBuffer {
    let mut image = ImageBuffer::new(width, height);
    if width == 0 || height == 0 {
        return image;
    }

    log::info!(
        "Rendering {}x{} | primitives: {} | triangles: {} | lights: {} | max depth: {}",
        width,
        height,
        scene.primitive_count(),
        scene.triangle_count(),
        scene.lights.len(),
        config.max_depth
    );

    let start = Instant::now();
    let rays = RayGenerator::new(&scene.camera, width, height);
    render_buckets(&mut image, &rays, scene, config);

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}

/// Render the snapshot to 8-bit display pixels with the default config.
pub fn render(width: u32, height: u32, scene: &RenderScene) -> PixelBuffer {
    render_with_config(width, height, scene, &RenderConfig::default())
}

pub fn render_with_config(
    width: u32,
    height: u32,
    scene: &RenderScene,
    config: &RenderConfig,
) -> PixelBuffer {
    PixelBuffer::from_image(&render_image(width, height, scene, config))
}

/// Flatten `scene` and render it. Edits made to `scene` afterwards only
/// show up in the next call.
pub fn render_scene(width: u32, height: u32, scene: &Scene, config: &RenderConfig) -> PixelBuffer {
    let snapshot = RenderScene::from_scene(scene);
    render_with_config(width, height, &snapshot, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::PrimitiveFlags;
    use crate::mesh::MeshPrimitive;
    use crate::sphere::SpherePrimitive;
    use cbox_core::{demo_scene, Light, Material, Mesh, Wall};
    use cbox_math::{Camera, Mat4, Vec3};
    use std::sync::Arc;

    const BACKGROUND: Color = Color::new(0.1, 0.2, 0.3);

    fn small_config() -> RenderConfig {
        RenderConfig {
            bucket_size: 7,
            ..Default::default()
        }
    }

    fn lit_sphere_scene() -> RenderScene {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 1.0);
        let mut scene = RenderScene::new(camera, Color::splat(0.1), Color::ZERO);
        scene.add_light(Light::white(Vec3::new(0.0, 5.0, 0.0)));
        scene.add_sphere(SpherePrimitive::new(
            Vec3::ZERO,
            1.0,
            Material::new(Color::ONE),
            PrimitiveFlags::default(),
        ));
        scene
    }

    #[test]
    fn test_config_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.max_depth, 6);
        assert_eq!(config.bucket_size, 64);
    }

    #[test]
    fn test_config_from_json_file() {
        let path = std::env::temp_dir().join("cbox_render_config_test.json");
        fs::write(&path, r#"{ "max_depth": 3 }"#).unwrap();

        let config = RenderConfig::from_json_file(&path).unwrap();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.bucket_size, DEFAULT_BUCKET_SIZE);

        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            RenderConfig::from_json_file(&path),
            Err(ConfigError::Json(_))
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_image_buffer_bucket_write() {
        let mut image = ImageBuffer::new(4, 3);
        let bucket = crate::bucket::Bucket::new(1, 1, 2, 2, 0);
        let pixels = vec![Color::X, Color::Y, Color::Z, Color::ONE];
        image.write_bucket(&BucketResult::new(bucket, pixels));

        assert_eq!(image.get(1, 1), Color::X);
        assert_eq!(image.get(2, 1), Color::Y);
        assert_eq!(image.get(1, 2), Color::Z);
        assert_eq!(image.get(2, 2), Color::ONE);
        assert_eq!(image.get(0, 0), Color::ZERO);
    }

    #[test]
    fn test_lit_sphere_brighter_than_background() {
        let scene = lit_sphere_scene();
        let image = render_image(33, 33, &scene, &small_config());

        let center = image.get(16, 16);
        let corner = image.get(0, 0);

        assert_eq!(corner, scene.background_color);
        assert!(center.length() > corner.length());
        // Top of the sphere faces the light
        assert!(image.get(16, 12).length() > image.get(16, 20).length());
    }

    #[test]
    fn test_render_is_deterministic() {
        let (scene, _room) = demo_scene();
        let snapshot = RenderScene::from_scene(&scene);
        let config = small_config();

        let first = render_with_config(24, 18, &snapshot, &config);
        let second = render_with_config(24, 18, &snapshot, &config);
        assert_eq!(first, second);
        assert_eq!(first.data.len(), 24 * 18 * 3);
    }

    #[test]
    fn test_bucket_size_does_not_change_pixels() {
        let scene = lit_sphere_scene();
        let a = render_image(20, 15, &scene, &RenderConfig::default());
        let b = render_image(20, 15, &scene, &small_config());
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_scene_is_uniform() {
        let scene = RenderScene::new(Camera::default(), Color::splat(0.1), BACKGROUND);
        let image = render_image(8, 8, &scene, &small_config());
        assert!(image.pixels.iter().all(|&c| c == BACKGROUND));
    }

    #[test]
    fn test_zero_sized_render() {
        let pixels = render(0, 5, &lit_sphere_scene());
        assert_eq!(pixels.width, 0);
        assert!(pixels.data.is_empty());
    }

    #[test]
    fn test_mirror_plane_shows_reflection() {
        // Mirror in front of the camera, red sphere behind the camera
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 1.0);
        let mut scene = RenderScene::new(camera, Color::splat(0.1), Color::ZERO);
        scene.add_light(Light::white(Vec3::new(0.0, 3.0, 6.0)));

        let diffuse = Color::splat(0.5);
        scene.add_mesh(MeshPrimitive::new(
            Arc::new(Mesh::quad(10.0)),
            Mat4::IDENTITY,
            Material::new(diffuse)
                .with_specular(Color::ZERO, 0.0)
                .with_reflectivity(0.8),
            PrimitiveFlags::default(),
        ));
        scene.add_sphere(SpherePrimitive::new(
            Vec3::new(0.0, 0.0, 9.0),
            2.0,
            Material::new(Color::new(1.0, 0.0, 0.0)),
            PrimitiveFlags::default(),
        ));

        let image = render_image(17, 17, &scene, &small_config());
        let c = image.get(8, 8);

        // A plain grey plane would have equal channels
        assert!(c.x > c.y + 0.05, "{:?}", c);
        assert!((c - diffuse).length() > 0.05);
    }

    #[test]
    fn test_glass_sphere_shows_tinted_wall() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, 1.0);
        let mut scene = RenderScene::new(camera, Color::splat(0.2), Color::ZERO);
        scene.add_light(Light::white(Vec3::new(0.0, 0.0, 3.0)));

        let wall = Color::new(0.0, 0.9, 0.2);
        scene.add_mesh(MeshPrimitive::new(
            Arc::new(Mesh::quad(20.0)),
            Mat4::from_translation(Vec3::new(0.0, 0.0, -4.0)),
            Material::new(wall),
            PrimitiveFlags::default(),
        ));
        let tint = Color::new(1.0, 1.0, 0.5);
        scene.add_sphere(SpherePrimitive::new(
            Vec3::ZERO,
            1.0,
            Material::new(tint).with_transparency(1.0, 1.5),
            PrimitiveFlags::default(),
        ));

        let image = render_image(9, 9, &scene, &small_config());
        let c = image.get(4, 4);

        // The sphere's own color has full red; the wall seen through it has almost none
        assert!(c.y > c.x, "{:?}", c);
        assert!((c - tint).length() > 0.3);
    }

    #[test]
    fn test_hidden_object_only_seen_in_mirror() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 1.0).with_fov_degrees(60.0);
        let mut scene = RenderScene::new(camera, Color::splat(0.3), Color::ZERO);
        scene.add_light(Light::white(Vec3::new(0.0, 0.0, 4.0)));

        // Mirror on the left, angled so it reflects the right side of the view
        scene.add_mesh(MeshPrimitive::new(
            Arc::new(Mesh::quad(1.5)),
            Mat4::from_translation(Vec3::new(-1.5, 0.0, 0.0))
                * Mat4::from_rotation_y(45f32.to_radians()),
            Material::new(Color::ZERO)
                .with_specular(Color::ZERO, 0.0)
                .with_reflectivity(1.0),
            PrimitiveFlags::default(),
        ));
        // Hidden blue sphere on the right, in the mirror's reflection path
        let blue = Material::new(Color::new(0.0, 0.0, 1.0)).with_specular(Color::ZERO, 0.0);
        scene.add_sphere(SpherePrimitive::new(
            Vec3::new(1.5, 0.0, 1.0),
            1.0,
            blue,
            PrimitiveFlags {
                light_marker: false,
                hidden: true,
            },
        ));

        let image = render_image(41, 41, &scene, &small_config());

        // Direct view of the hidden sphere shows the background
        let rays = RayGenerator::new(&scene.camera, 41, 41);
        let mut direct_pixels = 0;
        let mut mirror_blue = 0;
        for y in 0..41 {
            for x in 0..41 {
                let ray = rays.ray_for_pixel(x, y);
                let c = image.get(x, y);
                let first = scene.intersect(&ray, false);
                match first {
                    Some(hit) if hit.material.diffuse_color == blue.diffuse_color => {
                        direct_pixels += 1;
                        assert_eq!(c, Color::ZERO, "hidden sphere visible at ({x}, {y})");
                    }
                    Some(hit) if hit.material.is_mirror => {
                        if c.z > 0.0 && c.x == 0.0 {
                            mirror_blue += 1;
                        }
                    }
                    _ => {}
                }
            }
        }

        assert!(direct_pixels > 0);
        assert!(mirror_blue > 0, "hidden sphere missing from the mirror");
    }

    #[test]
    fn test_render_scene_reflects_edits_next_time() {
        let (mut scene, room) = demo_scene();
        let config = small_config();

        let before = render_scene(16, 12, &scene, &config);
        room.set_wall_color(&mut scene, Wall::Back, Color::new(0.0, 0.0, 1.0));
        let after = render_scene(16, 12, &scene, &config);
        assert_ne!(before, after);
    }
}
