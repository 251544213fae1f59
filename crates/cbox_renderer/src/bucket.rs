//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! on the rayon thread pool. Every bucket writes a disjoint set of pixels.

use cbox_core::Color;
use rayon::prelude::*;

use crate::camera::RayGenerator;
use crate::renderer::{render_pixel, ImageBuffer, RenderConfig};
use crate::scene::RenderScene;

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Row-major index of this bucket
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Generate buckets for an image in row-major order.
///
/// A `bucket_size` of 0 is treated as 1.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    buckets
}

/// Render a single bucket. Returns pixels in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    rays: &RayGenerator,
    scene: &RenderScene,
    config: &RenderConfig,
) -> Vec<Color> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let color = render_pixel(rays, scene, bucket.x + local_x, bucket.y + local_y, config);
            pixels.push(color);
        }
    }

    pixels
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }
}

/// Render every bucket in parallel and assemble the image.
pub fn render_buckets(
    image: &mut ImageBuffer,
    rays: &RayGenerator,
    scene: &RenderScene,
    config: &RenderConfig,
) {
    let buckets = generate_buckets(image.width, image.height, config.bucket_size);

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let pixels = render_bucket(bucket, rays, scene, config);
            log::debug!(
                "Bucket {} at ({}, {}) done: {} pixels",
                bucket.index,
                bucket.x,
                bucket.y,
                pixels.len()
            );
            BucketResult::new(*bucket, pixels)
        })
        .collect();

    for result in &results {
        image.write_bucket(result);
    }
}
