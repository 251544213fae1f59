//! Display encoding and image output.

use std::path::Path;

use cbox_core::Color;
use thiserror::Error;

use crate::renderer::ImageBuffer;

/// Display gamma applied when encoding linear color.
pub const GAMMA: f32 = 2.2;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Pixel buffer is {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Encode one linear channel: clamp, gamma 1/2.2, clamp, round to 8 bits.
#[inline]
pub fn encode_channel(linear: f32) -> u8 {
    let c = linear.clamp(0.0, 1.0).powf(1.0 / GAMMA).clamp(0.0, 1.0);
    (c * 255.0 + 0.5) as u8
}

pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    [
        encode_channel(color.x),
        encode_channel(color.y),
        encode_channel(color.z),
    ]
}

/// Row-major, top-to-bottom RGB8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    /// Three bytes per pixel
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        }
    }

    /// Encode a linear image for display.
    pub fn from_image(image: &ImageBuffer) -> Self {
        let data = image
            .pixels
            .iter()
            .flat_map(|&c| color_to_rgb8(c))
            .collect();

        Self {
            width: image.width,
            height: image.height,
            data,
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn put(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let i = self.offset(x, y);
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    /// Save to disk; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> OutputResult<()> {
        let expected = self.width as usize * self.height as usize * 3;
        let img = image::RgbImage::from_raw(self.width, self.height, self.data.clone()).ok_or(
            OutputError::BufferSize {
                expected,
                actual: self.data.len(),
            },
        )?;
        img.save(path.as_ref())?;
        log::info!(
            "Saved {}x{} image to {}",
            self.width,
            self.height,
            path.as_ref().display()
        );
        Ok(())
    }
}
