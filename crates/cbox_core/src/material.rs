//! Surface materials for the Whitted-style renderer.

use cbox_math::Vec3;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// A Phong material with optional mirror and glass behaviour.
///
/// `is_mirror` and `is_transparent` may both be set; the renderer treats
/// that combination as glass whose Fresnel reflectance is floored at
/// `reflectivity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse/albedo color (RGB, 0-1)
    pub diffuse_color: Color,

    /// Specular highlight color (RGB, 0-1)
    pub specular_color: Color,

    /// Phong exponent. Highlights are skipped when this is <= 1.
    pub shininess: f32,

    /// Mirror blend factor in [0, 1]
    pub reflectivity: f32,
    pub is_mirror: bool,

    /// Glass blend factor in [0, 1]
    pub transparency: f32,
    pub is_transparent: bool,

    /// Index of refraction (1.0 = air, 1.5 = glass)
    pub refractive_index: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Material {
    /// Light grey plastic.
    pub const DEFAULT: Material = Material {
        diffuse_color: Vec3::splat(0.8),
        specular_color: Vec3::splat(0.8),
        shininess: 32.0,
        reflectivity: 0.0,
        is_mirror: false,
        transparency: 0.0,
        is_transparent: false,
        refractive_index: 1.0,
    };

    /// Create a plain diffuse material of the given color.
    pub fn new(diffuse_color: Color) -> Self {
        Self {
            diffuse_color,
            ..Self::DEFAULT
        }
    }

    /// Set mirror reflectivity. The mirror flag follows `reflectivity > 0`.
    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.set_reflectivity(reflectivity);
        self
    }

    /// Set glass transparency and index of refraction.
    /// The transparent flag follows `transparency > 0`.
    pub fn with_transparency(mut self, transparency: f32, refractive_index: f32) -> Self {
        self.set_transparency(transparency);
        self.refractive_index = refractive_index;
        self
    }

    pub fn with_specular(mut self, specular_color: Color, shininess: f32) -> Self {
        self.specular_color = specular_color;
        self.shininess = shininess;
        self
    }

    pub fn set_reflectivity(&mut self, reflectivity: f32) {
        self.reflectivity = reflectivity.clamp(0.0, 1.0);
        self.is_mirror = self.reflectivity > 0.0;
    }

    pub fn set_transparency(&mut self, transparency: f32) {
        self.transparency = transparency.clamp(0.0, 1.0);
        self.is_transparent = self.transparency > 0.0;
    }

    /// True when the renderer takes the mirror branch for this material.
    pub fn reflects(&self) -> bool {
        self.is_mirror && self.reflectivity > 0.0
    }

    /// True when the renderer takes the glass branch for this material.
    pub fn refracts(&self) -> bool {
        self.is_transparent && self.transparency > 0.0
    }

    /// Transparent materials never block light, whatever their tint.
    pub fn casts_shadow(&self) -> bool {
        !self.refracts()
    }
}
