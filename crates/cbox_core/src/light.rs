//! Point lights.

use cbox_math::Vec3;

use crate::material::Color;

/// A point light. No area, so shadows are always hard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            color: Color::ONE,
            intensity: 1.0,
        }
    }
}

impl Light {
    pub fn new(position: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            position,
            color,
            intensity,
        }
    }

    /// White light of unit intensity.
    pub fn white(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}
