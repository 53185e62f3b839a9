//! Surface material of a primitive.

use glint_core::MaterialDesc;
use glint_math::Vec3;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Phong-style surface attributes.
///
/// Owned by exactly one primitive. The specular coefficient is derived,
/// never stored: `specular = 1 - diffuse`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Color,
    pub diffuse: f32,
    pub reflection: f32,
    pub refraction: f32,
    pub refractive_index: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::ZERO,
            diffuse: 1.0,
            reflection: 0.2,
            refraction: 0.1,
            refractive_index: 1.0,
        }
    }
}

impl Material {
    /// Create a default material with the given colour.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// Material of a light: fully diffuse, never reflective or refractive.
    pub fn light(color: Color) -> Self {
        Self {
            color,
            diffuse: 1.0,
            reflection: 0.0,
            refraction: 0.0,
            refractive_index: 1.0,
        }
    }

    /// Specular coefficient, `1 - diffuse`.
    #[inline]
    pub fn specular(&self) -> f32 {
        1.0 - self.diffuse
    }

    pub fn with_diffuse(mut self, diffuse: f32) -> Self {
        self.diffuse = diffuse;
        self
    }

    pub fn with_reflection(mut self, reflection: f32) -> Self {
        self.reflection = reflection;
        self
    }

    pub fn with_refraction(mut self, refraction: f32, refractive_index: f32) -> Self {
        self.refraction = refraction;
        self.refractive_index = refractive_index;
        self
    }
}

impl From<&MaterialDesc> for Material {
    fn from(desc: &MaterialDesc) -> Self {
        Self {
            color: desc.color,
            diffuse: desc.diffuse,
            reflection: desc.reflection,
            refraction: desc.refraction,
            refractive_index: desc.refractive_index,
        }
    }
}
