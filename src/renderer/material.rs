//! Surface material
//!
//! Specular parameters for the Phong term of the lit shader. Diffuse colour
//! comes from the mesh texture.

/// Phong specular parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Strength of the specular highlight.
    pub specular_intensity: f32,
    /// Specular exponent. Higher is a tighter highlight.
    pub shininess: f32,
}

impl Material {
    pub fn new(specular_intensity: f32, shininess: f32) -> Self {
        Self {
            specular_intensity,
            shininess,
        }
    }

    /// Bright, tight highlight.
    pub fn shiny() -> Self {
        Self::new(4.0, 256.0)
    }

    /// Faint, broad highlight.
    pub fn dull() -> Self {
        Self::new(0.3, 4.0)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::dull()
    }
}
