//! WGSL shader sources
//!
//! The crate ships its shaders inline. A shader can also be read from a
//! file, falling back to the built-in source if the file is unreadable.

use crate::error::{report, Error, Result};
use std::borrow::Cow;
use std::path::Path;

const LIT: &str = include_str!("shaders/lit.wgsl");
const DIRECTIONAL_SHADOW: &str = include_str!("shaders/directional_shadow.wgsl");
const OMNI_SHADOW: &str = include_str!("shaders/omni_shadow.wgsl");

/// WGSL source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    source: Cow<'static, str>,
}

impl ShaderSource {
    /// Wrap inline source.
    pub fn inline(source: &'static str) -> Self {
        Self {
            source: Cow::Borrowed(source),
        }
    }

    /// Phong lighting with directional and omni shadow lookups.
    pub fn lit() -> Self {
        Self::inline(LIT)
    }

    /// Depth-only pass from the directional light.
    pub fn directional_shadow() -> Self {
        Self::inline(DIRECTIONAL_SHADOW)
    }

    /// Distance-to-light pass for point light cube faces.
    pub fn omni_shadow() -> Self {
        Self::inline(OMNI_SHADOW)
    }

    /// Read a UTF-8 WGSL file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::ShaderRead {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "shader loaded");
        Ok(Self {
            source: Cow::Owned(source),
        })
    }

    /// Read a WGSL file, or use `builtin` if it cannot be read.
    pub fn load_or_builtin(path: impl AsRef<Path>, builtin: ShaderSource) -> Self {
        match Self::from_file(path) {
            Ok(shader) => shader,
            Err(err) => {
                report("using built-in shader", err);
                builtin
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_shader_read_error() {
        let err = ShaderSource::from_file("no/such/dir/lit.wgsl").unwrap_err();
        assert!(matches!(err, Error::ShaderRead { .. }));
    }

    #[test]
    fn test_load_or_builtin_falls_back() {
        let shader = ShaderSource::load_or_builtin("no/such/dir/lit.wgsl", ShaderSource::lit());
        assert_eq!(shader, ShaderSource::lit());
    }

    #[test]
    fn test_from_file_reads_source() {
        let path = std::env::temp_dir().join("penumbra_shader_test.wgsl");
        std::fs::write(&path, "@vertex fn vs_main() {}").unwrap();
        let shader = ShaderSource::from_file(&path).unwrap();
        assert_eq!(shader.as_str(), "@vertex fn vs_main() {}");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_lit_shader_declares_uniform_names() {
        let lit = ShaderSource::lit();
        for name in [
            "directionalLight",
            "pointLights",
            "omniShadowMaps",
            "directionalLightTransform",
            "eyePosition",
            "specularIntensity",
            "shininess",
            "farPlane",
            "omniShadowMap0",
            "omniShadowMap1",
            "omniShadowMap2",
        ] {
            assert!(lit.as_str().contains(name), "lit shader lacks {name}");
        }
    }

    #[test]
    fn test_omni_shader_declares_uniform_names() {
        let omni = ShaderSource::omni_shadow();
        for name in ["lightMatrices", "lightPos", "farPlane"] {
            assert!(omni.as_str().contains(name), "omni shader lacks {name}");
        }
    }
}
