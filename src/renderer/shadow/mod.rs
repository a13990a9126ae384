//! Shadow mapping module
//!
//! The directional light renders into a 2D depth map. Each point light
//! renders into a depth cube, one pass per face. The lit pass samples both
//! through comparison samplers.

mod directional;
mod omni;

pub use directional::{DirectionalShadowPass, ShadowMap};
pub use omni::{OmniShadowMap, OmniShadowPass};

use crate::error::{Error, Result};

/// Shadow map configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowConfig {
    /// Directional shadow map resolution (width and height).
    pub directional_resolution: u32,
    /// Per-face resolution of point light cube maps.
    pub omni_resolution: u32,
    /// Depth bias of the directional lookup, in 0..1 depth units.
    pub bias: f32,
    /// Depth bias of the cube lookups, in world units.
    pub omni_bias: f32,
    /// Slope-scaled raster bias of the directional caster pass.
    pub slope_bias: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            directional_resolution: 2048,
            omni_resolution: 1024,
            bias: 0.005,
            omni_bias: 0.05,
            slope_bias: 1.5,
        }
    }
}

/// Reject shadow maps with a zero dimension.
pub fn validate_size(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::ZeroShadowMapSize { width, height });
    }
    Ok(())
}

/// Reject cube maps with a zero dimension or non-square faces.
pub fn validate_cube_size(width: u32, height: u32) -> Result<()> {
    validate_size(width, height)?;
    if width != height {
        return Err(Error::NonSquareCubeMap { width, height });
    }
    Ok(())
}

/// Comparison sampler for shadow lookups. Filtering gives hardware 2x2 PCF.
fn comparison_sampler(
    ctx: &crate::context::WgpuContext,
    label: &str,
    address_mode: wgpu::AddressMode,
    border_color: Option<wgpu::SamplerBorderColor>,
) -> wgpu::Sampler {
    ctx.device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        compare: Some(wgpu::CompareFunction::LessEqual),
        border_color,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            validate_size(0, 1024),
            Err(Error::ZeroShadowMapSize {
                width: 0,
                height: 1024
            })
        ));
        assert!(matches!(
            validate_size(2048, 0),
            Err(Error::ZeroShadowMapSize { .. })
        ));
        assert!(validate_size(1, 1).is_ok());
    }

    #[test]
    fn test_cube_size_must_be_square() {
        assert!(matches!(
            validate_cube_size(0, 0),
            Err(Error::ZeroShadowMapSize { .. })
        ));
        assert!(matches!(
            validate_cube_size(1024, 512),
            Err(Error::NonSquareCubeMap {
                width: 1024,
                height: 512
            })
        ));
        assert!(validate_cube_size(1024, 1024).is_ok());
    }

    #[test]
    fn test_default_config() {
        let config = ShadowConfig::default();
        assert_eq!(config.directional_resolution, 2048);
        assert_eq!(config.omni_resolution, 1024);
        assert_eq!(config.bias, 0.005);
        assert_eq!(config.omni_bias, 0.05);
        assert_eq!(config.slope_bias, 1.5);
    }
}
