//! Render state configurations
//!
//! Provides convenient structs for configuring render pipeline states.

/// Clear state for render targets.
#[derive(Debug, Clone, Copy)]
pub struct ClearState {
    /// Color to clear to (RGBA), or None to not clear.
    pub color: Option<[f32; 4]>,
    /// Depth value to clear to (0.0-1.0), or None to not clear.
    pub depth: Option<f32>,
}

impl ClearState {
    /// Create a clear state that clears depth only.
    pub fn depth(depth: f32) -> Self {
        Self {
            color: None,
            depth: Some(depth),
        }
    }

    /// Create a clear state that clears both color and depth.
    pub fn color_and_depth(color: [f32; 4], depth: f32) -> Self {
        Self {
            color: Some(color),
            depth: Some(depth),
        }
    }

    /// Get the wgpu load operation for color.
    pub fn color_load_op(&self) -> wgpu::LoadOp<wgpu::Color> {
        match self.color {
            Some([r, g, b, a]) => wgpu::LoadOp::Clear(wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            }),
            None => wgpu::LoadOp::Load,
        }
    }

    /// Get the wgpu load operation for depth.
    pub fn depth_load_op(&self) -> wgpu::LoadOp<f32> {
        match self.depth {
            Some(d) => wgpu::LoadOp::Clear(d),
            None => wgpu::LoadOp::Load,
        }
    }
}

impl Default for ClearState {
    fn default() -> Self {
        Self::color_and_depth([0.0, 0.0, 0.0, 1.0], 1.0)
    }
}

/// Depth test configuration.
#[derive(Debug, Clone, Copy)]
pub struct DepthState {
    /// Whether to write to the depth buffer.
    pub write: bool,
    /// Comparison function for depth test.
    pub compare: wgpu::CompareFunction,
    /// Slope-scaled bias applied while rasterizing (shadow casters).
    pub slope_bias: f32,
}

impl DepthState {
    /// Depth testing enabled with writes.
    pub fn read_write() -> Self {
        Self {
            write: true,
            compare: wgpu::CompareFunction::Less,
            slope_bias: 0.0,
        }
    }

    /// Depth testing with writes and a slope-scaled bias, for depth-only passes.
    pub fn shadow_caster(slope_bias: f32) -> Self {
        Self {
            slope_bias,
            ..Self::read_write()
        }
    }

    /// Convert to wgpu depth stencil state.
    pub fn to_wgpu(&self, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format,
            depth_write_enabled: self.write,
            depth_compare: self.compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState {
                constant: 0,
                slope_scale: self.slope_bias,
                clamp: 0.0,
            },
        }
    }
}

impl Default for DepthState {
    fn default() -> Self {
        Self::read_write()
    }
}

/// Cull mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullState {
    /// No culling.
    None,
    /// Cull front faces.
    Front,
    /// Cull back faces.
    #[default]
    Back,
}

impl CullState {
    /// Convert to wgpu cull mode.
    pub fn to_wgpu(&self) -> Option<wgpu::Face> {
        match self {
            CullState::None => None,
            CullState::Front => Some(wgpu::Face::Front),
            CullState::Back => Some(wgpu::Face::Back),
        }
    }
}
