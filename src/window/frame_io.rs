//! Frame input/output types
//!
//! Types passed to and from the render loop callbacks.

use super::input::InputState;
use crate::context::WgpuContext;
pub use crate::renderer::viewer::Viewport;

/// What the setup callback gets once the GPU is ready.
pub struct GraphicsInit<'a> {
    /// The wgpu context.
    pub ctx: &'a WgpuContext,
    /// The surface format.
    pub surface_format: wgpu::TextureFormat,
    /// The initial surface size.
    pub viewport: Viewport,
}

/// Input data for a frame.
pub struct FrameInput<'a> {
    /// Keyboard and mouse state.
    pub input: &'a mut InputState,
    /// Time elapsed since the start of the application in seconds.
    pub elapsed_time: f64,
    /// Time elapsed since the last frame in seconds.
    pub delta_time: f64,
    /// The viewport dimensions.
    pub viewport: Viewport,
    /// Whether the surface changed size since the last frame.
    pub resized: bool,
    /// The wgpu context.
    pub ctx: &'a WgpuContext,
    /// The surface texture view to render to.
    pub surface_view: &'a wgpu::TextureView,
    /// The surface format.
    pub surface_format: wgpu::TextureFormat,
}

impl FrameInput<'_> {
    /// Get the aspect ratio.
    pub fn aspect(&self) -> f32 {
        self.viewport.aspect()
    }
}

/// Output data from a frame.
#[derive(Debug, Clone, Default)]
pub struct FrameOutput {
    /// Whether to exit the application.
    pub exit: bool,
}

impl FrameOutput {
    /// Create a new frame output that doesn't exit.
    pub fn new() -> Self {
        Self { exit: false }
    }

    /// Create a frame output that exits the application.
    pub fn exit() -> Self {
        Self { exit: true }
    }
}
