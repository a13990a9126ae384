//! Core rendering abstractions
//!
//! This module provides mid-level abstractions over wgpu primitives.

pub mod buffer;
pub mod pipeline;
pub mod render_states;
pub mod texture;
pub mod vertex;

pub use buffer::{IndexBuffer, UniformBuffer, VertexBuffer};
pub use pipeline::PipelineBuilder;
pub use render_states::{ClearState, CullState, DepthState};
pub use texture::{DepthCubeTexture, DepthTexture, Texture2D};
pub use vertex::Vertex;
