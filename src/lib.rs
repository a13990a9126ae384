//! Penumbra
//!
//! A small forward renderer on wgpu with shadow mapping: one directional
//! light with a 2D depth map and up to three point lights with depth cubes.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **context** - Core wgpu wrapper (Device, Queue)
//! 2. **core** - GPU primitives (buffers, textures, pipelines)
//! 3. **renderer** - Lights, camera, meshes, shadow passes and frame sequencing
//! 4. **shader** - Built-in WGSL and shader file loading
//! 5. **window** - Window management and input with winit (feature = "window")

pub mod context;
pub mod core;
pub mod error;
pub mod renderer;
pub mod shader;

#[cfg(feature = "window")]
pub mod window;

// Re-export commonly used types
pub use context::WgpuContext;

pub use error::{report, Error, Result};

pub use core::{
    ClearState, CullState, DepthCubeTexture, DepthState, DepthTexture, IndexBuffer,
    PipelineBuilder, Texture2D, UniformBuffer, Vertex, VertexBuffer,
};

pub use renderer::{
    calc_average_normals, load_texture_or_white, render_frame, Attenuation, Camera, CubeFace,
    DirectionalLight, ForwardRenderer, Light, LightBase, LightId, LightTransforms,
    LightingUniforms, Material, Mesh, MeshData, MoveKeys, Phase, PointLight, PointLights,
    Projection, RenderBackend, RendererShaders, Scene, SceneLights, SceneObject, ShadowConfig,
    Viewer, Viewport, CUBE_FACES, MAX_POINT_LIGHTS,
};

pub use shader::ShaderSource;

#[cfg(feature = "window")]
pub use window::{
    FrameInput, FrameOutput, GraphicsInit, InputState, Key, Window, WindowSettings,
};
