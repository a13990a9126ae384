//! High-level rendering
//!
//! Lights and their light-space transforms, the fly camera, meshes, the
//! shadow passes and the forward renderer that sequences them.

pub mod camera;
pub mod forward;
pub mod frame;
pub mod light;
pub mod material;
pub mod mesh;
pub mod object;
pub mod scene;
pub mod shadow;
pub mod uniforms;
pub mod viewer;

pub use camera::{Camera, MoveKeys};
pub use forward::{ForwardRenderer, RendererShaders};
pub use frame::{render_frame, Phase, RenderBackend};
pub use light::{
    Attenuation, CubeFace, DirectionalLight, Light, LightBase, LightId, LightTransforms,
    PointLight, PointLights, SceneLights, CUBE_FACES, MAX_POINT_LIGHTS,
};
pub use material::Material;
pub use mesh::{calc_average_normals, Mesh, MeshData};
pub use object::{ObjectLayouts, SceneObject};
pub use scene::{load_texture_or_white, Scene};
pub use shadow::{DirectionalShadowPass, OmniShadowMap, OmniShadowPass, ShadowConfig, ShadowMap};
pub use uniforms::LightingUniforms;
pub use viewer::{Projection, Viewer, Viewport};
