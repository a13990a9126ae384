//! Scene context
//!
//! Everything a frame needs, owned in one place and passed by `&mut`
//! through the frame loop.

use crate::context::WgpuContext;
use crate::core::texture::Texture2D;
use crate::error::report;
use crate::renderer::camera::{Camera, MoveKeys};
use crate::renderer::forward::ForwardRenderer;
use crate::renderer::light::SceneLights;
use crate::renderer::material::Material;
use crate::renderer::mesh::{Mesh, MeshData};
use crate::renderer::object::SceneObject;
use crate::renderer::viewer::Viewport;
use glam::Mat4;
use std::path::Path;

/// Camera, lights, objects and the renderer that draws them.
pub struct Scene {
    pub camera: Camera,
    pub lights: SceneLights,
    pub objects: Vec<SceneObject>,
    pub renderer: ForwardRenderer,
}

impl Scene {
    pub fn new(camera: Camera, lights: SceneLights, renderer: ForwardRenderer) -> Self {
        Self {
            camera,
            lights,
            objects: Vec::new(),
            renderer,
        }
    }

    /// Upload a mesh and add it as an object. Returns the object's index.
    pub fn add_object(
        &mut self,
        ctx: &WgpuContext,
        data: &MeshData,
        texture: Texture2D,
        material: Material,
        transform: Mat4,
    ) -> usize {
        let mesh = Mesh::new(ctx, data, Some("scene mesh"));
        let object = SceneObject::new(
            ctx,
            self.renderer.object_layouts(),
            mesh,
            texture,
            material,
            transform,
        );
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Move the camera by this frame's input.
    pub fn update_camera(&mut self, keys: MoveKeys, mouse_delta: (f32, f32), delta_time: f32) {
        self.camera.apply_keys(keys, delta_time);
        self.camera.apply_mouse_delta(mouse_delta.0, mouse_delta.1);
    }

    /// Follow a surface resize.
    pub fn resize(&mut self, ctx: &WgpuContext, viewport: Viewport) {
        self.camera.set_viewport(viewport);
        self.renderer.resize(ctx, viewport.width, viewport.height);
    }

    /// Render and submit one frame.
    pub fn render(&self, ctx: &WgpuContext, target: &wgpu::TextureView) {
        self.renderer
            .render(ctx, target, &self.camera, &self.lights, &self.objects);
    }
}

/// Load a texture, or fall back to plain white if it cannot be decoded.
pub fn load_texture_or_white(ctx: &WgpuContext, path: impl AsRef<Path>) -> Texture2D {
    match Texture2D::from_file(ctx, path) {
        Ok(texture) => texture,
        Err(err) => {
            report("using white texture", err);
            Texture2D::white(ctx)
        }
    }
}
