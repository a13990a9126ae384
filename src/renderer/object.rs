//! Scene objects
//!
//! A mesh drawn with a texture, a material and a model transform. Every
//! pass binds the object's uniform at group 1. The lit pass also binds the
//! texture at group 2.

use crate::context::WgpuContext;
use crate::core::buffer::{uniform_layout_entry, UniformBuffer};
use crate::core::texture::Texture2D;
use crate::renderer::material::Material;
use crate::renderer::mesh::Mesh;
use crate::renderer::uniforms::ObjectUniform;
use glam::Mat4;

/// Bind group index of the per-object uniform in every pipeline.
pub const OBJECT_GROUP: u32 = 1;
/// Bind group index of the mesh texture in the lit pipeline.
pub const TEXTURE_GROUP: u32 = 2;

/// Bind group layouts for per-object resources.
pub struct ObjectLayouts {
    pub object: wgpu::BindGroupLayout,
    pub texture: wgpu::BindGroupLayout,
}

impl ObjectLayouts {
    pub fn new(ctx: &WgpuContext) -> Self {
        let object = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("object bind group layout"),
                entries: &[uniform_layout_entry(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                )],
            });

        let texture = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("texture bind group layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        Self { object, texture }
    }
}

/// A textured mesh placed in the world.
pub struct SceneObject {
    mesh: Mesh,
    #[allow(dead_code)]
    texture: Texture2D,
    pub material: Material,
    pub transform: Mat4,
    uniform: UniformBuffer<ObjectUniform>,
    object_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
}

impl SceneObject {
    pub fn new(
        ctx: &WgpuContext,
        layouts: &ObjectLayouts,
        mesh: Mesh,
        texture: Texture2D,
        material: Material,
        transform: Mat4,
    ) -> Self {
        let uniform = UniformBuffer::new(
            ctx,
            &ObjectUniform::new(transform, &material),
            Some("object uniform"),
        );

        let object_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object bind group"),
            layout: &layouts.object,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.binding(),
            }],
        });

        let texture_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture bind group"),
            layout: &layouts.texture,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(texture.sampler()),
                },
            ],
        });

        Self {
            mesh,
            texture,
            material,
            transform,
            uniform,
            object_bind_group,
            texture_bind_group,
        }
    }

    /// Upload the current transform and material.
    pub fn update(&self, ctx: &WgpuContext) {
        self.uniform
            .update(ctx, &ObjectUniform::new(self.transform, &self.material));
    }

    /// Draw into a depth-only pass.
    pub fn draw_depth(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(OBJECT_GROUP, &self.object_bind_group, &[]);
        self.mesh.draw(pass);
    }

    /// Draw into the lit pass.
    pub fn draw_lit(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(OBJECT_GROUP, &self.object_bind_group, &[]);
        pass.set_bind_group(TEXTURE_GROUP, &self.texture_bind_group, &[]);
        self.mesh.draw(pass);
    }
}
