//! Forward renderer
//!
//! Owns the lit pipeline, the shadow passes and every shadow map. A frame
//! encodes all shadow passes and the lit pass into one command buffer.
//!
//! Bind groups of the lit pass:
//! - group 0: [`LightingUniforms`]
//! - group 1: per-object uniform
//! - group 2: mesh texture and sampler
//! - group 3: directional map, its sampler, three omni cubes, the cube sampler

use crate::context::WgpuContext;
use crate::core::buffer::{uniform_layout_entry, UniformBuffer};
use crate::core::pipeline::PipelineBuilder;
use crate::core::render_states::{ClearState, CullState, DepthState};
use crate::core::texture::DepthTexture;
use crate::core::vertex::Vertex;
use crate::renderer::frame::{render_frame, RenderBackend};
use crate::renderer::light::{Light, LightId, SceneLights, MAX_POINT_LIGHTS};
use crate::renderer::object::{ObjectLayouts, SceneObject};
use crate::renderer::shadow::{
    DirectionalShadowPass, OmniShadowMap, OmniShadowPass, ShadowConfig, ShadowMap,
};
use crate::renderer::uniforms::LightingUniforms;
use crate::renderer::viewer::Viewer;
use crate::shader::ShaderSource;
use std::path::Path;

/// Shaders used by the renderer.
#[derive(Debug, Clone)]
pub struct RendererShaders {
    pub lit: ShaderSource,
    pub directional_shadow: ShaderSource,
    pub omni_shadow: ShaderSource,
}

impl RendererShaders {
    /// Read `lit.wgsl`, `directional_shadow.wgsl` and `omni_shadow.wgsl`
    /// from `dir`. Each unreadable file falls back to its built-in source.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            lit: ShaderSource::load_or_builtin(dir.join("lit.wgsl"), ShaderSource::lit()),
            directional_shadow: ShaderSource::load_or_builtin(
                dir.join("directional_shadow.wgsl"),
                ShaderSource::directional_shadow(),
            ),
            omni_shadow: ShaderSource::load_or_builtin(
                dir.join("omni_shadow.wgsl"),
                ShaderSource::omni_shadow(),
            ),
        }
    }
}

impl Default for RendererShaders {
    fn default() -> Self {
        Self {
            lit: ShaderSource::lit(),
            directional_shadow: ShaderSource::directional_shadow(),
            omni_shadow: ShaderSource::omni_shadow(),
        }
    }
}

/// Forward renderer with shadow mapping.
pub struct ForwardRenderer {
    object_layouts: ObjectLayouts,
    lit_pipeline: wgpu::RenderPipeline,
    scene_uniform: UniformBuffer<LightingUniforms>,
    scene_bind_group: wgpu::BindGroup,
    shadows_bind_group: wgpu::BindGroup,
    directional_pass: DirectionalShadowPass,
    omni_pass: OmniShadowPass,
    directional_map: ShadowMap,
    omni_maps: Vec<OmniShadowMap>,
    depth: DepthTexture,
    config: ShadowConfig,
    clear: ClearState,
}

impl ForwardRenderer {
    /// Create the renderer with one cube map per point light slot, so
    /// lights added later always have a map to render into.
    pub fn new(
        ctx: &WgpuContext,
        color_format: wgpu::TextureFormat,
        (width, height): (u32, u32),
        config: ShadowConfig,
        shaders: &RendererShaders,
    ) -> anyhow::Result<Self> {
        let object_layouts = ObjectLayouts::new(ctx);

        let scene_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("scene bind group layout"),
                entries: &[uniform_layout_entry(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                )],
            });
        let shadows_layout = shadows_layout(ctx);

        let lit_pipeline = PipelineBuilder::new(ctx)
            .label("lit pipeline")
            .shader(shaders.lit.as_str())
            .vertex_layout(Vertex::layout())
            .bind_group_layout(&scene_layout)
            .bind_group_layout(&object_layouts.object)
            .bind_group_layout(&object_layouts.texture)
            .bind_group_layout(&shadows_layout)
            .color_format(color_format)
            .depth(DepthState::read_write())
            .cull(CullState::Back)
            .build()?;

        let scene_uniform = UniformBuffer::zeroed(ctx, Some("scene uniform"));
        let scene_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene bind group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_uniform.binding(),
            }],
        });

        let directional_pass = DirectionalShadowPass::new(
            ctx,
            &object_layouts,
            &shaders.directional_shadow,
            &config,
        )?;
        let omni_pass = OmniShadowPass::new(ctx, &object_layouts, &shaders.omni_shadow)?;

        let directional_map = ShadowMap::new(
            ctx,
            &directional_pass,
            config.directional_resolution,
            config.directional_resolution,
        )?;

        let omni_maps = (0..MAX_POINT_LIGHTS)
            .map(|_| {
                OmniShadowMap::new(
                    ctx,
                    &omni_pass,
                    config.omni_resolution,
                    config.omni_resolution,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let shadows_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadows bind group"),
            layout: &shadows_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(directional_map.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(directional_map.sampler()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(omni_maps[0].view()),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(omni_maps[1].view()),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(omni_maps[2].view()),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: wgpu::BindingResource::Sampler(omni_pass.sampler()),
                },
            ],
        });

        let depth = DepthTexture::new(ctx, width.max(1), height.max(1), Some("depth texture"));

        Ok(Self {
            object_layouts,
            lit_pipeline,
            scene_uniform,
            scene_bind_group,
            shadows_bind_group,
            directional_pass,
            omni_pass,
            directional_map,
            omni_maps,
            depth,
            config,
            clear: ClearState::default(),
        })
    }

    /// Layouts scene objects must be created with.
    pub fn object_layouts(&self) -> &ObjectLayouts {
        &self.object_layouts
    }

    pub fn config(&self) -> &ShadowConfig {
        &self.config
    }

    /// Set the colour the lit pass clears to.
    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear = ClearState::color_and_depth(color, 1.0);
    }

    /// Match the depth buffer to the surface size.
    pub fn resize(&mut self, ctx: &WgpuContext, width: u32, height: u32) {
        self.depth.resize(ctx, width.max(1), height.max(1));
    }

    /// Render one frame into `target` and submit it.
    pub fn render(
        &self,
        ctx: &WgpuContext,
        target: &wgpu::TextureView,
        viewer: &dyn Viewer,
        lights: &SceneLights,
        objects: &[SceneObject],
    ) {
        for object in objects {
            object.update(ctx);
        }

        let mut passes = FramePasses {
            renderer: self,
            ctx,
            encoder: Some(ctx.create_encoder(Some("frame encoder"))),
            target,
            objects,
        };
        render_frame(viewer, lights, &self.config, &mut passes);
    }
}

fn shadows_layout(ctx: &WgpuContext) -> wgpu::BindGroupLayout {
    let depth_texture = |binding, view_dimension| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Depth,
            view_dimension,
            multisampled: false,
        },
        count: None,
    };
    let comparison_sampler = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
        count: None,
    };

    ctx.device
        .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shadows bind group layout"),
            entries: &[
                depth_texture(0, wgpu::TextureViewDimension::D2),
                comparison_sampler(1),
                depth_texture(2, wgpu::TextureViewDimension::Cube),
                depth_texture(3, wgpu::TextureViewDimension::Cube),
                depth_texture(4, wgpu::TextureViewDimension::Cube),
                comparison_sampler(5),
            ],
        })
}

/// GPU backend for one frame. Passes are encoded in call order and
/// submitted on present.
struct FramePasses<'a> {
    renderer: &'a ForwardRenderer,
    ctx: &'a WgpuContext,
    encoder: Option<wgpu::CommandEncoder>,
    target: &'a wgpu::TextureView,
    objects: &'a [SceneObject],
}

impl RenderBackend for FramePasses<'_> {
    fn shadow_pass(&mut self, id: LightId, light: &Light) {
        let Some(encoder) = self.encoder.as_mut() else {
            return;
        };
        let renderer = self.renderer;

        match (id, light) {
            (LightId::Directional, Light::Directional(light)) => {
                renderer.directional_map.update(self.ctx, light);
                renderer
                    .directional_pass
                    .render(encoder, &renderer.directional_map, self.objects);
            }
            (LightId::Point(index), Light::Point(light)) => match renderer.omni_maps.get(index) {
                Some(map) => {
                    map.update(self.ctx, light);
                    renderer.omni_pass.render(encoder, map, self.objects);
                }
                None => tracing::warn!(index, "point light has no cube map slot"),
            },
            (id, _) => {
                tracing::warn!(?id, "no shadow map for light, skipping its shadow pass");
            }
        }
    }

    fn main_pass(&mut self, uniforms: &LightingUniforms) {
        let Some(encoder) = self.encoder.as_mut() else {
            return;
        };
        let renderer = self.renderer;
        renderer.scene_uniform.update(self.ctx, uniforms);

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lit pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: renderer.clear.color_load_op(),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: renderer.depth.view(),
                depth_ops: Some(wgpu::Operations {
                    load: renderer.clear.depth_load_op(),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        render_pass.set_pipeline(&renderer.lit_pipeline);
        render_pass.set_bind_group(0, &renderer.scene_bind_group, &[]);
        render_pass.set_bind_group(3, &renderer.shadows_bind_group, &[]);

        for object in self.objects {
            object.draw_lit(&mut render_pass);
        }
    }

    fn present(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            self.ctx.submit(std::iter::once(encoder.finish()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shaders_from_missing_dir_use_builtins() {
        let shaders = RendererShaders::from_dir("no/such/shader/dir");
        assert_eq!(shaders.lit, ShaderSource::lit());
        assert_eq!(shaders.directional_shadow, ShaderSource::directional_shadow());
        assert_eq!(shaders.omni_shadow, ShaderSource::omni_shadow());
    }
}
