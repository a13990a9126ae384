//! Directional light shadow mapping

use super::{comparison_sampler, validate_size, ShadowConfig};
use crate::context::WgpuContext;
use crate::core::buffer::{uniform_layout_entry, UniformBuffer};
use crate::core::pipeline::PipelineBuilder;
use crate::core::render_states::{ClearState, CullState, DepthState};
use crate::core::texture::DepthTexture;
use crate::core::vertex::Vertex;
use crate::error::Result;
use crate::renderer::light::DirectionalLight;
use crate::renderer::object::{ObjectLayouts, SceneObject};
use crate::renderer::uniforms::DirectionalShadowUniform;
use crate::shader::ShaderSource;

/// Depth map of the directional light, plus the uniform and bind group its
/// caster pass renders with.
pub struct ShadowMap {
    depth: DepthTexture,
    sampler: wgpu::Sampler,
    uniform: UniformBuffer<DirectionalShadowUniform>,
    bind_group: wgpu::BindGroup,
}

impl ShadowMap {
    /// Create a shadow map. Fails if either dimension is zero.
    ///
    /// Lookups outside the map read as lit. Where the adapter supports it
    /// the sampler clamps to an opaque white border, otherwise the lit
    /// shader range-checks the coordinates.
    pub fn new(
        ctx: &WgpuContext,
        pass: &DirectionalShadowPass,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        validate_size(width, height)?;

        let depth = DepthTexture::new(ctx, width, height, Some("directional shadow map"));

        let sampler = if ctx.supports_border_clamp() {
            comparison_sampler(
                ctx,
                "directional shadow sampler",
                wgpu::AddressMode::ClampToBorder,
                Some(wgpu::SamplerBorderColor::OpaqueWhite),
            )
        } else {
            tracing::warn!("border clamp unsupported, falling back to edge clamp for shadows");
            comparison_sampler(
                ctx,
                "directional shadow sampler",
                wgpu::AddressMode::ClampToEdge,
                None,
            )
        };

        let uniform = UniformBuffer::zeroed(ctx, Some("directional shadow uniform"));
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("directional shadow bind group"),
            layout: &pass.light_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.binding(),
            }],
        });

        tracing::info!(width, height, "directional shadow map created");

        Ok(Self {
            depth,
            sampler,
            uniform,
            bind_group,
        })
    }

    /// Upload the light's current transform.
    pub fn update(&self, ctx: &WgpuContext, light: &DirectionalLight) {
        self.uniform.update(
            ctx,
            &DirectionalShadowUniform {
                directional_light_transform: light.light_transform().to_cols_array_2d(),
            },
        );
    }

    /// Get the depth view for sampling.
    pub fn view(&self) -> &wgpu::TextureView {
        self.depth.view()
    }

    /// Get the comparison sampler.
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    pub fn size(&self) -> (u32, u32) {
        self.depth.size()
    }
}

/// Depth-only pipeline that renders the scene from the directional light.
pub struct DirectionalShadowPass {
    pipeline: wgpu::RenderPipeline,
    light_layout: wgpu::BindGroupLayout,
}

impl DirectionalShadowPass {
    pub fn new(
        ctx: &WgpuContext,
        layouts: &ObjectLayouts,
        shader: &ShaderSource,
        config: &ShadowConfig,
    ) -> anyhow::Result<Self> {
        let light_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("directional shadow bind group layout"),
                entries: &[uniform_layout_entry(0, wgpu::ShaderStages::VERTEX)],
            });

        let pipeline = PipelineBuilder::new(ctx)
            .label("directional shadow pipeline")
            .shader(shader.as_str())
            .vertex_layout(Vertex::layout())
            .bind_group_layout(&light_layout)
            .bind_group_layout(&layouts.object)
            .depth(DepthState::shadow_caster(config.slope_bias))
            .cull(CullState::None)
            .build_depth_only()?;

        Ok(Self {
            pipeline,
            light_layout,
        })
    }

    /// Clear the map and draw every object into it.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        map: &ShadowMap,
        objects: &[SceneObject],
    ) {
        let clear = ClearState::depth(1.0);
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("directional shadow pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: map.view(),
                depth_ops: Some(wgpu::Operations {
                    load: clear.depth_load_op(),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &map.bind_group, &[]);

        for object in objects {
            object.draw_depth(&mut render_pass);
        }
    }
}
