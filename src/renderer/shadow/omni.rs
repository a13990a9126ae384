//! Point light (omnidirectional) shadow mapping
//!
//! Each point light owns a six-layer depth cube. The caster pass runs once
//! per face. The fragment stage writes `distance / far_plane` as depth, so
//! the lit shader can compare against the fragment-to-light distance.

use super::{comparison_sampler, validate_cube_size};
use crate::context::WgpuContext;
use crate::core::buffer::{uniform_layout_entry, UniformBuffer};
use crate::core::pipeline::PipelineBuilder;
use crate::core::render_states::{ClearState, CullState, DepthState};
use crate::core::texture::DepthCubeTexture;
use crate::core::vertex::Vertex;
use crate::error::Result;
use crate::renderer::light::PointLight;
use crate::renderer::object::{ObjectLayouts, SceneObject};
use crate::renderer::uniforms::{CubeFaceUniform, OmniShadowUniform};
use crate::shader::ShaderSource;

/// Depth cube of one point light with the uniforms its six face passes use.
pub struct OmniShadowMap {
    cube: DepthCubeTexture,
    light_uniform: UniformBuffer<OmniShadowUniform>,
    // Kept alive for the face bind groups.
    #[allow(dead_code)]
    face_uniforms: [UniformBuffer<CubeFaceUniform>; 6],
    face_bind_groups: [wgpu::BindGroup; 6],
}

impl OmniShadowMap {
    /// Create a cube shadow map. Faces must be square and non-empty.
    pub fn new(
        ctx: &WgpuContext,
        pass: &OmniShadowPass,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        validate_cube_size(width, height)?;
        let map = Self::create(ctx, pass, width, height, Some("omni shadow map"));
        tracing::info!(width, height, "omni shadow map created");
        Ok(map)
    }

    fn create(
        ctx: &WgpuContext,
        pass: &OmniShadowPass,
        width: u32,
        height: u32,
        label: Option<&str>,
    ) -> Self {
        let cube = DepthCubeTexture::new(ctx, width, height, label);
        let light_uniform = UniformBuffer::zeroed(ctx, Some("omni shadow uniform"));
        let face_uniforms = std::array::from_fn(|face| {
            UniformBuffer::new(
                ctx,
                &CubeFaceUniform::new(face),
                Some("cube face uniform"),
            )
        });

        let face_bind_groups = std::array::from_fn(|face| {
            ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("omni shadow face bind group"),
                layout: &pass.light_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: light_uniform.binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: face_uniforms[face].binding(),
                    },
                ],
            })
        });

        Self {
            cube,
            light_uniform,
            face_uniforms,
            face_bind_groups,
        }
    }

    /// Upload the light's position, far plane and six face transforms.
    pub fn update(&self, ctx: &WgpuContext, light: &PointLight) {
        self.light_uniform.update(ctx, &OmniShadowUniform::from(light));
    }

    /// Get the cube view for sampling.
    pub fn view(&self) -> &wgpu::TextureView {
        self.cube.cube_view()
    }

    pub fn size(&self) -> (u32, u32) {
        self.cube.size()
    }
}

/// Depth pipeline that renders the scene into one cube face at a time.
pub struct OmniShadowPass {
    pipeline: wgpu::RenderPipeline,
    light_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

impl OmniShadowPass {
    pub fn new(
        ctx: &WgpuContext,
        layouts: &ObjectLayouts,
        shader: &ShaderSource,
    ) -> anyhow::Result<Self> {
        let light_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("omni shadow bind group layout"),
                entries: &[
                    uniform_layout_entry(
                        0,
                        wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ),
                    uniform_layout_entry(1, wgpu::ShaderStages::VERTEX),
                ],
            });

        // Depth comes from the fragment stage, so raster bias has no effect.
        let pipeline = PipelineBuilder::new(ctx)
            .label("omni shadow pipeline")
            .shader(shader.as_str())
            .vertex_layout(Vertex::layout())
            .bind_group_layout(&light_layout)
            .bind_group_layout(&layouts.object)
            .depth(DepthState::read_write())
            .cull(CullState::None)
            .build_depth_only()?;

        let sampler = comparison_sampler(
            ctx,
            "omni shadow sampler",
            wgpu::AddressMode::ClampToEdge,
            None,
        );

        Ok(Self {
            pipeline,
            light_layout,
            sampler,
        })
    }

    /// Comparison sampler shared by every cube map.
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// Clear each face of the map and draw every object into it.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        map: &OmniShadowMap,
        objects: &[SceneObject],
    ) {
        let clear = ClearState::depth(1.0);

        for (face, bind_group) in map.face_bind_groups.iter().enumerate() {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("omni shadow pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: map.cube.face_view(face),
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
            render_pass.set_bind_group(0, bind_group, &[]);

            for object in objects {
                object.draw_depth(&mut render_pass);
            }
        }
    }
}
