//! Texture abstractions
//!
//! Provides wrappers for sampled 2D textures, the screen depth buffer, and
//! the depth targets used by shadow maps.

use crate::context::WgpuContext;
use crate::error::{Error, Result};
use std::path::Path;

/// A 2D colour texture with associated view and sampler.
pub struct Texture2D {
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    pub(crate) size: wgpu::Extent3d,
}

impl Texture2D {
    /// Create a texture from RGBA8 image data.
    ///
    /// Texture coordinates outside 0..1 repeat.
    pub fn from_rgba8(
        ctx: &WgpuContext,
        width: u32,
        height: u32,
        data: &[u8],
        label: Option<&str>,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: label.map(|l| format!("{} sampler", l)).as_deref(),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            size,
        }
    }

    /// Decode an image file and upload it.
    pub fn from_file(ctx: &WgpuContext, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| Error::ImageDecode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = image.dimensions();

        tracing::info!(path = %path.display(), width, height, "texture loaded");

        let label = path.to_string_lossy();
        Ok(Self::from_rgba8(
            ctx,
            width,
            height,
            image.as_raw(),
            Some(label.as_ref()),
        ))
    }

    /// A 1x1 opaque white texture, used when an image is missing.
    pub fn white(ctx: &WgpuContext) -> Self {
        Self::from_rgba8(ctx, 1, 1, &[255, 255, 255, 255], Some("white texture"))
    }

    /// Get the texture view.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Get the sampler.
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// Get the texture size.
    pub fn size(&self) -> (u32, u32) {
        (self.size.width, self.size.height)
    }
}

/// A depth texture for depth testing or 2D shadow maps.
pub struct DepthTexture {
    #[allow(dead_code)]
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) size: wgpu::Extent3d,
}

impl DepthTexture {
    /// The depth format used by this texture.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a new depth texture.
    pub fn new(ctx: &WgpuContext, width: u32, height: u32, label: Option<&str>) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            size,
        }
    }

    /// Resize the depth texture.
    pub fn resize(&mut self, ctx: &WgpuContext, width: u32, height: u32) {
        if self.size.width != width || self.size.height != height {
            *self = Self::new(ctx, width, height, Some("depth texture"));
        }
    }

    /// Get the texture view.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Get the texture size.
    pub fn size(&self) -> (u32, u32) {
        (self.size.width, self.size.height)
    }
}

/// A six-layer depth texture viewed as a cube map.
///
/// Layer `i` is cube face `i` in the order +X, -X, +Y, -Y, +Z, -Z.
pub struct DepthCubeTexture {
    #[allow(dead_code)]
    pub(crate) texture: wgpu::Texture,
    pub(crate) cube_view: wgpu::TextureView,
    pub(crate) face_views: [wgpu::TextureView; 6],
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl DepthCubeTexture {
    /// Create a new depth cube texture.
    pub fn new(ctx: &WgpuContext, width: u32, height: u32, label: Option<&str>) -> Self {
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label,
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 6,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DepthTexture::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let cube_view = texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let face_views = std::array::from_fn(|face| {
            texture.create_view(&wgpu::TextureViewDescriptor {
                dimension: Some(wgpu::TextureViewDimension::D2),
                base_array_layer: face as u32,
                array_layer_count: Some(1),
                ..Default::default()
            })
        });

        Self {
            texture,
            cube_view,
            face_views,
            width,
            height,
        }
    }

    /// View of the whole cube, for sampling.
    pub fn cube_view(&self) -> &wgpu::TextureView {
        &self.cube_view
    }

    /// View of a single face, for rendering into.
    pub fn face_view(&self, face: usize) -> &wgpu::TextureView {
        &self.face_views[face]
    }

    /// Get the per-face size.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
