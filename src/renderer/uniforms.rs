//! GPU uniform layouts
//!
//! Host mirrors of the structs declared in the crate's WGSL. Field order,
//! padding and size follow WGSL uniform layout rules, so each type can be
//! uploaded with `bytemuck::bytes_of` unchanged.

use crate::renderer::light::{DirectionalLight, LightBase, PointLight, MAX_POINT_LIGHTS};
use crate::renderer::material::Material;
use crate::renderer::shadow::ShadowConfig;
use crate::renderer::viewer::Viewer;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// `BaseLight` in the lit shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct BaseLightUniform {
    pub colour: [f32; 3],
    pub ambient_intensity: f32,
    pub diffuse_intensity: f32,
    pub _pad: [f32; 3],
}

impl From<&LightBase> for BaseLightUniform {
    fn from(base: &LightBase) -> Self {
        Self {
            colour: base.colour.to_array(),
            ambient_intensity: base.ambient_intensity,
            diffuse_intensity: base.diffuse_intensity,
            _pad: [0.0; 3],
        }
    }
}

/// `DirectionalLight` in the lit shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct DirectionalLightUniform {
    pub base: BaseLightUniform,
    pub direction: [f32; 3],
    pub shadow_bias: f32,
}

impl DirectionalLightUniform {
    pub fn new(light: &DirectionalLight, shadow_bias: f32) -> Self {
        Self {
            base: (&light.base).into(),
            direction: light.direction.to_array(),
            shadow_bias,
        }
    }
}

/// `PointLight` in the lit shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PointLightUniform {
    pub base: BaseLightUniform,
    pub position: [f32; 3],
    pub constant: f32,
    pub linear: f32,
    pub exponent: f32,
    pub _pad: [f32; 2],
}

impl From<&PointLight> for PointLightUniform {
    fn from(light: &PointLight) -> Self {
        Self {
            base: (&light.base).into(),
            position: light.position.to_array(),
            constant: light.attenuation.constant,
            linear: light.attenuation.linear,
            exponent: light.attenuation.exponent,
            _pad: [0.0; 2],
        }
    }
}

/// `OmniShadowMap` in the lit shader. The cube texture itself is a separate
/// binding.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct OmniShadowMapUniform {
    pub far_plane: f32,
    pub bias: f32,
    pub _pad: [f32; 2],
}

/// Per-frame uniforms of the lit pass: camera, every light and the omni far
/// planes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LightingUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub directional_light_transform: [[f32; 4]; 4],
    pub eye_position: [f32; 3],
    pub point_light_count: u32,
    pub directional_light: DirectionalLightUniform,
    pub point_lights: [PointLightUniform; MAX_POINT_LIGHTS],
    pub omni_shadow_maps: [OmniShadowMapUniform; MAX_POINT_LIGHTS],
}

impl LightingUniforms {
    /// Assemble the lit pass uniforms.
    ///
    /// Point lights past [`MAX_POINT_LIGHTS`] are dropped with a warning.
    pub fn new(
        viewer: &dyn Viewer,
        directional: &DirectionalLight,
        point_lights: &[PointLight],
        shadows: &ShadowConfig,
    ) -> Self {
        let count = if point_lights.len() > MAX_POINT_LIGHTS {
            tracing::warn!(
                requested = point_lights.len(),
                max = MAX_POINT_LIGHTS,
                "point light count clamped"
            );
            MAX_POINT_LIGHTS
        } else {
            point_lights.len()
        };

        let mut uniforms = Self {
            projection: viewer.projection_matrix().to_cols_array_2d(),
            view: viewer.view_matrix().to_cols_array_2d(),
            directional_light_transform: directional.light_transform().to_cols_array_2d(),
            eye_position: viewer.position().to_array(),
            point_light_count: count as u32,
            directional_light: DirectionalLightUniform::new(directional, shadows.bias),
            point_lights: [PointLightUniform::default(); MAX_POINT_LIGHTS],
            omni_shadow_maps: [OmniShadowMapUniform::default(); MAX_POINT_LIGHTS],
        };

        for (i, light) in point_lights.iter().take(count).enumerate() {
            uniforms.point_lights[i] = light.into();
            uniforms.omni_shadow_maps[i] = OmniShadowMapUniform {
                far_plane: light.far,
                bias: shadows.omni_bias,
                _pad: [0.0; 2],
            };
        }

        uniforms
    }
}

/// Per-object uniforms shared by the lit and depth passes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`, for normals under non-uniform scale.
    pub normal_matrix: [[f32; 4]; 4],
    pub specular_intensity: f32,
    pub shininess: f32,
    pub _pad: [f32; 2],
}

impl ObjectUniform {
    pub fn new(model: Mat4, material: &Material) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            specular_intensity: material.specular_intensity,
            shininess: material.shininess,
            _pad: [0.0; 2],
        }
    }
}

/// Uniform of the directional depth pass.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DirectionalShadowUniform {
    pub directional_light_transform: [[f32; 4]; 4],
}

/// Shared uniform of the six omni depth passes of one light.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct OmniShadowUniform {
    pub light_matrices: [[[f32; 4]; 4]; 6],
    pub light_pos: [f32; 3],
    pub far_plane: f32,
}

impl From<&PointLight> for OmniShadowUniform {
    fn from(light: &PointLight) -> Self {
        Self {
            light_matrices: light.light_transforms().map(|m| m.to_cols_array_2d()),
            light_pos: light.position.to_array(),
            far_plane: light.far,
        }
    }
}

/// Cube face selector of one omni depth pass.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct CubeFaceUniform {
    pub face: u32,
    pub _pad: [u32; 3],
}

impl CubeFaceUniform {
    pub fn new(face: usize) -> Self {
        Self {
            face: face as u32,
            _pad: [0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::light::{Attenuation, LightBase};
    use glam::Vec3;
    use std::mem::{offset_of, size_of};

    struct FixedViewer;

    impl Viewer for FixedViewer {
        fn position(&self) -> Vec3 {
            Vec3::new(0.0, 2.0, 5.0)
        }

        fn view_matrix(&self) -> Mat4 {
            Mat4::IDENTITY
        }

        fn projection_matrix(&self) -> Mat4 {
            Mat4::IDENTITY
        }
    }

    fn directional() -> DirectionalLight {
        DirectionalLight::new(
            LightBase::new(Vec3::ONE, 0.1, 0.6),
            Vec3::new(0.0, -15.0, -10.0),
        )
    }

    fn point(far: f32) -> PointLight {
        PointLight::new(
            LightBase::new(Vec3::new(0.0, 0.0, 1.0), 0.0, 1.0),
            Vec3::new(1.0, 2.0, 3.0),
            Attenuation::new(0.3, 0.2, 0.1),
            0.01,
            far,
        )
    }

    #[test]
    fn test_layouts_match_wgsl() {
        assert_eq!(size_of::<BaseLightUniform>(), 32);
        assert_eq!(size_of::<DirectionalLightUniform>(), 48);
        assert_eq!(size_of::<PointLightUniform>(), 64);
        assert_eq!(size_of::<OmniShadowMapUniform>(), 16);
        assert_eq!(size_of::<ObjectUniform>(), 144);
        assert_eq!(size_of::<OmniShadowUniform>(), 400);
        assert_eq!(size_of::<CubeFaceUniform>(), 16);
    }

    #[test]
    fn test_lighting_uniform_offsets() {
        assert_eq!(offset_of!(LightingUniforms, directional_light_transform), 128);
        assert_eq!(offset_of!(LightingUniforms, eye_position), 192);
        assert_eq!(offset_of!(LightingUniforms, point_light_count), 204);
        assert_eq!(offset_of!(LightingUniforms, directional_light), 208);
        assert_eq!(offset_of!(LightingUniforms, point_lights), 256);
        assert_eq!(offset_of!(LightingUniforms, omni_shadow_maps), 448);
        assert_eq!(size_of::<LightingUniforms>(), 496);
    }

    #[test]
    fn test_point_light_fields() {
        let uniform = PointLightUniform::from(&point(100.0));
        assert_eq!(uniform.position, [1.0, 2.0, 3.0]);
        assert_eq!(uniform.constant, 0.3);
        assert_eq!(uniform.linear, 0.2);
        assert_eq!(uniform.exponent, 0.1);
        assert_eq!(uniform.base.colour, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_assembly_copies_far_planes() {
        let uniforms = LightingUniforms::new(
            &FixedViewer,
            &directional(),
            &[point(100.0), point(50.0)],
            &ShadowConfig::default(),
        );
        assert_eq!(uniforms.point_light_count, 2);
        assert_eq!(uniforms.omni_shadow_maps[0].far_plane, 100.0);
        assert_eq!(uniforms.omni_shadow_maps[1].far_plane, 50.0);
        assert_eq!(uniforms.omni_shadow_maps[2].far_plane, 0.0);
        assert_eq!(uniforms.omni_shadow_maps[0].bias, 0.05);
        assert_eq!(uniforms.directional_light.shadow_bias, 0.005);
        assert_eq!(uniforms.eye_position, [0.0, 2.0, 5.0]);
        assert_eq!(
            uniforms.directional_light_transform,
            directional().light_transform().to_cols_array_2d()
        );
    }

    #[test]
    fn test_assembly_clamps_point_lights() {
        let lights: Vec<PointLight> = (0..5).map(|i| point(10.0 + i as f32)).collect();
        let uniforms =
            LightingUniforms::new(&FixedViewer, &directional(), &lights, &ShadowConfig::default());
        assert_eq!(uniforms.point_light_count, MAX_POINT_LIGHTS as u32);
        assert_eq!(uniforms.omni_shadow_maps[2].far_plane, 12.0);
    }

    #[test]
    fn test_normal_matrix_undoes_scale() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let uniform = ObjectUniform::new(model, &Material::new(1.0, 32.0));
        let normal = Mat4::from_cols_array_2d(&uniform.normal_matrix);
        assert!((normal.x_axis.x - 0.5).abs() < 1e-6);
        assert_eq!(uniform.shininess, 32.0);
    }

    #[test]
    fn test_omni_shadow_uniform_matches_light() {
        let light = point(25.0);
        let uniform = OmniShadowUniform::from(&light);
        assert_eq!(uniform.far_plane, 25.0);
        assert_eq!(uniform.light_pos, [1.0, 2.0, 3.0]);
        assert_eq!(
            uniform.light_matrices[3],
            light.light_transforms()[3].to_cols_array_2d()
        );
    }
}
