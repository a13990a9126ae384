//! Light types
//!
//! A light is either directional or a point light. Both share the photometric
//! parameters in [`LightBase`]. Each variant derives its own light-space
//! transforms, which the shadow passes render with and the lit pass samples
//! against.
//!
//! Transforms are computed from the current parameters on every call, so
//! moving a light never leaves a stale matrix behind.

use crate::error::{Error, Result};
use crate::renderer::viewer::Projection;
use glam::{Mat4, Vec3};

/// Number of point lights the lighting shader has slots for.
pub const MAX_POINT_LIGHTS: usize = 3;

/// Half extent of the directional light's orthographic shadow volume.
pub const DIRECTIONAL_SHADOW_EXTENT: f32 = 20.0;
/// Near plane of the directional light's orthographic shadow volume.
pub const DIRECTIONAL_SHADOW_NEAR: f32 = 0.1;
/// Far plane of the directional light's orthographic shadow volume.
pub const DIRECTIONAL_SHADOW_FAR: f32 = 100.0;

/// Colour and intensities shared by every light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightBase {
    /// How much of each colour channel the light lets through (0.0 - 1.0).
    pub colour: Vec3,
    /// Intensity applied to every surface regardless of orientation.
    pub ambient_intensity: f32,
    /// Intensity of the direction-dependent term.
    pub diffuse_intensity: f32,
}

impl LightBase {
    /// Create a new light base.
    pub fn new(colour: Vec3, ambient_intensity: f32, diffuse_intensity: f32) -> Self {
        Self {
            colour,
            ambient_intensity,
            diffuse_intensity,
        }
    }
}

impl Default for LightBase {
    fn default() -> Self {
        Self::new(Vec3::ONE, 1.0, 0.0)
    }
}

/// Falloff of a point light: `1 / (constant + linear * d + exponent * d^2)`.
///
/// `constant` must be non-zero, otherwise the light is singular at its own
/// position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub exponent: f32,
}

impl Attenuation {
    /// Create a new attenuation.
    pub fn new(constant: f32, linear: f32, exponent: f32) -> Self {
        Self {
            constant,
            linear,
            exponent,
        }
    }

    /// No falloff with distance.
    pub fn none() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Attenuation factor at `distance` from the light.
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.exponent * distance * distance)
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self::none()
    }
}

/// Light arriving from infinitely far away along `direction`.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub base: LightBase,
    /// Direction the light travels in. Not renormalized.
    pub direction: Vec3,
}

impl DirectionalLight {
    /// Create a new directional light.
    pub fn new(base: LightBase, direction: Vec3) -> Self {
        Self { base, direction }
    }

    /// The fixed orthographic volume the shadow map covers.
    pub fn projection() -> Mat4 {
        Projection::orthographic(
            2.0 * DIRECTIONAL_SHADOW_EXTENT,
            2.0 * DIRECTIONAL_SHADOW_EXTENT,
            DIRECTIONAL_SHADOW_NEAR,
            DIRECTIONAL_SHADOW_FAR,
        )
        .matrix()
    }

    /// World to light clip space.
    ///
    /// The view looks from `-direction` at the origin with +Y as up. A
    /// direction parallel to +Y yields a degenerate view.
    pub fn light_transform(&self) -> Mat4 {
        Self::projection() * Mat4::look_at_rh(-self.direction, Vec3::ZERO, Vec3::Y)
    }
}

/// Viewing direction and up vector of one cube map face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeFace {
    pub direction: Vec3,
    pub up: Vec3,
}

/// Cube faces in layer order: +X, -X, +Y, -Y, +Z, -Z.
///
/// The vertical faces use a Z up vector, since Y is parallel to their view
/// direction.
pub const CUBE_FACES: [CubeFace; 6] = [
    CubeFace {
        direction: Vec3::X,
        up: Vec3::NEG_Y,
    },
    CubeFace {
        direction: Vec3::NEG_X,
        up: Vec3::NEG_Y,
    },
    CubeFace {
        direction: Vec3::Y,
        up: Vec3::Z,
    },
    CubeFace {
        direction: Vec3::NEG_Y,
        up: Vec3::NEG_Z,
    },
    CubeFace {
        direction: Vec3::Z,
        up: Vec3::NEG_Y,
    },
    CubeFace {
        direction: Vec3::NEG_Z,
        up: Vec3::NEG_Y,
    },
];

/// Omnidirectional light at a position, with distance attenuation.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub base: LightBase,
    pub position: Vec3,
    pub attenuation: Attenuation,
    /// Near plane of the cube shadow projection.
    pub near: f32,
    /// Far plane of the cube shadow projection. Also used by the lit shader
    /// to normalize sampled distances.
    pub far: f32,
    /// Shadow map width / height. 1.0 for square cube faces.
    pub shadow_aspect: f32,
}

impl PointLight {
    /// Create a new point light with square shadow faces.
    pub fn new(
        base: LightBase,
        position: Vec3,
        attenuation: Attenuation,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            base,
            position,
            attenuation,
            near,
            far,
            shadow_aspect: 1.0,
        }
    }

    /// Projection shared by all six faces.
    pub fn projection(&self) -> Mat4 {
        Projection::perspective(90.0, self.shadow_aspect, self.near, self.far).matrix()
    }

    /// View matrix of every cube face, in layer order.
    pub fn face_views(&self) -> [Mat4; 6] {
        CUBE_FACES.map(|face| {
            Mat4::look_at_rh(self.position, self.position + face.direction, face.up)
        })
    }

    /// World to light clip space for every cube face, in layer order.
    pub fn light_transforms(&self) -> [Mat4; 6] {
        let projection = self.projection();
        self.face_views().map(|view| projection * view)
    }
}

/// Identifies a light within a frame's light set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightId {
    Directional,
    /// Index into the point light array.
    Point(usize),
}

/// Light-space transforms of a single light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightTransforms {
    /// One transform for a 2D shadow map.
    Single(Mat4),
    /// One transform per cube face.
    Cube([Mat4; 6]),
}

impl LightTransforms {
    /// All transforms as a slice.
    pub fn as_slice(&self) -> &[Mat4] {
        match self {
            LightTransforms::Single(matrix) => std::slice::from_ref(matrix),
            LightTransforms::Cube(matrices) => matrices,
        }
    }
}

/// A light of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Directional(DirectionalLight),
    Point(PointLight),
}

impl Light {
    /// Photometric parameters.
    pub fn base(&self) -> &LightBase {
        match self {
            Light::Directional(light) => &light.base,
            Light::Point(light) => &light.base,
        }
    }

    /// Light-space transforms for this light's shadow pass.
    pub fn light_transforms(&self) -> LightTransforms {
        match self {
            Light::Directional(light) => LightTransforms::Single(light.light_transform()),
            Light::Point(light) => LightTransforms::Cube(light.light_transforms()),
        }
    }
}

impl From<DirectionalLight> for Light {
    fn from(light: DirectionalLight) -> Self {
        Light::Directional(light)
    }
}

impl From<PointLight> for Light {
    fn from(light: PointLight) -> Self {
        Light::Point(light)
    }
}

/// Point lights, bounded by [`MAX_POINT_LIGHTS`].
#[derive(Debug, Clone, Default)]
pub struct PointLights {
    lights: Vec<PointLight>,
}

impl PointLights {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a light. Fails once the shader's slots are used up.
    pub fn push(&mut self, light: PointLight) -> Result<usize> {
        if self.lights.len() >= MAX_POINT_LIGHTS {
            return Err(Error::TooManyPointLights {
                max: MAX_POINT_LIGHTS,
            });
        }
        self.lights.push(light);
        Ok(self.lights.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PointLight> {
        self.lights.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut PointLight> {
        self.lights.get_mut(index)
    }

    pub fn as_slice(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PointLight> {
        self.lights.iter()
    }
}

/// The lights of a scene: one directional light and the point lights.
#[derive(Debug, Clone)]
pub struct SceneLights {
    pub directional: DirectionalLight,
    pub points: PointLights,
}

impl SceneLights {
    /// Create a light set with no point lights.
    pub fn new(directional: DirectionalLight) -> Self {
        Self {
            directional,
            points: PointLights::new(),
        }
    }

    /// Every light in shadow pass order: directional first, then point lights.
    pub fn iter(&self) -> impl Iterator<Item = (LightId, Light)> + '_ {
        std::iter::once((
            LightId::Directional,
            Light::Directional(self.directional.clone()),
        ))
        .chain(
            self.points
                .iter()
                .enumerate()
                .map(|(i, light)| (LightId::Point(i), Light::Point(light.clone()))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const EPSILON: f32 = 1e-4;

    fn point_light(position: Vec3) -> PointLight {
        PointLight::new(
            LightBase::new(Vec3::ONE, 0.0, 1.0),
            position,
            Attenuation::new(0.3, 0.2, 0.1),
            0.01,
            100.0,
        )
    }

    #[test]
    fn test_directional_transform_is_deterministic() {
        let light = DirectionalLight::new(LightBase::default(), Vec3::new(0.0, -15.0, -10.0));
        let a = light.light_transform();
        let b = light.light_transform();
        assert_eq!(a.to_cols_array(), b.to_cols_array());
    }

    #[test]
    fn test_directional_transform_ignores_photometrics() {
        let direction = Vec3::new(2.0, -1.0, -2.0);
        let dim = DirectionalLight::new(LightBase::new(Vec3::X, 0.1, 0.2), direction);
        let bright = DirectionalLight::new(LightBase::new(Vec3::ONE, 0.9, 3.0), direction);
        assert_eq!(
            dim.light_transform().to_cols_array(),
            bright.light_transform().to_cols_array()
        );
    }

    #[test]
    fn test_directional_transform_tracks_direction() {
        let mut light = DirectionalLight::new(LightBase::default(), Vec3::new(0.0, -15.0, -10.0));
        let before = light.light_transform();
        light.direction = Vec3::new(5.0, -10.0, 0.0);
        assert_ne!(before.to_cols_array(), light.light_transform().to_cols_array());
    }

    #[test]
    fn test_directional_transform_maps_origin_inside_volume() {
        let direction = Vec3::new(0.0, -15.0, -10.0);
        let light = DirectionalLight::new(LightBase::default(), direction);
        let clip = light.light_transform() * Vec4::new(0.0, 0.0, 0.0, 1.0);

        // The eye sits at -direction, so the origin is |direction| in front of it.
        let distance = direction.length();
        let expected_depth = (distance - DIRECTIONAL_SHADOW_NEAR)
            / (DIRECTIONAL_SHADOW_FAR - DIRECTIONAL_SHADOW_NEAR);
        assert!(clip.x.abs() < EPSILON);
        assert!(clip.y.abs() < EPSILON);
        assert!((clip.z - expected_depth).abs() < EPSILON);
        assert!((clip.w - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_cube_face_up_vectors() {
        assert_eq!(CUBE_FACES[2].up, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(CUBE_FACES[3].up, Vec3::new(0.0, 0.0, -1.0));
        for face in [0, 1, 4, 5] {
            assert_eq!(CUBE_FACES[face].up, Vec3::new(0.0, -1.0, 0.0));
        }
    }

    #[test]
    fn test_cube_face_order() {
        let directions: Vec<Vec3> = CUBE_FACES.iter().map(|f| f.direction).collect();
        assert_eq!(
            directions,
            vec![
                Vec3::X,
                Vec3::NEG_X,
                Vec3::Y,
                Vec3::NEG_Y,
                Vec3::Z,
                Vec3::NEG_Z
            ]
        );
    }

    #[test]
    fn test_point_light_faces_share_eye() {
        let position = Vec3::new(1.0, 2.0, -3.0);
        let light = point_light(position);

        for (view, face) in light.face_views().iter().zip(CUBE_FACES.iter()) {
            let eye = *view * position.extend(1.0);
            assert!(eye.truncate().length() < EPSILON);

            // The face target lies straight ahead, one unit down -Z in view space.
            let target = *view * (position + face.direction).extend(1.0);
            assert!((target.truncate() - Vec3::new(0.0, 0.0, -1.0)).length() < EPSILON);
        }
    }

    #[test]
    fn test_point_light_transforms_project_to_face_center() {
        let position = Vec3::new(-2.0, 4.0, 1.5);
        let light = point_light(position);

        for (transform, face) in light.light_transforms().iter().zip(CUBE_FACES.iter()) {
            let eye = *transform * position.extend(1.0);
            assert!(eye.x.abs() < EPSILON);
            assert!(eye.y.abs() < EPSILON);
            assert!(eye.w.abs() < EPSILON);

            let ahead = *transform * (position + face.direction * 5.0).extend(1.0);
            let ndc = ahead.truncate() / ahead.w;
            assert!(ndc.x.abs() < EPSILON);
            assert!(ndc.y.abs() < EPSILON);
            assert!(ndc.z > 0.0 && ndc.z < 1.0);
        }
    }

    #[test]
    fn test_point_light_transforms_use_shared_projection() {
        let light = point_light(Vec3::ZERO);
        let projection = light.projection();
        for (transform, view) in light.light_transforms().iter().zip(light.face_views()) {
            assert_eq!(transform.to_cols_array(), (projection * view).to_cols_array());
        }
    }

    #[test]
    fn test_attenuation_unit_constant_at_source() {
        let attenuation = Attenuation::new(1.0, 0.0, 0.0);
        assert_eq!(attenuation.factor(0.0), 1.0);
        assert!(attenuation.factor(0.0).is_finite());
    }

    #[test]
    fn test_attenuation_falls_off() {
        let attenuation = Attenuation::new(1.0, 0.5, 0.25);
        // 1 / (1 + 1 + 1)
        assert!((attenuation.factor(2.0) - 1.0 / 3.0).abs() < EPSILON);
        assert!(attenuation.factor(4.0) < attenuation.factor(2.0));
    }

    #[test]
    fn test_light_transforms_by_variant() {
        let directional: Light =
            DirectionalLight::new(LightBase::default(), Vec3::new(1.0, -1.0, 0.0)).into();
        assert_eq!(directional.light_transforms().as_slice().len(), 1);

        let point: Light = point_light(Vec3::ONE).into();
        assert_eq!(point.light_transforms().as_slice().len(), 6);
    }

    #[test]
    fn test_point_lights_reject_overflow() {
        let mut lights = PointLights::new();
        for i in 0..MAX_POINT_LIGHTS {
            assert_eq!(lights.push(point_light(Vec3::ZERO)).ok(), Some(i));
        }
        let overflow = lights.push(point_light(Vec3::ZERO));
        assert!(matches!(
            overflow,
            Err(Error::TooManyPointLights { max }) if max == MAX_POINT_LIGHTS
        ));
        assert_eq!(lights.len(), MAX_POINT_LIGHTS);
    }

    #[test]
    fn test_scene_lights_order() {
        let mut lights = SceneLights::new(DirectionalLight::new(
            LightBase::default(),
            Vec3::new(0.0, -1.0, -1.0),
        ));
        lights.points.push(point_light(Vec3::X)).unwrap();
        lights.points.push(point_light(Vec3::Y)).unwrap();

        let ids: Vec<LightId> = lights.iter().map(|(id, _)| id).collect();
        assert_eq!(
            ids,
            vec![LightId::Directional, LightId::Point(0), LightId::Point(1)]
        );
    }
}
