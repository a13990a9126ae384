//! Per-frame pass sequencing
//!
//! A frame is every shadow pass, then the lit pass, then present. The
//! ordering lives here so it can be checked without a GPU.

use crate::renderer::light::{Light, LightId, SceneLights};
use crate::renderer::shadow::ShadowConfig;
use crate::renderer::uniforms::LightingUniforms;
use crate::renderer::viewer::Viewer;

/// One step of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Shadow(LightId),
    Main,
    Present,
}

/// Executes the passes of a frame.
pub trait RenderBackend {
    /// Render the depth map of one light.
    fn shadow_pass(&mut self, id: LightId, light: &Light);

    /// Render the lit scene, sampling every shadow map.
    fn main_pass(&mut self, uniforms: &LightingUniforms);

    /// Hand the frame over for display.
    fn present(&mut self);
}

/// Drive one frame through `backend`.
///
/// Shadow passes run directional first, then point lights in index order.
pub fn render_frame<B: RenderBackend + ?Sized>(
    viewer: &dyn Viewer,
    lights: &SceneLights,
    shadows: &ShadowConfig,
    backend: &mut B,
) {
    for (id, light) in lights.iter() {
        tracing::debug!(?id, "shadow pass");
        backend.shadow_pass(id, &light);
    }

    tracing::debug!("main pass");
    let uniforms = LightingUniforms::new(
        viewer,
        &lights.directional,
        lights.points.as_slice(),
        shadows,
    );
    backend.main_pass(&uniforms);

    tracing::debug!("present");
    backend.present();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::camera::Camera;
    use crate::renderer::light::{
        Attenuation, DirectionalLight, LightBase, PointLight, MAX_POINT_LIGHTS,
    };
    use glam::Vec3;

    #[derive(Default)]
    struct RecordingBackend {
        phases: Vec<Phase>,
        point_light_counts: Vec<u32>,
    }

    impl RenderBackend for RecordingBackend {
        fn shadow_pass(&mut self, id: LightId, light: &Light) {
            match (id, light) {
                (LightId::Directional, Light::Directional(_)) => {}
                (LightId::Point(_), Light::Point(_)) => {}
                _ => panic!("light id {id:?} does not match its light"),
            }
            self.phases.push(Phase::Shadow(id));
        }

        fn main_pass(&mut self, uniforms: &LightingUniforms) {
            self.point_light_counts.push(uniforms.point_light_count);
            self.phases.push(Phase::Main);
        }

        fn present(&mut self) {
            self.phases.push(Phase::Present);
        }
    }

    fn lights(point_count: usize) -> SceneLights {
        let mut lights = SceneLights::new(DirectionalLight::new(
            LightBase::new(Vec3::ONE, 0.1, 0.6),
            Vec3::new(0.0, -15.0, -10.0),
        ));
        for i in 0..point_count {
            lights.points.push(point_light(i as f32)).unwrap();
        }
        lights
    }

    /// Renders point lights into a fixed number of cube map slots and checks
    /// that the lit pass only samples slots rendered this frame.
    struct SlotBackend {
        slots: usize,
        rendered: Vec<usize>,
        sampled_unrendered: Vec<usize>,
    }

    impl SlotBackend {
        fn new(slots: usize) -> Self {
            Self {
                slots,
                rendered: Vec::new(),
                sampled_unrendered: Vec::new(),
            }
        }
    }

    impl RenderBackend for SlotBackend {
        fn shadow_pass(&mut self, id: LightId, _light: &Light) {
            if let LightId::Point(index) = id {
                if index < self.slots {
                    self.rendered.push(index);
                }
            }
        }

        fn main_pass(&mut self, uniforms: &LightingUniforms) {
            for index in 0..uniforms.point_light_count as usize {
                if !self.rendered.contains(&index) {
                    self.sampled_unrendered.push(index);
                }
            }
        }

        fn present(&mut self) {
            self.rendered.clear();
        }
    }

    fn point_light(x: f32) -> PointLight {
        PointLight::new(
            LightBase::new(Vec3::ONE, 0.0, 1.0),
            Vec3::new(x, 2.0, 0.0),
            Attenuation::new(0.3, 0.2, 0.1),
            0.01,
            100.0,
        )
    }

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Y, -90.0, 0.0, 5.0, 0.5)
    }

    #[test]
    fn test_frame_order() {
        let mut backend = RecordingBackend::default();
        render_frame(&camera(), &lights(2), &ShadowConfig::default(), &mut backend);

        assert_eq!(
            backend.phases,
            vec![
                Phase::Shadow(LightId::Directional),
                Phase::Shadow(LightId::Point(0)),
                Phase::Shadow(LightId::Point(1)),
                Phase::Main,
                Phase::Present,
            ]
        );
        assert_eq!(backend.point_light_counts, vec![2]);
    }

    #[test]
    fn test_frames_never_interleave() {
        let mut backend = RecordingBackend::default();
        let lights = lights(3);
        for _ in 0..3 {
            render_frame(&camera(), &lights, &ShadowConfig::default(), &mut backend);
        }

        let frames: Vec<&[Phase]> = backend.phases.chunks(6).collect();
        assert_eq!(frames.len(), 3);
        for frame in frames {
            assert_eq!(frame[0], Phase::Shadow(LightId::Directional));
            assert_eq!(frame[3], Phase::Shadow(LightId::Point(2)));
            assert_eq!(&frame[4..], &[Phase::Main, Phase::Present]);
        }
    }

    #[test]
    fn test_directional_only_frame() {
        let mut backend = RecordingBackend::default();
        render_frame(&camera(), &lights(0), &ShadowConfig::default(), &mut backend);
        assert_eq!(
            backend.phases,
            vec![
                Phase::Shadow(LightId::Directional),
                Phase::Main,
                Phase::Present
            ]
        );
    }

    #[test]
    fn test_lights_added_later_get_shadow_passes() {
        let mut lights = lights(1);
        let mut backend = SlotBackend::new(MAX_POINT_LIGHTS);
        render_frame(&camera(), &lights, &ShadowConfig::default(), &mut backend);

        while lights.points.len() < MAX_POINT_LIGHTS {
            let x = lights.points.len() as f32;
            lights.points.push(point_light(x)).unwrap();
        }
        render_frame(&camera(), &lights, &ShadowConfig::default(), &mut backend);

        assert!(backend.sampled_unrendered.is_empty());
    }
}
