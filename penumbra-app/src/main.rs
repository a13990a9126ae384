mod logging;

use std::path::Path;

use glam::{Mat4, Vec3};
use logging::{init_logging, LoggingConfig};
use penumbra::{
    load_texture_or_white, Attenuation, Camera, DirectionalLight, ForwardRenderer, FrameInput,
    FrameOutput, GraphicsInit, LightBase, Material, MeshData, PointLight, RendererShaders, Scene,
    SceneLights, ShadowConfig, Window, WindowSettings,
};

const SHADER_DIR: &str = "Shaders";
const BRICK_TEXTURE: &str = "Textures/brick.png";
const DIRT_TEXTURE: &str = "Textures/dirt.png";

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let settings = WindowSettings::new().title("penumbra");
    Window::new(settings).render_loop(build_scene, frame)
}

fn scene_lights() -> anyhow::Result<SceneLights> {
    let sun = DirectionalLight::new(
        LightBase::new(Vec3::ONE, 0.1, 0.6),
        Vec3::new(0.0, -15.0, -10.0),
    );
    let mut lights = SceneLights::new(sun);

    let attenuation = Attenuation::new(0.3, 0.2, 0.1);
    lights.points.push(PointLight::new(
        LightBase::new(Vec3::new(0.0, 0.0, 1.0), 0.0, 0.4),
        Vec3::new(1.0, 2.0, 0.0),
        attenuation,
        0.01,
        100.0,
    ))?;
    lights.points.push(PointLight::new(
        LightBase::new(Vec3::new(0.0, 1.0, 0.0), 0.0, 0.4),
        Vec3::new(-4.0, 2.0, 0.0),
        attenuation,
        0.01,
        100.0,
    ))?;

    Ok(lights)
}

fn build_scene(init: GraphicsInit<'_>) -> anyhow::Result<Scene> {
    let ctx = init.ctx;

    let mut camera = Camera::new(Vec3::new(0.0, 1.0, 6.0), Vec3::Y, -90.0, 0.0, 5.0, 0.5);
    camera.set_viewport(init.viewport);

    let lights = scene_lights()?;

    let shaders = if Path::new(SHADER_DIR).is_dir() {
        RendererShaders::from_dir(SHADER_DIR)
    } else {
        RendererShaders::default()
    };

    let renderer = ForwardRenderer::new(
        ctx,
        init.surface_format,
        (init.viewport.width, init.viewport.height),
        ShadowConfig::default(),
        &shaders,
    )?;

    let mut scene = Scene::new(camera, lights, renderer);

    let pyramid = MeshData::pyramid();
    scene.add_object(
        ctx,
        &pyramid,
        load_texture_or_white(ctx, BRICK_TEXTURE),
        Material::shiny(),
        Mat4::from_translation(Vec3::new(0.0, 0.0, -2.5)),
    );
    scene.add_object(
        ctx,
        &pyramid,
        load_texture_or_white(ctx, DIRT_TEXTURE),
        Material::dull(),
        Mat4::from_translation(Vec3::new(0.0, 4.0, -2.5)),
    );
    scene.add_object(
        ctx,
        &MeshData::floor(10.0, 10.0),
        load_texture_or_white(ctx, DIRT_TEXTURE),
        Material::dull(),
        Mat4::from_translation(Vec3::new(0.0, -2.0, 0.0)),
    );

    log::info!(
        "scene ready: {} objects, {} point lights",
        scene.objects.len(),
        scene.lights.points.len()
    );
    Ok(scene)
}

fn frame(scene: &mut Scene, frame: FrameInput<'_>) -> FrameOutput {
    if frame.resized {
        scene.resize(frame.ctx, frame.viewport);
    }

    let keys = frame.input.move_keys();
    let mouse_delta = frame.input.take_mouse_delta();
    scene.update_camera(keys, mouse_delta, frame.delta_time as f32);

    scene.render(frame.ctx, frame.surface_view);
    FrameOutput::new()
}
