//! Window management module
//!
//! Runs a winit event loop with a wgpu surface. The setup callback builds
//! the application state once the GPU is ready, then the frame callback
//! runs on every redraw. Escape or the close button ends the loop.

pub mod event;
pub mod frame_io;
pub mod input;
pub mod settings;

pub use event::Key;
pub use frame_io::{FrameInput, FrameOutput, GraphicsInit, Viewport};
pub use input::{InputState, KEY_TABLE_SIZE};
pub use settings::WindowSettings;

use crate::context::WgpuContext;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorGrabMode, WindowId};

/// A window with GPU rendering context.
pub struct Window {
    settings: WindowSettings,
}

impl Window {
    /// Create a new window with the given settings.
    pub fn new(settings: WindowSettings) -> Self {
        Self { settings }
    }

    /// Run the render loop until the window closes.
    ///
    /// `init` runs once the device and surface exist. A failure there, or in
    /// creating the device and surface, ends the loop and is returned.
    pub fn render_loop<S, I, F>(self, init: I, callback: F) -> anyhow::Result<()>
    where
        I: FnOnce(GraphicsInit<'_>) -> anyhow::Result<S>,
        F: FnMut(&mut S, FrameInput<'_>) -> FrameOutput,
    {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App {
            settings: self.settings,
            init: Some(init),
            state: None,
            callback,
            graphics: None,
            input: InputState::new(),
            error: None,
            resized: false,
            start_time: Instant::now(),
            last_frame_time: Instant::now(),
        };

        event_loop.run_app(&mut app)?;

        match app.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct Graphics {
    window: Arc<winit::window::Window>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    ctx: WgpuContext,
    cursor_grabbed: bool,
}

struct App<S, I, F> {
    settings: WindowSettings,
    init: Option<I>,
    state: Option<S>,
    callback: F,
    graphics: Option<Graphics>,
    input: InputState,
    error: Option<anyhow::Error>,
    resized: bool,
    start_time: Instant,
    last_frame_time: Instant,
}

impl<S, I, F> App<S, I, F>
where
    I: FnOnce(GraphicsInit<'_>) -> anyhow::Result<S>,
{
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attrs = winit::window::WindowAttributes::default()
            .with_title(&self.settings.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.settings.size.0,
                self.settings.size.1,
            ))
            .with_resizable(self.settings.resizable);

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))?;

        let ctx = pollster::block_on(WgpuContext::from_adapter(&adapter))?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow::anyhow!("surface reports no supported formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if self.settings.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&ctx.device, &config);

        let cursor_grabbed = self.settings.grab_cursor && grab_cursor(&window);

        let viewport = Viewport::new_at_origin(config.width, config.height);
        if let Some(init) = self.init.take() {
            self.state = Some(init(GraphicsInit {
                ctx: &ctx,
                surface_format: format,
                viewport,
            })?);
        }

        self.graphics = Some(Graphics {
            window,
            surface,
            config,
            ctx,
            cursor_grabbed,
        });

        self.start_time = Instant::now();
        self.last_frame_time = Instant::now();
        Ok(())
    }
}

/// Hide the cursor and keep it in the window. Returns whether it worked.
fn grab_cursor(window: &winit::window::Window) -> bool {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));

    match grabbed {
        Ok(()) => {
            window.set_cursor_visible(false);
            true
        }
        Err(err) => {
            tracing::warn!("cursor grab unavailable: {err}");
            false
        }
    }
}

impl<S, I, F> ApplicationHandler for App<S, I, F>
where
    I: FnOnce(GraphicsInit<'_>) -> anyhow::Result<S>,
    F: FnMut(&mut S, FrameInput<'_>) -> FrameOutput,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() || self.error.is_some() {
            return;
        }

        if let Err(err) = self.init_graphics(event_loop) {
            tracing::error!("initialization failed: {err:#}");
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(graphics) = &mut self.graphics else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    graphics.config.width = size.width;
                    graphics.config.height = size.height;
                    graphics
                        .surface
                        .configure(&graphics.ctx.device, &graphics.config);
                    self.resized = true;
                }
            }
            WindowEvent::Focused(false) => {
                self.input.release_all();
            }
            WindowEvent::CursorMoved { position, .. } => {
                if !graphics.cursor_grabbed {
                    self.input.cursor_moved(position.x, position.y);
                }
            }
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                if let Some(key) = Key::from_winit(&key_event.physical_key) {
                    match key_event.state {
                        ElementState::Pressed if key == Key::Escape => {
                            event_loop.exit();
                        }
                        ElementState::Pressed => self.input.key_pressed(key),
                        ElementState::Released => self.input.key_released(key),
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed_time = (now - self.start_time).as_secs_f64();
                let delta_time = (now - self.last_frame_time).as_secs_f64();
                self.last_frame_time = now;

                let surface_texture = match graphics.surface.get_current_texture() {
                    Ok(texture) => texture,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        graphics
                            .surface
                            .configure(&graphics.ctx.device, &graphics.config);
                        return;
                    }
                    Err(e) => {
                        tracing::error!("surface error: {e:?}");
                        return;
                    }
                };

                let view = surface_texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                let Some(state) = self.state.as_mut() else {
                    return;
                };

                let frame_input = FrameInput {
                    input: &mut self.input,
                    elapsed_time,
                    delta_time,
                    viewport: Viewport::new_at_origin(
                        graphics.config.width,
                        graphics.config.height,
                    ),
                    resized: std::mem::take(&mut self.resized),
                    ctx: &graphics.ctx,
                    surface_view: &view,
                    surface_format: graphics.config.format,
                };

                let output = (self.callback)(state, frame_input);

                surface_texture.present();

                if output.exit {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(graphics) = &self.graphics else {
            return;
        };

        if let DeviceEvent::MouseMotion { delta } = event {
            if graphics.cursor_grabbed {
                self.input.mouse_motion(delta.0, delta.1);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = &self.graphics {
            graphics.window.request_redraw();
        }
    }
}
