//! Windowed application: startup sequence and the per-frame loop.
//!
//! Initialization is a single linear sequence; any failure aborts before the
//! render loop starts. Once running, frames are driven by winit redraw
//! requests that re-request themselves, and the loop only ends with the
//! window.

pub mod clock;

pub use clock::FrameClock;

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::assets::{self, LoadError};
use crate::gpu::{physical_extent, GpuContext, GpuError, QuadRenderer, SurfaceState};
use crate::shader::{ShaderError, ShaderProgram};

/// File name of the shipped fragment shader.
pub const FRAGMENT_SHADER: &str = "colorwash.frag";

/// File name of the shipped vertex shader.
pub const VERTEX_SHADER: &str = "fullscreen.vert";

/// Errors that can occur during startup. All are fatal; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Failed to load shader source: {0}")]
    ShaderLoad(#[from] LoadError),
    #[error("Shader error: {0}")]
    Shader(#[from] ShaderError),
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}

/// Per-window state: renderer, surface, and the frame clock.
pub struct AppState {
    renderer: QuadRenderer,
    surface: SurfaceState,
    clock: FrameClock,
}

impl AppState {
    /// Run the startup sequence for a freshly created window.
    pub async fn new(window: Arc<Window>) -> Result<Self, InitError> {
        let scale = window.scale_factor();
        let logical = window.inner_size().to_logical::<f64>(scale);
        let (width, height) = physical_extent(logical.width, logical.height, scale);

        let (ctx, surface) = GpuContext::for_window(window.clone()).await?;
        log::info!("using adapter: {}", ctx.adapter_info().name);

        let surface = SurfaceState::new(surface, &ctx.adapter, &ctx.device, width, height);
        log::info!(
            "surface configured: {:?} {}x{}",
            surface.format(),
            width,
            height
        );

        let dir = assets::shader_dir();
        log::info!("loading shaders from {}", dir.display());
        let fragment_source = assets::load_text(&dir.join(FRAGMENT_SHADER))?;
        let vertex_source = assets::load_text(&dir.join(VERTEX_SHADER))?;

        let program = ShaderProgram::link(&fragment_source, &vertex_source)?;
        if program.time_uniform().is_none() {
            log::warn!("shader declares no u_time uniform; output will be static");
        }

        let format = surface.format();
        let renderer = QuadRenderer::for_surface(ctx, format, &program);

        Ok(Self {
            renderer,
            surface,
            clock: FrameClock::start(),
        })
    }

    /// Resize the swapchain to a new physical size. Idempotent for
    /// unchanged input.
    pub fn handle_resized(&mut self, width: u32, height: u32) {
        self.surface.resize(self.renderer.device(), width, height);
    }

    /// Render one frame at the clock's current elapsed time.
    pub fn render(&mut self) {
        let frame = match self.surface.acquire() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                // The next resize event reconfigures the surface.
                log::warn!("surface outdated, skipping frame");
                return;
            }
            Err(err) => {
                log::error!("failed to acquire frame: {err}");
                return;
            }
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.renderer
                .device()
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("frame_encoder"),
                });

        self.renderer.draw(&mut encoder, &view, self.clock.seconds());

        self.renderer
            .queue()
            .submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}

/// Winit application handler driving the render loop.
#[derive(Default)]
pub struct App {
    window: Option<Arc<Window>>,
    state: Option<AppState>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("huewave")
            .with_inner_size(LogicalSize::new(800.0, 600.0));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(AppState::new(window.clone())) {
            Ok(state) => {
                self.state = Some(state);
                window.request_redraw();
                self.window = Some(window);
            }
            Err(err) => {
                log::error!("initialization failed: {err}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                state.handle_resized(size.width, size.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let logical = window.inner_size().to_logical::<f64>(scale_factor);
                    let (width, height) =
                        physical_extent(logical.width, logical.height, scale_factor);
                    state.handle_resized(width, height);
                }
            }
            WindowEvent::RedrawRequested => {
                state.render();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
