//! Application event loop.
//!
//! This module owns the winit event loop and forwards its events to the
//! [`BumpMapDemo`]. It plays the part of a classic windowing backend:
//!
//! 1. `resumed` creates the window and the GPU [`Context`] and initializes the demo
//! 2. keyboard and cursor events are handed to the demo's input callbacks
//! 3. every `RedrawRequested` renders a frame and immediately asks for the next one,
//!    so the demo keeps rendering while idle
//!
//! Loading is asynchronous; the loop blocks on it through a tokio runtime it owns.

use std::sync::{Arc, Once};

use anyhow::Context as _;
use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, PhysicalKey},
    window::Window,
};

use crate::{
    app::{BumpMapDemo, KeyAction},
    config::DemoConfig,
    context::Context,
};

const FPS_LOG_INTERVAL: Duration = Duration::from_secs(5);

static LOGGER: Once = Once::new();

fn init_logger() {
    LOGGER.call_once(|| {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    });
}

/// Counts presented frames and reports the rate every [`FPS_LOG_INTERVAL`].
#[derive(Debug)]
struct FrameCounter {
    frames: u32,
    last_log: Instant,
}

impl FrameCounter {
    fn new() -> Self {
        Self {
            frames: 0,
            last_log: Instant::now(),
        }
    }

    /// Count the frame if it rendered. Returns the rate when one is due.
    fn record(&mut self, outcome: &Result<(), wgpu::SurfaceError>) -> Option<f64> {
        if outcome.is_err() {
            return None;
        }
        self.frames += 1;
        let elapsed = self.last_log.elapsed();
        if elapsed < FPS_LOG_INTERVAL {
            return None;
        }
        let fps = self.frames as f64 / elapsed.as_secs_f64();
        self.frames = 0;
        self.last_log = Instant::now();
        Some(fps)
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    demo: BumpMapDemo,
    ctx: Option<Context>,
    // The first fatal error. The loop exits once it is set.
    error: Option<anyhow::Error>,
    frames: FrameCounter,
}

impl App {
    fn new(config: DemoConfig) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new().context("could not start the async runtime")?;
        Ok(Self {
            async_runtime,
            demo: BumpMapDemo::new(config),
            ctx: None,
            error: None,
            frames: FrameCounter::new(),
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        self.error = Some(error);
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if !event.state.is_pressed() {
            return;
        }
        if let PhysicalKey::Code(code) = event.physical_key {
            if self.demo.special_keyboard(code) {
                return;
            }
        }
        if let Key::Character(text) = &event.logical_key {
            if self.demo.keyboard(text.as_str()) == KeyAction::Exit {
                log::info!("Exit requested");
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.ctx.is_some() || self.error.is_some() {
            return;
        }

        let config = self.demo.config();
        let window_attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height));
        let backends = config.backends;

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                println!("Could not create the window: {e}");
                self.fail(event_loop, anyhow::Error::new(e).context("could not create the window"));
                return;
            }
        };

        let ctx = match self.async_runtime.block_on(Context::new(window, backends)) {
            Ok(ctx) => ctx,
            Err(e) => {
                println!("{e:#}");
                self.fail(event_loop, e);
                return;
            }
        };

        if let Err(e) = self.async_runtime.block_on(self.demo.init(&ctx)) {
            self.fail(event_loop, e);
            return;
        }

        ctx.window.request_redraw();
        self.ctx = Some(ctx);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: winit::window::WindowId, event: WindowEvent) {
        if self.ctx.is_none() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(ctx) = self.ctx.as_mut() {
                    ctx.resize(size.width, size.height);
                }
                self.demo.resize(size.width, size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::CursorMoved { position, .. } => self.demo.passive_mouse(position.x, position.y),
            WindowEvent::RedrawRequested => {
                let Some(ctx) = self.ctx.as_mut() else {
                    return;
                };
                let outcome = self.demo.render_scene(ctx);
                if let Some(fps) = self.frames.record(&outcome) {
                    log::debug!("{:.1} fps", fps);
                }
                match outcome {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = ctx.window.inner_size();
                        if size.width > 0 && size.height > 0 {
                            ctx.resize(size.width, size.height);
                        } else {
                            ctx.reconfigure();
                        }
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory while rendering");
                        self.fail(event_loop, anyhow::anyhow!("the GPU ran out of memory"));
                        return;
                    }
                    Err(e) => log::warn!("Unable to render {}", e),
                }
                if let Some(ctx) = self.ctx.as_ref() {
                    ctx.window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Start logging and build the configuration from command line arguments.
///
/// The logger comes first so warnings about malformed arguments are shown.
pub fn config_from_args<I, S>(args: I) -> DemoConfig
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    init_logger();
    DemoConfig::from_args(args)
}

/// Open the window and run the demo until it exits.
///
/// Errors during start-up end the loop and are returned.
pub fn run(config: DemoConfig) -> anyhow::Result<()> {
    init_logger();

    log::info!("Starting '{}' ({}x{})", config.title, config.width, config.height);
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
