#![deny(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Context;
use error_iter::ErrorIter as _;
use life_game::Flow;
use log::{debug, error, info};
use pixels::wgpu::Color;
use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, KeyEvent, MouseButton, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Cursor, CursorIcon, Window, WindowId};

const BACKGROUND_COLOR: Color = Color::BLACK;

/// A front end drawn into a fixed-size RGBA pixel buffer.
pub trait PixelsApp {
    /// Buffer size in pixels; also the window's initial logical size.
    fn buffer_size(&self) -> (u32, u32);

    fn title(&self) -> String;

    fn on_key(&mut self, code: KeyCode) -> Flow;

    /// `x` and `y` are buffer pixel coordinates.
    fn on_click(&mut self, x: usize, y: usize) -> Flow;

    /// Called once per frame with the time since the previous frame.
    fn on_frame(&mut self, dt: Duration) -> Flow;

    fn render(&self, frame: &mut [u8]);

    /// Called once, right before the event loop exits.
    fn on_close(&mut self) {}
}

/// Runs `game` in a window at `frames_per_second` until it asks to exit or
/// the window is closed.
pub fn animate<G: PixelsApp>(game: G, frames_per_second: u32) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("creating event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut handler = AppEventHandler::new(game, frames_per_second);
    event_loop
        .run_app(&mut handler)
        .context("running event loop")?;
    handler.failure.map_or(Ok(()), Err)
}

struct View {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    title: String,
}

impl View {
    fn new<G: PixelsApp>(event_loop: &ActiveEventLoop, game: &G) -> anyhow::Result<Self> {
        let (width, height) = game.buffer_size();
        let title = game.title();
        let window = Arc::new(Self::build_window(event_loop, width, height, &title)?);
        let pixels = Self::build_pixels(&window, width, height)?;
        Ok(Self {
            window,
            pixels,
            title,
        })
    }

    fn build_window(
        event_loop: &ActiveEventLoop,
        width: u32,
        height: u32,
        title: &str,
    ) -> anyhow::Result<Window> {
        let size = LogicalSize::new(width as f64, height as f64);
        let window_attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(size)
            .with_min_inner_size(size)
            .with_cursor(Cursor::Icon(CursorIcon::Crosshair))
            .with_visible(false);
        event_loop
            .create_window(window_attributes)
            .context("creating window")
    }

    fn build_pixels(
        window: &Arc<Window>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Pixels<'static>> {
        let window_size = window.inner_size();
        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());
        PixelsBuilder::new(width, height, surface_texture)
            .clear_color(BACKGROUND_COLOR)
            .build()
            .context("creating pixel buffer")
    }

    fn update_title(&mut self, title: String) {
        if title != self.title {
            self.window.set_title(&title);
            self.title = title;
        }
    }
}

struct AppEventHandler<G: PixelsApp> {
    game: G,
    view: Option<View>,
    frame_interval: Duration,
    next_frame: Instant,
    last_frame: Instant,
    cursor: Option<PhysicalPosition<f64>>,
    closed: bool,
    failure: Option<anyhow::Error>,
}

impl<G: PixelsApp> AppEventHandler<G> {
    fn new(game: G, frames_per_second: u32) -> Self {
        let now = Instant::now();
        Self {
            game,
            view: None,
            frame_interval: Duration::from_secs(1) / frames_per_second.max(1),
            next_frame: now,
            last_frame: now,
            cursor: None,
            closed: false,
            failure: None,
        }
    }

    fn on_create(&mut self, event_loop: &ActiveEventLoop) {
        match View::new(event_loop, &self.game) {
            Ok(view) => {
                view.window.request_redraw();
                view.window.set_visible(true);
                self.view = Some(view);
                let now = Instant::now();
                self.last_frame = now;
                self.next_frame = now + self.frame_interval;
            }
            Err(err) => {
                error!("{err:#}");
                self.failure = Some(err);
                self.close(event_loop);
            }
        }
    }

    fn on_time_step(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;
        let flow = self.game.on_frame(dt);
        self.follow(event_loop, flow);

        if let Some(view) = self.view.as_mut() {
            view.update_title(self.game.title());
            view.window.request_redraw();
        }

        while self.next_frame <= now {
            self.next_frame += self.frame_interval;
        }
    }

    fn on_redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        self.game.render(view.pixels.frame_mut());
        if let Err(err) = view.pixels.render() {
            log_error("pixels.render", err);
            self.close(event_loop);
        }
    }

    fn on_resize(&mut self, event_loop: &ActiveEventLoop, width: u32, height: u32) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        if let Err(err) = view.pixels.resize_surface(width, height) {
            log_error("pixels.resize_surface", err);
            self.close(event_loop);
        }
    }

    fn on_mouse_press(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(view), Some(cursor)) = (self.view.as_ref(), self.cursor) else {
            return;
        };
        match view
            .pixels
            .window_pos_to_pixel((cursor.x as f32, cursor.y as f32))
        {
            Ok((x, y)) => {
                let flow = self.game.on_click(x, y);
                self.follow(event_loop, flow);
            }
            Err((x, y)) => debug!("Click outside the board at {x}, {y}"),
        }
    }

    fn follow(&mut self, event_loop: &ActiveEventLoop, flow: Flow) {
        if flow == Flow::Exit {
            self.close(event_loop);
        }
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if !self.closed {
            self.closed = true;
            self.game.on_close();
            info!("Closing window");
        }
        event_loop.exit();
    }
}

impl<G: PixelsApp> ApplicationHandler for AppEventHandler<G> {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause {
            self.on_time_step(event_loop);
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.view.is_none() && !self.closed {
            self.on_create(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.close(event_loop);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let flow = self.game.on_key(code);
                self.follow(event_loop, flow);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.on_mouse_press(event_loop);
            }
            WindowEvent::Resized(size) => {
                self.on_resize(event_loop, size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                self.on_redraw(event_loop);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.closed && self.view.is_some() {
            event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
        }
    }
}

fn log_error<E: Error + 'static>(method_name: &str, err: E) {
    error!("{method_name}() failed: {err}");
    for source in err.sources().skip(1) {
        error!("  Caused by: {source}");
    }
}
