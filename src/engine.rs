use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use image::RgbaImage;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
pub use winit::keyboard::KeyCode;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::audio::{AudioContext, AudioError};
use crate::input::InputState;
use crate::renderer::draw::DrawList;
use crate::renderer::text::Font;
use crate::renderer::utils::{letterbox_viewport, screen_to_logical};
use crate::renderer::{RenderError, Renderer};
use crate::window::{WindowConfig, WindowMode, apply_window_settings};

// ── Color ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
    pub const RED: Self = Self([1.0, 0.0, 0.0, 1.0]);
    pub const GREEN: Self = Self([0.0, 1.0, 0.0, 1.0]);
    pub const YELLOW: Self = Self([1.0, 1.0, 0.0, 1.0]);
    pub const CYAN: Self = Self([0.0, 1.0, 1.0, 1.0]);

    pub fn with_alpha(self, a: f32) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, a])
    }
}

// ── Errors ─────────────────────────────────────────────────────────────────

/// Failures that stop the engine before the first frame.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error("failed to decode font atlas: {0}")]
    FontAtlas(#[from] image::ImageError),
    #[error("invalid font glyph map: {0}")]
    FontGlyphs(#[from] serde_json::Error),
}

// ── Game trait ─────────────────────────────────────────────────────────────

pub trait Game {
    /// Called once, after the window, renderer and audio are ready.
    fn on_enter(&mut self, _engine: &mut Engine) {}
    /// Fixed-timestep simulation tick. Input edges are visible to exactly
    /// one tick.
    fn update(&mut self, engine: &mut Engine);
    /// Record the frame into the engine's draw list.
    fn render(&mut self, engine: &mut Engine);
}

// ── Engine ──────────────────────────────────────────────────────────────────

/// F1 debug overlay toggle. Only reachable when started with `--debug`.
#[derive(Debug, Default)]
pub struct DebugState {
    pub enabled: bool,
    pub active: bool,
}

pub struct Engine {
    pub renderer: Renderer,
    pub font: Font,
    /// Rebuilt every frame by `Game::render`, in painter's order.
    pub draw: DrawList,
    pub input: InputState,
    pub audio: AudioContext,
    pub window_config: WindowConfig,
    pub debug: DebugState,
    dt: f32,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn dt(&self) -> f32 { self.dt }

    /// Size of the scene every draw call is expressed in.
    pub fn logical_size(&self) -> Vec2 {
        Vec2::new(
            self.window_config.logical_width as f32,
            self.window_config.logical_height as f32,
        )
    }

    /// Cursor position in scene coordinates, `None` over a letterbox bar.
    pub fn cursor(&self) -> Option<Vec2> {
        screen_to_logical(&self.window_config, self.input.mouse_pos)
    }

    /// Scene position of a left click made since the last tick, taken where
    /// the button went down. Clicks in the letterbox bars are dropped.
    pub fn clicked(&self) -> Option<Vec2> {
        let at = self.input.pressed_at(MouseButton::Left)?;
        screen_to_logical(&self.window_config, at)
    }

    pub fn debug_active(&self) -> bool {
        self.debug.enabled && self.debug.active
    }

    // ── Drawing (scene coordinates) ────────────────────────────────────────

    pub fn draw_image(&mut self, name: &str, pos: Vec2, size: Vec2) {
        self.draw.image(name, pos, size, Color::WHITE);
    }

    pub fn draw_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.draw.rect(pos, size, color);
    }

    pub fn draw_rect_outline(&mut self, pos: Vec2, size: Vec2, thickness: f32, color: Color) {
        self.draw.rect_outline(pos, size, thickness, color);
    }

    pub fn draw_polygon_outline(&mut self, points: &[Vec2], thickness: f32, color: Color) {
        self.draw.polyline_closed(points, thickness, color);
    }

    pub fn draw_triangle(&mut self, points: [Vec2; 3], color: Color) {
        self.draw.triangle(points, color);
    }

    pub fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.draw.text(&self.font, text, pos, size, color);
    }

    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        self.font.text_width(text, size)
    }

    // ── Images ─────────────────────────────────────────────────────────────

    pub fn upload_image(&mut self, name: &str, img: &RgbaImage) {
        self.renderer.upload_image(name, img);
    }

    pub fn remove_image(&mut self, name: &str) {
        self.renderer.remove_image(name);
    }

    pub fn has_image(&self, name: &str) -> bool {
        self.renderer.has_image(name)
    }

    pub fn image_size(&self, name: &str) -> Option<(u32, u32)> {
        self.renderer.image_size(name)
    }

    // ── Audio ──────────────────────────────────────────────────────────────

    pub fn play_sound(&mut self, name: &str) {
        self.audio.play(name);
    }

    fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        self.window_config.physical_width = size.width;
        self.window_config.physical_height = size.height;
        let viewport = letterbox_viewport(&self.window_config);
        debug!(width = size.width, height = size.height, ?viewport, "window resized");
        self.renderer.resize(size, viewport);
    }
}

// ── EngineBuilder ───────────────────────────────────────────────────────────

/// Fixed simulation rate.
pub const UPDATES_PER_SECOND: u32 = 60;

pub const WINDOW_TITLE: &str = "where is everybody?";

#[derive(Default)]
pub struct EngineBuilder {
    window: WindowConfig,
    debug_enabled: bool,
    images: Vec<(String, RgbaImage)>,
    sounds: Vec<(String, PathBuf)>,
}

impl EngineBuilder {
    pub fn with_window(mut self, window: WindowConfig) -> Self { self.window = window; self }
    pub fn with_debug(mut self, enabled: bool) -> Self { self.debug_enabled = enabled; self }

    /// Image uploaded to the GPU before `Game::on_enter`.
    pub fn with_image(mut self, name: &str, img: RgbaImage) -> Self {
        self.images.push((name.to_string(), img));
        self
    }

    /// Sound decoded at startup. An unreadable file aborts `run`.
    pub fn with_sound(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.sounds.push((name.to_string(), path.into()));
        self
    }

    /// Open the window and run `game` until the window closes. Startup failures are returned once the event loop
    /// has shut down.
    pub fn run(self, game: impl Game + 'static) -> Result<(), EngineError> {
        let event_loop = EventLoop::new()?;
        let fixed_dt = 1.0 / UPDATES_PER_SECOND as f32;
        let mut app = App {
            config: self,
            game: Box::new(game),
            engine: None,
            error: None,
            last_instant: None,
            accumulator: 0.0,
            fixed_dt,
        };
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct App {
    config: EngineBuilder,
    game: Box<dyn Game>,
    engine: Option<Engine>,
    error: Option<EngineError>,
    last_instant: Option<Instant>,
    accumulator: f32,
    fixed_dt: f32,
}

impl App {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Engine, EngineError> {
        let mut audio = AudioContext::new();
        for (name, path) in &self.config.sounds {
            audio.load_sound(name, path)?;
        }

        let requested = &self.config.window;
        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title(WINDOW_TITLE)
                    .with_inner_size(PhysicalSize::new(
                        requested.physical_width,
                        requested.physical_height,
                    ))
                    .with_resizable(true),
            )?,
        );
        if requested.mode != WindowMode::Windowed {
            apply_window_settings(&window, requested);
        }

        let size = window.inner_size();
        let window_config = requested.clone().with_physical(size.width, size.height);

        let font_atlas = image::load_from_memory(crate::DEFAULT_FONT_ATLAS)?.to_rgba8();
        let font = Font::from_atlas_json(crate::DEFAULT_FONT_GLYPHS, font_atlas.width(), font_atlas.height())?;

        let mut renderer = pollster::block_on(Renderer::new(
            window,
            &font_atlas,
            window_config.logical_width,
            window_config.logical_height,
            letterbox_viewport(&window_config),
        ))?;

        for (name, img) in self.config.images.drain(..) {
            renderer.upload_image(&name, &img);
        }

        info!(
            width = size.width,
            height = size.height,
            mode = ?window_config.mode,
            audio = audio.is_available(),
            "engine started"
        );

        Ok(Engine {
            renderer,
            font,
            draw: DrawList::new(),
            input: InputState::new(),
            audio,
            window_config,
            debug: DebugState { enabled: self.config.debug_enabled, active: self.config.debug_enabled },
            dt: 0.0,
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(mut engine) => {
                self.game.on_enter(&mut engine);
                self.engine = Some(engine);
            }
            Err(e) => {
                error!(error = %e, "engine startup failed");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(engine) = self.engine.as_ref() {
            engine.renderer.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(engine) = self.engine.as_mut() else { return };

        match event {
            WindowEvent::CloseRequested => {
                info!("window closed");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => engine.handle_resize(size),

            WindowEvent::CursorMoved { position, .. } => {
                engine.input.mouse_pos = Vec2::new(position.x as f32, position.y as f32);
            }

            WindowEvent::MouseInput { button, state, .. } => match state {
                ElementState::Pressed => engine.input.press_mouse(button),
                ElementState::Released => engine.input.release_mouse(button),
            },

            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(code), state, .. },
                ..
            } => match state {
                ElementState::Pressed => {
                    if code == KeyCode::F1 && engine.debug.enabled && !engine.input.is_key_held(code) {
                        engine.debug.active = !engine.debug.active;
                    }
                    engine.input.press_key(code);
                }
                ElementState::Released => engine.input.release_key(code),
            },

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed = match self.last_instant {
                    Some(prev) => now.duration_since(prev).as_secs_f32().min(0.25),
                    None => self.fixed_dt,
                };
                self.last_instant = Some(now);
                self.accumulator += elapsed;

                while self.accumulator >= self.fixed_dt {
                    engine.dt = self.fixed_dt;
                    self.game.update(engine);
                    // Edges belong to the first tick that saw them.
                    engine.input.clear_frame_state();
                    self.accumulator -= self.fixed_dt;
                }

                engine.draw.clear();
                self.game.render(engine);

                match engine.renderer.render(&engine.draw) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = engine.renderer.window.inner_size();
                        engine.handle_resize(size);
                    }
                    Err(e) => warn!(error = %e, "frame skipped"),
                }
            }

            _ => {}
        }
    }
}
