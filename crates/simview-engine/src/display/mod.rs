//! The viewer facade.
//!
//! [`Display`] owns the window, GPU renderers, input dispatcher and frame
//! recorder. A host loop calls [`poll_events`](Display::poll_events), steps
//! its simulation, then [`render_scene`](Display::render_scene).

use std::time::Duration;

use anyhow::{bail, Context, Result};
use winit::event_loop::EventLoop;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};

use crate::coords::{PixelPos, PixelRect, SceneViewport, Vec2, Viewport};
use crate::device::SurfaceErrorAction;
use crate::input::{ClickState, EventDispatcher, InputEvent, Key, KeyState};
use crate::paint::{RgbColor, Surface};
use crate::render::shapes::{GpuTexture, PolygonRenderer, TextureRenderer};
use crate::render::FrameRecorder;
use crate::scene::Scene;
use crate::time::TickClock;
use crate::window::{DisplayConfig, WindowHost};

/// Upper bound on event-loop pumps while waiting for the window to appear.
const STARTUP_PUMPS: usize = 100;

/// A window showing a 2D scene, with input routed to host callbacks.
///
/// `S` is the host's scene type; every callback receives `&mut S`.
pub struct Display<S> {
    // Declared before the event loop so the window and surface drop first.
    host: WindowHost,
    event_loop: EventLoop<()>,

    frame: FrameRecorder<GpuTexture>,
    polygons: PolygonRenderer,
    textures: TextureRenderer,

    dispatcher: EventDispatcher<S>,
    events: Vec<InputEvent>,
    clock: TickClock,
}

impl<S> Display<S> {
    /// Opens the default window showing the simulation rectangle `min..max`.
    ///
    /// # Panics
    /// Panics unless `min.x < max.x` and `min.y < max.y`.
    pub fn new(min: Vec2, max: Vec2) -> Result<Self> {
        Self::with_config(DisplayConfig::default(), min, max)
    }

    pub fn with_config(config: DisplayConfig, min: Vec2, max: Vec2) -> Result<Self> {
        let viewport = SceneViewport::from_bounds(min, max);

        let mut event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut host = WindowHost::new(config);

        for _ in 0..STARTUP_PUMPS {
            if host.is_ready() {
                break;
            }
            if let Some(err) = host.take_init_error() {
                return Err(err);
            }
            if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(Duration::from_millis(10)), &mut host) {
                if let Some(err) = host.take_init_error() {
                    return Err(err);
                }
                bail!("event loop exited with code {code} before the window opened");
            }
        }
        if let Some(err) = host.take_init_error() {
            return Err(err);
        }
        if !host.is_ready() {
            bail!("window was not created after {STARTUP_PUMPS} event loop iterations");
        }

        log::info!(
            "display ready, showing ({}, {})..({}, {})",
            min.x, min.y, max.x, max.y
        );

        Ok(Self {
            host,
            event_loop,
            frame: FrameRecorder::new(viewport),
            polygons: PolygonRenderer::new(),
            textures: TextureRenderer::new(),
            dispatcher: EventDispatcher::new(),
            events: Vec::new(),
            clock: TickClock::new(),
        })
    }

    // ── events ─────────────────────────────────────────────────────────────

    /// Drains pending window events and dispatches them to the handlers.
    ///
    /// Returns `true` if the user asked to quit. Events after the quit request
    /// are still dispatched. Never blocks.
    pub fn poll_events(&mut self, scene: &mut S) -> bool {
        let status = self.event_loop.pump_app_events(Some(Duration::ZERO), &mut self.host);
        let mut quit = matches!(status, PumpStatus::Exit(_));

        self.host.take_events(&mut self.events);
        quit |= self.dispatcher.dispatch_all(self.events.drain(..), scene);
        quit
    }

    // ── handler registration ───────────────────────────────────────────────

    /// Key handler: `(key, pressed/released, seconds held, scene)`.
    pub fn on_key(&mut self, f: impl FnMut(Key, KeyState, f64, &mut S) + 'static) {
        self.dispatcher.handlers_mut().set_key(f);
    }

    /// Called on button release with `(press position, release position, scene)`.
    pub fn on_click(&mut self, f: impl FnMut(PixelPos, PixelPos, &mut S) + 'static) {
        self.dispatcher.handlers_mut().set_click(f);
    }

    /// Called on every motion while a button is held with `(press, current, scene)`.
    pub fn on_drag(&mut self, f: impl FnMut(PixelPos, PixelPos, &mut S) + 'static) {
        self.dispatcher.handlers_mut().set_drag(f);
    }

    /// Called after the click handler on release, with the same positions.
    pub fn on_button_up(&mut self, f: impl FnMut(PixelPos, PixelPos, &mut S) + 'static) {
        self.dispatcher.handlers_mut().set_button_up(f);
    }

    pub fn on_scroll(&mut self, f: impl FnMut(f64, f64, &mut S) + 'static) {
        self.dispatcher.handlers_mut().set_scroll(f);
    }

    pub fn clear_on_key(&mut self) {
        self.dispatcher.handlers_mut().clear_key();
    }

    pub fn clear_on_click(&mut self) {
        self.dispatcher.handlers_mut().clear_click();
    }

    pub fn clear_on_drag(&mut self) {
        self.dispatcher.handlers_mut().clear_drag();
    }

    pub fn clear_on_button_up(&mut self) {
        self.dispatcher.handlers_mut().clear_button_up();
    }

    pub fn clear_on_scroll(&mut self) {
        self.dispatcher.handlers_mut().clear_scroll();
    }

    pub fn click_state(&self) -> ClickState {
        self.dispatcher.click_state()
    }

    // ── geometry ───────────────────────────────────────────────────────────

    /// Drawable size of the window in physical pixels.
    pub fn viewport(&self) -> Viewport {
        self.host.with_gpu(|gpu| gpu.viewport()).unwrap_or_default()
    }

    /// Half the current drawable size.
    pub fn window_center(&self) -> Vec2 {
        self.viewport().center()
    }

    pub fn scene_viewport(&self) -> &SceneViewport {
        self.frame.viewport()
    }

    /// Pixel position of a simulation point in the current window.
    pub fn to_window_position(&self, scene_pos: Vec2) -> PixelPos {
        self.frame.viewport().to_window_position(scene_pos, self.window_center())
    }

    /// Simulation point under a window pixel.
    pub fn to_scene_position(&self, pixel: PixelPos) -> Vec2 {
        self.frame.viewport().to_scene_position(pixel, self.window_center())
    }

    // ── drawing ────────────────────────────────────────────────────────────

    /// Starts a new frame on an opaque white background.
    pub fn clear(&mut self) {
        self.frame.clear();
    }

    /// Fills the polygon with `color` (channels in `[0, 1]`).
    ///
    /// A `texture` is queued as an image overlay over `dest`, or over the
    /// polygon's pixel bounding box when `dest` is `None`; overlays are drawn
    /// after all polygons.
    ///
    /// # Panics
    /// Panics on fewer than three points or a channel outside `[0, 1]`.
    pub fn draw_polygon(&mut self, points: &[Vec2], color: RgbColor, texture: Option<&Surface>, dest: Option<PixelRect>) {
        let window_center = self.window_center();
        let bbox = self.frame.draw_polygon(points, color, window_center);

        let Some(surface) = texture else { return; };
        let textures = &mut self.textures;
        if let Some(Some(uploaded)) = self.host.with_gpu(|gpu| textures.upload(&gpu.render_ctx(), surface)) {
            self.frame.enqueue_image(uploaded, dest.unwrap_or(bbox));
        }
    }

    /// Queues a pre-rendered text surface over the given pixel rectangle.
    ///
    /// Components are truncated to whole pixels. The surface is consumed.
    pub fn draw_text(&mut self, surface: Surface, x: f64, y: f64, w: f64, h: f64) {
        let dest = PixelRect::from_f64(x, y, w, h);
        let textures = &mut self.textures;
        if let Some(Some(uploaded)) = self.host.with_gpu(|gpu| textures.upload(&gpu.render_ctx(), &surface)) {
            self.frame.enqueue_text(uploaded, dest);
        }
    }

    /// Draws the boundary, composites text then image overlays, and presents.
    ///
    /// Both overlay queues are empty afterwards, whatever the outcome. Returns
    /// an error only when the GPU surface is unrecoverable.
    pub fn show(&mut self) -> Result<()> {
        let window_center = self.window_center();
        self.frame.draw_boundary(window_center);
        let result = self.present();
        self.frame.reset();
        result
    }

    fn present(&mut self) -> Result<()> {
        let (frame, polygons, textures) = (&self.frame, &mut self.polygons, &mut self.textures);

        let outcome = self.host.with_gpu_mut(|gpu| -> Result<()> {
            if !gpu.viewport().is_valid() {
                log::trace!("window minimized, frame skipped");
                return Ok(());
            }

            let mut gpu_frame = match gpu.begin_frame() {
                Ok(f) => f,
                Err(err) => {
                    log::warn!("failed to acquire frame: {err}");
                    match gpu.handle_surface_error(err) {
                        SurfaceErrorAction::Fatal => bail!("GPU surface is out of memory"),
                        action => {
                            log::debug!("frame skipped ({action:?})");
                            return Ok(());
                        }
                    }
                }
            };

            {
                let ctx = gpu.render_ctx();
                let mut target = gpu_frame.target();

                let background = if ctx.linear_output() {
                    frame.clear_color().linearized()
                } else {
                    frame.clear_color()
                };
                target.clear(background.to_array().map(f64::from));

                polygons.render(&ctx, &mut target, frame.polygons());
                textures.render(
                    &ctx,
                    &mut target,
                    &[
                        ("simview text overlay pass", frame.overlays().text.as_slice()),
                        ("simview image overlay pass", frame.overlays().images.as_slice()),
                    ],
                );
            }

            gpu.submit(gpu_frame);
            Ok(())
        });

        outcome.unwrap_or(Ok(()))
    }

    // ── timing ─────────────────────────────────────────────────────────────

    /// Seconds since the previous call; `0.0` on the first.
    pub fn elapsed_since_last_tick(&mut self) -> f64 {
        self.clock.elapsed_since_last_tick()
    }
}

impl<S: Scene> Display<S> {
    /// Clears, draws every visible body in index order, and shows the frame.
    pub fn render_scene(&mut self, scene: &S) -> Result<()> {
        self.clear();
        let window_center = self.window_center();
        let (host, textures) = (&self.host, &mut self.textures);
        self.frame.record_scene(scene, window_center, |surface| {
            host.with_gpu(|gpu| textures.upload(&gpu.render_ctx(), surface)).flatten()
        });
        self.show()
    }
}
