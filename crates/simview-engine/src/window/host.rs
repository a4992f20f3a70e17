use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::device::Gpu;
use crate::input::platform::WinitTranslator;
use crate::input::InputEvent;

use super::DisplayConfig;

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// `winit` application state behind a [`Display`](crate::display::Display).
///
/// Creates the window on the first `resumed`, keeps the surface sized to it,
/// and buffers translated input events until [`take_events`](Self::take_events).
pub(crate) struct WindowHost {
    config: DisplayConfig,
    entry: Option<WindowEntry>,
    init_error: Option<anyhow::Error>,
    translator: WinitTranslator,
    pending: Vec<InputEvent>,
}

impl WindowHost {
    pub(crate) fn new(config: DisplayConfig) -> Self {
        Self {
            config,
            entry: None,
            init_error: None,
            translator: WinitTranslator::new(),
            pending: Vec::new(),
        }
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.entry.is_some()
    }

    /// Error from window or GPU creation, if it failed.
    pub(crate) fn take_init_error(&mut self) -> Option<anyhow::Error> {
        self.init_error.take()
    }

    /// Moves buffered events into `out`, oldest first.
    pub(crate) fn take_events(&mut self, out: &mut Vec<InputEvent>) {
        out.append(&mut self.pending);
    }

    pub(crate) fn with_gpu<R>(&self, f: impl FnOnce(&Gpu<'_>) -> R) -> Option<R> {
        self.entry.as_ref().map(|e| e.with_gpu(|gpu| f(gpu)))
    }

    pub(crate) fn with_gpu_mut<R>(&mut self, f: impl FnOnce(&mut Gpu<'_>) -> R) -> Option<R> {
        self.entry.as_mut().map(|e| e.with_gpu_mut(|gpu| f(gpu)))
    }

    fn create_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(f64::from(self.config.width), f64::from(self.config.height)))
            .with_resizable(self.config.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let size = window.inner_size();
        log::info!("window created: {}x{} physical px", size.width, size.height);

        let gpu_init = self.config.gpu.clone();
        WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")
    }

    fn resize_to_window(&mut self) {
        if let Some(entry) = self.entry.as_mut() {
            let size = entry.with_window(|w| w.inner_size());
            entry.with_gpu_mut(|gpu| gpu.resize(size));
        }
    }
}

impl ApplicationHandler for WindowHost {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.init_error.is_some() {
            return;
        }

        match self.create_entry(event_loop) {
            Ok(entry) => self.entry = Some(entry),
            Err(e) => {
                log::error!("failed to open viewer window: {e:#}");
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                }
            }
            WindowEvent::ScaleFactorChanged { .. } => self.resize_to_window(),
            WindowEvent::CloseRequested => log::debug!("close requested"),
            _ => {}
        }

        if let Some(ev) = self.translator.translate(&event) {
            self.pending.push(ev);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::debug!("event loop exiting");
    }
}
