//! Viewer window.
//!
//! Owns the `winit` window together with the GPU surface bound to it, and
//! collects translated input until the display drains it.

mod config;
mod host;

pub use config::DisplayConfig;
pub(crate) use host::WindowHost;
