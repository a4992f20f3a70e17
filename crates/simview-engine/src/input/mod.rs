//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The window layer translates platform events into `InputEvent`s, and the
//! `EventDispatcher` turns those into calls on the registered handlers.

mod dispatch;
mod handlers;
pub(crate) mod platform;
mod types;

pub use dispatch::{ClickState, EventDispatcher};
pub use handlers::{Handlers, KeyHandler, MouseHandler, ScrollHandler};
pub use types::{InputEvent, Key, KeyCode, KeyState, MouseButton, MouseButtonState};
