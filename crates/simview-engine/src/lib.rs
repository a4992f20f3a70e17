//! simview engine crate.
//!
//! Window, input and GPU drawing for a 2D physics viewer. A host owns a
//! [`Display`], registers input callbacks that mutate its scene, and asks the
//! display to render the scene's bodies every tick.

pub mod coords;
pub mod device;
pub mod display;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod text;
pub mod time;
pub mod window;

pub use coords::{PixelPos, PixelRect, Vec2};
pub use display::Display;
pub use input::{Key, KeyState};
pub use paint::{RgbColor, Surface};
pub use scene::{Body, Scene};
pub use window::DisplayConfig;
