//! Coordinate and geometry types.
//!
//! Two spaces are in play:
//! - simulation space: `Vec2` (f64), +Y up, owned by the host scene
//! - pixel space: `PixelPos` / `PixelRect` (i32), origin top-left, +Y down
//!
//! `SceneViewport` converts between them.

mod pixel;
mod rect;
mod scene_viewport;
mod vec2;
mod viewport;

pub use pixel::PixelPos;
pub use rect::PixelRect;
pub use scene_viewport::{SceneViewport, PIXEL_LIMIT};
pub use vec2::Vec2;
pub use viewport::Viewport;
