//! Paint model: scene colors, renderer colors and CPU image surfaces.
//!
//! Geometry types remain in `coords`.

mod color;
mod surface;

pub use color::{Color, RgbColor};
pub use surface::{Surface, SurfaceError};
