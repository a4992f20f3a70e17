//! Scene interface consumed by the display.
//!
//! The simulation owns its bodies; the display only reads shapes, colors,
//! visibility and textures through these traits, once per rendered frame.

mod body;

pub use body::{Body, Scene};
