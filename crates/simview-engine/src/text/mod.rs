//! Text pre-rendering.
//!
//! Fonts are loaded through `fontdue` and whole strings are rasterized into
//! [`Surface`](crate::paint::Surface)s that the display composites as overlays.

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem};
