//! GPU renderers for recorded frame content.

mod common;

pub mod polygon;
pub mod texture;

pub use polygon::PolygonRenderer;
pub use texture::{GpuTexture, TextureRenderer};
