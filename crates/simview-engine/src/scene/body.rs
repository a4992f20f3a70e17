use std::borrow::Cow;

use crate::coords::{PixelRect, Vec2};
use crate::paint::{RgbColor, Surface};

/// Read-only view of one simulated body.
///
/// Implemented by the host's body type. The display never mutates bodies.
pub trait Body {
    /// Outline vertices in simulation space, in order. At least three.
    fn shape(&self) -> Cow<'_, [Vec2]>;

    /// Fill color, each channel in `[0, 1]`.
    fn color(&self) -> RgbColor;

    /// Hidden bodies are skipped when rendering.
    fn is_hidden(&self) -> bool {
        false
    }

    /// Optional image composited over the body after all polygons are drawn.
    fn texture(&self) -> Option<&Surface> {
        None
    }

    /// Destination of the texture in window pixels.
    ///
    /// `None` stretches the texture over the polygon's pixel bounding box.
    fn texture_rect(&self) -> Option<PixelRect> {
        None
    }
}

/// Read-only view of the simulated scene.
pub trait Scene {
    type Body: Body;

    fn body_count(&self) -> usize;

    /// Returns body `index`; `index < body_count()`.
    fn body(&self, index: usize) -> &Self::Body;
}

impl<B: Body> Scene for Vec<B> {
    type Body = B;

    fn body_count(&self) -> usize {
        self.len()
    }

    fn body(&self, index: usize) -> &B {
        &self[index]
    }
}
