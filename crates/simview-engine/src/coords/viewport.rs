use super::Vec2;

/// Drawable size of the window surface in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Pixel-space center of the surface (half of its dimensions).
    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(f64::from(self.width) * 0.5, f64::from(self.height) * 0.5)
    }
}
