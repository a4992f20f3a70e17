/// Integer position in pixel space (origin top-left, +Y down).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct PixelPos {
    pub x: i32,
    pub y: i32,
}

impl PixelPos {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_f32(self) -> [f32; 2] {
        [self.x as f32, self.y as f32]
    }
}
