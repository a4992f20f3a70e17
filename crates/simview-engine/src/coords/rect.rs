use super::PixelPos;

/// Axis-aligned rectangle in pixel space (top-left origin).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Builds a rectangle from floating-point components, truncating toward zero.
    #[inline]
    pub fn from_f64(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(x as i32, y as i32, w as i32, h as i32)
    }

    /// Smallest rectangle containing every point, or `None` for an empty slice.
    pub fn bounding(points: &[PixelPos]) -> Option<Self> {
        let first = points.first()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Some(Self::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0)))
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut r = self;
        if r.w < 0 {
            r.x = r.x.saturating_add(r.w);
            r.w = r.w.saturating_neg();
        }
        if r.h < 0 {
            r.y = r.y.saturating_add(r.h);
            r.h = r.h.saturating_neg();
        }
        r
    }
}
