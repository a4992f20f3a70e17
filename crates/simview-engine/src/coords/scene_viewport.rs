use super::{PixelPos, PixelRect, Vec2};

/// Transformed pixels are clamped to `±PIXEL_LIMIT` so rectangle extents
/// built from them stay well inside `i32`.
pub const PIXEL_LIMIT: i32 = 1 << 24;

/// Mapping from simulation space onto the window.
///
/// The configured bounds are centered in the window and scaled uniformly so the
/// whole region stays visible whatever the window aspect ratio. The y axis is
/// flipped: simulation +Y is up, pixel +Y is down.
///
/// Window centers are passed in rather than stored because the window may be
/// resized between any two draw calls.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneViewport {
    /// Simulation point mapped to the window center.
    center: Vec2,
    /// Offset from `center` to the top-right corner of the bounds.
    max_diff: Vec2,
}

impl SceneViewport {
    /// Creates a viewport showing the rectangle spanned by `min` and `max`.
    ///
    /// # Panics
    /// Panics unless `min.x < max.x` and `min.y < max.y`.
    pub fn from_bounds(min: Vec2, max: Vec2) -> Self {
        assert!(
            min.x < max.x,
            "scene bounds: min.x ({}) must be less than max.x ({})",
            min.x, max.x
        );
        assert!(
            min.y < max.y,
            "scene bounds: min.y ({}) must be less than max.y ({})",
            min.y, max.y
        );

        let center = (min + max) * 0.5;
        Self { center, max_diff: max - center }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn max_diff(&self) -> Vec2 {
        self.max_diff
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.max_diff
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.max_diff
    }

    /// Pixels per simulation unit for a window whose center is `window_center`.
    #[inline]
    pub fn scene_scale(&self, window_center: Vec2) -> f64 {
        let x_scale = window_center.x / self.max_diff.x;
        let y_scale = window_center.y / self.max_diff.y;
        x_scale.min(y_scale)
    }

    /// Maps a simulation point to the nearest pixel.
    ///
    /// Points far outside the window are clamped to `±PIXEL_LIMIT`.
    pub fn to_window_position(&self, scene_pos: Vec2, window_center: Vec2) -> PixelPos {
        let offset = (scene_pos - self.center) * self.scene_scale(window_center);
        PixelPos::new(
            clamp_pixel(window_center.x + offset.x),
            clamp_pixel(window_center.y - offset.y),
        )
    }

    /// Maps a pixel back into simulation space.
    pub fn to_scene_position(&self, pixel: PixelPos, window_center: Vec2) -> Vec2 {
        let scale = self.scene_scale(window_center);
        Vec2::new(
            self.center.x + (f64::from(pixel.x) - window_center.x) / scale,
            self.center.y - (f64::from(pixel.y) - window_center.y) / scale,
        )
    }

    /// Pixel rectangle covered by the configured bounds.
    pub fn boundary_rect(&self, window_center: Vec2) -> PixelRect {
        let max_px = self.to_window_position(self.max(), window_center);
        let min_px = self.to_window_position(self.min(), window_center);
        PixelRect::new(
            min_px.x,
            max_px.y,
            max_px.x - min_px.x,
            min_px.y - max_px.y,
        )
    }
}

fn clamp_pixel(v: f64) -> i32 {
    let limit = f64::from(PIXEL_LIMIT);
    v.round().clamp(-limit, limit) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;

    fn viewport() -> SceneViewport {
        SceneViewport::from_bounds(Vec2::new(0.0, 0.0), Vec2::new(100.0, 50.0))
    }

    #[test]
    fn center_and_extent_from_bounds() {
        let vp = SceneViewport::from_bounds(Vec2::new(-10.0, 20.0), Vec2::new(30.0, 40.0));
        assert_eq!(vp.center(), Vec2::new(10.0, 30.0));
        assert_eq!(vp.max_diff(), Vec2::new(20.0, 10.0));
        assert_eq!(vp.min(), Vec2::new(-10.0, 20.0));
        assert_eq!(vp.max(), Vec2::new(30.0, 40.0));
    }

    #[test]
    #[should_panic(expected = "min.x")]
    fn rejects_inverted_x_bounds() {
        SceneViewport::from_bounds(Vec2::new(5.0, 0.0), Vec2::new(5.0, 1.0));
    }

    #[test]
    #[should_panic(expected = "min.y")]
    fn rejects_inverted_y_bounds() {
        SceneViewport::from_bounds(Vec2::new(0.0, 3.0), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn scale_keeps_aspect_ratio() {
        let vp = viewport();
        // 1000x500 window: both axes give 10 px/unit.
        assert_eq!(vp.scene_scale(Viewport::new(1000, 500).center()), 10.0);
        // Wide window is limited by height.
        assert_eq!(vp.scene_scale(Viewport::new(2000, 500).center()), 10.0);
        // Tall window is limited by width.
        assert_eq!(vp.scene_scale(Viewport::new(500, 2000).center()), 5.0);
    }

    #[test]
    fn scale_does_not_grow_with_larger_extent() {
        let wc = Viewport::new(1000, 500).center();
        let mut last = f64::INFINITY;
        for half in [1.0, 2.0, 5.0, 25.0, 50.0, 400.0, 1e6] {
            let vp = SceneViewport::from_bounds(Vec2::new(-half, -half), Vec2::new(half, half));
            let s = vp.scene_scale(wc);
            assert!(s <= last, "scale increased from {last} to {s} at extent {half}");
            last = s;
        }
    }

    #[test]
    fn bounds_center_maps_to_window_center() {
        let vp = viewport();
        for (w, h) in [(1000, 500), (801, 333), (640, 480)] {
            let wc = Viewport::new(w, h).center();
            let px = vp.to_window_position(vp.center(), wc);
            assert!((f64::from(px.x) - wc.x).abs() <= 0.5);
            assert!((f64::from(px.y) - wc.y).abs() <= 0.5);
        }
    }

    #[test]
    fn y_axis_is_flipped() {
        let vp = viewport();
        let wc = Viewport::new(1000, 500).center();
        let up = vp.to_window_position(Vec2::new(50.0, 40.0), wc);
        let down = vp.to_window_position(Vec2::new(50.0, 10.0), wc);
        assert!(up.y < down.y);
        assert_eq!(up, PixelPos::new(500, 100));
        assert_eq!(down, PixelPos::new(500, 400));
    }

    #[test]
    fn interior_points_land_inside_window() {
        let vp = viewport();
        for (w, h) in [(1000, 500), (300, 900), (1920, 1080)] {
            let window = Viewport::new(w, h);
            let wc = window.center();
            for i in 1..20 {
                for j in 1..20 {
                    let p = Vec2::new(100.0 * f64::from(i) / 20.0, 50.0 * f64::from(j) / 20.0);
                    let px = vp.to_window_position(p, wc);
                    assert!(px.x > 0 && px.x < w as i32, "{p:?} -> {px:?} outside {w}x{h}");
                    assert!(px.y > 0 && px.y < h as i32, "{p:?} -> {px:?} outside {w}x{h}");
                }
            }
        }
    }

    #[test]
    fn rounds_to_nearest_pixel() {
        let vp = viewport();
        let wc = Viewport::new(1000, 500).center();
        // 0.26 units right of center = 2.6 px -> 503
        let px = vp.to_window_position(Vec2::new(50.26, 25.0), wc);
        assert_eq!(px, PixelPos::new(503, 250));
    }

    #[test]
    fn inverse_mapping_is_within_a_pixel() {
        let vp = viewport();
        let wc = Viewport::new(1000, 500).center();
        let scale = vp.scene_scale(wc);
        for p in [Vec2::new(3.3, 7.7), Vec2::new(99.0, 1.0), Vec2::new(50.0, 25.0)] {
            let back = vp.to_scene_position(vp.to_window_position(p, wc), wc);
            assert!((back - p).length() * scale <= 1.0, "{p:?} came back as {back:?}");
        }
    }

    #[test]
    fn far_away_points_are_clamped() {
        let vp = viewport();
        let wc = Viewport::new(1000, 500).center();
        let px = vp.to_window_position(Vec2::new(1e12, -1e12), wc);
        assert_eq!(px, PixelPos::new(PIXEL_LIMIT, PIXEL_LIMIT));
        let px = vp.to_window_position(Vec2::new(-1e12, 1e12), wc);
        assert_eq!(px, PixelPos::new(-PIXEL_LIMIT, -PIXEL_LIMIT));
    }

    #[test]
    fn boundary_rect_spans_bounds() {
        let vp = viewport();
        let wc = Viewport::new(1000, 500).center();
        assert_eq!(vp.boundary_rect(wc), PixelRect::new(0, 0, 1000, 500));

        // Wider window: bounds are letterboxed horizontally.
        let wc = Viewport::new(1200, 500).center();
        assert_eq!(vp.boundary_rect(wc), PixelRect::new(100, 0, 1000, 500));
    }
}
