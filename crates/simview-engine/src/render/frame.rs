use crate::coords::{PixelPos, PixelRect, SceneViewport, Vec2};
use crate::paint::{Color, RgbColor, Surface};
use crate::scene::{Body, Scene};

use super::batch::PolygonBatch;
use super::overlay::FrameOverlays;

/// Backend-independent record of one frame.
///
/// Collects transformed polygon geometry and overlay blits between `clear`
/// and presentation. `T` is whatever handle the backend uses for an uploaded
/// image.
#[derive(Debug)]
pub struct FrameRecorder<T> {
    viewport: SceneViewport,
    polygons: PolygonBatch,
    overlays: FrameOverlays<T>,
    scratch: Vec<PixelPos>,
}

impl<T> FrameRecorder<T> {
    pub fn new(viewport: SceneViewport) -> Self {
        Self {
            viewport,
            polygons: PolygonBatch::new(),
            overlays: FrameOverlays::default(),
            scratch: Vec::new(),
        }
    }

    pub fn viewport(&self) -> &SceneViewport {
        &self.viewport
    }

    /// Discards polygons drawn so far; the frame background is always white.
    pub fn clear(&mut self) {
        self.polygons.clear();
    }

    /// Background the frame is cleared to before anything is drawn.
    pub fn clear_color(&self) -> Color {
        Color::WHITE
    }

    /// Transforms `points` into window pixels and records the filled polygon.
    ///
    /// Returns the pixel bounding box of the transformed outline.
    ///
    /// # Panics
    /// Panics on fewer than three points or a channel outside `[0, 1]`.
    pub fn draw_polygon(&mut self, points: &[Vec2], color: RgbColor, window_center: Vec2) -> PixelRect {
        assert!(
            points.len() >= 3,
            "a polygon needs at least 3 points, got {}",
            points.len()
        );
        color.assert_normalized();

        self.scratch.clear();
        self.scratch.extend(
            points
                .iter()
                .map(|&p| self.viewport.to_window_position(p, window_center)),
        );

        let tris = self
            .polygons
            .push_polygon(&self.scratch, Color::from(color));
        if tris == 0 {
            log::trace!("polygon with {} points has no area on screen", points.len());
        }

        PixelRect::bounding(&self.scratch).unwrap_or_default()
    }

    /// Records every visible body of `scene` in index order.
    ///
    /// Textured bodies hand their surface to `upload`; the resulting handle is
    /// queued as an image over the body's texture rect, or over its pixel
    /// bounding box when it has none. Surfaces `upload` rejects are skipped.
    pub fn record_scene<S, F>(&mut self, scene: &S, window_center: Vec2, mut upload: F)
    where
        S: Scene,
        F: FnMut(&Surface) -> Option<T>,
    {
        for i in 0..scene.body_count() {
            let body = scene.body(i);
            if body.is_hidden() {
                continue;
            }
            let shape = body.shape();
            let bbox = self.draw_polygon(&shape, body.color(), window_center);

            let Some(surface) = body.texture() else { continue; };
            if let Some(resource) = upload(surface) {
                self.enqueue_image(resource, body.texture_rect().unwrap_or(bbox));
            }
        }
    }

    /// Records the one-pixel black outline around the configured bounds.
    pub fn draw_boundary(&mut self, window_center: Vec2) {
        let rect = self.viewport.boundary_rect(window_center);
        self.polygons.push_rect_outline(rect, Color::BLACK);
    }

    pub fn enqueue_text(&mut self, resource: T, dest: PixelRect) {
        self.overlays.text.push(resource, dest);
    }

    pub fn enqueue_image(&mut self, resource: T, dest: PixelRect) {
        self.overlays.images.push(resource, dest);
    }

    pub fn polygons(&self) -> &PolygonBatch {
        &self.polygons
    }

    pub fn overlays(&self) -> &FrameOverlays<T> {
        &self.overlays
    }

    /// Empties geometry and both overlay queues for the next frame.
    pub fn reset(&mut self) {
        self.polygons.clear();
        self.overlays.clear();
    }
}
