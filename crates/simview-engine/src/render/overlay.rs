use crate::coords::PixelRect;

/// A pending image blit: `resource` stretched over `dest`.
#[derive(Debug)]
pub struct OverlayEntry<T> {
    pub resource: T,
    pub dest: PixelRect,
}

/// Ordered list of blits drawn after the polygons of the current frame.
///
/// Entries own their resource until the frame is presented; `clear` releases
/// them all.
#[derive(Debug)]
pub struct OverlayQueue<T> {
    entries: Vec<OverlayEntry<T>>,
}

impl<T> Default for OverlayQueue<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> OverlayQueue<T> {
    pub fn push(&mut self, resource: T, dest: PixelRect) {
        self.entries.push(OverlayEntry { resource, dest });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, OverlayEntry<T>> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[OverlayEntry<T>] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The two per-frame overlay queues. Text is composited before images.
#[derive(Debug)]
pub struct FrameOverlays<T> {
    pub text: OverlayQueue<T>,
    pub images: OverlayQueue<T>,
}

impl<T> Default for FrameOverlays<T> {
    fn default() -> Self {
        Self {
            text: OverlayQueue::default(),
            images: OverlayQueue::default(),
        }
    }
}

impl<T> FrameOverlays<T> {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.images.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut q = OverlayQueue::default();
        q.push("a", PixelRect::new(0, 0, 1, 1));
        q.push("b", PixelRect::new(1, 1, 1, 1));
        let names: Vec<_> = q.iter().map(|e| e.resource).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn clear_releases_resources() {
        let res = Rc::new(());
        let mut o = FrameOverlays::default();
        o.text.push(Rc::clone(&res), PixelRect::default());
        o.images.push(Rc::clone(&res), PixelRect::default());
        assert_eq!(Rc::strong_count(&res), 3);

        o.clear();
        assert!(o.is_empty());
        assert_eq!(Rc::strong_count(&res), 1);

        o.clear();
        assert!(o.is_empty());
    }
}
