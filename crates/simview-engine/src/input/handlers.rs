use crate::coords::PixelPos;

use super::types::{Key, KeyState};

/// Key callback: `(key, pressed/released, held seconds, scene)`.
pub type KeyHandler<S> = Box<dyn FnMut(Key, KeyState, f64, &mut S)>;

/// Mouse callback: `(press position, current position, scene)`.
pub type MouseHandler<S> = Box<dyn FnMut(PixelPos, PixelPos, &mut S)>;

/// Scroll callback: `(horizontal delta, vertical delta, scene)`.
pub type ScrollHandler<S> = Box<dyn FnMut(f64, f64, &mut S)>;

/// Single-slot callback registry.
///
/// Each slot holds at most one handler; registering again replaces the previous
/// one. Empty slots make the matching events no-ops.
pub struct Handlers<S> {
    pub(crate) key: Option<KeyHandler<S>>,
    pub(crate) click: Option<MouseHandler<S>>,
    pub(crate) drag: Option<MouseHandler<S>>,
    pub(crate) button_up: Option<MouseHandler<S>>,
    pub(crate) scroll: Option<ScrollHandler<S>>,
}

impl<S> Default for Handlers<S> {
    fn default() -> Self {
        Self {
            key: None,
            click: None,
            drag: None,
            button_up: None,
            scroll: None,
        }
    }
}

impl<S> Handlers<S> {
    pub fn set_key(&mut self, f: impl FnMut(Key, KeyState, f64, &mut S) + 'static) {
        self.key = Some(Box::new(f));
    }

    pub fn set_click(&mut self, f: impl FnMut(PixelPos, PixelPos, &mut S) + 'static) {
        self.click = Some(Box::new(f));
    }

    pub fn set_drag(&mut self, f: impl FnMut(PixelPos, PixelPos, &mut S) + 'static) {
        self.drag = Some(Box::new(f));
    }

    pub fn set_button_up(&mut self, f: impl FnMut(PixelPos, PixelPos, &mut S) + 'static) {
        self.button_up = Some(Box::new(f));
    }

    pub fn set_scroll(&mut self, f: impl FnMut(f64, f64, &mut S) + 'static) {
        self.scroll = Some(Box::new(f));
    }

    pub fn clear_key(&mut self) {
        self.key = None;
    }

    pub fn clear_click(&mut self) {
        self.click = None;
    }

    pub fn clear_drag(&mut self) {
        self.drag = None;
    }

    pub fn clear_button_up(&mut self) {
        self.button_up = None;
    }

    pub fn clear_scroll(&mut self) {
        self.scroll = None;
    }
}
