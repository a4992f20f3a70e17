use std::fmt;

use crate::coords::PixelPos;

/// Platform-agnostic key identity as reported by the window layer.
///
/// Character keys carry the unshifted character of a US layout (e.g. `'a'`,
/// `'1'`, `'/'`). Keys with no character form are `Other` with the platform
/// code, and are dropped before reaching handlers unless listed in [`Key`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum KeyCode {
    Char(char),
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Other(u32),
}

/// Key delivered to the key handler.
///
/// Only printable 7-bit ASCII characters, the four arrows and the named keys
/// `Space` and `N` are recognized.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Char(char),
    LeftArrow,
    UpArrow,
    RightArrow,
    DownArrow,
    Space,
    N,
}

impl Key {
    /// Maps a platform key code, returning `None` for unrecognized keys.
    pub fn from_code(code: KeyCode) -> Option<Key> {
        match code {
            KeyCode::ArrowLeft => Some(Key::LeftArrow),
            KeyCode::ArrowUp => Some(Key::UpArrow),
            KeyCode::ArrowRight => Some(Key::RightArrow),
            KeyCode::ArrowDown => Some(Key::DownArrow),
            KeyCode::Char(' ') => Some(Key::Space),
            KeyCode::Char('n') => Some(Key::N),
            KeyCode::Char(c) if c.is_ascii_graphic() => Some(Key::Char(c)),
            KeyCode::Char(_) | KeyCode::Other(_) => None,
        }
    }

    /// Character form of the key, if it has one.
    pub fn as_char(self) -> Option<char> {
        match self {
            Key::Char(c) => Some(c),
            Key::Space => Some(' '),
            Key::N => Some('n'),
            Key::LeftArrow | Key::UpArrow | Key::RightArrow | Key::DownArrow => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse button identifier.
///
/// Carried on button events for diagnostics; dispatch treats all buttons alike.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Raw input event queued by the window layer and consumed by the dispatcher.
///
/// Positions are window pixels at the time of the event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The user asked to close the window.
    Quit,

    Key {
        code: KeyCode,
        state: KeyState,
        /// True when the platform generated the event by auto-repeat.
        repeat: bool,
        /// Milliseconds since the display was created.
        timestamp_ms: u32,
    },

    MouseButton {
        button: MouseButton,
        state: MouseButtonState,
        pos: PixelPos,
    },

    MouseMotion {
        pos: PixelPos,
    },

    /// Scroll amount in lines; +Y is away from the user.
    Scroll {
        dx: f64,
        dy: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_named_keys_are_recognized() {
        assert_eq!(Key::from_code(KeyCode::ArrowLeft), Some(Key::LeftArrow));
        assert_eq!(Key::from_code(KeyCode::ArrowUp), Some(Key::UpArrow));
        assert_eq!(Key::from_code(KeyCode::ArrowRight), Some(Key::RightArrow));
        assert_eq!(Key::from_code(KeyCode::ArrowDown), Some(Key::DownArrow));
        assert_eq!(Key::from_code(KeyCode::Char(' ')), Some(Key::Space));
        assert_eq!(Key::from_code(KeyCode::Char('n')), Some(Key::N));
    }

    #[test]
    fn printable_ascii_passes_through() {
        for c in ['a', 'z', '0', '/', '~', '!'] {
            assert_eq!(Key::from_code(KeyCode::Char(c)), Some(Key::Char(c)));
        }
    }

    #[test]
    fn unrecognized_keys_are_dropped() {
        assert_eq!(Key::from_code(KeyCode::Char('\r')), None);
        assert_eq!(Key::from_code(KeyCode::Char('\u{1b}')), None);
        assert_eq!(Key::from_code(KeyCode::Char('é')), None);
        assert_eq!(Key::from_code(KeyCode::Other(42)), None);
    }

    #[test]
    fn char_form() {
        assert_eq!(Key::Space.as_char(), Some(' '));
        assert_eq!(Key::Char('q').as_char(), Some('q'));
        assert_eq!(Key::UpArrow.as_char(), None);
    }
}
