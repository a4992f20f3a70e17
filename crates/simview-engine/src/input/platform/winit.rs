use std::time::Instant;

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

use crate::coords::PixelPos;
use crate::input::{InputEvent, KeyCode, KeyState, MouseButton, MouseButtonState};

/// Pixel-precise scroll deltas (touchpads) are reported in line units using
/// this many pixels per line.
const PIXELS_PER_LINE: f64 = 20.0;

/// Translates winit `WindowEvent`s into engine `InputEvent`s.
///
/// Tracks the cursor so button events can report where they happened, and
/// stamps key events with milliseconds since the translator was created.
#[derive(Debug)]
pub struct WinitTranslator {
    started: Instant,
    cursor: PixelPos,
}

impl Default for WinitTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl WinitTranslator {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            cursor: PixelPos::default(),
        }
    }

    /// Returns `None` for events not represented by the input subsystem.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CloseRequested => Some(InputEvent::Quit),

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = to_pixel(*position);
                Some(InputEvent::MouseMotion { pos: self.cursor })
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let state = match state {
                    ElementState::Pressed => MouseButtonState::Pressed,
                    ElementState::Released => MouseButtonState::Released,
                };
                Some(InputEvent::MouseButton {
                    button: map_mouse_button(*button),
                    state,
                    pos: self.cursor,
                })
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (f64::from(*x), f64::from(*y)),
                    MouseScrollDelta::PixelDelta(p) => (p.x / PIXELS_PER_LINE, p.y / PIXELS_PER_LINE),
                };
                Some(InputEvent::Scroll { dx, dy })
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let state = match event.state {
                    ElementState::Pressed => KeyState::Pressed,
                    ElementState::Released => KeyState::Released,
                };
                Some(InputEvent::Key {
                    code: map_key(event.physical_key),
                    state,
                    repeat: event.repeat,
                    timestamp_ms: self.timestamp_ms(),
                })
            }

            _ => None,
        }
    }

    fn timestamp_ms(&self) -> u32 {
        // Wraps after ~49 days, matching the dispatcher's wrapping subtraction.
        self.started.elapsed().as_millis() as u32
    }
}

fn to_pixel(pos: PhysicalPosition<f64>) -> PixelPos {
    PixelPos::new(pos.x as i32, pos.y as i32)
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

/// Maps a physical key to the character it produces on an unshifted US layout.
fn map_key(pk: PhysicalKey) -> KeyCode {
    let PhysicalKey::Code(code) = pk else {
        return KeyCode::Other(0);
    };

    let c = match code {
        WinitKeyCode::ArrowLeft => return KeyCode::ArrowLeft,
        WinitKeyCode::ArrowUp => return KeyCode::ArrowUp,
        WinitKeyCode::ArrowRight => return KeyCode::ArrowRight,
        WinitKeyCode::ArrowDown => return KeyCode::ArrowDown,

        WinitKeyCode::Space => ' ',
        WinitKeyCode::Enter | WinitKeyCode::NumpadEnter => '\r',
        WinitKeyCode::Tab => '\t',
        WinitKeyCode::Backspace => '\u{8}',
        WinitKeyCode::Escape => '\u{1b}',

        WinitKeyCode::KeyA => 'a',
        WinitKeyCode::KeyB => 'b',
        WinitKeyCode::KeyC => 'c',
        WinitKeyCode::KeyD => 'd',
        WinitKeyCode::KeyE => 'e',
        WinitKeyCode::KeyF => 'f',
        WinitKeyCode::KeyG => 'g',
        WinitKeyCode::KeyH => 'h',
        WinitKeyCode::KeyI => 'i',
        WinitKeyCode::KeyJ => 'j',
        WinitKeyCode::KeyK => 'k',
        WinitKeyCode::KeyL => 'l',
        WinitKeyCode::KeyM => 'm',
        WinitKeyCode::KeyN => 'n',
        WinitKeyCode::KeyO => 'o',
        WinitKeyCode::KeyP => 'p',
        WinitKeyCode::KeyQ => 'q',
        WinitKeyCode::KeyR => 'r',
        WinitKeyCode::KeyS => 's',
        WinitKeyCode::KeyT => 't',
        WinitKeyCode::KeyU => 'u',
        WinitKeyCode::KeyV => 'v',
        WinitKeyCode::KeyW => 'w',
        WinitKeyCode::KeyX => 'x',
        WinitKeyCode::KeyY => 'y',
        WinitKeyCode::KeyZ => 'z',

        WinitKeyCode::Digit0 | WinitKeyCode::Numpad0 => '0',
        WinitKeyCode::Digit1 | WinitKeyCode::Numpad1 => '1',
        WinitKeyCode::Digit2 | WinitKeyCode::Numpad2 => '2',
        WinitKeyCode::Digit3 | WinitKeyCode::Numpad3 => '3',
        WinitKeyCode::Digit4 | WinitKeyCode::Numpad4 => '4',
        WinitKeyCode::Digit5 | WinitKeyCode::Numpad5 => '5',
        WinitKeyCode::Digit6 | WinitKeyCode::Numpad6 => '6',
        WinitKeyCode::Digit7 | WinitKeyCode::Numpad7 => '7',
        WinitKeyCode::Digit8 | WinitKeyCode::Numpad8 => '8',
        WinitKeyCode::Digit9 | WinitKeyCode::Numpad9 => '9',

        WinitKeyCode::Minus | WinitKeyCode::NumpadSubtract => '-',
        WinitKeyCode::Equal => '=',
        WinitKeyCode::NumpadAdd => '+',
        WinitKeyCode::NumpadMultiply => '*',
        WinitKeyCode::NumpadDivide | WinitKeyCode::Slash => '/',
        WinitKeyCode::NumpadDecimal | WinitKeyCode::Period => '.',
        WinitKeyCode::BracketLeft => '[',
        WinitKeyCode::BracketRight => ']',
        WinitKeyCode::Backslash => '\\',
        WinitKeyCode::Semicolon => ';',
        WinitKeyCode::Quote => '\'',
        WinitKeyCode::Backquote => '`',
        WinitKeyCode::Comma => ',',

        other => return KeyCode::Other(other as u32),
    };

    KeyCode::Char(c)
}
