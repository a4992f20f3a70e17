use crate::coords::PixelPos;

use super::handlers::Handlers;
use super::types::{InputEvent, Key, KeyState, MouseButtonState};

const MS_PER_S: f64 = 1e3;

/// In-progress press tracked between button-down and button-up.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ClickState {
    press: Option<PixelPos>,
}

impl ClickState {
    #[inline]
    pub fn is_clicked(&self) -> bool {
        self.press.is_some()
    }

    /// Position of the press that started the current click, if any.
    #[inline]
    pub fn press_position(&self) -> Option<PixelPos> {
        self.press
    }
}

/// Routes raw input events to the registered handlers.
///
/// Owns the handler slots plus the small amount of state needed to turn raw
/// events into callbacks: the press position of an in-progress click and the
/// timestamp at which the current key started being held.
pub struct EventDispatcher<S> {
    handlers: Handlers<S>,
    click: ClickState,
    key_started_ms: u32,
}

impl<S> Default for EventDispatcher<S> {
    fn default() -> Self {
        Self {
            handlers: Handlers::default(),
            click: ClickState::default(),
            key_started_ms: 0,
        }
    }
}

impl<S> EventDispatcher<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handlers_mut(&mut self) -> &mut Handlers<S> {
        &mut self.handlers
    }

    pub fn click_state(&self) -> ClickState {
        self.click
    }

    /// Dispatches every event in order.
    ///
    /// Returns `true` if any of them was a quit request. Events after the quit
    /// are still dispatched.
    pub fn dispatch_all<I>(&mut self, events: I, scene: &mut S) -> bool
    where
        I: IntoIterator<Item = InputEvent>,
    {
        let mut quit = false;
        for ev in events {
            quit |= self.dispatch(&ev, scene);
        }
        quit
    }

    /// Dispatches one event. Returns `true` for a quit request.
    pub fn dispatch(&mut self, ev: &InputEvent, scene: &mut S) -> bool {
        match *ev {
            InputEvent::Quit => return true,

            InputEvent::Key { code, state, repeat, timestamp_ms } => {
                let Some(handler) = self.handlers.key.as_mut() else { return false };
                let Some(key) = Key::from_code(code) else {
                    log::trace!("dropping unrecognized key {code:?}");
                    return false;
                };

                if !repeat {
                    self.key_started_ms = timestamp_ms;
                }
                let held = f64::from(timestamp_ms.wrapping_sub(self.key_started_ms)) / MS_PER_S;
                handler(key, state, held, scene);
            }

            InputEvent::MouseButton { state: MouseButtonState::Pressed, pos, .. } => {
                if self.handlers.click.is_none() {
                    return false;
                }
                // Duplicate presses keep the original position.
                if self.click.press.is_none() {
                    self.click.press = Some(pos);
                }
            }

            InputEvent::MouseMotion { pos } => {
                let Some(press) = self.click.press else { return false };
                if let Some(drag) = self.handlers.drag.as_mut() {
                    drag(press, pos, scene);
                }
            }

            InputEvent::MouseButton { state: MouseButtonState::Released, pos, .. } => {
                let press = self.click.press.take();
                let Some(click) = self.handlers.click.as_mut() else { return false };
                let press = press.unwrap_or(pos);

                click(press, pos, scene);
                if let Some(up) = self.handlers.button_up.as_mut() {
                    up(press, pos, scene);
                }
            }

            InputEvent::Scroll { dx, dy } => {
                if let Some(scroll) = self.handlers.scroll.as_mut() {
                    scroll(dx, dy, scene);
                }
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::types::{KeyCode, MouseButton};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Key(Key, KeyState, f64),
        Click(PixelPos, PixelPos),
        Drag(PixelPos, PixelPos),
        Up(PixelPos, PixelPos),
        Scroll(f64, f64),
    }

    type Log = Vec<Call>;

    fn px(x: i32, y: i32) -> PixelPos {
        PixelPos::new(x, y)
    }

    fn key(code: KeyCode, state: KeyState, repeat: bool, timestamp_ms: u32) -> InputEvent {
        InputEvent::Key { code, state, repeat, timestamp_ms }
    }

    fn button(state: MouseButtonState, x: i32, y: i32) -> InputEvent {
        InputEvent::MouseButton { button: MouseButton::Left, state, pos: px(x, y) }
    }

    fn motion(x: i32, y: i32) -> InputEvent {
        InputEvent::MouseMotion { pos: px(x, y) }
    }

    fn recording() -> EventDispatcher<Log> {
        let mut d = EventDispatcher::new();
        let h = d.handlers_mut();
        h.set_key(|k, s, held, log: &mut Log| log.push(Call::Key(k, s, held)));
        h.set_click(|a, b, log: &mut Log| log.push(Call::Click(a, b)));
        h.set_drag(|a, b, log: &mut Log| log.push(Call::Drag(a, b)));
        h.set_button_up(|a, b, log: &mut Log| log.push(Call::Up(a, b)));
        h.set_scroll(|x, y, log: &mut Log| log.push(Call::Scroll(x, y)));
        d
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn press_then_release_reports_zero_hold() {
        let mut d = recording();
        let mut log = Log::new();
        d.dispatch(&key(KeyCode::Char('a'), KeyState::Pressed, false, 500), &mut log);
        d.dispatch(&key(KeyCode::Char('a'), KeyState::Released, false, 500), &mut log);
        assert_eq!(
            log,
            vec![
                Call::Key(Key::Char('a'), KeyState::Pressed, 0.0),
                Call::Key(Key::Char('a'), KeyState::Released, 0.0),
            ]
        );
    }

    #[test]
    fn repeats_accumulate_hold_time() {
        let mut d = recording();
        let mut log = Log::new();
        d.dispatch(&key(KeyCode::ArrowUp, KeyState::Pressed, false, 1_000), &mut log);
        d.dispatch(&key(KeyCode::ArrowUp, KeyState::Pressed, true, 1_250), &mut log);
        d.dispatch(&key(KeyCode::ArrowUp, KeyState::Pressed, true, 1_500), &mut log);
        let held: Vec<f64> = log
            .iter()
            .map(|c| match c {
                Call::Key(_, _, h) => *h,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(held, vec![0.0, 0.25, 0.5]);
    }

    #[test]
    fn non_repeat_release_resets_baseline() {
        let mut d = recording();
        let mut log = Log::new();
        d.dispatch(&key(KeyCode::Char(' '), KeyState::Pressed, false, 100), &mut log);
        d.dispatch(&key(KeyCode::Char(' '), KeyState::Pressed, true, 900), &mut log);
        d.dispatch(&key(KeyCode::Char(' '), KeyState::Released, false, 1_000), &mut log);
        assert_eq!(log.last(), Some(&Call::Key(Key::Space, KeyState::Released, 0.0)));
    }

    #[test]
    fn unrecognized_keys_do_not_reach_handler() {
        let mut d = recording();
        let mut log = Log::new();
        d.dispatch(&key(KeyCode::Other(7), KeyState::Pressed, false, 0), &mut log);
        d.dispatch(&key(KeyCode::Char('\t'), KeyState::Pressed, false, 0), &mut log);
        assert!(log.is_empty());
    }

    #[test]
    fn keys_without_handler_are_ignored() {
        let mut d: EventDispatcher<Log> = EventDispatcher::new();
        let mut log = Log::new();
        assert!(!d.dispatch(&key(KeyCode::Char('a'), KeyState::Pressed, false, 0), &mut log));
        assert!(log.is_empty());
    }

    // ── mouse ─────────────────────────────────────────────────────────────

    #[test]
    fn press_drag_release_sequence() {
        let mut d = recording();
        let mut log = Log::new();

        d.dispatch(&button(MouseButtonState::Pressed, 10, 10), &mut log);
        assert_eq!(d.click_state().press_position(), Some(px(10, 10)));

        d.dispatch(&motion(20, 15), &mut log);
        d.dispatch(&button(MouseButtonState::Released, 20, 15), &mut log);

        assert_eq!(
            log,
            vec![
                Call::Drag(px(10, 10), px(20, 15)),
                Call::Click(px(10, 10), px(20, 15)),
                Call::Up(px(10, 10), px(20, 15)),
            ]
        );
        assert!(!d.click_state().is_clicked());

        // A fresh press starts a new drag from the new position.
        log.clear();
        d.dispatch(&button(MouseButtonState::Pressed, 40, 40), &mut log);
        d.dispatch(&motion(41, 42), &mut log);
        assert_eq!(log, vec![Call::Drag(px(40, 40), px(41, 42))]);
    }

    #[test]
    fn drag_fires_on_every_motion() {
        let mut d = recording();
        let mut log = Log::new();
        d.dispatch(&button(MouseButtonState::Pressed, 0, 0), &mut log);
        for x in 1..=3 {
            d.dispatch(&motion(x, 0), &mut log);
        }
        assert_eq!(log.len(), 3);
        assert!(log.iter().all(|c| matches!(c, Call::Drag(p, _) if *p == px(0, 0))));
    }

    #[test]
    fn duplicate_press_keeps_first_position() {
        let mut d = recording();
        let mut log = Log::new();
        d.dispatch(&button(MouseButtonState::Pressed, 1, 1), &mut log);
        d.dispatch(&button(MouseButtonState::Pressed, 9, 9), &mut log);
        d.dispatch(&button(MouseButtonState::Released, 5, 5), &mut log);
        assert_eq!(log[0], Call::Click(px(1, 1), px(5, 5)));
    }

    #[test]
    fn motion_without_press_is_ignored() {
        let mut d = recording();
        let mut log = Log::new();
        d.dispatch(&motion(3, 3), &mut log);
        assert!(log.is_empty());
    }

    #[test]
    fn press_is_not_tracked_without_click_handler() {
        let mut d = recording();
        d.handlers_mut().clear_click();
        let mut log = Log::new();
        d.dispatch(&button(MouseButtonState::Pressed, 1, 1), &mut log);
        d.dispatch(&motion(2, 2), &mut log);
        d.dispatch(&button(MouseButtonState::Released, 2, 2), &mut log);
        assert!(log.is_empty());
        assert!(!d.click_state().is_clicked());
    }

    #[test]
    fn button_up_requires_click_handler() {
        let mut d: EventDispatcher<Log> = EventDispatcher::new();
        d.handlers_mut().set_button_up(|a, b, log: &mut Log| log.push(Call::Up(a, b)));
        let mut log = Log::new();
        d.dispatch(&button(MouseButtonState::Pressed, 1, 1), &mut log);
        d.dispatch(&button(MouseButtonState::Released, 2, 2), &mut log);
        assert!(log.is_empty());
    }

    #[test]
    fn release_without_press_reports_release_position_twice() {
        let mut d = recording();
        let mut log = Log::new();
        d.dispatch(&button(MouseButtonState::Released, 7, 8), &mut log);
        assert_eq!(log[0], Call::Click(px(7, 8), px(7, 8)));
    }

    // ── scroll / quit / registration ──────────────────────────────────────

    #[test]
    fn scroll_forwards_deltas() {
        let mut d = recording();
        let mut log = Log::new();
        d.dispatch(&InputEvent::Scroll { dx: -1.0, dy: 2.5 }, &mut log);
        assert_eq!(log, vec![Call::Scroll(-1.0, 2.5)]);
    }

    #[test]
    fn quit_still_dispatches_remaining_events() {
        let mut d = recording();
        let mut log = Log::new();
        let quit = d.dispatch_all(
            vec![InputEvent::Quit, InputEvent::Scroll { dx: 0.0, dy: 1.0 }],
            &mut log,
        );
        assert!(quit);
        assert_eq!(log, vec![Call::Scroll(0.0, 1.0)]);
    }

    #[test]
    fn no_quit_returns_false() {
        let mut d = recording();
        let mut log = Log::new();
        assert!(!d.dispatch_all(vec![motion(1, 1)], &mut log));
    }

    #[test]
    fn last_registration_wins() {
        let mut d: EventDispatcher<Log> = EventDispatcher::new();
        d.handlers_mut().set_scroll(|_, _, log: &mut Log| log.push(Call::Scroll(1.0, 1.0)));
        d.handlers_mut().set_scroll(|_, _, log: &mut Log| log.push(Call::Scroll(2.0, 2.0)));
        let mut log = Log::new();
        d.dispatch(&InputEvent::Scroll { dx: 0.0, dy: 0.0 }, &mut log);
        assert_eq!(log, vec![Call::Scroll(2.0, 2.0)]);
    }
}
