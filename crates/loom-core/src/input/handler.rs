// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The capture-aware input handler.

use super::consumer::{InputConsumer, NoOpConsumer};
use super::event::{Event, EventKind};
use super::keys::{Action, Key, MouseButton};
use super::masks::{ModKeyMask, MouseButtonMask};
use super::state::InputState;
use crate::platform::window::WindowId;

/// Turns raw windowing callbacks into typed events and rolling state.
///
/// Every callback is first forwarded to the chained consumer `C`, whose
/// answer becomes the event's `captured` flag and the callback's return
/// value. The handler is itself an [`InputConsumer`], so handlers can be
/// nested or put into a [`ConsumerChain`](super::ConsumerChain).
#[derive(Debug)]
pub struct InputHandler<C = NoOpConsumer> {
    state: InputState,
    consumer: C,
}

impl InputHandler<NoOpConsumer> {
    /// Creates a handler with no chained consumer.
    pub fn standalone() -> Self {
        Self::new(NoOpConsumer)
    }
}

impl<C: InputConsumer> InputHandler<C> {
    /// Creates a handler forwarding to `consumer`, tracking every key up to
    /// [`Key::LAST`].
    pub fn new(consumer: C) -> Self {
        Self::with_max_key(consumer, Key::LAST)
    }

    /// Creates a handler whose key tables cover `0..=max_key`. Modifiers
    /// are tracked whatever the table range.
    pub fn with_max_key(consumer: C, max_key: Key) -> Self {
        Self {
            state: InputState::new(max_key),
            consumer,
        }
    }

    /// The rolling state and this frame's events.
    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// The chained consumer.
    pub fn consumer(&self) -> &C {
        &self.consumer
    }

    /// Mutable access to the chained consumer.
    pub fn consumer_mut(&mut self) -> &mut C {
        &mut self.consumer
    }

    fn record(&mut self, window: WindowId, index: u64, captured: bool, kind: EventKind) -> bool {
        log::trace!("input event #{index} on {window:?} (captured: {captured}): {kind:?}");
        self.state.push(Event {
            window,
            index,
            captured,
            kind,
        });
        captured
    }
}

impl<C: InputConsumer> InputConsumer for InputHandler<C> {
    /// Empties both event lists and forwards the clear. Rolling state is kept.
    fn clear_events(&mut self) {
        self.state.clear_events();
        self.consumer.clear_events();
    }

    fn on_window_focus(&mut self, window: WindowId, focused: bool) -> bool {
        let captured = self.consumer.on_window_focus(window, focused);
        let index = self.state.next_index();
        if focused {
            self.state.mouse_pos = None;
        }
        self.record(window, index, captured, EventKind::Focus { focused })
    }

    fn on_cursor_enter(&mut self, window: WindowId, entered: bool) -> bool {
        let captured = self.consumer.on_cursor_enter(window, entered);
        let index = self.state.next_index();
        if !entered {
            self.state.mouse_pos = None;
        }
        self.record(window, index, captured, EventKind::CursorEnter { entered })
    }

    fn on_cursor_pos(&mut self, window: WindowId, x: f64, y: f64) -> bool {
        let captured = self.consumer.on_cursor_pos(window, x, y);
        let index = self.state.next_index();
        let (dx, dy) = match self.state.mouse_pos {
            Some((px, py)) => (x - px, y - py),
            None => (0.0, 0.0),
        };
        self.state.mouse_pos = Some((x, y));
        let kind = EventKind::CursorPos {
            x,
            y,
            dx,
            dy,
            buttons: self.state.buttons,
            mods: self.state.mods,
        };
        self.record(window, index, captured, kind)
    }

    fn on_mouse_button(
        &mut self,
        window: WindowId,
        button: MouseButton,
        action: Action,
        mods: ModKeyMask,
    ) -> bool {
        let captured = self.consumer.on_mouse_button(window, button, action, mods);
        let index = self.state.next_index();
        self.state
            .buttons
            .set(MouseButtonMask::for_button(button), action.is_down());
        let kind = EventKind::MouseButton {
            button,
            action,
            mods: self.state.mods,
        };
        self.record(window, index, captured, kind)
    }

    fn on_scroll(&mut self, window: WindowId, dx: f64, dy: f64) -> bool {
        let captured = self.consumer.on_scroll(window, dx, dy);
        let index = self.state.next_index();
        let kind = EventKind::Scroll {
            dx,
            dy,
            mods: self.state.mods,
        };
        self.record(window, index, captured, kind)
    }

    fn on_key(
        &mut self,
        window: WindowId,
        key: Key,
        scancode: i32,
        action: Action,
        mods: ModKeyMask,
    ) -> bool {
        let captured = self.consumer.on_key(window, key, scancode, action, mods);
        let index = self.state.next_index();
        match action {
            Action::Press => {
                self.state.track_modifier(key, true);
                self.state.all_keys.press(key, index);
                if !captured {
                    self.state.keys.press(key, index);
                }
            }
            Action::Release => {
                self.state.track_modifier(key, false);
                self.state.all_keys.release(key);
                if !captured {
                    self.state.keys.release(key);
                }
            }
            Action::Repeat => {}
        }
        let kind = EventKind::Key {
            key,
            scancode,
            action,
            mods: self.state.mods,
        };
        self.record(window, index, captured, kind)
    }

    fn on_char(&mut self, window: WindowId, codepoint: char) -> bool {
        let captured = self.consumer.on_char(window, codepoint);
        let index = self.state.next_index();
        self.record(window, index, captured, EventKind::Char { codepoint })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIN: WindowId = WindowId(42);

    /// Claims keyboard input while `typing` is set, mouse input while
    /// `hovering` is set.
    #[derive(Default)]
    struct FakeUi {
        typing: bool,
        hovering: bool,
        clears: u32,
    }

    impl InputConsumer for FakeUi {
        fn clear_events(&mut self) {
            self.clears += 1;
        }
        fn on_cursor_pos(&mut self, _: WindowId, _: f64, _: f64) -> bool {
            self.hovering
        }
        fn on_scroll(&mut self, _: WindowId, _: f64, _: f64) -> bool {
            self.hovering
        }
        fn on_key(&mut self, _: WindowId, _: Key, _: i32, _: Action, _: ModKeyMask) -> bool {
            self.typing
        }
        fn on_char(&mut self, _: WindowId, _: char) -> bool {
            self.typing
        }
    }

    fn press(h: &mut impl InputConsumer, key: Key) -> bool {
        h.on_key(WIN, key, 0, Action::Press, ModKeyMask::EMPTY)
    }

    fn release(h: &mut impl InputConsumer, key: Key) -> bool {
        h.on_key(WIN, key, 0, Action::Release, ModKeyMask::EMPTY)
    }

    #[test]
    fn test_every_callback_advances_the_counter() {
        let mut h = InputHandler::standalone();
        h.on_window_focus(WIN, true);
        h.on_cursor_enter(WIN, true);
        h.on_cursor_pos(WIN, 1.0, 2.0);
        h.on_mouse_button(WIN, MouseButton::LEFT, Action::Press, ModKeyMask::EMPTY);
        h.on_scroll(WIN, 0.0, 1.0);
        press(&mut h, Key::A);
        h.on_char(WIN, 'a');
        assert_eq!(h.state().event_index(), 7);
        assert_eq!(h.state().all_events().len(), 7);

        let indices: Vec<u64> = h.state().all_events().iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6, 7]);
        assert!(h.state().all_events().iter().all(|e| e.window == WIN));
    }

    #[test]
    fn test_clear_keeps_rolling_state() {
        let mut h = InputHandler::new(FakeUi::default());
        press(&mut h, Key::W);
        h.on_cursor_pos(WIN, 10.0, 10.0);
        h.clear_events();

        assert!(h.state().events().is_empty());
        assert!(h.state().all_events().is_empty());
        assert_eq!(h.state().event_index(), 2);
        assert!(h.state().is_key_pressed(Key::W));
        assert_eq!(h.state().mouse_pos(), Some((10.0, 10.0)));
        assert_eq!(h.consumer().clears, 1);
    }

    #[test]
    fn test_key_table_records_press_index() {
        let mut h = InputHandler::standalone();
        h.on_char(WIN, 'x');
        h.on_char(WIN, 'y');
        press(&mut h, Key::W);
        assert_eq!(h.state().keys().pressed_at(Key::W), 3);
        assert_eq!(h.state().all_keys().pressed_at(Key::W), 3);

        release(&mut h, Key::W);
        assert_eq!(h.state().keys().pressed_at(Key::W), 0);
        assert_eq!(h.state().all_keys().pressed_at(Key::W), 0);
    }

    #[test]
    fn test_repeat_keeps_original_press() {
        let mut h = InputHandler::standalone();
        press(&mut h, Key::A);
        press(&mut h, Key::D);
        h.on_key(WIN, Key::A, 0, Action::Repeat, ModKeyMask::EMPTY);
        assert_eq!(h.state().keys().pressed_at(Key::A), 1);
        assert_eq!(h.state().axis(Key::A, Key::D), 1);
    }

    #[test]
    fn test_modifiers_tracked_beyond_small_key_table() {
        let mut h = InputHandler::with_max_key(NoOpConsumer, Key(200));
        press(&mut h, Key::LEFT_SHIFT);
        assert!(h.state().mods().has_shift());
        assert!(!h.state().all_keys().is_pressed(Key::LEFT_SHIFT));

        press(&mut h, Key::RIGHT_SHIFT);
        release(&mut h, Key::LEFT_SHIFT);
        assert!(h.state().mods().has_shift());
        release(&mut h, Key::RIGHT_SHIFT);
        assert!(!h.state().mods().has_shift());

        press(&mut h, Key::LEFT_CONTROL);
        press(&mut h, Key::CAPS_LOCK);
        assert_eq!(h.state().mods(), ModKeyMask::CONTROL | ModKeyMask::CAPS_LOCK);
    }

    #[test]
    fn test_axis_scenario() {
        let mut h = InputHandler::standalone();
        press(&mut h, Key::A);
        press(&mut h, Key::D);
        assert_eq!(h.state().axis(Key::A, Key::D), 1);
        release(&mut h, Key::A);
        assert_eq!(h.state().axis(Key::A, Key::D), 1);
        release(&mut h, Key::D);
        assert_eq!(h.state().axis(Key::A, Key::D), 0);
    }

    #[test]
    fn test_cursor_delta() {
        let mut h = InputHandler::standalone();
        h.on_cursor_pos(WIN, 10.0, 20.0);
        h.on_cursor_pos(WIN, 15.0, 18.0);

        let deltas: Vec<(f64, f64)> = h
            .state()
            .events()
            .iter()
            .filter_map(|e| match e.kind {
                EventKind::CursorPos { dx, dy, .. } => Some((dx, dy)),
                _ => None,
            })
            .collect();
        assert_eq!(deltas, vec![(0.0, 0.0), (5.0, -2.0)]);
    }

    #[test]
    fn test_position_forgotten_on_focus_and_leave() {
        let mut h = InputHandler::standalone();
        h.on_cursor_pos(WIN, 10.0, 20.0);
        h.on_window_focus(WIN, true);
        assert_eq!(h.state().mouse_pos(), None);

        h.on_cursor_pos(WIN, 50.0, 50.0);
        h.on_cursor_enter(WIN, false);
        assert_eq!(h.state().mouse_pos(), None);

        h.on_cursor_pos(WIN, 60.0, 60.0);
        let last = h.state().events().last().map(|e| e.kind);
        assert!(matches!(
            last,
            Some(EventKind::CursorPos { dx, dy, .. }) if dx == 0.0 && dy == 0.0
        ));
    }

    #[test]
    fn test_focus_lost_keeps_position() {
        let mut h = InputHandler::standalone();
        h.on_cursor_pos(WIN, 3.0, 4.0);
        h.on_window_focus(WIN, false);
        assert_eq!(h.state().mouse_pos(), Some((3.0, 4.0)));
    }

    #[test]
    fn test_captured_events_only_in_all_events() {
        let mut h = InputHandler::new(FakeUi {
            typing: true,
            ..FakeUi::default()
        });
        assert!(h.on_char(WIN, 'q'));
        assert!(!h.on_scroll(WIN, 0.0, -1.0));

        assert_eq!(h.state().all_events().len(), 2);
        assert_eq!(h.state().events().len(), 1);
        assert!(h.state().all_events()[0].captured);
        assert!(matches!(h.state().events()[0].kind, EventKind::Scroll { .. }));
    }

    #[test]
    fn test_captured_key_only_in_all_keys() {
        let mut h = InputHandler::new(FakeUi {
            typing: true,
            ..FakeUi::default()
        });
        assert!(press(&mut h, Key::E));
        assert!(!h.state().keys().is_pressed(Key::E));
        assert_eq!(h.state().all_keys().pressed_at(Key::E), 1);
        assert_eq!(h.state().all_axis(Key::E, Key::Q), -1);
        assert_eq!(h.state().axis(Key::E, Key::Q), 0);
    }

    #[test]
    fn test_rolling_state_updates_when_captured() {
        let mut h = InputHandler::new(FakeUi {
            hovering: true,
            ..FakeUi::default()
        });
        assert!(h.on_cursor_pos(WIN, 5.0, 6.0));
        assert_eq!(h.state().mouse_pos(), Some((5.0, 6.0)));
        assert!(h.state().events().is_empty());
    }

    #[test]
    fn test_modifiers_follow_key_pairs() {
        let mut h = InputHandler::standalone();
        press(&mut h, Key::LEFT_SHIFT);
        press(&mut h, Key::RIGHT_SHIFT);
        release(&mut h, Key::LEFT_SHIFT);
        assert!(h.state().mods().has_shift());
        release(&mut h, Key::RIGHT_SHIFT);
        assert!(!h.state().mods().has_shift());

        press(&mut h, Key::RIGHT_CONTROL);
        h.on_scroll(WIN, 0.0, 1.0);
        let last = h.state().events().last().map(|e| e.kind);
        assert!(matches!(
            last,
            Some(EventKind::Scroll { mods, .. }) if mods == ModKeyMask::CONTROL
        ));
    }

    #[test]
    fn test_platform_mods_are_not_trusted() {
        let mut h = InputHandler::standalone();
        h.on_mouse_button(WIN, MouseButton::RIGHT, Action::Press, ModKeyMask::ALT);
        assert!(h.state().mods().is_empty());
        assert!(h.state().buttons().is_held(MouseButton::RIGHT));

        h.on_cursor_pos(WIN, 1.0, 1.0);
        let last = h.state().events().last().map(|e| e.kind);
        assert!(matches!(
            last,
            Some(EventKind::CursorPos { buttons, .. }) if buttons == MouseButtonMask::RIGHT
        ));

        h.on_mouse_button(WIN, MouseButton::RIGHT, Action::Release, ModKeyMask::EMPTY);
        assert!(h.state().buttons().is_empty());
    }

    #[test]
    fn test_handlers_nest() {
        let inner = InputHandler::new(FakeUi {
            typing: true,
            ..FakeUi::default()
        });
        let mut outer = InputHandler::new(inner);
        assert!(press(&mut outer, Key::Z));

        assert_eq!(outer.state().events().len(), 0);
        assert_eq!(outer.consumer().state().all_events().len(), 1);
        outer.clear_events();
        assert!(outer.consumer().state().all_events().is_empty());
        assert_eq!(outer.consumer().consumer().clears, 1);
    }
}
