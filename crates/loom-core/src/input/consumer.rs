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

//! The raw-callback contract shared by input handlers and the UI library's
//! input backend.

use super::keys::{Action, Key, MouseButton};
use super::masks::ModKeyMask;
use crate::platform::window::WindowId;

/// Receives raw windowing callbacks and reports whether it claims them.
///
/// Every callback returns `true` when the consumer wants to capture the
/// event, e.g. because the pointer hovers a UI panel or a text field has
/// keyboard focus. All methods default to "not interested".
pub trait InputConsumer {
    /// Called once per frame before new callbacks are delivered.
    fn clear_events(&mut self) {}

    /// The window gained (`true`) or lost focus.
    fn on_window_focus(&mut self, _window: WindowId, _focused: bool) -> bool {
        false
    }

    /// The cursor entered (`true`) or left the window.
    fn on_cursor_enter(&mut self, _window: WindowId, _entered: bool) -> bool {
        false
    }

    /// The cursor moved to an absolute position.
    fn on_cursor_pos(&mut self, _window: WindowId, _x: f64, _y: f64) -> bool {
        false
    }

    /// A mouse button was pressed or released. `mods` is the platform's own
    /// modifier mask.
    fn on_mouse_button(
        &mut self,
        _window: WindowId,
        _button: MouseButton,
        _action: Action,
        _mods: ModKeyMask,
    ) -> bool {
        false
    }

    /// The wheel scrolled, offsets in lines.
    fn on_scroll(&mut self, _window: WindowId, _dx: f64, _dy: f64) -> bool {
        false
    }

    /// A key changed state. `mods` is the platform's own modifier mask.
    fn on_key(
        &mut self,
        _window: WindowId,
        _key: Key,
        _scancode: i32,
        _action: Action,
        _mods: ModKeyMask,
    ) -> bool {
        false
    }

    /// A character was typed.
    fn on_char(&mut self, _window: WindowId, _codepoint: char) -> bool {
        false
    }
}

/// A consumer that never claims anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpConsumer;

impl InputConsumer for NoOpConsumer {}

impl<C: InputConsumer + ?Sized> InputConsumer for Box<C> {
    fn clear_events(&mut self) {
        (**self).clear_events()
    }
    fn on_window_focus(&mut self, window: WindowId, focused: bool) -> bool {
        (**self).on_window_focus(window, focused)
    }
    fn on_cursor_enter(&mut self, window: WindowId, entered: bool) -> bool {
        (**self).on_cursor_enter(window, entered)
    }
    fn on_cursor_pos(&mut self, window: WindowId, x: f64, y: f64) -> bool {
        (**self).on_cursor_pos(window, x, y)
    }
    fn on_mouse_button(
        &mut self,
        window: WindowId,
        button: MouseButton,
        action: Action,
        mods: ModKeyMask,
    ) -> bool {
        (**self).on_mouse_button(window, button, action, mods)
    }
    fn on_scroll(&mut self, window: WindowId, dx: f64, dy: f64) -> bool {
        (**self).on_scroll(window, dx, dy)
    }
    fn on_key(
        &mut self,
        window: WindowId,
        key: Key,
        scancode: i32,
        action: Action,
        mods: ModKeyMask,
    ) -> bool {
        (**self).on_key(window, key, scancode, action, mods)
    }
    fn on_char(&mut self, window: WindowId, codepoint: char) -> bool {
        (**self).on_char(window, codepoint)
    }
}

/// An ordered list of consumers.
///
/// Each callback walks the list front to back and stops at the first
/// consumer that claims it; consumers behind that one never see the event.
/// `clear_events` reaches every consumer.
#[derive(Default)]
pub struct ConsumerChain {
    consumers: Vec<Box<dyn InputConsumer>>,
}

impl ConsumerChain {
    /// Creates an empty chain. An empty chain never claims anything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a consumer behind the existing ones.
    pub fn push(&mut self, consumer: impl InputConsumer + 'static) {
        self.consumers.push(Box::new(consumer));
    }

    /// Builder form of [`ConsumerChain::push`].
    pub fn with(mut self, consumer: impl InputConsumer + 'static) -> Self {
        self.push(consumer);
        self
    }

    /// Number of consumers in the chain.
    pub fn len(&self) -> usize {
        self.consumers.len()
    }

    /// `true` when the chain holds no consumer.
    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }

    fn claim(&mut self, mut f: impl FnMut(&mut dyn InputConsumer) -> bool) -> bool {
        self.consumers.iter_mut().any(|c| f(c.as_mut()))
    }
}

impl std::fmt::Debug for ConsumerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerChain")
            .field("len", &self.consumers.len())
            .finish()
    }
}

impl InputConsumer for ConsumerChain {
    fn clear_events(&mut self) {
        for consumer in &mut self.consumers {
            consumer.clear_events();
        }
    }
    fn on_window_focus(&mut self, window: WindowId, focused: bool) -> bool {
        self.claim(|c| c.on_window_focus(window, focused))
    }
    fn on_cursor_enter(&mut self, window: WindowId, entered: bool) -> bool {
        self.claim(|c| c.on_cursor_enter(window, entered))
    }
    fn on_cursor_pos(&mut self, window: WindowId, x: f64, y: f64) -> bool {
        self.claim(|c| c.on_cursor_pos(window, x, y))
    }
    fn on_mouse_button(
        &mut self,
        window: WindowId,
        button: MouseButton,
        action: Action,
        mods: ModKeyMask,
    ) -> bool {
        self.claim(|c| c.on_mouse_button(window, button, action, mods))
    }
    fn on_scroll(&mut self, window: WindowId, dx: f64, dy: f64) -> bool {
        self.claim(|c| c.on_scroll(window, dx, dy))
    }
    fn on_key(
        &mut self,
        window: WindowId,
        key: Key,
        scancode: i32,
        action: Action,
        mods: ModKeyMask,
    ) -> bool {
        self.claim(|c| c.on_key(window, key, scancode, action, mods))
    }
    fn on_char(&mut self, window: WindowId, codepoint: char) -> bool {
        self.claim(|c| c.on_char(window, codepoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Claims every char event and counts the calls it sees.
    struct Counting {
        claims: bool,
        seen: Rc<Cell<u32>>,
        cleared: Rc<Cell<u32>>,
    }

    impl InputConsumer for Counting {
        fn clear_events(&mut self) {
            self.cleared.set(self.cleared.get() + 1);
        }
        fn on_char(&mut self, _window: WindowId, _codepoint: char) -> bool {
            self.seen.set(self.seen.get() + 1);
            self.claims
        }
    }

    fn counting(claims: bool) -> (Counting, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let seen = Rc::new(Cell::new(0));
        let cleared = Rc::new(Cell::new(0));
        let consumer = Counting {
            claims,
            seen: seen.clone(),
            cleared: cleared.clone(),
        };
        (consumer, seen, cleared)
    }

    #[test]
    fn test_noop_never_claims() {
        let mut c = NoOpConsumer;
        assert!(!c.on_char(WindowId(0), 'x'));
        assert!(!c.on_scroll(WindowId(0), 0.0, 1.0));
    }

    #[test]
    fn test_chain_stops_at_first_claim() {
        let (first, first_seen, _) = counting(false);
        let (second, second_seen, _) = counting(true);
        let (third, third_seen, _) = counting(true);
        let mut chain = ConsumerChain::new().with(first).with(second).with(third);

        assert!(chain.on_char(WindowId(0), 'a'));
        assert_eq!(first_seen.get(), 1);
        assert_eq!(second_seen.get(), 1);
        assert_eq!(third_seen.get(), 0);
    }

    #[test]
    fn test_chain_clear_reaches_everyone() {
        let (first, _, first_cleared) = counting(true);
        let (second, _, second_cleared) = counting(true);
        let mut chain = ConsumerChain::new().with(first).with(second);

        chain.clear_events();
        assert_eq!(first_cleared.get(), 1);
        assert_eq!(second_cleared.get(), 1);
    }

    #[test]
    fn test_empty_chain_claims_nothing() {
        let mut chain = ConsumerChain::new();
        assert!(chain.is_empty());
        assert!(!chain.on_window_focus(WindowId(0), true));
    }
}
