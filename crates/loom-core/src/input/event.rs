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

//! The typed input events recorded by an [`InputHandler`](super::InputHandler).

use super::keys::{Action, Key, MouseButton};
use super::masks::{ModKeyMask, MouseButtonMask};
use crate::loom_bitflags;
use crate::platform::window::WindowId;

/// A single recorded input event.
///
/// Events are immutable once built and live in the handler's event lists
/// until the next `clear_events`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// The window the raw callback came from.
    pub window: WindowId,
    /// The value of the handler's event counter when this event was recorded.
    pub index: u64,
    /// Whether a chained consumer claimed the event.
    pub captured: bool,
    /// The kind-specific payload.
    pub kind: EventKind,
}

/// Payload of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    /// The window gained or lost keyboard focus.
    Focus {
        /// `true` when focus was gained.
        focused: bool,
    },
    /// The cursor entered or left the window's client area.
    CursorEnter {
        /// `true` when the cursor entered.
        entered: bool,
    },
    /// The cursor moved.
    CursorPos {
        /// Absolute x position in window coordinates.
        x: f64,
        /// Absolute y position in window coordinates.
        y: f64,
        /// Horizontal movement since the last known position.
        dx: f64,
        /// Vertical movement since the last known position.
        dy: f64,
        /// Buttons held during the move.
        buttons: MouseButtonMask,
        /// Modifiers held during the move.
        mods: ModKeyMask,
    },
    /// A mouse button changed state.
    MouseButton {
        /// The button.
        button: MouseButton,
        /// Press or release.
        action: Action,
        /// Modifiers held at the time.
        mods: ModKeyMask,
    },
    /// The scroll wheel or touchpad scrolled.
    Scroll {
        /// Horizontal offset, in lines.
        dx: f64,
        /// Vertical offset, in lines.
        dy: f64,
        /// Modifiers held at the time.
        mods: ModKeyMask,
    },
    /// A key changed state.
    Key {
        /// The key code.
        key: Key,
        /// The platform scancode.
        scancode: i32,
        /// Press, release or repeat.
        action: Action,
        /// Modifiers held at the time.
        mods: ModKeyMask,
    },
    /// A unicode character was typed.
    Char {
        /// The character.
        codepoint: char,
    },
}

loom_bitflags! {
    /// A selection of event kinds, used to filter event lists.
    pub struct EventKinds: u32 {
        /// [`EventKind::Focus`].
        const FOCUS = 0x01;
        /// [`EventKind::CursorEnter`].
        const ENTER = 0x02;
        /// [`EventKind::CursorPos`].
        const CURSOR_POS = 0x04;
        /// [`EventKind::MouseButton`].
        const MOUSE_BUTTON = 0x08;
        /// [`EventKind::Scroll`].
        const SCROLL = 0x10;
        /// [`EventKind::Key`].
        const KEY = 0x20;
        /// [`EventKind::Char`].
        const CHAR = 0x40;
        /// Every kind.
        const ALL = 0x7f;
    }
}

impl EventKind {
    /// The filter bit matching this kind.
    pub fn kind_bit(&self) -> EventKinds {
        match self {
            EventKind::Focus { .. } => EventKinds::FOCUS,
            EventKind::CursorEnter { .. } => EventKinds::ENTER,
            EventKind::CursorPos { .. } => EventKinds::CURSOR_POS,
            EventKind::MouseButton { .. } => EventKinds::MOUSE_BUTTON,
            EventKind::Scroll { .. } => EventKinds::SCROLL,
            EventKind::Key { .. } => EventKinds::KEY,
            EventKind::Char { .. } => EventKinds::CHAR,
        }
    }
}

impl Event {
    /// `true` when the event's kind is selected by `filter`.
    pub fn matches(&self, filter: EventKinds) -> bool {
        filter.contains(self.kind.kind_bit())
    }

    /// `true` when this is a key event for `key` with the given action.
    pub fn is_key(&self, key: Key, action: Action) -> bool {
        matches!(self.kind, EventKind::Key { key: k, action: a, .. } if k == key && a == action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: EventKind) -> Event {
        Event {
            window: WindowId(1),
            index: 1,
            captured: false,
            kind,
        }
    }

    #[test]
    fn test_filter_matching() {
        let scroll = event(EventKind::Scroll {
            dx: 0.0,
            dy: 1.0,
            mods: ModKeyMask::EMPTY,
        });
        assert!(scroll.matches(EventKinds::SCROLL));
        assert!(scroll.matches(EventKinds::ALL));
        assert!(scroll.matches(EventKinds::SCROLL | EventKinds::KEY));
        assert!(!scroll.matches(EventKinds::KEY | EventKinds::CHAR));
    }

    #[test]
    fn test_is_key() {
        let press = event(EventKind::Key {
            key: Key::O,
            scancode: 24,
            action: Action::Press,
            mods: ModKeyMask::EMPTY,
        });
        assert!(press.is_key(Key::O, Action::Press));
        assert!(!press.is_key(Key::O, Action::Release));
        assert!(!press.is_key(Key::P, Action::Press));
        assert!(!event(EventKind::Char { codepoint: 'o' }).is_key(Key::O, Action::Press));
    }
}
