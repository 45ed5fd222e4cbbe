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

//! Rolling device state and the per-frame event log.

use super::event::{Event, EventKinds};
use super::keyboard::KeyTable;
use super::keys::Key;
use super::masks::{ModKeyMask, MouseButtonMask};

/// Everything an [`InputHandler`](super::InputHandler) knows about the
/// devices of one window.
///
/// The event lists only hold the current frame and are emptied by
/// `clear_events`; the counter, key tables, masks and mouse position
/// persist across frames.
#[derive(Debug, Clone)]
pub struct InputState {
    pub(super) event_index: u64,
    pub(super) events: Vec<Event>,
    pub(super) all_events: Vec<Event>,
    pub(super) keys: KeyTable,
    pub(super) all_keys: KeyTable,
    pub(super) mods: ModKeyMask,
    held_modifiers: Vec<Key>,
    pub(super) buttons: MouseButtonMask,
    pub(super) mouse_pos: Option<(f64, f64)>,
}

impl InputState {
    /// Creates an empty state tracking key codes `0..=max_key`.
    pub fn new(max_key: Key) -> Self {
        Self {
            event_index: 0,
            events: Vec::new(),
            all_events: Vec::new(),
            keys: KeyTable::new(max_key),
            all_keys: KeyTable::new(max_key),
            mods: ModKeyMask::EMPTY,
            held_modifiers: Vec::new(),
            buttons: MouseButtonMask::EMPTY,
            mouse_pos: None,
        }
    }

    /// Number of raw callbacks processed so far. Never reset.
    pub fn event_index(&self) -> u64 {
        self.event_index
    }

    /// This frame's events that no consumer claimed, in arrival order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Every event of this frame, claimed or not, in arrival order.
    pub fn all_events(&self) -> &[Event] {
        &self.all_events
    }

    /// Unclaimed events whose kind is selected by `filter`.
    pub fn events_of(&self, filter: EventKinds) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter().filter(move |e| e.matches(filter))
    }

    /// Key table fed only by unclaimed key events.
    pub fn keys(&self) -> &KeyTable {
        &self.keys
    }

    /// Key table fed by every key event.
    pub fn all_keys(&self) -> &KeyTable {
        &self.all_keys
    }

    /// Modifiers held, derived from the key state.
    pub fn mods(&self) -> ModKeyMask {
        self.mods
    }

    /// Mouse buttons held.
    pub fn buttons(&self) -> MouseButtonMask {
        self.buttons
    }

    /// The last known cursor position, `None` when unknown.
    pub fn mouse_pos(&self) -> Option<(f64, f64)> {
        self.mouse_pos
    }

    /// `true` while `key` is held and its press was not claimed.
    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.keys.is_pressed(key)
    }

    /// [`KeyTable::axis`] over the unclaimed key table.
    pub fn axis(&self, minus: Key, plus: Key) -> i32 {
        self.keys.axis(minus, plus)
    }

    /// [`KeyTable::axis`] over the table of every key event.
    pub fn all_axis(&self, minus: Key, plus: Key) -> i32 {
        self.all_keys.axis(minus, plus)
    }

    pub(super) fn next_index(&mut self) -> u64 {
        self.event_index += 1;
        self.event_index
    }

    pub(super) fn push(&mut self, event: Event) {
        if !event.captured {
            self.events.push(event);
        }
        self.all_events.push(event);
    }

    pub(super) fn clear_events(&mut self) {
        self.events.clear();
        self.all_events.clear();
    }

    /// Updates the modifier mask from a press or release of `key`.
    ///
    /// Modifier keys are tracked on their own, so the mask stays correct
    /// when the key tables do not reach the modifier key codes. A modifier
    /// stays set while either key of its left/right pair is held.
    pub(super) fn track_modifier(&mut self, key: Key, down: bool) {
        if ModKeyMask::for_key(key).is_none() {
            return;
        }
        self.held_modifiers.retain(|k| *k != key);
        if down {
            self.held_modifiers.push(key);
        }
        self.mods = self
            .held_modifiers
            .iter()
            .filter_map(|k| ModKeyMask::for_key(*k))
            .fold(ModKeyMask::EMPTY, |acc, m| acc | m);
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(Key::LAST)
    }
}
