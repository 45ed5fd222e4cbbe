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

//! Press-recency key tables.

use super::keys::Key;

/// Maps each key code to the event index of its last press, or `0` while
/// the key is released.
///
/// Comparing stored indices tells which of two held keys went down last,
/// which is what [`KeyTable::axis`] relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTable {
    max_key: Key,
    pressed_at: Vec<u64>,
}

impl KeyTable {
    /// Creates a table covering key codes `0..=max_key`.
    pub fn new(max_key: Key) -> Self {
        let len = max_key.0.max(0) as usize + 1;
        Self {
            max_key,
            pressed_at: vec![0; len],
        }
    }

    /// Records a press at `event_index`. Out-of-range keys are ignored.
    pub fn press(&mut self, key: Key, event_index: u64) {
        if let Some(slot) = self.slot_mut(key) {
            *slot = event_index;
        }
    }

    /// Records a release. Out-of-range keys are ignored.
    pub fn release(&mut self, key: Key) {
        if let Some(slot) = self.slot_mut(key) {
            *slot = 0;
        }
    }

    /// The event index of the last press of `key`, `0` when released or
    /// out of range.
    pub fn pressed_at(&self, key: Key) -> u64 {
        key.table_index(self.max_key)
            .map_or(0, |i| self.pressed_at[i])
    }

    /// `true` while `key` is held.
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed_at(key) != 0
    }

    /// Tri-state axis between two opposing keys.
    ///
    /// ## Returns
    /// * `-1` if `minus` went down more recently than `plus`,
    /// * `+1` if `plus` went down more recently than `minus`,
    /// * `0` if both are released.
    pub fn axis(&self, minus: Key, plus: Key) -> i32 {
        let m = self.pressed_at(minus);
        let p = self.pressed_at(plus);
        match m.cmp(&p) {
            std::cmp::Ordering::Greater => -1,
            std::cmp::Ordering::Less => 1,
            std::cmp::Ordering::Equal => 0,
        }
    }

    /// Releases every key.
    pub fn reset(&mut self) {
        self.pressed_at.fill(0);
    }

    fn slot_mut(&mut self, key: Key) -> Option<&mut u64> {
        let i = key.table_index(self.max_key)?;
        self.pressed_at.get_mut(i)
    }
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::new(Key::LAST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut table = KeyTable::default();
        table.press(Key::W, 7);
        assert_eq!(table.pressed_at(Key::W), 7);
        assert!(table.is_pressed(Key::W));

        table.release(Key::W);
        assert_eq!(table.pressed_at(Key::W), 0);
        assert!(!table.is_pressed(Key::W));
    }

    #[test]
    fn test_out_of_range_keys_are_ignored() {
        let mut table = KeyTable::default();
        table.press(Key::UNKNOWN, 3);
        table.press(Key(1000), 4);
        assert_eq!(table.pressed_at(Key::UNKNOWN), 0);
        assert_eq!(table.pressed_at(Key(1000)), 0);
    }

    #[test]
    fn test_axis_follows_most_recent_press() {
        let mut table = KeyTable::default();
        assert_eq!(table.axis(Key::A, Key::D), 0);

        table.press(Key::A, 1);
        assert_eq!(table.axis(Key::A, Key::D), -1);
        table.press(Key::D, 2);
        assert_eq!(table.axis(Key::A, Key::D), 1);
        table.release(Key::D);
        assert_eq!(table.axis(Key::A, Key::D), -1);
        table.release(Key::A);
        assert_eq!(table.axis(Key::A, Key::D), 0);
    }

    #[test]
    fn test_axis_is_antisymmetric() {
        let mut table = KeyTable::default();
        table.press(Key::S, 4);
        table.press(Key::W, 9);
        assert_eq!(table.axis(Key::S, Key::W), -table.axis(Key::W, Key::S));
    }
}
