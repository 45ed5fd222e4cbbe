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

//! Bit masks describing the held modifier keys and mouse buttons.

use super::keys::{Key, MouseButton};
use crate::loom_bitflags;

loom_bitflags! {
    /// The modifier keys currently held down.
    pub struct ModKeyMask: u32 {
        /// Either shift key.
        const SHIFT = 0x0001;
        /// Either control key.
        const CONTROL = 0x0002;
        /// Either alt key.
        const ALT = 0x0004;
        /// Either super (logo) key.
        const SUPER = 0x0008;
        /// Caps lock key held.
        const CAPS_LOCK = 0x0010;
        /// Num lock key held.
        const NUM_LOCK = 0x0020;
    }
}

impl ModKeyMask {
    /// Returns the modifier a key contributes to, if any.
    pub fn for_key(key: Key) -> Option<ModKeyMask> {
        match key {
            Key::LEFT_SHIFT | Key::RIGHT_SHIFT => Some(ModKeyMask::SHIFT),
            Key::LEFT_CONTROL | Key::RIGHT_CONTROL => Some(ModKeyMask::CONTROL),
            Key::LEFT_ALT | Key::RIGHT_ALT => Some(ModKeyMask::ALT),
            Key::LEFT_SUPER | Key::RIGHT_SUPER => Some(ModKeyMask::SUPER),
            Key::CAPS_LOCK => Some(ModKeyMask::CAPS_LOCK),
            Key::NUM_LOCK => Some(ModKeyMask::NUM_LOCK),
            _ => None,
        }
    }

    /// `true` when a shift key is held.
    pub fn has_shift(&self) -> bool {
        self.contains(ModKeyMask::SHIFT)
    }

    /// `true` when a control key is held.
    pub fn has_control(&self) -> bool {
        self.contains(ModKeyMask::CONTROL)
    }

    /// `true` when an alt key is held.
    pub fn has_alt(&self) -> bool {
        self.contains(ModKeyMask::ALT)
    }

    /// `true` when a super key is held.
    pub fn has_super(&self) -> bool {
        self.contains(ModKeyMask::SUPER)
    }
}

loom_bitflags! {
    /// The mouse buttons currently held down, one bit per button.
    pub struct MouseButtonMask: u32 {
        /// Primary button.
        const LEFT = 1 << 0;
        /// Secondary button.
        const RIGHT = 1 << 1;
        /// Wheel button.
        const MIDDLE = 1 << 2;
    }
}

impl MouseButtonMask {
    /// Returns the bit of a single button, or an empty mask past
    /// [`MouseButton::LAST`].
    pub fn for_button(button: MouseButton) -> MouseButtonMask {
        if button.0 > MouseButton::LAST.0 {
            MouseButtonMask::EMPTY
        } else {
            MouseButtonMask::from_bits_retain(1 << button.0)
        }
    }

    /// `true` when `button` is held.
    pub fn is_held(&self, button: MouseButton) -> bool {
        let bit = MouseButtonMask::for_button(button);
        !bit.is_empty() && self.contains(bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_and_right_keys_share_a_modifier() {
        assert_eq!(ModKeyMask::for_key(Key::LEFT_SHIFT), Some(ModKeyMask::SHIFT));
        assert_eq!(ModKeyMask::for_key(Key::RIGHT_SHIFT), Some(ModKeyMask::SHIFT));
        assert_eq!(ModKeyMask::for_key(Key::RIGHT_SUPER), Some(ModKeyMask::SUPER));
        assert_eq!(ModKeyMask::for_key(Key::A), None);
    }

    #[test]
    fn test_button_bits() {
        assert_eq!(MouseButtonMask::for_button(MouseButton::LEFT), MouseButtonMask::LEFT);
        assert_eq!(MouseButtonMask::for_button(MouseButton::MIDDLE).bits(), 0b100);
        assert!(MouseButtonMask::for_button(MouseButton(8)).is_empty());

        let mask = MouseButtonMask::LEFT | MouseButtonMask::for_button(MouseButton::FORWARD);
        assert!(mask.is_held(MouseButton::LEFT));
        assert!(mask.is_held(MouseButton::FORWARD));
        assert!(!mask.is_held(MouseButton::RIGHT));
        assert!(!mask.is_held(MouseButton(9)));
    }
}
