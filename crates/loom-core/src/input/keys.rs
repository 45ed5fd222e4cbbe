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

//! Backend-agnostic key, mouse button and action codes.
//!
//! The key space follows the conventional desktop numbering: printable keys
//! use their ASCII upper-case code, function and navigation keys start at
//! 256 and [`Key::LAST`] is the highest valid code. Windowing adapters map
//! their native codes into this space.

/// A keyboard key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(pub i32);

macro_rules! key_codes {
    ($($name:ident = $value:expr;)*) => {
        impl Key {
            $(
                #[allow(missing_docs)]
                pub const $name: Key = Key($value);
            )*
        }
    };
}

key_codes! {
    UNKNOWN = -1;
    SPACE = 32;
    APOSTROPHE = 39;
    COMMA = 44;
    MINUS = 45;
    PERIOD = 46;
    SLASH = 47;
    NUM_0 = 48;
    NUM_1 = 49;
    NUM_2 = 50;
    NUM_3 = 51;
    NUM_4 = 52;
    NUM_5 = 53;
    NUM_6 = 54;
    NUM_7 = 55;
    NUM_8 = 56;
    NUM_9 = 57;
    SEMICOLON = 59;
    EQUAL = 61;
    A = 65;
    B = 66;
    C = 67;
    D = 68;
    E = 69;
    F = 70;
    G = 71;
    H = 72;
    I = 73;
    J = 74;
    K = 75;
    L = 76;
    M = 77;
    N = 78;
    O = 79;
    P = 80;
    Q = 81;
    R = 82;
    S = 83;
    T = 84;
    U = 85;
    V = 86;
    W = 87;
    X = 88;
    Y = 89;
    Z = 90;
    LEFT_BRACKET = 91;
    BACKSLASH = 92;
    RIGHT_BRACKET = 93;
    GRAVE_ACCENT = 96;
    ESCAPE = 256;
    ENTER = 257;
    TAB = 258;
    BACKSPACE = 259;
    INSERT = 260;
    DELETE = 261;
    RIGHT = 262;
    LEFT = 263;
    DOWN = 264;
    UP = 265;
    PAGE_UP = 266;
    PAGE_DOWN = 267;
    HOME = 268;
    END = 269;
    CAPS_LOCK = 280;
    SCROLL_LOCK = 281;
    NUM_LOCK = 282;
    PRINT_SCREEN = 283;
    PAUSE = 284;
    F1 = 290;
    F2 = 291;
    F3 = 292;
    F4 = 293;
    F5 = 294;
    F6 = 295;
    F7 = 296;
    F8 = 297;
    F9 = 298;
    F10 = 299;
    F11 = 300;
    F12 = 301;
    KP_0 = 320;
    KP_1 = 321;
    KP_2 = 322;
    KP_3 = 323;
    KP_4 = 324;
    KP_5 = 325;
    KP_6 = 326;
    KP_7 = 327;
    KP_8 = 328;
    KP_9 = 329;
    KP_DECIMAL = 330;
    KP_DIVIDE = 331;
    KP_MULTIPLY = 332;
    KP_SUBTRACT = 333;
    KP_ADD = 334;
    KP_ENTER = 335;
    KP_EQUAL = 336;
    LEFT_SHIFT = 340;
    LEFT_CONTROL = 341;
    LEFT_ALT = 342;
    LEFT_SUPER = 343;
    RIGHT_SHIFT = 344;
    RIGHT_CONTROL = 345;
    RIGHT_ALT = 346;
    RIGHT_SUPER = 347;
    MENU = 348;
}

impl Key {
    /// The highest valid key code.
    pub const LAST: Key = Key::MENU;

    /// Returns the key's slot in a key table, or `None` when the code falls
    /// outside `0..=max`.
    pub fn table_index(self, max: Key) -> Option<usize> {
        if self.0 < 0 || self.0 > max.0 {
            None
        } else {
            Some(self.0 as usize)
        }
    }
}

/// A mouse button, numbered from 0 (left) upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseButton(pub u8);

impl MouseButton {
    /// Primary button.
    pub const LEFT: MouseButton = MouseButton(0);
    /// Secondary button.
    pub const RIGHT: MouseButton = MouseButton(1);
    /// Wheel button.
    pub const MIDDLE: MouseButton = MouseButton(2);
    /// Side button, usually "back".
    pub const BACK: MouseButton = MouseButton(3);
    /// Side button, usually "forward".
    pub const FORWARD: MouseButton = MouseButton(4);
    /// The highest button tracked by the button mask.
    pub const LAST: MouseButton = MouseButton(7);
}

/// What happened to a key or a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// The key or button was released.
    Release,
    /// The key or button was pressed.
    Press,
    /// The key was held down until it repeated.
    Repeat,
}

impl Action {
    /// `true` for both [`Action::Press`] and [`Action::Repeat`].
    pub fn is_down(self) -> bool {
        !matches!(self, Action::Release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_index_bounds() {
        assert_eq!(Key::A.table_index(Key::LAST), Some(65));
        assert_eq!(Key::LAST.table_index(Key::LAST), Some(348));
        assert_eq!(Key::UNKNOWN.table_index(Key::LAST), None);
        assert_eq!(Key(349).table_index(Key::LAST), None);
        assert_eq!(Key::ESCAPE.table_index(Key::Z), None);
    }

    #[test]
    fn test_action_is_down() {
        assert!(Action::Press.is_down());
        assert!(Action::Repeat.is_down());
        assert!(!Action::Release.is_down());
    }
}
