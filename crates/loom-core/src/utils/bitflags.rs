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

//! A declarative macro for the small flag sets used by the input layer
//! (modifier keys, mouse buttons, event kinds).

/// Declares a `Copy` flag-set newtype over an unsigned integer.
///
/// The generated type exposes one associated constant per flag, the usual
/// set operations and the bitwise operators. Raw bits outside the declared
/// flags are preserved so that masks coming from a platform layer survive a
/// round trip unchanged.
#[macro_export]
macro_rules! loom_bitflags {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident: $ty:ty {
            $(
                $(#[$flag_attr:meta])*
                const $flag_name:ident = $flag_value:expr;
            )*
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name {
            bits: $ty,
        }

        impl $name {
            /// The set with no flag raised.
            pub const EMPTY: Self = Self { bits: 0 };

            $(
                $(#[$flag_attr])*
                pub const $flag_name: Self = Self { bits: $flag_value };
            )*

            /// Wraps raw bits, keeping unknown bits as they are.
            pub const fn from_bits_retain(bits: $ty) -> Self {
                Self { bits }
            }

            /// Returns the raw bits.
            pub const fn bits(&self) -> $ty {
                self.bits
            }

            /// `true` when no bit is set.
            pub const fn is_empty(&self) -> bool {
                self.bits == 0
            }

            /// `true` when every bit of `other` is set in `self`.
            pub const fn contains(&self, other: Self) -> bool {
                (self.bits & other.bits) == other.bits
            }

            /// `true` when `self` and `other` share at least one bit.
            pub const fn intersects(&self, other: Self) -> bool {
                (self.bits & other.bits) != 0
            }

            /// Raises the bits of `other`.
            pub fn insert(&mut self, other: Self) {
                self.bits |= other.bits;
            }

            /// Clears the bits of `other`.
            pub fn remove(&mut self, other: Self) {
                self.bits &= !other.bits;
            }

            /// Raises or clears the bits of `other` depending on `value`.
            pub fn set(&mut self, other: Self, value: bool) {
                if value {
                    self.insert(other);
                } else {
                    self.remove(other);
                }
            }
        }

        impl core::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, other: Self) -> Self {
                Self { bits: self.bits | other.bits }
            }
        }

        impl core::ops::BitAnd for $name {
            type Output = Self;
            fn bitand(self, other: Self) -> Self {
                Self { bits: self.bits & other.bits }
            }
        }

        impl core::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, other: Self) {
                self.bits |= other.bits;
            }
        }

        impl core::ops::Not for $name {
            type Output = Self;
            fn not(self) -> Self {
                Self { bits: !self.bits }
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let mut rest = self.bits;
                let mut set = f.debug_set();
                $(
                    let flag: $ty = $flag_value;
                    if flag != 0 && rest & flag == flag {
                        set.entry(&format_args!("{}", stringify!($flag_name)));
                        rest &= !flag;
                    }
                )*
                if rest != 0 {
                    set.entry(&format_args!("{:#x}", rest));
                }
                set.finish()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::loom_bitflags! {
        struct Sample: u8 {
            const A = 1 << 0;
            const B = 1 << 1;
            const AB = 0b11;
        }
    }

    #[test]
    fn test_set_operations() {
        let mut flags = Sample::A;
        assert!(flags.contains(Sample::A));
        assert!(!flags.contains(Sample::AB));
        assert!(flags.intersects(Sample::AB));

        flags.insert(Sample::B);
        assert_eq!(flags, Sample::AB);

        flags.set(Sample::A, false);
        assert_eq!(flags, Sample::B);
        flags.remove(Sample::B);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_unknown_bits_are_retained() {
        let flags = Sample::from_bits_retain(0b1001);
        assert_eq!(flags.bits(), 0b1001);
        assert!(flags.contains(Sample::A));
        assert_eq!(format!("{flags:?}"), "{A, 0x8}");
    }

    #[test]
    fn test_debug_prefers_first_matching_names() {
        assert_eq!(format!("{:?}", Sample::AB), "{A, B}");
        assert_eq!(format!("{:?}", Sample::EMPTY), "{}");
    }
}
