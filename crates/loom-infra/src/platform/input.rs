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

//! Provides translation from a concrete windowing backend (`winit`) to the
//! raw input callbacks of an [`InputConsumer`].
//!
//! This module acts as an adapter layer: the input handler and the UI input
//! backend only ever see `loom-core` key codes, buttons and modifier masks.

use loom_core::input::{Action, InputConsumer, Key, ModKeyMask, MouseButton};
use loom_core::platform::window::WindowId;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::platform::scancode::PhysicalKeyExtScancode;

/// Pixels of a touchpad scroll counted as one wheel line.
pub const DEFAULT_PIXELS_PER_LINE: f64 = 50.0;

/// Feeds `winit` window events to an [`InputConsumer`].
///
/// `winit` reports cursor positions in physical pixels; they are converted
/// to logical points using the window's scale factor so that consumers see
/// the same coordinate space as the UI library.
#[derive(Debug, Clone)]
pub struct WinitInputTranslator {
    modifiers: ModKeyMask,
    scale_factor: f64,
    pixels_per_line: f64,
}

impl WinitInputTranslator {
    /// Creates a translator for a window with the given scale factor.
    pub fn new(scale_factor: f64) -> Self {
        Self {
            modifiers: ModKeyMask::EMPTY,
            scale_factor: sanitize_scale(scale_factor),
            pixels_per_line: DEFAULT_PIXELS_PER_LINE,
        }
    }

    /// Sets how many pixels of a pixel-precise scroll make one line.
    pub fn with_pixels_per_line(mut self, pixels_per_line: f64) -> Self {
        if pixels_per_line > 0.0 {
            self.pixels_per_line = pixels_per_line;
        }
        self
    }

    /// The platform's modifier mask, as last reported by `winit`.
    pub fn modifiers(&self) -> ModKeyMask {
        self.modifiers
    }

    /// The scale factor used to convert cursor positions.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Translates one window event into consumer callbacks.
    ///
    /// ## Arguments
    /// * `window` - The id of the window the event belongs to.
    /// * `event` - The `winit` event.
    /// * `consumer` - Receives the raw callbacks.
    ///
    /// ## Returns
    /// * `Some(captured)` when the event produced at least one callback,
    ///   `captured` being `true` if any callback was claimed.
    /// * `None` for events that are not user input (resize, redraw, ...).
    pub fn dispatch<C: InputConsumer + ?Sized>(
        &mut self,
        window: WindowId,
        event: &WindowEvent,
        consumer: &mut C,
    ) -> Option<bool> {
        match event {
            WindowEvent::Focused(focused) => Some(consumer.on_window_focus(window, *focused)),
            WindowEvent::CursorEntered { .. } => Some(consumer.on_cursor_enter(window, true)),
            WindowEvent::CursorLeft { .. } => Some(consumer.on_cursor_enter(window, false)),
            WindowEvent::CursorMoved { position, .. } => {
                let x = position.x / self.scale_factor;
                let y = position.y / self.scale_factor;
                Some(consumer.on_cursor_pos(window, x, y))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let action = match state {
                    ElementState::Pressed => Action::Press,
                    ElementState::Released => Action::Release,
                };
                Some(consumer.on_mouse_button(
                    window,
                    map_mouse_button(*button),
                    action,
                    self.modifiers,
                ))
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (f64::from(*x), f64::from(*y)),
                    MouseScrollDelta::PixelDelta(pos) => {
                        (pos.x / self.pixels_per_line, pos.y / self.pixels_per_line)
                    }
                };
                Some(consumer.on_scroll(window, dx, dy))
            }
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                let action = match (key_event.state, key_event.repeat) {
                    (ElementState::Pressed, false) => Action::Press,
                    (ElementState::Pressed, true) => Action::Repeat,
                    (ElementState::Released, _) => Action::Release,
                };
                let (key, scancode) = match key_event.physical_key {
                    PhysicalKey::Code(code) => (
                        map_key_code(code),
                        key_event
                            .physical_key
                            .to_scancode()
                            .map_or(-1, |s| s as i32),
                    ),
                    PhysicalKey::Unidentified(_) => (Key::UNKNOWN, -1),
                };
                let mut captured = consumer.on_key(window, key, scancode, action, self.modifiers);

                if action.is_down() {
                    if let Some(text) = &key_event.text {
                        for codepoint in text.chars().filter(|c| !c.is_control()) {
                            captured |= consumer.on_char(window, codepoint);
                        }
                    }
                }
                Some(captured)
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = map_modifiers(modifiers.state());
                None
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = sanitize_scale(*scale_factor);
                None
            }
            _ => None,
        }
    }
}

impl Default for WinitInputTranslator {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn sanitize_scale(scale_factor: f64) -> f64 {
    if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        1.0
    }
}

/// Maps a `winit` modifier state to a [`ModKeyMask`].
pub fn map_modifiers(state: ModifiersState) -> ModKeyMask {
    let mut mods = ModKeyMask::EMPTY;
    mods.set(ModKeyMask::SHIFT, state.shift_key());
    mods.set(ModKeyMask::CONTROL, state.control_key());
    mods.set(ModKeyMask::ALT, state.alt_key());
    mods.set(ModKeyMask::SUPER, state.super_key());
    mods
}

/// Maps a `winit` mouse button to a numbered [`MouseButton`].
pub fn map_mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::LEFT,
        WinitMouseButton::Right => MouseButton::RIGHT,
        WinitMouseButton::Middle => MouseButton::MIDDLE,
        WinitMouseButton::Back => MouseButton::BACK,
        WinitMouseButton::Forward => MouseButton::FORWARD,
        WinitMouseButton::Other(id) => MouseButton(id.min(u16::from(u8::MAX)) as u8),
    }
}

/// Maps a physical `winit` key code to a [`Key`]. Keys without a
/// counterpart map to [`Key::UNKNOWN`].
pub fn map_key_code(code: KeyCode) -> Key {
    match code {
        KeyCode::Space => Key::SPACE,
        KeyCode::Quote => Key::APOSTROPHE,
        KeyCode::Comma => Key::COMMA,
        KeyCode::Minus => Key::MINUS,
        KeyCode::Period => Key::PERIOD,
        KeyCode::Slash => Key::SLASH,
        KeyCode::Digit0 => Key::NUM_0,
        KeyCode::Digit1 => Key::NUM_1,
        KeyCode::Digit2 => Key::NUM_2,
        KeyCode::Digit3 => Key::NUM_3,
        KeyCode::Digit4 => Key::NUM_4,
        KeyCode::Digit5 => Key::NUM_5,
        KeyCode::Digit6 => Key::NUM_6,
        KeyCode::Digit7 => Key::NUM_7,
        KeyCode::Digit8 => Key::NUM_8,
        KeyCode::Digit9 => Key::NUM_9,
        KeyCode::Semicolon => Key::SEMICOLON,
        KeyCode::Equal => Key::EQUAL,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::BracketLeft => Key::LEFT_BRACKET,
        KeyCode::Backslash => Key::BACKSLASH,
        KeyCode::BracketRight => Key::RIGHT_BRACKET,
        KeyCode::Backquote => Key::GRAVE_ACCENT,
        KeyCode::Escape => Key::ESCAPE,
        KeyCode::Enter => Key::ENTER,
        KeyCode::Tab => Key::TAB,
        KeyCode::Backspace => Key::BACKSPACE,
        KeyCode::Insert => Key::INSERT,
        KeyCode::Delete => Key::DELETE,
        KeyCode::ArrowRight => Key::RIGHT,
        KeyCode::ArrowLeft => Key::LEFT,
        KeyCode::ArrowDown => Key::DOWN,
        KeyCode::ArrowUp => Key::UP,
        KeyCode::PageUp => Key::PAGE_UP,
        KeyCode::PageDown => Key::PAGE_DOWN,
        KeyCode::Home => Key::HOME,
        KeyCode::End => Key::END,
        KeyCode::CapsLock => Key::CAPS_LOCK,
        KeyCode::ScrollLock => Key::SCROLL_LOCK,
        KeyCode::NumLock => Key::NUM_LOCK,
        KeyCode::PrintScreen => Key::PRINT_SCREEN,
        KeyCode::Pause => Key::PAUSE,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,
        KeyCode::Numpad0 => Key::KP_0,
        KeyCode::Numpad1 => Key::KP_1,
        KeyCode::Numpad2 => Key::KP_2,
        KeyCode::Numpad3 => Key::KP_3,
        KeyCode::Numpad4 => Key::KP_4,
        KeyCode::Numpad5 => Key::KP_5,
        KeyCode::Numpad6 => Key::KP_6,
        KeyCode::Numpad7 => Key::KP_7,
        KeyCode::Numpad8 => Key::KP_8,
        KeyCode::Numpad9 => Key::KP_9,
        KeyCode::NumpadDecimal => Key::KP_DECIMAL,
        KeyCode::NumpadDivide => Key::KP_DIVIDE,
        KeyCode::NumpadMultiply => Key::KP_MULTIPLY,
        KeyCode::NumpadSubtract => Key::KP_SUBTRACT,
        KeyCode::NumpadAdd => Key::KP_ADD,
        KeyCode::NumpadEnter => Key::KP_ENTER,
        KeyCode::NumpadEqual => Key::KP_EQUAL,
        KeyCode::ShiftLeft => Key::LEFT_SHIFT,
        KeyCode::ControlLeft => Key::LEFT_CONTROL,
        KeyCode::AltLeft => Key::LEFT_ALT,
        KeyCode::SuperLeft => Key::LEFT_SUPER,
        KeyCode::ShiftRight => Key::RIGHT_SHIFT,
        KeyCode::ControlRight => Key::RIGHT_CONTROL,
        KeyCode::AltRight => Key::RIGHT_ALT,
        KeyCode::SuperRight => Key::RIGHT_SUPER,
        KeyCode::ContextMenu => Key::MENU,
        _ => Key::UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_core::input::{EventKind, InputHandler, MouseButtonMask};
    use winit::dpi::PhysicalPosition;
    use winit::event::{DeviceId, TouchPhase};

    const WIN: WindowId = WindowId(3);

    #[test]
    fn test_map_key_code() {
        assert_eq!(map_key_code(KeyCode::KeyA), Key::A);
        assert_eq!(map_key_code(KeyCode::Digit1), Key::NUM_1);
        assert_eq!(map_key_code(KeyCode::ShiftRight), Key::RIGHT_SHIFT);
        assert_eq!(map_key_code(KeyCode::ContextMenu), Key::LAST);
        assert_eq!(map_key_code(KeyCode::F24), Key::UNKNOWN);
    }

    #[test]
    fn test_map_mouse_button() {
        assert_eq!(map_mouse_button(WinitMouseButton::Left), MouseButton::LEFT);
        assert_eq!(map_mouse_button(WinitMouseButton::Middle), MouseButton::MIDDLE);
        assert_eq!(map_mouse_button(WinitMouseButton::Forward), MouseButton::FORWARD);
        assert_eq!(map_mouse_button(WinitMouseButton::Other(6)), MouseButton(6));
        assert_eq!(map_mouse_button(WinitMouseButton::Other(900)), MouseButton(255));
    }

    #[test]
    fn test_map_modifiers() {
        let state = ModifiersState::SHIFT | ModifiersState::SUPER;
        assert_eq!(map_modifiers(state), ModKeyMask::SHIFT | ModKeyMask::SUPER);
        assert!(map_modifiers(ModifiersState::empty()).is_empty());
    }

    #[test]
    fn test_cursor_positions_are_logical() {
        let mut translator = WinitInputTranslator::new(2.0);
        let mut handler = InputHandler::standalone();
        let event = WindowEvent::CursorMoved {
            device_id: DeviceId::dummy(),
            position: PhysicalPosition::new(200.0, 100.0),
        };
        assert_eq!(translator.dispatch(WIN, &event, &mut handler), Some(false));
        assert_eq!(handler.state().mouse_pos(), Some((100.0, 50.0)));
    }

    #[test]
    fn test_pixel_scroll_is_converted_to_lines() {
        let mut translator = WinitInputTranslator::default().with_pixels_per_line(25.0);
        let mut handler = InputHandler::standalone();
        let event = WindowEvent::MouseWheel {
            device_id: DeviceId::dummy(),
            delta: MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -50.0)),
            phase: TouchPhase::Moved,
        };
        translator.dispatch(WIN, &event, &mut handler);
        assert!(matches!(
            handler.state().events()[0].kind,
            EventKind::Scroll { dx, dy, .. } if dx == 0.0 && dy == -2.0
        ));
    }

    #[test]
    fn test_focus_enter_and_buttons() {
        let mut translator = WinitInputTranslator::default();
        let mut handler = InputHandler::standalone();
        let press = WindowEvent::MouseInput {
            device_id: DeviceId::dummy(),
            state: ElementState::Pressed,
            button: WinitMouseButton::Right,
        };
        translator.dispatch(WIN, &WindowEvent::Focused(true), &mut handler);
        translator.dispatch(
            WIN,
            &WindowEvent::CursorEntered {
                device_id: DeviceId::dummy(),
            },
            &mut handler,
        );
        translator.dispatch(WIN, &press, &mut handler);

        assert_eq!(handler.state().event_index(), 3);
        assert_eq!(handler.state().buttons(), MouseButtonMask::RIGHT);
        assert!(matches!(
            handler.state().events()[1].kind,
            EventKind::CursorEnter { entered: true }
        ));
    }

    #[test]
    fn test_non_input_events_are_ignored() {
        let mut translator = WinitInputTranslator::default();
        let mut handler = InputHandler::standalone();
        let resize = WindowEvent::Resized(winit::dpi::PhysicalSize::new(100, 100));
        assert_eq!(translator.dispatch(WIN, &resize, &mut handler), None);
        assert_eq!(
            translator.dispatch(WIN, &WindowEvent::CloseRequested, &mut handler),
            None
        );
        assert_eq!(handler.state().event_index(), 0);
    }
}
