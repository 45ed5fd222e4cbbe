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

//! The `egui` input backend, exposed as an [`InputConsumer`].
//!
//! Raw callbacks are converted into `egui` events that are handed to the
//! context with the next frame's [`egui::RawInput`]. The capture answer is
//! the context's own "wants input" query, as of the last finished frame.

use egui::{pos2, vec2, Modifiers, MouseWheelUnit, PointerButton, Pos2, Rect};
use loom_core::input::{Action, InputConsumer, Key, ModKeyMask, MouseButton};
use loom_core::platform::window::WindowId;
use std::time::Instant;

/// Feeds raw input to an `egui` context and reports what it captures.
pub struct EguiInput {
    ctx: egui::Context,
    events: Vec<egui::Event>,
    pointer_pos: Option<Pos2>,
    modifiers: Modifiers,
    focused: bool,
    start: Instant,
}

impl EguiInput {
    /// Creates the backend for `ctx`.
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            events: Vec::new(),
            pointer_pos: None,
            modifiers: Modifiers::default(),
            focused: true,
            start: Instant::now(),
        }
    }

    /// The `egui` context fed by this backend.
    pub fn context(&self) -> &egui::Context {
        &self.ctx
    }

    /// Number of events waiting for the next frame.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Drains the queued events into the input of a new frame.
    ///
    /// ## Arguments
    /// * `screen_size` - Display size in logical points.
    /// * `pixels_per_point` - Framebuffer pixels per logical point.
    pub fn take_raw_input(&mut self, screen_size: [f32; 2], pixels_per_point: f32) -> egui::RawInput {
        let mut raw = egui::RawInput {
            screen_rect: Some(Rect::from_min_size(
                Pos2::ZERO,
                vec2(screen_size[0], screen_size[1]),
            )),
            time: Some(self.start.elapsed().as_secs_f64()),
            modifiers: self.modifiers,
            focused: self.focused,
            events: std::mem::take(&mut self.events),
            ..Default::default()
        };
        raw.viewports
            .entry(egui::ViewportId::ROOT)
            .or_default()
            .native_pixels_per_point = Some(pixels_per_point);
        raw
    }

    fn wants_pointer(&self) -> bool {
        self.ctx.wants_pointer_input()
    }

    fn wants_keyboard(&self) -> bool {
        self.ctx.wants_keyboard_input()
    }
}

impl std::fmt::Debug for EguiInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EguiInput")
            .field("pending_events", &self.events.len())
            .field("pointer_pos", &self.pointer_pos)
            .field("focused", &self.focused)
            .finish()
    }
}

impl InputConsumer for EguiInput {
    fn on_window_focus(&mut self, _window: WindowId, focused: bool) -> bool {
        self.focused = focused;
        self.events.push(egui::Event::WindowFocused(focused));
        false
    }

    fn on_cursor_enter(&mut self, _window: WindowId, entered: bool) -> bool {
        if !entered {
            self.pointer_pos = None;
            self.events.push(egui::Event::PointerGone);
        }
        false
    }

    fn on_cursor_pos(&mut self, _window: WindowId, x: f64, y: f64) -> bool {
        let pos = pos2(x as f32, y as f32);
        self.pointer_pos = Some(pos);
        self.events.push(egui::Event::PointerMoved(pos));
        self.wants_pointer()
    }

    fn on_mouse_button(
        &mut self,
        _window: WindowId,
        button: MouseButton,
        action: Action,
        mods: ModKeyMask,
    ) -> bool {
        self.modifiers = to_egui_modifiers(mods);
        if let (Some(button), Some(pos)) = (to_egui_button(button), self.pointer_pos) {
            self.events.push(egui::Event::PointerButton {
                pos,
                button,
                pressed: action.is_down(),
                modifiers: self.modifiers,
            });
        }
        self.wants_pointer()
    }

    fn on_scroll(&mut self, _window: WindowId, dx: f64, dy: f64) -> bool {
        self.events.push(egui::Event::MouseWheel {
            unit: MouseWheelUnit::Line,
            delta: vec2(dx as f32, dy as f32),
            modifiers: self.modifiers,
        });
        self.wants_pointer()
    }

    fn on_key(
        &mut self,
        _window: WindowId,
        key: Key,
        _scancode: i32,
        action: Action,
        mods: ModKeyMask,
    ) -> bool {
        self.modifiers = to_egui_modifiers(mods);
        if let Some(egui_key) = to_egui_key(key) {
            let pressed = action.is_down();
            if pressed && self.modifiers.command {
                match egui_key {
                    egui::Key::C => self.events.push(egui::Event::Copy),
                    egui::Key::X => self.events.push(egui::Event::Cut),
                    _ => {}
                }
            }
            self.events.push(egui::Event::Key {
                key: egui_key,
                physical_key: Some(egui_key),
                pressed,
                repeat: action == Action::Repeat,
                modifiers: self.modifiers,
            });
        }
        self.wants_keyboard()
    }

    fn on_char(&mut self, _window: WindowId, codepoint: char) -> bool {
        if !codepoint.is_control() {
            self.events.push(egui::Event::Text(codepoint.to_string()));
        }
        self.wants_keyboard()
    }
}

/// Converts a modifier mask into `egui` modifiers.
pub fn to_egui_modifiers(mods: ModKeyMask) -> Modifiers {
    let mac = cfg!(target_os = "macos");
    Modifiers {
        alt: mods.has_alt(),
        ctrl: mods.has_control(),
        shift: mods.has_shift(),
        mac_cmd: mac && mods.has_super(),
        command: if mac {
            mods.has_super()
        } else {
            mods.has_control()
        },
    }
}

/// Maps a numbered mouse button to an `egui` pointer button.
pub fn to_egui_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::LEFT => Some(PointerButton::Primary),
        MouseButton::RIGHT => Some(PointerButton::Secondary),
        MouseButton::MIDDLE => Some(PointerButton::Middle),
        MouseButton::BACK => Some(PointerButton::Extra1),
        MouseButton::FORWARD => Some(PointerButton::Extra2),
        _ => None,
    }
}

/// Maps a key code to the `egui` key it stands for, if any.
pub fn to_egui_key(key: Key) -> Option<egui::Key> {
    use egui::Key as E;
    let mapped = match key {
        Key::A => E::A,
        Key::B => E::B,
        Key::C => E::C,
        Key::D => E::D,
        Key::E => E::E,
        Key::F => E::F,
        Key::G => E::G,
        Key::H => E::H,
        Key::I => E::I,
        Key::J => E::J,
        Key::K => E::K,
        Key::L => E::L,
        Key::M => E::M,
        Key::N => E::N,
        Key::O => E::O,
        Key::P => E::P,
        Key::Q => E::Q,
        Key::R => E::R,
        Key::S => E::S,
        Key::T => E::T,
        Key::U => E::U,
        Key::V => E::V,
        Key::W => E::W,
        Key::X => E::X,
        Key::Y => E::Y,
        Key::Z => E::Z,
        Key::NUM_0 | Key::KP_0 => E::Num0,
        Key::NUM_1 | Key::KP_1 => E::Num1,
        Key::NUM_2 | Key::KP_2 => E::Num2,
        Key::NUM_3 | Key::KP_3 => E::Num3,
        Key::NUM_4 | Key::KP_4 => E::Num4,
        Key::NUM_5 | Key::KP_5 => E::Num5,
        Key::NUM_6 | Key::KP_6 => E::Num6,
        Key::NUM_7 | Key::KP_7 => E::Num7,
        Key::NUM_8 | Key::KP_8 => E::Num8,
        Key::NUM_9 | Key::KP_9 => E::Num9,
        Key::ESCAPE => E::Escape,
        Key::ENTER | Key::KP_ENTER => E::Enter,
        Key::TAB => E::Tab,
        Key::BACKSPACE => E::Backspace,
        Key::INSERT => E::Insert,
        Key::DELETE => E::Delete,
        Key::RIGHT => E::ArrowRight,
        Key::LEFT => E::ArrowLeft,
        Key::DOWN => E::ArrowDown,
        Key::UP => E::ArrowUp,
        Key::PAGE_UP => E::PageUp,
        Key::PAGE_DOWN => E::PageDown,
        Key::HOME => E::Home,
        Key::END => E::End,
        Key::SPACE => E::Space,
        Key::MINUS | Key::KP_SUBTRACT => E::Minus,
        Key::EQUAL | Key::KP_EQUAL => E::Equals,
        Key::KP_ADD => E::Plus,
        Key::COMMA => E::Comma,
        Key::PERIOD | Key::KP_DECIMAL => E::Period,
        Key::SLASH | Key::KP_DIVIDE => E::Slash,
        Key::BACKSLASH => E::Backslash,
        Key::SEMICOLON => E::Semicolon,
        Key::LEFT_BRACKET => E::OpenBracket,
        Key::RIGHT_BRACKET => E::CloseBracket,
        Key::GRAVE_ACCENT => E::Backtick,
        Key::F1 => E::F1,
        Key::F2 => E::F2,
        Key::F3 => E::F3,
        Key::F4 => E::F4,
        Key::F5 => E::F5,
        Key::F6 => E::F6,
        Key::F7 => E::F7,
        Key::F8 => E::F8,
        Key::F9 => E::F9,
        Key::F10 => E::F10,
        Key::F11 => E::F11,
        Key::F12 => E::F12,
        _ => return None,
    };
    Some(mapped)
}
