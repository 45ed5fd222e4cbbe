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

//! A frame loop over two windows, each with its own chain of consumers.

use loom_core::input::{
    Action, ConsumerChain, EventKind, EventKinds, InputConsumer, InputHandler, Key, ModKeyMask,
    MouseButton,
};
use loom_core::platform::window::{WindowContextMap, WindowId};
use std::cell::Cell;
use std::rc::Rc;

/// Claims keyboard input while its shared flag says a text field has focus.
struct TextField {
    editing: Rc<Cell<bool>>,
    typed: Rc<Cell<usize>>,
}

impl InputConsumer for TextField {
    fn on_key(&mut self, _: WindowId, _: Key, _: i32, _: Action, _: ModKeyMask) -> bool {
        self.editing.get()
    }

    fn on_char(&mut self, _: WindowId, _: char) -> bool {
        if self.editing.get() {
            self.typed.set(self.typed.get() + 1);
        }
        self.editing.get()
    }
}

/// Claims pointer input over a panel in the top-left corner.
struct Panel;

impl InputConsumer for Panel {
    fn on_cursor_pos(&mut self, _: WindowId, x: f64, y: f64) -> bool {
        x < 100.0 && y < 100.0
    }
}

const MAIN: WindowId = WindowId(1);
const TOOLS: WindowId = WindowId(2);

fn press(handler: &mut impl InputConsumer, window: WindowId, key: Key, action: Action) -> bool {
    handler.on_key(window, key, 0, action, ModKeyMask::EMPTY)
}

#[test]
fn windows_keep_separate_input_across_frames() {
    let editing = Rc::new(Cell::new(false));
    let typed = Rc::new(Cell::new(0));

    let mut windows = WindowContextMap::new();
    windows.attach(
        MAIN,
        InputHandler::new(ConsumerChain::new().with(Panel).with(TextField {
            editing: editing.clone(),
            typed: typed.clone(),
        })),
    );
    windows.attach(TOOLS, InputHandler::new(ConsumerChain::new()));

    // Frame 1: W goes down in the main window, the cursor moves over the panel.
    windows.dispatch(MAIN, |h| press(h, MAIN, Key::W, Action::Press));
    windows.dispatch(MAIN, |h| h.on_cursor_pos(MAIN, 50.0, 50.0));
    windows.dispatch(TOOLS, |h| h.on_cursor_pos(TOOLS, 10.0, 10.0));

    let main = windows.get(MAIN).unwrap().state();
    assert_eq!(main.axis(Key::S, Key::W), 1);
    assert_eq!(main.events().len(), 1);
    assert_eq!(main.all_events().len(), 2);
    assert_eq!(main.mouse_pos(), Some((50.0, 50.0)));

    let tools = windows.get(TOOLS).unwrap().state();
    assert_eq!(tools.events_of(EventKinds::CURSOR_POS).count(), 1);
    assert_eq!(tools.axis(Key::S, Key::W), 0);

    for (_, handler) in windows.iter_mut() {
        handler.clear_events();
    }

    // Frame 2: a text field takes focus; typing is claimed, W stays held.
    editing.set(true);
    windows.dispatch(MAIN, |h| press(h, MAIN, Key::A, Action::Press));
    windows.dispatch(MAIN, |h| h.on_char(MAIN, 'a'));
    windows.dispatch(MAIN, |h| h.on_mouse_button(MAIN, MouseButton::LEFT, Action::Press, ModKeyMask::EMPTY));

    let main = windows.get(MAIN).unwrap().state();
    assert_eq!(typed.get(), 1);
    assert_eq!(main.axis(Key::S, Key::W), 1);
    assert_eq!(main.axis(Key::A, Key::D), 0);
    assert_eq!(main.all_axis(Key::A, Key::D), -1);
    assert_eq!(main.events().len(), 1);
    assert!(matches!(
        main.events()[0].kind,
        EventKind::MouseButton {
            button: MouseButton::LEFT,
            action: Action::Press,
            ..
        }
    ));
    assert!(main.buttons().is_held(MouseButton::LEFT));
    assert_eq!(main.event_index(), 5);

    // Frame 3: the field loses focus; releasing A is no longer claimed.
    windows.dispatch(MAIN, |h| h.clear_events());
    editing.set(false);
    let captured = windows.dispatch(MAIN, |h| press(h, MAIN, Key::A, Action::Release));
    assert_eq!(captured, Some(false));
    let main = windows.get(MAIN).unwrap().state();
    assert_eq!(main.all_axis(Key::A, Key::D), 0);
    assert_eq!(main.events_of(EventKinds::KEY).count(), 1);
    assert_eq!(main.events_of(EventKinds::CHAR | EventKinds::SCROLL).count(), 0);
}

#[test]
fn dispatch_to_a_detached_window_is_dropped() {
    let mut windows = WindowContextMap::new();
    windows.attach(MAIN, InputHandler::standalone());
    let handler = windows.detach(MAIN).unwrap();
    assert_eq!(handler.state().event_index(), 0);

    let delivered = windows.dispatch(MAIN, |h| h.on_scroll(MAIN, 0.0, 1.0));
    assert_eq!(delivered, None);
    assert!(windows.is_empty());
}
