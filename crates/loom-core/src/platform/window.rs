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

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::collections::HashMap;
use std::sync::Arc;

/// Combines the windowing handle traits required by graphics backends into
/// one object-safe trait.
pub trait WindowHandle: HasWindowHandle + HasDisplayHandle {}

impl<T: HasWindowHandle + HasDisplayHandle> WindowHandle for T {}

/// A thread-safe, shared handle to a native window, as needed to create a
/// rendering surface.
pub type LoomWindowHandle = Arc<dyn WindowHandle + Send + Sync>;

/// An opaque, stable identifier of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

/// A trait that abstracts the behavior of a window.
///
/// Any windowing backend can implement this trait to host a Loom
/// application.
pub trait LoomWindow: HasWindowHandle + HasDisplayHandle + Send + Sync {
    /// Returns the physical dimensions (width, height) of the window's inner area.
    fn inner_size(&self) -> (u32, u32);

    /// Returns the scale factor between logical and physical pixels.
    fn scale_factor(&self) -> f64;

    /// Requests that the window be redrawn.
    fn request_redraw(&self);

    /// Clones an Arc'd, thread-safe handle to the window.
    fn clone_handle_arc(&self) -> LoomWindowHandle;

    /// Returns the unique identifier for the window.
    fn id(&self) -> WindowId;
}

/// Associates per-window state with window ids.
///
/// Raw callbacks carry only the id of the window they came from; the
/// dispatcher looks the target context up here instead of keeping a pointer
/// inside the native window.
#[derive(Debug)]
pub struct WindowContextMap<T> {
    contexts: HashMap<WindowId, T>,
}

impl<T> WindowContextMap<T> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            contexts: HashMap::new(),
        }
    }

    /// Attaches `context` to `window`, returning the context it replaces.
    pub fn attach(&mut self, window: WindowId, context: T) -> Option<T> {
        log::debug!("Attaching input context to window {window:?}");
        self.contexts.insert(window, context)
    }

    /// Detaches and returns the context of `window`.
    pub fn detach(&mut self, window: WindowId) -> Option<T> {
        log::debug!("Detaching input context from window {window:?}");
        self.contexts.remove(&window)
    }

    /// The context attached to `window`.
    pub fn get(&self, window: WindowId) -> Option<&T> {
        self.contexts.get(&window)
    }

    /// The context attached to `window`, mutably.
    pub fn get_mut(&mut self, window: WindowId) -> Option<&mut T> {
        self.contexts.get_mut(&window)
    }

    /// Runs `f` on the context of `window`. Callbacks for unknown windows
    /// are dropped and yield `None`.
    pub fn dispatch<R>(&mut self, window: WindowId, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        match self.contexts.get_mut(&window) {
            Some(context) => Some(f(context)),
            None => {
                log::trace!("Dropping callback for unregistered window {window:?}");
                None
            }
        }
    }

    /// Iterates over every attached context.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (WindowId, &mut T)> {
        self.contexts.iter_mut().map(|(id, c)| (*id, c))
    }

    /// Number of attached windows.
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// `true` when no window is attached.
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

impl<T> Default for WindowContextMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputConsumer, InputHandler};

    #[test]
    fn test_dispatch_reaches_the_attached_context() {
        let mut map = WindowContextMap::new();
        map.attach(WindowId(1), InputHandler::standalone());
        map.attach(WindowId(2), InputHandler::standalone());

        let captured = map.dispatch(WindowId(2), |h| h.on_char(WindowId(2), 'k'));
        assert_eq!(captured, Some(false));
        assert_eq!(map.get(WindowId(2)).map(|h| h.state().event_index()), Some(1));
        assert_eq!(map.get(WindowId(1)).map(|h| h.state().event_index()), Some(0));
    }

    #[test]
    fn test_unknown_window_is_ignored() {
        let mut map: WindowContextMap<InputHandler> = WindowContextMap::new();
        assert!(map.dispatch(WindowId(9), |h| h.on_char(WindowId(9), 'k')).is_none());

        map.attach(WindowId(9), InputHandler::standalone());
        assert!(map.detach(WindowId(9)).is_some());
        assert!(map.is_empty());
    }
}
