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

//! The input event pipeline: typed events, rolling device state and the
//! capture chain shared with the UI library's input backend.

pub mod consumer;
pub mod event;
pub mod handler;
pub mod keyboard;
pub mod keys;
pub mod masks;
pub mod state;

pub use consumer::{ConsumerChain, InputConsumer, NoOpConsumer};
pub use event::{Event, EventKind, EventKinds};
pub use handler::InputHandler;
pub use keyboard::KeyTable;
pub use keys::{Action, Key, MouseButton};
pub use masks::{ModKeyMask, MouseButtonMask};
pub use state::InputState;
