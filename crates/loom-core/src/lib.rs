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

//! # Loom Core
//!
//! Foundational crate containing the backend-agnostic types and interface
//! contracts shared by the input pipeline, the UI draw translator and the
//! renderer backends.

#![warn(missing_docs)]

pub mod input;
pub mod platform;
pub mod renderer;
pub mod ui;
pub mod utils;

pub use input::{Event, EventKind, InputConsumer, InputHandler, InputState};
pub use platform::window::WindowId;
