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

//! Adapters between `egui` and the `loom-core` input and draw contracts.

pub mod egui_draw;
pub mod egui_input;
pub mod egui_textures;
pub mod fonts;

pub use egui_draw::{to_draw_data, UiCallback};
pub use egui_input::EguiInput;
pub use egui_textures::EguiTextures;
pub use fonts::FontRegistry;
