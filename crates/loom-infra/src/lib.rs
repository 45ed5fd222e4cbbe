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

//! # Loom Infra
//!
//! Concrete adapters behind the `loom-core` contracts: the `winit` window
//! and input translation, the `egui` input backend, draw-data conversion
//! and texture synchronisation, and the `wgpu` UI render backend.

pub mod graphics;
pub mod platform;
pub mod ui;

pub use graphics::wgpu::{WgpuGraphicsContext, WgpuUiBackend};
pub use platform::input::WinitInputTranslator;
pub use platform::window::{WinitWindow, WinitWindowBuilder};
pub use ui::{EguiInput, EguiTextures};
