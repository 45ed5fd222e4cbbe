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

//! UI lane - converts immediate-mode draw lists into renderer batches.
//!
//! The renderer cannot offset into a shared vertex buffer per batch, so the
//! lane concatenates every list into one vertex/index buffer pair and
//! rewrites the indices of all lists after the first.

mod frame_buffers;
mod material_pool;
mod translator;

pub use frame_buffers::UiFrameBuffers;
pub use material_pool::MaterialInstancePool;
pub use translator::{scissor_for, UiDrawTranslator};
