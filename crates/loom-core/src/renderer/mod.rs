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

//! The renderer-side contract of the UI lane.
//!
//! A [`UiRenderBackend`] owns GPU resources behind opaque ids; the lane only
//! ever talks to it through this module's types.

pub mod api;
pub mod error;
pub mod traits;

pub use api::{
    BufferId, DrawBatch, IndexFormat, MaterialInstanceId, ScissorRect, TextureId, VertexAttribute,
    VertexFormat, VertexLayout,
};
pub use error::{RenderError, ResourceError};
pub use traits::UiRenderBackend;
