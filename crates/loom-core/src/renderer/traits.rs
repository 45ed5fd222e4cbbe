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

//! The abstract renderer the UI lane drives.

use super::api::{
    BufferId, DrawBatch, IndexFormat, MaterialInstanceId, ScissorRect, TextureId, VertexLayout,
};
use super::error::ResourceError;

/// The renderer operations the UI lane relies on.
///
/// Implementations own every GPU object and hand out opaque ids. Methods
/// take `&self` so a single backend can be shared (`Arc`) between the UI
/// lane, texture synchronisation and the frame loop; implementations use
/// interior mutability for their resource tables.
///
/// Destroying an unknown id is a no-op, mirroring how graphics engines
/// accept null handles.
pub trait UiRenderBackend: Send + Sync {
    /// Allocates a vertex buffer for `vertex_count` vertices of `layout`.
    fn create_vertex_buffer(
        &self,
        vertex_count: usize,
        layout: &VertexLayout,
    ) -> Result<BufferId, ResourceError>;

    /// Allocates an index buffer for `index_count` indices.
    fn create_index_buffer(
        &self,
        index_count: usize,
        format: IndexFormat,
    ) -> Result<BufferId, ResourceError>;

    /// Schedules a copy of `bytes` to the start of a buffer.
    ///
    /// ## Errors
    /// * [`ResourceError::OutOfBounds`] when `bytes` exceeds the buffer size.
    fn upload_buffer(&self, buffer: BufferId, bytes: &[u8]) -> Result<(), ResourceError>;

    /// Releases a buffer.
    fn destroy_buffer(&self, buffer: BufferId);

    /// Creates an RGBA8 texture sampled with linear filtering and uploads
    /// `pixels` into it.
    fn create_texture_rgba8(
        &self,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureId, ResourceError>;

    /// Overwrites a region of an RGBA8 texture.
    fn update_texture_rgba8(
        &self,
        texture: TextureId,
        origin: [u32; 2],
        size: [u32; 2],
        pixels: &[u8],
    ) -> Result<(), ResourceError>;

    /// Releases a texture.
    fn destroy_texture(&self, texture: TextureId);

    /// Creates a material instance of the UI material.
    fn create_material_instance(&self) -> Result<MaterialInstanceId, ResourceError>;

    /// Releases a material instance.
    fn destroy_material_instance(&self, material: MaterialInstanceId);

    /// Sets the scissor of a material instance.
    fn set_scissor(&self, material: MaterialInstanceId, scissor: ScissorRect);

    /// Binds the sampled texture of a material instance.
    fn set_texture(
        &self,
        material: MaterialInstanceId,
        texture: TextureId,
    ) -> Result<(), ResourceError>;

    /// Sets the UI viewport to `size_px` framebuffer pixels and the
    /// orthographic projection to `[0, logical_size]` with y pointing down.
    fn configure_view(&self, size_px: (u32, u32), logical_size: [f32; 2]);

    /// Drops the renderable built for the previous frame, if any.
    fn clear_renderable(&self);

    /// Replaces the UI renderable with `batches` drawn from the given
    /// buffers, in ascending blend order.
    fn build_renderable(
        &self,
        vertex_buffer: BufferId,
        index_buffer: BufferId,
        batches: &[DrawBatch],
    ) -> Result<(), ResourceError>;

    /// Blocks until the GPU finished every submitted command (fence).
    fn wait_for_gpu(&self);
}
