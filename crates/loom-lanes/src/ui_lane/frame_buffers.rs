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

use loom_core::renderer::{BufferId, IndexFormat, ResourceError, UiRenderBackend, VertexLayout};

#[derive(Debug, Clone, Copy)]
struct SizedBuffer {
    id: BufferId,
    capacity: usize,
}

/// The shared vertex and index buffers of the UI lane.
///
/// Capacities follow the high-water mark of the frame totals: buffers are
/// replaced by bigger ones when a frame does not fit and are never shrunk.
#[derive(Debug, Default)]
pub struct UiFrameBuffers {
    vertex: Option<SizedBuffer>,
    index: Option<SizedBuffer>,
}

impl UiFrameBuffers {
    /// Creates the pair with no GPU buffer allocated yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current vertex buffer.
    pub fn vertex_buffer(&self) -> Option<BufferId> {
        self.vertex.map(|b| b.id)
    }

    /// The current index buffer.
    pub fn index_buffer(&self) -> Option<BufferId> {
        self.index.map(|b| b.id)
    }

    /// Vertices the current vertex buffer can hold.
    pub fn vertex_capacity(&self) -> usize {
        self.vertex.map_or(0, |b| b.capacity)
    }

    /// Indices the current index buffer can hold.
    pub fn index_capacity(&self) -> usize {
        self.index.map_or(0, |b| b.capacity)
    }

    /// Makes room for `vertices` and `indices` entries.
    ///
    /// When either buffer must grow, waits for the GPU once, then replaces
    /// only the buffers that are too small.
    ///
    /// ## Returns
    /// * `Ok(true)` if a buffer was reallocated, `Ok(false)` if both fit.
    pub fn reserve(
        &mut self,
        backend: &dyn UiRenderBackend,
        vertices: usize,
        indices: usize,
    ) -> Result<bool, ResourceError> {
        let grow_vertex = self.vertex.is_none_or(|b| b.capacity < vertices);
        let grow_index = self.index.is_none_or(|b| b.capacity < indices);
        if !grow_vertex && !grow_index {
            return Ok(false);
        }

        backend.wait_for_gpu();

        if grow_vertex {
            if let Some(old) = self.vertex.take() {
                backend.destroy_buffer(old.id);
            }
            let id = backend.create_vertex_buffer(vertices, &VertexLayout::UI)?;
            log::debug!("UI vertex buffer grown to {vertices} vertices ({id:?})");
            self.vertex = Some(SizedBuffer {
                id,
                capacity: vertices,
            });
        }
        if grow_index {
            if let Some(old) = self.index.take() {
                backend.destroy_buffer(old.id);
            }
            let id = backend.create_index_buffer(indices, IndexFormat::Uint32)?;
            log::debug!("UI index buffer grown to {indices} indices ({id:?})");
            self.index = Some(SizedBuffer {
                id,
                capacity: indices,
            });
        }
        Ok(true)
    }

    /// Destroys both buffers.
    pub fn release(&mut self, backend: &dyn UiRenderBackend) {
        if let Some(b) = self.vertex.take() {
            backend.destroy_buffer(b.id);
        }
        if let Some(b) = self.index.take() {
            backend.destroy_buffer(b.id);
        }
    }
}
