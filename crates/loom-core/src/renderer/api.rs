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

//! Handles and plain data exchanged with a [`UiRenderBackend`](super::UiRenderBackend).

/// An opaque handle to a GPU buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub usize);

/// An opaque handle to a GPU texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// An opaque handle to a material instance (scissor + texture binding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialInstanceId(pub usize);

/// A scissor rectangle in framebuffer pixels with a bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScissorRect {
    /// Left edge.
    pub x: i32,
    /// Bottom edge, measured from the bottom of the framebuffer.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

/// One renderable unit of a UI frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawBatch {
    /// First index in the shared index buffer.
    pub index_offset: u32,
    /// Number of indices.
    pub index_count: u32,
    /// Scissor, bottom-left origin.
    pub scissor: ScissorRect,
    /// Texture sampled by the batch.
    pub texture: TextureId,
    /// Material instance carrying scissor and texture.
    pub material: MaterialInstanceId,
    /// Draw position; lower first.
    pub blend_order: u32,
}

/// The data type of one vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    /// Two 32-bit floats.
    Float32x2,
    /// Four normalized unsigned bytes.
    Unorm8x4,
}

/// One attribute of an interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader location.
    pub location: u32,
    /// Byte offset inside the vertex.
    pub offset: u32,
    /// Data type.
    pub format: VertexFormat,
}

/// The layout of an interleaved vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    /// Bytes per vertex.
    pub stride: u32,
    /// Attributes, by location.
    pub attributes: &'static [VertexAttribute],
}

impl VertexLayout {
    /// Layout of [`DrawVertex`](crate::ui::DrawVertex): position, uv, color.
    pub const UI: VertexLayout = VertexLayout {
        stride: 20,
        attributes: &[
            VertexAttribute {
                location: 0,
                offset: 0,
                format: VertexFormat::Float32x2,
            },
            VertexAttribute {
                location: 1,
                offset: 8,
                format: VertexFormat::Float32x2,
            },
            VertexAttribute {
                location: 2,
                offset: 16,
                format: VertexFormat::Unorm8x4,
            },
        ],
    };
}

/// Width of the entries of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    /// 16-bit indices.
    Uint16,
    /// 32-bit indices.
    Uint32,
}

impl IndexFormat {
    /// Bytes per index.
    pub fn size(self) -> u64 {
        match self {
            IndexFormat::Uint16 => 2,
            IndexFormat::Uint32 => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::DrawVertex;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_ui_layout_matches_vertex() {
        assert_eq!(VertexLayout::UI.stride as usize, size_of::<DrawVertex>());
        assert_eq!(VertexLayout::UI.attributes[0].offset as usize, offset_of!(DrawVertex, pos));
        assert_eq!(VertexLayout::UI.attributes[1].offset as usize, offset_of!(DrawVertex, uv));
        assert_eq!(VertexLayout::UI.attributes[2].offset as usize, offset_of!(DrawVertex, color));
    }
}
