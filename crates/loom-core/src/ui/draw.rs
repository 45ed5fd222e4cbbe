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

use crate::renderer::TextureId;
use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::sync::Arc;

/// A UI vertex: position in logical points, atlas uv, packed RGBA color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DrawVertex {
    /// Position, in logical points.
    pub pos: [f32; 2],
    /// Texture coordinates.
    pub uv: [f32; 2],
    /// Premultiplied sRGBA color.
    pub color: [u8; 4],
}

/// Index type of every UI draw list.
pub type DrawIndex = u32;

/// A clip rectangle in framebuffer pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipRect {
    /// Left edge.
    pub min_x: f32,
    /// Top edge.
    pub min_y: f32,
    /// Right edge.
    pub max_x: f32,
    /// Bottom edge.
    pub max_y: f32,
}

impl ClipRect {
    /// Builds a rectangle from its corners.
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Scales every edge, e.g. from logical points to framebuffer pixels.
    pub fn scaled(self, sx: f32, sy: f32) -> Self {
        Self::new(
            self.min_x * sx,
            self.min_y * sy,
            self.max_x * sx,
            self.max_y * sy,
        )
    }

    /// Width, never negative.
    pub fn width(&self) -> f32 {
        (self.max_x - self.min_x).max(0.0)
    }

    /// Height, never negative.
    pub fn height(&self) -> f32 {
        (self.max_y - self.min_y).max(0.0)
    }
}

/// A user hook run in place of a draw call, in draw order.
pub type DrawCallback = Arc<dyn Fn(&DrawList, &DrawCmd) + Send + Sync>;

/// One draw call of a [`DrawList`].
#[derive(Clone, Default)]
pub struct DrawCmd {
    /// Clip rectangle in logical points, top-left origin. The translator
    /// scales it by the display's framebuffer scale.
    pub clip_rect: ClipRect,
    /// Number of indices drawn.
    pub elem_count: u32,
    /// First index, relative to the start of the list's index buffer.
    pub idx_offset: u32,
    /// Texture to sample, `None` for the font atlas.
    pub texture: Option<TextureId>,
    /// When set, the command draws nothing and the callback runs instead.
    pub callback: Option<DrawCallback>,
}

impl fmt::Debug for DrawCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawCmd")
            .field("clip_rect", &self.clip_rect)
            .field("elem_count", &self.elem_count)
            .field("idx_offset", &self.idx_offset)
            .field("texture", &self.texture)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// A self-contained layer of UI geometry: local vertices, indices into
/// them and the draw calls that consume the indices.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    /// Vertices, indexed from 0 for this list.
    pub vertices: Vec<DrawVertex>,
    /// Triangle indices into `vertices`.
    pub indices: Vec<DrawIndex>,
    /// Draw calls, in order.
    pub cmds: Vec<DrawCmd>,
}

/// The display the UI is rendered for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayParams {
    /// Size in logical points.
    pub size: [f32; 2],
    /// Framebuffer pixels per logical point, per axis.
    pub framebuffer_scale: [f32; 2],
}

impl DisplayParams {
    /// Framebuffer size in whole pixels.
    pub fn size_px(&self) -> (u32, u32) {
        let w = (self.size[0] * self.framebuffer_scale[0]).max(0.0) as u32;
        let h = (self.size[1] * self.framebuffer_scale[1]).max(0.0) as u32;
        (w, h)
    }
}

/// A whole UI frame.
#[derive(Debug, Clone, Default)]
pub struct DrawData {
    /// Layers, back to front.
    pub lists: Vec<DrawList>,
    /// `false` when the UI library changed its fonts and the atlas must be
    /// rebuilt before the next frame.
    pub fonts_built: bool,
}

impl DrawData {
    /// Sum of vertex counts over every list.
    pub fn total_vertices(&self) -> usize {
        self.lists.iter().map(|l| l.vertices.len()).sum()
    }

    /// Sum of index counts over every list.
    pub fn total_indices(&self) -> usize {
        self.lists.iter().map(|l| l.indices.len()).sum()
    }

    /// Sum of draw calls over every list.
    pub fn total_cmds(&self) -> usize {
        self.lists.iter().map(|l| l.cmds.len()).sum()
    }
}

/// The UI library's font atlas, as RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontAtlasImage {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Row-major RGBA8 texels, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl FontAtlasImage {
    /// Wraps RGBA8 pixels. Returns `None` when the length does not match.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize * 4).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Writes a sub-image at `(x, y)`, clipped to the atlas bounds.
    pub fn blit(&mut self, x: u32, y: u32, width: u32, pixels: &[u8]) {
        let row_bytes = width as usize * 4;
        if row_bytes == 0 {
            return;
        }
        for (row, src) in pixels.chunks_exact(row_bytes).enumerate() {
            let dy = y as usize + row;
            if dy >= self.height as usize || x >= self.width {
                break;
            }
            let copy_px = (self.width - x).min(width) as usize;
            let start = (dy * self.width as usize + x as usize) * 4;
            self.pixels[start..start + copy_px * 4].copy_from_slice(&src[..copy_px * 4]);
        }
    }
}
