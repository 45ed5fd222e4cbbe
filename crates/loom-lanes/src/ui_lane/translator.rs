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

//! Implements the per-frame translation of UI draw data into renderer batches.

use super::{MaterialInstancePool, UiFrameBuffers};
use loom_core::{
    renderer::{DrawBatch, ResourceError, ScissorRect, TextureId, UiRenderBackend},
    ui::{ClipRect, DisplayParams, DrawData, DrawIndex, DrawVertex, FontAtlasImage},
};
use std::sync::Arc;

/// Converts a top-left-origin clip rectangle into a bottom-left-origin
/// scissor for a framebuffer `height_px` pixels tall.
pub fn scissor_for(clip: &ClipRect, height_px: u32) -> ScissorRect {
    ScissorRect {
        x: clip.min_x as i32,
        y: (height_px as f32 - clip.max_y) as i32,
        width: clip.width() as u32,
        height: clip.height() as u32,
    }
}

/// Owns the renderer-side state of the UI and rebuilds its renderable each
/// frame.
///
/// The translator keeps the font atlas texture, the grow-only vertex and
/// index buffers, the material instance pool and CPU copies of the frame's
/// geometry. Every backend resource it created is released on drop.
pub struct UiDrawTranslator {
    backend: Arc<dyn UiRenderBackend>,
    buffers: UiFrameBuffers,
    materials: MaterialInstancePool,
    font_atlas: Option<TextureId>,
    vertex_data: Vec<DrawVertex>,
    index_data: Vec<DrawIndex>,
    batches: Vec<DrawBatch>,
}

impl UiDrawTranslator {
    /// Creates a translator drawing through `backend`. No GPU resource is
    /// allocated until the first frame.
    pub fn new(backend: Arc<dyn UiRenderBackend>) -> Self {
        Self {
            backend,
            buffers: UiFrameBuffers::new(),
            materials: MaterialInstancePool::new(),
            font_atlas: None,
            vertex_data: Vec::new(),
            index_data: Vec::new(),
            batches: Vec::new(),
        }
    }

    /// Replaces the font atlas texture.
    ///
    /// Waits for the GPU first, since the previous frame may still sample
    /// the old atlas. Must not be called between the UI library's
    /// frame-begin and frame-end.
    ///
    /// ## Arguments
    /// * `image` - The atlas as produced by the UI library.
    ///
    /// ## Returns
    /// * The id of the new atlas texture, also used as the fallback texture
    ///   of draw calls that do not name one.
    pub fn rebuild_font_atlas(&mut self, image: &FontAtlasImage) -> Result<TextureId, ResourceError> {
        self.backend.wait_for_gpu();
        if let Some(old) = self.font_atlas.take() {
            self.backend.destroy_texture(old);
        }
        let texture = self.backend.create_texture_rgba8(
            "UI Font Atlas",
            image.width,
            image.height,
            &image.pixels,
        )?;
        log::info!(
            "UI font atlas rebuilt: {}x{} ({texture:?})",
            image.width,
            image.height
        );
        self.font_atlas = Some(texture);
        Ok(texture)
    }

    /// The current font atlas texture.
    pub fn font_atlas(&self) -> Option<TextureId> {
        self.font_atlas
    }

    /// Rebuilds the UI renderable from a frame's draw data.
    ///
    /// ## Arguments
    /// * `draw_data` - The frame's draw lists, clip rects in logical points.
    /// * `display` - The logical display size and framebuffer scale. Clip
    ///   rects are scaled by `framebuffer_scale` before the scissor is taken.
    ///
    /// ## Errors
    /// Returns the backend's [`ResourceError`] when a buffer, material
    /// instance or upload fails. The frame is then left without renderable
    /// and without batches.
    pub fn update_view(
        &mut self,
        draw_data: &DrawData,
        display: &DisplayParams,
    ) -> Result<(), ResourceError> {
        let (width_px, height_px) = display.size_px();
        if width_px == 0 || height_px == 0 {
            return Ok(());
        }

        self.backend.configure_view((width_px, height_px), display.size);

        self.backend.clear_renderable();
        self.batches.clear();
        if draw_data.lists.is_empty() {
            return Ok(());
        }

        let result = self.fill_frame(draw_data, display.framebuffer_scale, height_px);
        if result.is_err() {
            self.batches.clear();
            self.backend.clear_renderable();
        }
        result
    }

    fn fill_frame(
        &mut self,
        draw_data: &DrawData,
        [scale_x, scale_y]: [f32; 2],
        height_px: u32,
    ) -> Result<(), ResourceError> {
        if !draw_data.fonts_built {
            log::warn!(
                "UI fonts are not built: rebuild the font atlas before the UI frame begins \
                 when fonts were added or changed"
            );
        }

        let total_vertices = draw_data.total_vertices();
        let total_indices = draw_data.total_indices();
        self.buffers
            .reserve(&*self.backend, total_vertices, total_indices)?;
        self.materials
            .grow_to(&*self.backend, draw_data.total_cmds())?;

        self.vertex_data.clear();
        self.index_data.clear();
        self.vertex_data.reserve(total_vertices);
        self.index_data.reserve(total_indices);

        let mut vertex_offset: u32 = 0;
        let mut index_offset: u32 = 0;
        for (list_index, list) in draw_data.lists.iter().enumerate() {
            self.vertex_data.extend_from_slice(&list.vertices);
            if list_index == 0 {
                self.index_data.extend_from_slice(&list.indices);
            } else {
                self.index_data
                    .extend(list.indices.iter().map(|i| i + vertex_offset));
            }

            for cmd in &list.cmds {
                if let Some(callback) = &cmd.callback {
                    callback(list, cmd);
                    continue;
                }

                let Some(texture) = cmd.texture.or(self.font_atlas) else {
                    log::warn!("Skipping UI draw call: no texture and no font atlas");
                    continue;
                };
                let slot = self.batches.len();
                let material = self.materials.get(slot).ok_or(ResourceError::NotFound {
                    kind: "material instance",
                    id: slot,
                })?;

                let scissor = scissor_for(&cmd.clip_rect.scaled(scale_x, scale_y), height_px);
                self.backend.set_scissor(material, scissor);
                self.backend.set_texture(material, texture)?;

                self.batches.push(DrawBatch {
                    index_offset: cmd.idx_offset + index_offset,
                    index_count: cmd.elem_count,
                    scissor,
                    texture,
                    material,
                    blend_order: slot as u32,
                });
            }

            vertex_offset += list.vertices.len() as u32;
            index_offset += list.indices.len() as u32;
        }

        let (Some(vertex_buffer), Some(index_buffer)) =
            (self.buffers.vertex_buffer(), self.buffers.index_buffer())
        else {
            return Err(ResourceError::BackendError(
                "UI frame buffers missing after reserve".to_string(),
            ));
        };

        self.backend
            .build_renderable(vertex_buffer, index_buffer, &self.batches)?;

        if !self.vertex_data.is_empty() {
            self.backend
                .upload_buffer(vertex_buffer, bytemuck::cast_slice(&self.vertex_data))?;
        }
        if !self.index_data.is_empty() {
            self.backend
                .upload_buffer(index_buffer, bytemuck::cast_slice(&self.index_data))?;
        }
        Ok(())
    }

    /// The batches of the last frame, in draw order.
    pub fn batches(&self) -> &[DrawBatch] {
        &self.batches
    }

    /// The re-indexed vertices of the last frame.
    pub fn vertices(&self) -> &[DrawVertex] {
        &self.vertex_data
    }

    /// The re-indexed indices of the last frame.
    pub fn indices(&self) -> &[DrawIndex] {
        &self.index_data
    }

    /// The shared GPU buffers.
    pub fn frame_buffers(&self) -> &UiFrameBuffers {
        &self.buffers
    }

    /// Number of pooled material instances.
    pub fn material_pool_len(&self) -> usize {
        self.materials.len()
    }

    /// The backend this translator draws through.
    pub fn backend(&self) -> &Arc<dyn UiRenderBackend> {
        &self.backend
    }
}

impl Drop for UiDrawTranslator {
    fn drop(&mut self) {
        log::debug!("Releasing UI draw translator resources");
        self.backend.clear_renderable();
        self.materials.release(&*self.backend);
        self.buffers.release(&*self.backend);
        if let Some(atlas) = self.font_atlas.take() {
            self.backend.destroy_texture(atlas);
        }
    }
}

impl std::fmt::Debug for UiDrawTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiDrawTranslator")
            .field("buffers", &self.buffers)
            .field("materials", &self.materials.len())
            .field("font_atlas", &self.font_atlas)
            .field("batches", &self.batches.len())
            .finish()
    }
}
