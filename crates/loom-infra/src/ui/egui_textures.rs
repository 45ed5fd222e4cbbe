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

//! Synchronisation of `egui` textures with a [`UiRenderBackend`].

use loom_core::renderer::{ResourceError, TextureId, UiRenderBackend};
use loom_core::ui::FontAtlasImage;
use std::collections::HashMap;
use std::sync::Arc;

/// The managed id `egui` gives its font texture.
pub const FONT_TEXTURE: egui::TextureId = egui::TextureId::Managed(0);

/// Applies `egui::TexturesDelta`s.
///
/// The font texture is kept as a CPU-side [`FontAtlasImage`]: full and
/// partial updates are patched into it and mark the atlas dirty, and the UI
/// lane rebuilds its atlas texture from it outside of a UI frame. Every other
/// managed texture is uploaded straight to the backend. Renderer textures
/// owned by the caller are shown through `egui::TextureId::User` ids handed
/// out by [`EguiTextures::register_user_texture`]; user ids that were never
/// registered resolve to nothing.
pub struct EguiTextures {
    backend: Arc<dyn UiRenderBackend>,
    font_image: Option<FontAtlasImage>,
    font_dirty: bool,
    managed: HashMap<u64, TextureId>,
    user: HashMap<u64, TextureId>,
    next_user: u64,
    pending_free: Vec<egui::TextureId>,
}

impl EguiTextures {
    /// Creates an empty texture set uploading through `backend`.
    pub fn new(backend: Arc<dyn UiRenderBackend>) -> Self {
        Self {
            backend,
            font_image: None,
            font_dirty: false,
            managed: HashMap::new(),
            user: HashMap::new(),
            next_user: 0,
            pending_free: Vec::new(),
        }
    }

    /// Makes a caller-owned renderer texture drawable by `egui` widgets.
    /// The texture stays owned by the caller and is never destroyed here.
    pub fn register_user_texture(&mut self, texture: TextureId) -> egui::TextureId {
        let n = self.next_user;
        self.next_user += 1;
        self.user.insert(n, texture);
        egui::TextureId::User(n)
    }

    /// Forgets a texture registered with
    /// [`register_user_texture`](Self::register_user_texture).
    pub fn unregister_user_texture(&mut self, id: egui::TextureId) -> Option<TextureId> {
        match id {
            egui::TextureId::User(n) => self.user.remove(&n),
            egui::TextureId::Managed(_) => None,
        }
    }

    /// `true` when the font image changed since the atlas was last built.
    pub fn font_atlas_dirty(&self) -> bool {
        self.font_dirty
    }

    /// The current font image, if `egui` sent one.
    pub fn font_image(&self) -> Option<&FontAtlasImage> {
        self.font_image.as_ref()
    }

    /// Returns the font image if it changed, clearing the dirty flag.
    pub fn take_dirty_font_image(&mut self) -> Option<&FontAtlasImage> {
        if !self.font_dirty {
            return None;
        }
        self.font_dirty = false;
        self.font_image.as_ref()
    }

    /// Resolves an `egui` texture id. `None` selects the font atlas.
    pub fn resolve(&self, id: egui::TextureId) -> Option<TextureId> {
        match id {
            FONT_TEXTURE => None,
            egui::TextureId::Managed(n) => self.managed.get(&n).copied(),
            egui::TextureId::User(n) => {
                let texture = self.user.get(&n).copied();
                if texture.is_none() {
                    log::warn!("egui user texture {n} is not registered");
                }
                texture
            }
        }
    }

    /// Applies the `set` half of a delta and queues its `free` half.
    ///
    /// Frees are delayed until [`EguiTextures::free_pending`] so textures
    /// used by the frame being drawn stay alive until it is presented.
    pub fn apply(&mut self, delta: &egui::TexturesDelta) -> Result<(), ResourceError> {
        for (id, image_delta) in &delta.set {
            let Some((size, pixels)) = rgba_pixels(&image_delta.image) else {
                log::warn!("Ignoring unsupported image data for {id:?}");
                continue;
            };
            match (*id, image_delta.pos) {
                (FONT_TEXTURE, pos) => self.patch_font(pos, size, pixels),
                (egui::TextureId::Managed(n), None) => {
                    if let Some(old) = self.managed.remove(&n) {
                        self.backend.destroy_texture(old);
                    }
                    let texture = self.backend.create_texture_rgba8(
                        &format!("egui texture {n}"),
                        size[0] as u32,
                        size[1] as u32,
                        &pixels,
                    )?;
                    log::debug!("Uploaded egui texture {n} ({}x{})", size[0], size[1]);
                    self.managed.insert(n, texture);
                }
                (egui::TextureId::Managed(n), Some(pos)) => {
                    let texture = self.managed.get(&n).copied().ok_or(ResourceError::NotFound {
                        kind: "egui texture",
                        id: n as usize,
                    })?;
                    self.backend.update_texture_rgba8(
                        texture,
                        [pos[0] as u32, pos[1] as u32],
                        [size[0] as u32, size[1] as u32],
                        &pixels,
                    )?;
                }
                (egui::TextureId::User(n), _) => {
                    log::warn!("egui tried to set user texture {n}; user textures are owned by the caller");
                }
            }
        }
        self.pending_free.extend(delta.free.iter().copied());
        Ok(())
    }

    /// Releases the textures freed by previous deltas.
    pub fn free_pending(&mut self) {
        let has_gpu_textures = self.pending_free.iter().any(|id| match id {
            egui::TextureId::Managed(n) => self.managed.contains_key(n),
            egui::TextureId::User(_) => false,
        });
        if has_gpu_textures {
            self.backend.wait_for_gpu();
        }
        for id in self.pending_free.drain(..) {
            match id {
                FONT_TEXTURE => {}
                egui::TextureId::Managed(n) => {
                    if let Some(texture) = self.managed.remove(&n) {
                        self.backend.destroy_texture(texture);
                    }
                }
                egui::TextureId::User(_) => {}
            }
        }
    }

    fn patch_font(&mut self, pos: Option<[usize; 2]>, size: [usize; 2], pixels: Vec<u8>) {
        match (pos, self.font_image.as_mut()) {
            (Some([x, y]), Some(atlas)) => {
                atlas.blit(x as u32, y as u32, size[0] as u32, &pixels);
            }
            (Some(_), None) => {
                log::warn!("Partial font update before the full font image; ignored");
                return;
            }
            (None, _) => {
                self.font_image =
                    FontAtlasImage::from_rgba8(size[0] as u32, size[1] as u32, pixels);
            }
        }
        self.font_dirty = true;
    }
}

impl Drop for EguiTextures {
    fn drop(&mut self) {
        for (_, texture) in self.managed.drain() {
            self.backend.destroy_texture(texture);
        }
    }
}

impl std::fmt::Debug for EguiTextures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EguiTextures")
            .field("font_dirty", &self.font_dirty)
            .field("managed", &self.managed.len())
            .field("user", &self.user.len())
            .field("pending_free", &self.pending_free.len())
            .finish()
    }
}

/// Flattens `egui` image data into RGBA8 bytes.
fn rgba_pixels(image: &egui::ImageData) -> Option<([usize; 2], Vec<u8>)> {
    match image {
        egui::ImageData::Color(color) => {
            let pixels = color.pixels.iter().flat_map(|c| c.to_array()).collect();
            Some((color.size, pixels))
        }
        #[allow(unreachable_patterns)]
        _ => None,
    }
}
