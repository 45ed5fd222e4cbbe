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

//! Conversion of tessellated `egui` output into [`DrawData`].

use super::EguiTextures;
use egui::epaint::{ClippedPrimitive, Primitive};
use loom_core::ui::{ClipRect, DrawCallback, DrawCmd, DrawData, DrawList, DrawVertex};
use std::sync::Arc;

/// Payload of an `egui::PaintCallback` that the UI lane understands.
///
/// Wrap a [`DrawCallback`] in this type and pass it as the callback of an
/// `egui::PaintCallback`; it runs in draw order when the frame is
/// translated.
#[derive(Clone)]
pub struct UiCallback(pub DrawCallback);

impl UiCallback {
    /// Wraps a closure.
    pub fn new(f: impl Fn(&DrawList, &DrawCmd) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

/// Converts one frame of `egui` primitives into draw lists.
///
/// Each mesh becomes its own list with a single draw call. Clip rects and
/// vertex positions stay in points. Paint callbacks carrying a [`UiCallback`] become callback
/// commands, other callbacks are skipped.
///
/// ## Arguments
/// * `primitives` - The output of `egui::Context::tessellate`.
/// * `textures` - Resolves `egui` texture ids to renderer textures.
pub fn to_draw_data(
    primitives: &[ClippedPrimitive],
    textures: &EguiTextures,
) -> DrawData {
    let mut lists = Vec::with_capacity(primitives.len());
    for ClippedPrimitive {
        clip_rect,
        primitive,
    } in primitives
    {
        let clip =
            ClipRect::new(clip_rect.min.x, clip_rect.min.y, clip_rect.max.x, clip_rect.max.y);
        match primitive {
            Primitive::Mesh(mesh) => {
                if mesh.indices.is_empty() {
                    continue;
                }
                let vertices = mesh
                    .vertices
                    .iter()
                    .map(|v| DrawVertex {
                        pos: [v.pos.x, v.pos.y],
                        uv: [v.uv.x, v.uv.y],
                        color: v.color.to_array(),
                    })
                    .collect();
                lists.push(DrawList {
                    vertices,
                    indices: mesh.indices.clone(),
                    cmds: vec![DrawCmd {
                        clip_rect: clip,
                        elem_count: mesh.indices.len() as u32,
                        idx_offset: 0,
                        texture: textures.resolve(mesh.texture_id),
                        callback: None,
                    }],
                });
            }
            Primitive::Callback(paint) => match paint.callback.downcast_ref::<UiCallback>() {
                Some(UiCallback(callback)) => lists.push(DrawList {
                    vertices: Vec::new(),
                    indices: Vec::new(),
                    cmds: vec![DrawCmd {
                        clip_rect: clip,
                        callback: Some(callback.clone()),
                        ..DrawCmd::default()
                    }],
                }),
                None => log::warn!("Skipping paint callback of an unknown type"),
            },
        }
    }
    DrawData {
        lists,
        fonts_built: !textures.font_atlas_dirty(),
    }
}
