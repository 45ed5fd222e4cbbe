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

//! `egui` texture synchronisation and draw-data conversion.

use egui::epaint::{ClippedPrimitive, ImageDelta, Mesh, Primitive};
use egui::{Color32, ColorImage, ImageData, PaintCallback, Pos2, Rect, TextureOptions};
use loom_core::renderer::{
    BufferId, DrawBatch, IndexFormat, MaterialInstanceId, ResourceError, ScissorRect, TextureId,
    UiRenderBackend, VertexLayout,
};
use loom_infra::ui::{to_draw_data, EguiTextures, UiCallback};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
enum TexCall {
    Create(u32, u32),
    Update(TextureId, [u32; 2], [u32; 2]),
    Destroy(TextureId),
}

#[derive(Default)]
struct TextureLog {
    calls: Mutex<Vec<TexCall>>,
    next_id: AtomicUsize,
}

impl TextureLog {
    fn calls(&self) -> Vec<TexCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl UiRenderBackend for TextureLog {
    fn create_vertex_buffer(&self, _: usize, _: &VertexLayout) -> Result<BufferId, ResourceError> {
        Ok(BufferId(0))
    }
    fn create_index_buffer(&self, _: usize, _: IndexFormat) -> Result<BufferId, ResourceError> {
        Ok(BufferId(0))
    }
    fn upload_buffer(&self, _: BufferId, _: &[u8]) -> Result<(), ResourceError> {
        Ok(())
    }
    fn destroy_buffer(&self, _: BufferId) {}
    fn create_texture_rgba8(
        &self,
        _label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureId, ResourceError> {
        assert_eq!(pixels.len() as u32, width * height * 4);
        self.calls.lock().unwrap().push(TexCall::Create(width, height));
        Ok(TextureId(100 + self.next_id.fetch_add(1, Ordering::Relaxed)))
    }
    fn update_texture_rgba8(
        &self,
        texture: TextureId,
        origin: [u32; 2],
        size: [u32; 2],
        _pixels: &[u8],
    ) -> Result<(), ResourceError> {
        self.calls
            .lock()
            .unwrap()
            .push(TexCall::Update(texture, origin, size));
        Ok(())
    }
    fn destroy_texture(&self, texture: TextureId) {
        self.calls.lock().unwrap().push(TexCall::Destroy(texture));
    }
    fn create_material_instance(&self) -> Result<MaterialInstanceId, ResourceError> {
        Ok(MaterialInstanceId(0))
    }
    fn destroy_material_instance(&self, _: MaterialInstanceId) {}
    fn set_scissor(&self, _: MaterialInstanceId, _: ScissorRect) {}
    fn set_texture(&self, _: MaterialInstanceId, _: TextureId) -> Result<(), ResourceError> {
        Ok(())
    }
    fn configure_view(&self, _: (u32, u32), _: [f32; 2]) {}
    fn clear_renderable(&self) {}
    fn build_renderable(&self, _: BufferId, _: BufferId, _: &[DrawBatch]) -> Result<(), ResourceError> {
        Ok(())
    }
    fn wait_for_gpu(&self) {}
}

fn image(width: usize, height: usize, color: Color32) -> ImageData {
    let rgba: Vec<u8> = std::iter::repeat_n(color.to_array(), width * height)
        .flatten()
        .collect();
    ImageData::Color(Arc::new(ColorImage::from_rgba_unmultiplied(
        [width, height],
        &rgba,
    )))
}

fn full(id: egui::TextureId, width: usize, height: usize) -> (egui::TextureId, ImageDelta) {
    (
        id,
        ImageDelta::full(image(width, height, Color32::WHITE), TextureOptions::LINEAR),
    )
}

fn partial(
    id: egui::TextureId,
    pos: [usize; 2],
    width: usize,
    height: usize,
) -> (egui::TextureId, ImageDelta) {
    (
        id,
        ImageDelta::partial(pos, image(width, height, Color32::RED), TextureOptions::LINEAR),
    )
}

fn delta(
    set: Vec<(egui::TextureId, ImageDelta)>,
    free: Vec<egui::TextureId>,
) -> egui::TexturesDelta {
    egui::TexturesDelta { set, free }
}

#[test]
fn font_updates_stay_on_the_cpu_and_mark_the_atlas_dirty() {
    let backend = Arc::new(TextureLog::default());
    let mut textures = EguiTextures::new(backend.clone());
    assert!(!textures.font_atlas_dirty());

    textures
        .apply(&delta(vec![full(egui::TextureId::Managed(0), 8, 4)], vec![]))
        .unwrap();
    assert!(textures.font_atlas_dirty());
    assert!(backend.calls().is_empty());

    let image = textures.take_dirty_font_image().unwrap();
    assert_eq!((image.width, image.height), (8, 4));
    assert!(!textures.font_atlas_dirty());
    assert!(textures.take_dirty_font_image().is_none());

    textures
        .apply(&delta(
            vec![partial(egui::TextureId::Managed(0), [2, 1], 2, 2)],
            vec![],
        ))
        .unwrap();
    assert!(textures.font_atlas_dirty());
    let atlas = textures.font_image().unwrap();
    let at = |x: usize, y: usize| {
        let i = (y * atlas.width as usize + x) * 4;
        [atlas.pixels[i], atlas.pixels[i + 1], atlas.pixels[i + 2], atlas.pixels[i + 3]]
    };
    assert_eq!(at(2, 1), [255, 0, 0, 255]);
    assert_eq!(at(3, 2), [255, 0, 0, 255]);
    assert_eq!(at(0, 0), [255, 255, 255, 255]);
}

#[test]
fn partial_font_update_without_a_base_image_is_ignored() {
    let _ = env_logger::builder().is_test(true).try_init();
    let backend = Arc::new(TextureLog::default());
    let mut textures = EguiTextures::new(backend);
    textures
        .apply(&delta(
            vec![partial(egui::TextureId::Managed(0), [0, 0], 1, 1)],
            vec![],
        ))
        .unwrap();
    assert!(!textures.font_atlas_dirty());
    assert!(textures.font_image().is_none());
}

#[test]
fn managed_textures_are_uploaded_and_freed_after_the_frame() {
    let backend = Arc::new(TextureLog::default());
    let mut textures = EguiTextures::new(backend.clone());
    let image_id = egui::TextureId::Managed(3);

    textures
        .apply(&delta(vec![full(image_id, 4, 4)], vec![]))
        .unwrap();
    let texture = textures.resolve(image_id).unwrap();
    assert_eq!(backend.calls(), vec![TexCall::Create(4, 4)]);

    textures
        .apply(&delta(vec![partial(image_id, [1, 1], 2, 2)], vec![image_id]))
        .unwrap();
    assert_eq!(backend.calls()[1], TexCall::Update(texture, [1, 1], [2, 2]));
    // Still alive until the frame using it has been drawn.
    assert_eq!(textures.resolve(image_id), Some(texture));

    textures.free_pending();
    assert_eq!(backend.calls()[2], TexCall::Destroy(texture));
    assert_eq!(textures.resolve(image_id), None);
}

#[test]
fn partial_update_of_an_unknown_texture_fails() {
    let backend = Arc::new(TextureLog::default());
    let mut textures = EguiTextures::new(backend);
    let err = textures
        .apply(&delta(
            vec![partial(egui::TextureId::Managed(9), [0, 0], 1, 1)],
            vec![],
        ))
        .unwrap_err();
    assert!(matches!(err, ResourceError::NotFound { id: 9, .. }));
}

#[test]
fn texture_ids_resolve_by_kind() {
    let mut textures = EguiTextures::new(Arc::new(TextureLog::default()));
    assert_eq!(textures.resolve(egui::TextureId::Managed(0)), None);
    assert_eq!(textures.resolve(egui::TextureId::Managed(5)), None);
    assert_eq!(textures.resolve(egui::TextureId::User(42)), None);

    let first = textures.register_user_texture(TextureId(42));
    let second = textures.register_user_texture(TextureId(1));
    assert_ne!(first, second);
    assert_eq!(textures.resolve(first), Some(TextureId(42)));
    assert_eq!(textures.resolve(second), Some(TextureId(1)));

    assert_eq!(textures.unregister_user_texture(first), Some(TextureId(42)));
    assert_eq!(textures.resolve(first), None);
    assert_eq!(textures.resolve(second), Some(TextureId(1)));
}

#[test]
fn dropping_the_texture_set_releases_managed_textures() {
    let backend = Arc::new(TextureLog::default());
    {
        let mut textures = EguiTextures::new(backend.clone());
        textures
            .apply(&delta(vec![full(egui::TextureId::Managed(1), 2, 2)], vec![]))
            .unwrap();
    }
    let calls = backend.calls();
    assert!(matches!(calls.last(), Some(TexCall::Destroy(_))));
}

fn quad_mesh(texture_id: egui::TextureId) -> Mesh {
    let mut mesh = Mesh::with_texture(texture_id);
    mesh.add_rect_with_uv(
        Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(10.0, 20.0)),
        Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0)),
        Color32::from_rgb(10, 20, 30),
    );
    mesh
}

#[test]
fn meshes_become_one_list_each_with_clip_rects_in_points() {
    let mut textures = EguiTextures::new(Arc::new(TextureLog::default()));
    let image = textures.register_user_texture(TextureId(7));
    let primitives = vec![
        ClippedPrimitive {
            clip_rect: Rect::from_min_max(Pos2::new(1.0, 2.0), Pos2::new(30.0, 40.0)),
            primitive: Primitive::Mesh(quad_mesh(egui::TextureId::Managed(0))),
        },
        ClippedPrimitive {
            clip_rect: Rect::EVERYTHING,
            primitive: Primitive::Mesh(Mesh::default()),
        },
        ClippedPrimitive {
            clip_rect: Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(5.0, 5.0)),
            primitive: Primitive::Mesh(quad_mesh(image)),
        },
    ];

    let data = to_draw_data(&primitives, &textures);
    assert!(data.fonts_built);
    assert_eq!(data.lists.len(), 2);

    let first = &data.lists[0];
    assert_eq!(first.vertices.len(), 4);
    assert_eq!(first.indices.len(), 6);
    assert_eq!(first.cmds.len(), 1);
    assert_eq!(first.cmds[0].elem_count, 6);
    assert_eq!(first.cmds[0].idx_offset, 0);
    assert_eq!(first.cmds[0].texture, None);
    assert_eq!(
        (
            first.cmds[0].clip_rect.min_x,
            first.cmds[0].clip_rect.min_y,
            first.cmds[0].clip_rect.max_x,
            first.cmds[0].clip_rect.max_y
        ),
        (1.0, 2.0, 30.0, 40.0)
    );
    assert_eq!(first.vertices[0].color, [10, 20, 30, 255]);
    assert_eq!(first.vertices[3].pos, [10.0, 20.0]);

    assert_eq!(data.lists[1].cmds[0].texture, Some(TextureId(7)));
}

#[test]
fn ui_callbacks_become_callback_commands() {
    let textures = EguiTextures::new(Arc::new(TextureLog::default()));
    let rect = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(8.0, 8.0));
    let primitives = vec![
        ClippedPrimitive {
            clip_rect: rect,
            primitive: Primitive::Callback(PaintCallback {
                rect,
                callback: Arc::new(UiCallback::new(|_, _| {})),
            }),
        },
        ClippedPrimitive {
            clip_rect: rect,
            primitive: Primitive::Callback(PaintCallback {
                rect,
                callback: Arc::new(17u32),
            }),
        },
    ];

    let data = to_draw_data(&primitives, &textures);
    assert_eq!(data.lists.len(), 1);
    assert!(data.lists[0].vertices.is_empty());
    assert!(data.lists[0].cmds[0].callback.is_some());
}

#[test]
fn dirty_font_atlas_is_reported_as_not_built() {
    let mut textures = EguiTextures::new(Arc::new(TextureLog::default()));
    textures
        .apply(&delta(vec![full(egui::TextureId::Managed(0), 2, 2)], vec![]))
        .unwrap();
    let data = to_draw_data(&[], &textures);
    assert!(!data.fonts_built);
    assert!(data.lists.is_empty());
}
