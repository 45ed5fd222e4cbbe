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

use super::context::WgpuGraphicsContext;
use bytemuck::{Pod, Zeroable};
use loom_core::renderer::{
    BufferId, DrawBatch, IndexFormat, MaterialInstanceId, ResourceError, ScissorRect, TextureId,
    UiRenderBackend, VertexFormat, VertexLayout,
};
use std::collections::HashMap;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const UI_SHADER: &str = include_str!("shaders/ui.wgsl");

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Globals {
    screen_size: [f32; 2],
    _padding: [f32; 2],
}

#[derive(Debug)]
struct WgpuBufferEntry {
    wgpu_buffer: Arc<wgpu::Buffer>,
    size: u64,
    index_format: Option<wgpu::IndexFormat>,
}

#[derive(Debug)]
struct WgpuTextureEntry {
    wgpu_texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

#[derive(Debug, Default)]
struct MaterialEntry {
    scissor: ScissorRect,
    texture: Option<TextureId>,
    bind_group: Option<Arc<wgpu::BindGroup>>,
}

#[derive(Debug)]
struct UiDraw {
    indices: Range<u32>,
    scissor: [u32; 4],
    bind_group: Arc<wgpu::BindGroup>,
}

#[derive(Debug)]
struct UiRenderable {
    vertex_buffer: Arc<wgpu::Buffer>,
    index_buffer: Arc<wgpu::Buffer>,
    index_format: wgpu::IndexFormat,
    draws: Vec<UiDraw>,
}

/// A [`UiRenderBackend`] drawing into `wgpu` render targets.
///
/// Resources live in id-keyed tables behind mutexes so the backend can be
/// shared between the UI lane and the frame loop. The renderable built by
/// [`UiRenderBackend::build_renderable`] is recorded into a command encoder
/// by [`WgpuUiBackend::render`].
pub struct WgpuUiBackend {
    context: Arc<Mutex<WgpuGraphicsContext>>,
    pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,

    buffers: Mutex<HashMap<BufferId, WgpuBufferEntry>>,
    textures: Mutex<HashMap<TextureId, WgpuTextureEntry>>,
    materials: Mutex<HashMap<MaterialInstanceId, MaterialEntry>>,
    view_size_px: Mutex<(u32, u32)>,
    renderable: Mutex<Option<UiRenderable>>,

    next_buffer_id: AtomicUsize,
    next_texture_id: AtomicUsize,
    next_material_id: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn into_wgpu_vertex_format(format: VertexFormat) -> wgpu::VertexFormat {
    match format {
        VertexFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
        VertexFormat::Unorm8x4 => wgpu::VertexFormat::Unorm8x4,
    }
}

fn into_wgpu_index_format(format: IndexFormat) -> wgpu::IndexFormat {
    match format {
        IndexFormat::Uint16 => wgpu::IndexFormat::Uint16,
        IndexFormat::Uint32 => wgpu::IndexFormat::Uint32,
    }
}

/// Buffer sizes must be non-zero multiples of `COPY_BUFFER_ALIGNMENT`.
fn aligned_buffer_size(bytes: u64) -> u64 {
    let align = wgpu::COPY_BUFFER_ALIGNMENT;
    bytes.div_ceil(align).max(1) * align
}

/// Converts a bottom-left scissor into a top-left `[x, y, width, height]`
/// clamped to the target. `None` when nothing of it is visible.
fn to_target_scissor(scissor: ScissorRect, (width, height): (u32, u32)) -> Option<[u32; 4]> {
    let (w, h) = (i64::from(width), i64::from(height));
    let top = h - (i64::from(scissor.y) + i64::from(scissor.height));
    let x0 = i64::from(scissor.x).clamp(0, w);
    let y0 = top.clamp(0, h);
    let x1 = (i64::from(scissor.x) + i64::from(scissor.width)).clamp(0, w);
    let y1 = (top + i64::from(scissor.height)).clamp(0, h);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some([x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32])
}

impl WgpuUiBackend {
    /// Compiles the UI pipeline for the context's surface format.
    pub fn new(context: Arc<Mutex<WgpuGraphicsContext>>) -> Result<Self, ResourceError> {
        let (pipeline, texture_layout, sampler, globals_buffer, globals_bind_group) = {
            let ctx = lock(&context);
            let device = &ctx.device;
            let target_format = ctx.surface_format();

            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("UI Shader"),
                source: wgpu::ShaderSource::Wgsl(UI_SHADER.into()),
            });

            let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("UI Globals Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });
            let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("UI Texture Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

            let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("UI Globals"),
                size: std::mem::size_of::<Globals>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("UI Globals Bind Group"),
                layout: &globals_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                }],
            });

            let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("UI Sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                ..Default::default()
            });

            let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("UI Pipeline Layout"),
                bind_group_layouts: &[Some(&globals_layout), Some(&texture_layout)],
                immediate_size: 0,
            });

            let ui_layout = VertexLayout::UI;
            let attributes: Vec<wgpu::VertexAttribute> = ui_layout
                .attributes
                .iter()
                .map(|a| wgpu::VertexAttribute {
                    format: into_wgpu_vertex_format(a.format),
                    offset: u64::from(a.offset),
                    shader_location: a.location,
                })
                .collect();

            let fragment_entry = if target_format.is_srgb() {
                "fs_main_linear"
            } else {
                "fs_main_gamma"
            };

            // Premultiplied alpha.
            let blend = wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::OneMinusDstAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            };

            let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("UI Pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: u64::from(ui_layout.stride),
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &attributes,
                    }],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fragment_entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: target_format,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });
            log::info!("WgpuUiBackend: UI pipeline created for {target_format:?} ({fragment_entry})");

            (pipeline, texture_layout, sampler, globals_buffer, globals_bind_group)
        };

        Ok(Self {
            context,
            pipeline,
            texture_layout,
            sampler,
            globals_buffer,
            globals_bind_group,
            buffers: Mutex::new(HashMap::new()),
            textures: Mutex::new(HashMap::new()),
            materials: Mutex::new(HashMap::new()),
            view_size_px: Mutex::new((0, 0)),
            renderable: Mutex::new(None),
            next_buffer_id: AtomicUsize::new(0),
            next_texture_id: AtomicUsize::new(0),
            next_material_id: AtomicUsize::new(0),
        })
    }

    /// The graphics context this backend renders with.
    pub fn context(&self) -> &Arc<Mutex<WgpuGraphicsContext>> {
        &self.context
    }

    /// Records the current renderable into `encoder` as one render pass
    /// targeting `target`.
    ///
    /// The target is cleared to `clear` first when given, otherwise the UI
    /// is drawn over its existing content. Without a renderable only the
    /// clear happens.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        clear: Option<wgpu::Color>,
    ) {
        let load = match clear {
            Some(color) => wgpu::LoadOp::Clear(color),
            None => wgpu::LoadOp::Load,
        };
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("UI Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let renderable = lock(&self.renderable);
        let Some(renderable) = renderable.as_ref() else {
            return;
        };
        if renderable.draws.is_empty() {
            return;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.globals_bind_group, &[]);
        pass.set_vertex_buffer(0, renderable.vertex_buffer.slice(..));
        pass.set_index_buffer(renderable.index_buffer.slice(..), renderable.index_format);
        for draw in &renderable.draws {
            let [x, y, width, height] = draw.scissor;
            pass.set_scissor_rect(x, y, width, height);
            pass.set_bind_group(1, draw.bind_group.as_ref(), &[]);
            pass.draw_indexed(draw.indices.clone(), 0, 0..1);
        }
    }

    fn generate_buffer_id(&self) -> BufferId {
        BufferId(self.next_buffer_id.fetch_add(1, Ordering::Relaxed))
    }

    fn generate_texture_id(&self) -> TextureId {
        TextureId(self.next_texture_id.fetch_add(1, Ordering::Relaxed))
    }

    fn create_buffer(
        &self,
        label: &str,
        bytes: u64,
        usage: wgpu::BufferUsages,
        index_format: Option<wgpu::IndexFormat>,
    ) -> BufferId {
        let size = aligned_buffer_size(bytes);
        let wgpu_buffer = lock(&self.context)
            .device
            .create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: usage | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
        let id = self.generate_buffer_id();
        lock(&self.buffers).insert(
            id,
            WgpuBufferEntry {
                wgpu_buffer: Arc::new(wgpu_buffer),
                size,
                index_format,
            },
        );
        log::debug!("WgpuUiBackend: Created {label} {id:?}, size: {size} bytes");
        id
    }
}

impl UiRenderBackend for WgpuUiBackend {
    fn create_vertex_buffer(
        &self,
        vertex_count: usize,
        layout: &VertexLayout,
    ) -> Result<BufferId, ResourceError> {
        let bytes = vertex_count as u64 * u64::from(layout.stride);
        Ok(self.create_buffer("UI Vertex Buffer", bytes, wgpu::BufferUsages::VERTEX, None))
    }

    fn create_index_buffer(
        &self,
        index_count: usize,
        format: IndexFormat,
    ) -> Result<BufferId, ResourceError> {
        let bytes = index_count as u64 * format.size();
        Ok(self.create_buffer(
            "UI Index Buffer",
            bytes,
            wgpu::BufferUsages::INDEX,
            Some(into_wgpu_index_format(format)),
        ))
    }

    fn upload_buffer(&self, buffer: BufferId, bytes: &[u8]) -> Result<(), ResourceError> {
        let wgpu_buffer = {
            let buffers = lock(&self.buffers);
            let entry = buffers.get(&buffer).ok_or(ResourceError::NotFound {
                kind: "buffer",
                id: buffer.0,
            })?;
            if bytes.len() as u64 > entry.size {
                return Err(ResourceError::OutOfBounds {
                    kind: "buffer",
                    requested: bytes.len() as u64,
                    capacity: entry.size,
                });
            }
            entry.wgpu_buffer.clone()
        };
        if bytes.is_empty() {
            return Ok(());
        }

        let ctx = lock(&self.context);
        let align = wgpu::COPY_BUFFER_ALIGNMENT as usize;
        if bytes.len() % align == 0 {
            ctx.queue.write_buffer(&wgpu_buffer, 0, bytes);
        } else {
            // Writes must be aligned; the buffer size already is.
            let mut padded = bytes.to_vec();
            padded.resize(bytes.len().next_multiple_of(align), 0);
            ctx.queue.write_buffer(&wgpu_buffer, 0, &padded);
        }
        Ok(())
    }

    fn destroy_buffer(&self, buffer: BufferId) {
        if let Some(entry) = lock(&self.buffers).remove(&buffer) {
            log::debug!("WgpuUiBackend: Destroyed buffer {buffer:?} ({} bytes)", entry.size);
        }
    }

    fn create_texture_rgba8(
        &self,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureId, ResourceError> {
        if width == 0 || height == 0 {
            return Err(ResourceError::BackendError(format!(
                "Texture '{label}' has an empty extent {width}x{height}"
            )));
        }
        let expected = u64::from(width) * u64::from(height) * 4;
        if pixels.len() as u64 != expected {
            return Err(ResourceError::OutOfBounds {
                kind: "texture",
                requested: pixels.len() as u64,
                capacity: expected,
            });
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let ctx = lock(&self.context);
        let wgpu_texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &wgpu_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );
        drop(ctx);

        let view = wgpu_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let id = self.generate_texture_id();
        lock(&self.textures).insert(
            id,
            WgpuTextureEntry {
                wgpu_texture,
                view,
                width,
                height,
            },
        );
        log::info!("WgpuUiBackend: Created texture '{label}' {id:?} ({width}x{height})");
        Ok(id)
    }

    fn update_texture_rgba8(
        &self,
        texture: TextureId,
        origin: [u32; 2],
        size: [u32; 2],
        pixels: &[u8],
    ) -> Result<(), ResourceError> {
        let textures = lock(&self.textures);
        let entry = textures.get(&texture).ok_or(ResourceError::NotFound {
            kind: "texture",
            id: texture.0,
        })?;
        let fits = u64::from(origin[0]) + u64::from(size[0]) <= u64::from(entry.width)
            && u64::from(origin[1]) + u64::from(size[1]) <= u64::from(entry.height);
        let expected = u64::from(size[0]) * u64::from(size[1]) * 4;
        if !fits || pixels.len() as u64 != expected {
            return Err(ResourceError::OutOfBounds {
                kind: "texture",
                requested: pixels.len() as u64,
                capacity: u64::from(entry.width) * u64::from(entry.height) * 4,
            });
        }
        if size[0] == 0 || size[1] == 0 {
            return Ok(());
        }

        lock(&self.context).queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &entry.wgpu_texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: origin[0],
                    y: origin[1],
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size[0]),
                rows_per_image: Some(size[1]),
            },
            wgpu::Extent3d {
                width: size[0],
                height: size[1],
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    fn destroy_texture(&self, texture: TextureId) {
        if lock(&self.textures).remove(&texture).is_some() {
            log::debug!("WgpuUiBackend: Destroyed texture {texture:?}");
        }
    }

    fn create_material_instance(&self) -> Result<MaterialInstanceId, ResourceError> {
        let id = MaterialInstanceId(self.next_material_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.materials).insert(id, MaterialEntry::default());
        Ok(id)
    }

    fn destroy_material_instance(&self, material: MaterialInstanceId) {
        lock(&self.materials).remove(&material);
    }

    fn set_scissor(&self, material: MaterialInstanceId, scissor: ScissorRect) {
        match lock(&self.materials).get_mut(&material) {
            Some(entry) => entry.scissor = scissor,
            None => log::warn!("WgpuUiBackend: set_scissor on unknown {material:?}"),
        }
    }

    fn set_texture(
        &self,
        material: MaterialInstanceId,
        texture: TextureId,
    ) -> Result<(), ResourceError> {
        if lock(&self.materials)
            .get(&material)
            .is_some_and(|entry| entry.texture == Some(texture) && entry.bind_group.is_some())
        {
            return Ok(());
        }

        let view = lock(&self.textures)
            .get(&texture)
            .map(|entry| entry.view.clone())
            .ok_or(ResourceError::NotFound {
                kind: "texture",
                id: texture.0,
            })?;
        let bind_group = lock(&self.context)
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("UI Texture Bind Group"),
                layout: &self.texture_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            });

        let mut materials = lock(&self.materials);
        let entry = materials.get_mut(&material).ok_or(ResourceError::NotFound {
            kind: "material instance",
            id: material.0,
        })?;
        entry.texture = Some(texture);
        entry.bind_group = Some(Arc::new(bind_group));
        Ok(())
    }

    fn configure_view(&self, size_px: (u32, u32), logical_size: [f32; 2]) {
        *lock(&self.view_size_px) = size_px;
        let globals = Globals {
            screen_size: [logical_size[0].max(1.0), logical_size[1].max(1.0)],
            _padding: [0.0; 2],
        };
        lock(&self.context)
            .queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
    }

    fn clear_renderable(&self) {
        lock(&self.renderable).take();
    }

    fn build_renderable(
        &self,
        vertex_buffer: BufferId,
        index_buffer: BufferId,
        batches: &[DrawBatch],
    ) -> Result<(), ResourceError> {
        let (vertex_buffer, index_buffer, index_format) = {
            let buffers = lock(&self.buffers);
            let vertices = buffers.get(&vertex_buffer).ok_or(ResourceError::NotFound {
                kind: "vertex buffer",
                id: vertex_buffer.0,
            })?;
            let indices = buffers.get(&index_buffer).ok_or(ResourceError::NotFound {
                kind: "index buffer",
                id: index_buffer.0,
            })?;
            (
                vertices.wgpu_buffer.clone(),
                indices.wgpu_buffer.clone(),
                indices.index_format.unwrap_or(wgpu::IndexFormat::Uint32),
            )
        };

        let mut ordered: Vec<&DrawBatch> = batches.iter().collect();
        ordered.sort_by_key(|batch| batch.blend_order);

        let view_size = *lock(&self.view_size_px);
        let materials = lock(&self.materials);
        let mut draws = Vec::with_capacity(ordered.len());
        for batch in ordered {
            let entry = materials.get(&batch.material).ok_or(ResourceError::NotFound {
                kind: "material instance",
                id: batch.material.0,
            })?;
            let bind_group = entry.bind_group.clone().ok_or(ResourceError::NotFound {
                kind: "material texture",
                id: batch.texture.0,
            })?;
            // Fully clipped batches draw nothing.
            let Some(scissor) = to_target_scissor(batch.scissor, view_size) else {
                continue;
            };
            draws.push(UiDraw {
                indices: batch.index_offset..batch.index_offset + batch.index_count,
                scissor,
                bind_group,
            });
        }
        drop(materials);

        log::trace!("WgpuUiBackend: Built UI renderable with {} draws", draws.len());
        *lock(&self.renderable) = Some(UiRenderable {
            vertex_buffer,
            index_buffer,
            index_format,
            draws,
        });
        Ok(())
    }

    fn wait_for_gpu(&self) {
        let ctx = lock(&self.context);
        if let Err(e) = ctx.device.poll(wgpu::PollType::wait_indefinitely()) {
            log::warn!("WgpuUiBackend: Failed to wait for the GPU: {e:?}");
        }
    }
}

impl std::fmt::Debug for WgpuUiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuUiBackend")
            .field("buffers", &lock(&self.buffers).len())
            .field("textures", &lock(&self.textures).len())
            .field("materials", &lock(&self.materials).len())
            .field("view_size_px", &*lock(&self.view_size_px))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scissor_flips_to_a_top_left_origin() {
        // A 100x50 rect whose bottom sits 20px above the bottom of a 200px target.
        let scissor = ScissorRect {
            x: 10,
            y: 20,
            width: 100,
            height: 50,
        };
        assert_eq!(to_target_scissor(scissor, (300, 200)), Some([10, 130, 100, 50]));
    }

    #[test]
    fn scissor_is_clamped_to_the_target() {
        let scissor = ScissorRect {
            x: -10,
            y: -10,
            width: 50,
            height: 50,
        };
        assert_eq!(to_target_scissor(scissor, (100, 100)), Some([0, 60, 40, 40]));
    }

    #[test]
    fn offscreen_scissor_is_dropped() {
        let scissor = ScissorRect {
            x: 150,
            y: 0,
            width: 10,
            height: 10,
        };
        assert_eq!(to_target_scissor(scissor, (100, 100)), None);
        let empty = ScissorRect::default();
        assert_eq!(to_target_scissor(empty, (100, 100)), None);
    }

    #[test]
    fn buffer_sizes_are_copy_aligned() {
        assert_eq!(aligned_buffer_size(0), 4);
        assert_eq!(aligned_buffer_size(20), 20);
        assert_eq!(aligned_buffer_size(6), 8);
    }

    #[test]
    fn ui_layout_maps_onto_wgpu_formats() {
        let formats: Vec<_> = VertexLayout::UI
            .attributes
            .iter()
            .map(|a| into_wgpu_vertex_format(a.format))
            .collect();
        assert_eq!(
            formats,
            [
                wgpu::VertexFormat::Float32x2,
                wgpu::VertexFormat::Float32x2,
                wgpu::VertexFormat::Unorm8x4,
            ]
        );
        assert_eq!(
            into_wgpu_index_format(IndexFormat::Uint32),
            wgpu::IndexFormat::Uint32
        );
    }
}
