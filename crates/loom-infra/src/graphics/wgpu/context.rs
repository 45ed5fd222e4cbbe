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

use anyhow::anyhow;
use anyhow::Result;
use loom_core::platform::window::LoomWindowHandle;
use wgpu::SurfaceTargetUnsafe;
use wgpu::{Adapter, Instance};

/// The device, queue and presentable surface of the single Loom window.
///
/// Shared behind a mutex between the application (which acquires and
/// presents frames) and the UI backend (which records into them).
#[derive(Debug)]
pub struct WgpuGraphicsContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface_config: wgpu::SurfaceConfiguration,
    adapter_info: wgpu::AdapterInfo,
    clear_color: wgpu::Color,
}

impl WgpuGraphicsContext {
    /// Creates an instance, picks an adapter able to present to the window
    /// and initializes the context on it.
    ///
    /// ## Arguments
    /// * `window_handle` - The window to present to.
    /// * `window_size` - The initial physical size of the window surface.
    /// * `vsync` - Selects `Fifo` presentation instead of `Mailbox`.
    pub async fn for_window(
        window_handle: LoomWindowHandle,
        window_size: (u32, u32),
        vsync: bool,
    ) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::new_without_display_handle());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow!("No suitable graphics adapter: {e}"))?;
        Self::new(&instance, window_handle, adapter, window_size, vsync).await
    }

    /// Initializes the graphics context for a window surface on a
    /// pre-selected adapter.
    ///
    /// ## Arguments
    /// * `instance` - A reference to the shared `wgpu::Instance`.
    /// * `window_handle` - The window to present to.
    /// * `adapter` - The pre-selected `wgpu::Adapter` to use.
    /// * `window_size` - The initial physical size of the window surface.
    /// * `vsync` - Selects `Fifo` presentation instead of `Mailbox`.
    pub async fn new(
        instance: &Instance,
        window_handle: LoomWindowHandle,
        adapter: Adapter,
        window_size: (u32, u32),
        vsync: bool,
    ) -> Result<Self> {
        let surface_target = unsafe {
            SurfaceTargetUnsafe::from_window(&window_handle)
                .map_err(|e| anyhow!("window cannot back a surface: {e}"))?
        };

        let surface = unsafe { instance.create_surface_unsafe(surface_target)? };
        let adapter_info = adapter.get_info();
        log::info!(
            "Presenting through {} ({:?})",
            adapter_info.name,
            adapter_info.backend
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Loom Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::default(),
            })
            .await
            .map_err(|e| anyhow!("device request refused: {e}"))?;

        device.on_uncaptured_error(std::sync::Arc::new(|e| {
            log::error!("Uncaptured device error: {e:?}");
        }));

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow!("The surface reports no supported format"))?;

        let present_mode = if vsync {
            wgpu::PresentMode::Fifo
        } else {
            // Fifo is the only mode every surface supports.
            if caps.present_modes.contains(&wgpu::PresentMode::Mailbox) {
                wgpu::PresentMode::Mailbox
            } else {
                wgpu::PresentMode::Fifo
            }
        };

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: window_size.0.max(1),
            height: window_size.1.max(1),
            present_mode,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);
        log::debug!(
            "Surface {}x{} as {format:?} with {present_mode:?}",
            surface_config.width,
            surface_config.height
        );

        Ok(WgpuGraphicsContext {
            surface,
            device,
            queue,
            surface_config,
            adapter_info,
            clear_color: wgpu::Color {
                r: 0.01,
                g: 0.02,
                b: 0.03,
                a: 1.0,
            },
        })
    }

    /// Resizes the swapchain. A minimized window reports a zero extent,
    /// which leaves the surface untouched.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Surface resize to {width}x{height} skipped");
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Reconfigures the surface with its current settings, after it was
    /// reported lost or outdated.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Returns the next surface texture to render into.
    pub fn get_current_texture(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Name and backend of the adapter the device was created on.
    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// The format of the swapchain textures.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    /// The color each frame is cleared to before the UI is drawn.
    pub fn clear_color(&self) -> wgpu::Color {
        self.clear_color
    }

    /// Records a pass that clears `target` to the clear color.
    pub fn encode_clear(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Loom Clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    /// Sets the clear color from straight RGBA components.
    pub fn set_clear_color(&mut self, rgba: [f32; 4]) {
        self.clear_color = wgpu::Color {
            r: rgba[0] as f64,
            g: rgba[1] as f64,
            b: rgba[2] as f64,
            a: rgba[3] as f64,
        };
    }

    /// Size of the swapchain in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }
}
