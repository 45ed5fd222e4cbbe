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

//! The integrated application: one window, its input handler, the UI
//! context and the renderer.

use crate::config::LoomConfig;
use anyhow::{Context as _, Result};
use loom_core::input::{InputConsumer, InputHandler, InputState, Key};
use loom_core::platform::window::{LoomWindow, WindowContextMap, WindowId};
use loom_core::renderer::{RenderError, TextureId, UiRenderBackend};
use loom_core::ui::DisplayParams;
use loom_infra::platform::window::window_id;
use loom_infra::ui::{to_draw_data, EguiInput, EguiTextures, FontRegistry};
use loom_infra::{
    WgpuGraphicsContext, WgpuUiBackend, WinitInputTranslator, WinitWindow, WinitWindowBuilder,
};
use loom_lanes::UiDrawTranslator;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;

/// The per-window input handler: tables and event lists on top of the UI
/// library's input backend.
pub type UiInputHandler = InputHandler<EguiInput>;

/// A frame being rendered, between [`LoomApp::begin_render`] and
/// [`LoomApp::end_render`].
///
/// The target has already been cleared; content recorded into
/// [`RenderFrame::encoder`] is drawn under the UI.
pub struct RenderFrame {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

impl RenderFrame {
    /// The swapchain image of this frame.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// The encoder the frame is recorded into.
    pub fn encoder(&mut self) -> &mut wgpu::CommandEncoder {
        &mut self.encoder
    }
}

/// Owns every system of a running Loom application.
///
/// A frame runs in this order:
/// 1. window events are fed to [`LoomApp::handle_window_event`];
/// 2. [`LoomApp::begin_ui_frame`], then application logic reading
///    [`LoomApp::input`] and building UI on [`LoomApp::ui`];
/// 3. [`LoomApp::end_ui_frame`];
/// 4. [`LoomApp::begin_render`] / [`LoomApp::end_render`];
/// 5. [`LoomApp::poll_events`] to start collecting the next frame's input.
pub struct LoomApp {
    // Declared first so they release their GPU resources before the
    // backend and context go away.
    translator: UiDrawTranslator,
    textures: EguiTextures,

    ui_backend: Arc<WgpuUiBackend>,
    graphics: Arc<Mutex<WgpuGraphicsContext>>,
    ctx: egui::Context,
    fonts: FontRegistry,
    platform: egui_winit::State,
    inputs: WindowContextMap<UiInputHandler>,
    input_translator: WinitInputTranslator,
    window: WinitWindow,
    window_id: WindowId,
    pixels_per_point: f32,
    running: bool,
    in_ui_frame: bool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl LoomApp {
    /// Creates the window, the graphics context, the UI context and the
    /// UI renderer, and attaches an input handler to the window.
    pub fn init(event_loop: &ActiveEventLoop, config: &LoomConfig) -> Result<Self> {
        log::info!("Initializing Loom application...");
        config.validate()?;
        let window = WinitWindowBuilder::new()
            .with_title(config.window.title.clone())
            .with_dimensions(config.window.width, config.window.height)
            .build(event_loop)
            .context("Failed to create the main window")?;
        let window_id = window.id();
        let scale_factor = window.scale_factor();

        let mut graphics = pollster::block_on(WgpuGraphicsContext::for_window(
            window.clone_handle_arc(),
            window.inner_size(),
            config.vsync,
        ))?;
        graphics.set_clear_color(config.clear_color);
        log::info!(
            "Loom window {:?} on {} ({:?}), scale factor {scale_factor}",
            window_id,
            graphics.adapter_info().name,
            graphics.adapter_info().backend
        );
        let graphics = Arc::new(Mutex::new(graphics));

        let ui_backend = Arc::new(WgpuUiBackend::new(graphics.clone())?);
        let backend: Arc<dyn UiRenderBackend> = ui_backend.clone();
        let translator = UiDrawTranslator::new(backend.clone());
        let textures = EguiTextures::new(backend);

        let ctx = egui::Context::default();
        let mut fonts = FontRegistry::new();
        for font in &config.fonts {
            let family = if font.monospace {
                egui::FontFamily::Monospace
            } else {
                egui::FontFamily::Proportional
            };
            if let Err(e) = fonts.add_font_file(&ctx, &font.name, &font.path, family, font.scale) {
                log::warn!("Skipping font '{}' ({}): {e}", font.name, font.path.display());
            }
        }

        let platform = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window.winit(),
            Some(scale_factor as f32),
            None,
            None,
        );

        let mut inputs = WindowContextMap::new();
        inputs.attach(
            window_id,
            InputHandler::with_max_key(EguiInput::new(ctx.clone()), Key(config.max_key_code)),
        );
        let input_translator = WinitInputTranslator::new(scale_factor)
            .with_pixels_per_line(config.scroll_pixels_per_line);

        log::info!("Loom application initialized (window {window_id:?}).");
        Ok(Self {
            translator,
            textures,
            ui_backend,
            graphics,
            ctx,
            fonts,
            platform,
            inputs,
            input_translator,
            window,
            window_id,
            pixels_per_point: scale_factor as f32,
            running: true,
            in_ui_frame: false,
        })
    }

    /// `true` until the window was asked to close or [`LoomApp::exit`] ran.
    pub fn run(&self) -> bool {
        self.running
    }

    /// Stops the application after the current frame.
    pub fn exit(&mut self) {
        self.running = false;
    }

    /// The id of the main window.
    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    /// The main window.
    pub fn window(&self) -> &WinitWindow {
        &self.window
    }

    /// The UI context, valid for building UI between
    /// [`LoomApp::begin_ui_frame`] and [`LoomApp::end_ui_frame`].
    pub fn ui(&self) -> &egui::Context {
        &self.ctx
    }

    /// Registers a TTF/OTF font with the UI.
    pub fn add_font(&mut self, name: &str, data: Vec<u8>, family: egui::FontFamily) {
        self.fonts.add_font(&self.ctx, name, data, family);
    }

    /// Makes a renderer texture created through [`LoomApp::ui_backend`]
    /// usable in `egui::Image` and painter calls.
    pub fn register_user_texture(&mut self, texture: TextureId) -> egui::TextureId {
        self.textures.register_user_texture(texture)
    }

    /// Stops resolving a registered user texture. The texture itself stays
    /// alive until the caller destroys it.
    pub fn unregister_user_texture(&mut self, id: egui::TextureId) -> Option<TextureId> {
        self.textures.unregister_user_texture(id)
    }

    /// The input of the main window collected since the last
    /// [`LoomApp::poll_events`]. `None` once the window was detached during
    /// teardown.
    pub fn input(&self) -> Option<&InputState> {
        self.input_of(self.window_id)
    }

    /// The input collected for `window`, if a handler is attached to it.
    pub fn input_of(&self, window: WindowId) -> Option<&InputState> {
        self.inputs.get(window).map(|handler| handler.state())
    }

    /// The graphics context, for applications rendering their own content.
    pub fn graphics(&self) -> &Arc<Mutex<WgpuGraphicsContext>> {
        &self.graphics
    }

    /// The UI render backend, for creating textures shown in the UI.
    pub fn ui_backend(&self) -> &Arc<WgpuUiBackend> {
        &self.ui_backend
    }

    /// The UI draw translator.
    pub fn translator(&self) -> &UiDrawTranslator {
        &self.translator
    }

    /// Starts collecting a new frame of input: event lists are emptied,
    /// key tables and the cursor state carry over.
    pub fn poll_events(&mut self) {
        for (_, handler) in self.inputs.iter_mut() {
            handler.clear_events();
        }
    }

    /// Routes one window event to the input handler of its window and
    /// reacts to window lifecycle events.
    ///
    /// ## Returns
    /// `Some(captured)` for input events, `None` otherwise.
    pub fn handle_window_event(
        &mut self,
        window: winit::window::WindowId,
        event: &WindowEvent,
    ) -> Option<bool> {
        let id = window_id(window);
        match event {
            WindowEvent::CloseRequested if id == self.window_id => {
                log::info!("Shutdown requested.");
                self.running = false;
            }
            WindowEvent::Resized(size) if id == self.window_id => {
                lock(&self.graphics).resize(size.width, size.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } if id == self.window_id => {
                log::info!("Scale factor changed to {scale_factor}");
                self.pixels_per_point = *scale_factor as f32;
            }
            _ => {}
        }

        let translator = &mut self.input_translator;
        self.inputs
            .dispatch(id, |handler| translator.dispatch(id, event, handler))
            .flatten()
    }

    /// Begins a UI frame.
    ///
    /// A font atlas left stale by the previous frame is rebuilt first, then
    /// the queued input is handed to the UI context.
    pub fn begin_ui_frame(&mut self) -> Result<(), RenderError> {
        self.rebuild_font_atlas_if_needed()?;

        let (width, height) = self.window.inner_size();
        let ppp = self.pixels_per_point;
        let screen_size = [width as f32 / ppp, height as f32 / ppp];
        let raw_input = match self.inputs.get_mut(self.window_id) {
            Some(handler) => handler.consumer_mut().take_raw_input(screen_size, ppp),
            None => egui::RawInput::default(),
        };
        self.ctx.begin_pass(raw_input);
        self.in_ui_frame = true;
        Ok(())
    }

    /// Ends the UI frame and turns its output into the renderable.
    ///
    /// ## Errors
    /// A failed texture upload or UI translation; the frame then draws no
    /// UI.
    pub fn end_ui_frame(&mut self) -> Result<(), RenderError> {
        if !self.in_ui_frame {
            log::warn!("end_ui_frame called without begin_ui_frame");
            return Ok(());
        }
        self.in_ui_frame = false;

        let output = self.ctx.end_pass();
        self.platform
            .handle_platform_output(self.window.winit(), output.platform_output);

        self.textures.apply(&output.textures_delta)?;
        // The pass is over, so the atlas may change.
        self.rebuild_font_atlas_if_needed()?;

        let ppp = output.pixels_per_point;
        let primitives = self.ctx.tessellate(output.shapes, ppp);
        let draw_data = to_draw_data(&primitives, &self.textures);

        let (width, height) = self.window.inner_size();
        let display = DisplayParams {
            size: [width as f32 / ppp, height as f32 / ppp],
            framebuffer_scale: [ppp, ppp],
        };
        self.translator.update_view(&draw_data, &display)?;
        Ok(())
    }

    /// Acquires the next swapchain image and clears it.
    ///
    /// ## Returns
    /// `Ok(None)` when the surface is temporarily unavailable (minimized,
    /// lost or outdated); the caller skips the frame.
    pub fn begin_render(&mut self) -> Result<Option<RenderFrame>, RenderError> {
        let mut graphics = lock(&self.graphics);
        let (width, height) = graphics.size();
        if width == 0 || height == 0 {
            return Ok(None);
        }
        let surface_texture = match graphics.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                graphics.reconfigure();
                return Ok(None);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface acquisition timed out, skipping frame");
                return Ok(None);
            }
            Err(e) => return Err(RenderError::SurfaceAcquisitionFailed(e.to_string())),
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = graphics
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Loom Frame Encoder"),
            });
        graphics.encode_clear(&mut encoder, &view);

        Ok(Some(RenderFrame {
            surface_texture,
            view,
            encoder,
        }))
    }

    /// Draws the UI over the frame, submits and presents it, then releases
    /// textures the UI freed during the frame.
    pub fn end_render(&mut self, frame: RenderFrame) {
        let RenderFrame {
            surface_texture,
            view,
            mut encoder,
        } = frame;
        self.ui_backend.render(&mut encoder, &view, None);
        {
            let graphics = lock(&self.graphics);
            graphics.queue.submit(std::iter::once(encoder.finish()));
        }
        self.window.winit().pre_present_notify();
        surface_texture.present();
        self.textures.free_pending();
    }

    /// Requests another redraw of the main window.
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    fn rebuild_font_atlas_if_needed(&mut self) -> Result<(), RenderError> {
        if let Some(image) = self.textures.take_dirty_font_image() {
            self.translator.rebuild_font_atlas(image)?;
        }
        Ok(())
    }
}

impl Drop for LoomApp {
    fn drop(&mut self) {
        log::info!("LoomApp is being dropped. Waiting for the GPU before teardown...");
        self.ui_backend.wait_for_gpu();
        if let Some(handler) = self.inputs.detach(self.window_id) {
            log::debug!(
                "Detached input handler after {} events",
                handler.state().event_index()
            );
        }
    }
}

impl std::fmt::Debug for LoomApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoomApp")
            .field("window_id", &self.window_id)
            .field("pixels_per_point", &self.pixels_per_point)
            .field("running", &self.running)
            .field("translator", &self.translator)
            .finish()
    }
}
