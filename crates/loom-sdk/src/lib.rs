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

//! The public-facing API of Loom.
//!
//! Implement [`Application`] and hand it to [`run`]: the runner owns the
//! event loop, builds a [`LoomApp`] once the platform is ready and drives
//! one input/UI/render cycle per redraw.

use anyhow::Result;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

pub mod app;
pub mod config;
pub mod logging;

pub use app::{LoomApp, RenderFrame, UiInputHandler};
pub use config::{ConfigError, FontConfig, LoomConfig, WindowConfig};
pub use logging::init_logging;

pub mod prelude {
    pub use crate::{run, Application, LoomApp, LoomConfig, RenderFrame};
    pub use loom_core::input::{
        Action, EventKind, EventKinds, InputState, Key, ModKeyMask, MouseButton, MouseButtonMask,
    };
    pub use loom_core::{Event, WindowId};
}

/// The user's side of a Loom application.
pub trait Application: Sized + 'static {
    /// Called once the window and renderer exist.
    fn new(app: &mut LoomApp) -> Result<Self>;

    /// Called every frame inside the UI frame: read `app.input()` and build
    /// UI on `app.ui()`.
    fn update(&mut self, app: &mut LoomApp);

    /// Records the application's own content under the UI.
    fn render(&mut self, _app: &LoomApp, _frame: &mut RenderFrame) {}
}

/// The internal state of the running application, managed by the winit
/// event loop.
struct EngineState<A: Application> {
    config: LoomConfig,
    app: Option<A>,
    loom: Option<LoomApp>,
}

impl<A: Application> EngineState<A> {
    fn frame(&mut self) {
        let (Some(loom), Some(app)) = (self.loom.as_mut(), self.app.as_mut()) else {
            return;
        };

        if let Err(e) = loom.begin_ui_frame() {
            log::error!("Failed to begin the UI frame: {e}");
        }
        app.update(loom);
        if let Err(e) = loom.end_ui_frame() {
            log::error!("UI frame failed: {e}");
        }

        match loom.begin_render() {
            Ok(Some(mut frame)) => {
                app.render(loom, &mut frame);
                loom.end_render(frame);
            }
            Ok(None) => log::trace!("Frame skipped: surface unavailable"),
            Err(e) => log::error!("Rendering error: {e}"),
        }

        loom.poll_events();
    }
}

impl<A: Application> Drop for EngineState<A> {
    fn drop(&mut self) {
        log::info!("EngineState is being dropped. Performing controlled shutdown...");
        // The application may hold resources of the renderer.
        self.app.take();
        self.loom.take();
        log::info!("Shutdown complete.");
    }
}

impl<A: Application> ApplicationHandler for EngineState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.loom.is_some() {
            return;
        }
        log::info!("Application resumed. Initializing window and systems...");

        let mut loom = match LoomApp::init(event_loop, &self.config) {
            Ok(loom) => loom,
            Err(e) => {
                log::error!("Initialization failed: {e:#}");
                event_loop.exit();
                return;
            }
        };
        match A::new(&mut loom) {
            Ok(app) => self.app = Some(app),
            Err(e) => {
                log::error!("Application failed to start: {e:#}");
                event_loop.exit();
                return;
            }
        }
        self.loom = Some(loom);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if let WindowEvent::RedrawRequested = event {
            self.frame();
        } else if let Some(loom) = self.loom.as_mut() {
            loom.handle_window_event(id, &event);
        }

        if self.loom.as_ref().is_some_and(|loom| !loom.run()) {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(loom) = &self.loom {
            loom.request_redraw();
        }
    }
}

/// Creates the event loop and runs `A` until its window closes.
///
/// Blocks the current thread. Logging is left to the caller, see
/// [`init_logging`].
pub fn run<A: Application>(config: LoomConfig) -> Result<()> {
    log::info!("Loom: Starting '{}'...", config.window.title);
    config.validate()?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut state = EngineState::<A> {
        config,
        app: None,
        loom: None,
    };
    event_loop.run_app(&mut state)?;
    Ok(())
}
