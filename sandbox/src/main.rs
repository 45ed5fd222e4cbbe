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

// Loom Sandbox
// Orbit camera driven by input events and key axes, with a UI overlay.

mod orbit;

use anyhow::Result;
use loom_sdk::prelude::*;
use loom_sdk::{init_logging, LoomConfig};
use orbit::OrbitController;
use std::sync::PoisonError;
use std::time::Instant;

/// Backdrops cycled with O/P.
const BACKDROPS: &[(&str, [f32; 4])] = &[
    ("Midnight", [0.01, 0.02, 0.03, 1.0]),
    ("Dusk", [0.18, 0.09, 0.14, 1.0]),
    ("Overcast", [0.35, 0.38, 0.42, 1.0]),
    ("Studio", [0.12, 0.12, 0.12, 1.0]),
    ("Noon", [0.42, 0.62, 0.85, 1.0]),
];

const CUBE_CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

struct SandboxApp {
    orbit: OrbitController,
    backdrop: usize,
    last_frame: Instant,
    fps: f32,
}

impl SandboxApp {
    /// Applies this frame's input to the camera. Returns the requested
    /// backdrop step.
    fn process_input(&mut self, input: &InputState) -> isize {
        let mut step = 0;
        for event in input.events() {
            match event.kind {
                EventKind::CursorPos { dx, dy, buttons, .. }
                    if buttons.is_held(MouseButton::LEFT) =>
                {
                    self.orbit.mouse_pan(dx as f32, dy as f32);
                }
                EventKind::Scroll { dy, .. } => self.orbit.mouse_dolly(dy as f32),
                EventKind::Key {
                    key,
                    action: Action::Press,
                    ..
                } => {
                    if key == Key::O {
                        step = -1;
                    } else if key == Key::P {
                        step = 1;
                    }
                }
                _ => {}
            }
        }

        let pan_horizontal = input.axis(Key::A, Key::D);
        let pan_vertical = input.axis(Key::S, Key::W);
        if pan_horizontal != 0 || pan_vertical != 0 {
            self.orbit
                .nonmouse_pan(pan_horizontal as f32, pan_vertical as f32);
        }
        let dolly = input.axis(Key::E, Key::Q);
        if dolly != 0 {
            self.orbit.nonmouse_dolly(dolly as f32);
        }
        step
    }

    fn step_backdrop(&mut self, app: &LoomApp, step: isize) {
        let next = self
            .backdrop
            .saturating_add_signed(step)
            .min(BACKDROPS.len() - 1);
        if next != self.backdrop {
            self.backdrop = next;
            self.apply_backdrop(app);
        }
    }

    fn apply_backdrop(&self, app: &LoomApp) {
        let (name, color) = BACKDROPS[self.backdrop];
        log::info!("Backdrop: {name}");
        app.graphics()
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_clear_color(color);
    }

    fn tick_fps(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        if dt > 0.0 {
            self.fps = if self.fps == 0.0 {
                1.0 / dt
            } else {
                0.95 * self.fps + 0.05 / dt
            };
        }
    }

    fn draw_scene(&self, ctx: &egui::Context) {
        let rect = ctx.screen_rect();
        let painter = ctx.layer_painter(egui::LayerId::background());
        let stroke = egui::Stroke::new(1.5, egui::Color32::from_rgb(120, 180, 255));
        let project = |corner: [f32; 3]| {
            self.orbit
                .project(corner, [rect.width(), rect.height()])
                .map(|[x, y]| rect.min + egui::vec2(x, y))
        };
        for (a, b) in CUBE_EDGES {
            if let (Some(pa), Some(pb)) = (project(CUBE_CORNERS[a]), project(CUBE_CORNERS[b])) {
                painter.line_segment([pa, pb], stroke);
            }
        }
    }

    fn draw_overlay(&mut self, ctx: &egui::Context) {
        let frame = egui::Frame::popup(&ctx.style()).fill(egui::Color32::from_black_alpha(140));

        egui::Area::new(egui::Id::new("fps_counter"))
            .fixed_pos(egui::pos2(10.0, 10.0))
            .show(ctx, |ui| {
                frame.show(ui, |ui| ui.label(format!("FPS: {:.1}", self.fps)));
            });

        egui::Area::new(egui::Id::new("controls"))
            .fixed_pos(egui::pos2(10.0, 50.0))
            .show(ctx, |ui| {
                frame.show(ui, |ui| {
                    ui.monospace("  mouse drag - move camera");
                    ui.monospace("mouse scroll - zoom");
                    ui.monospace("     w,a,s,d - move camera");
                    ui.monospace("         q,e - zoom");
                    ui.monospace("         o,p - change backdrop");
                });
            });

        egui::Window::new("Camera")
            .default_pos(egui::pos2(10.0, 190.0))
            .resizable(false)
            .show(ctx, |ui| {
                let [x, y, z] = self.orbit.position();
                ui.label(format!("Backdrop: {}", BACKDROPS[self.backdrop].0));
                ui.label(format!("Position: ({x:.2}, {y:.2}, {z:.2})"));
                ui.label(format!(
                    "theta {:.2}  phi {:.2}  radius {:.2}",
                    self.orbit.theta, self.orbit.phi, self.orbit.radius
                ));
                ui.separator();
                ui.add(
                    egui::Slider::new(&mut self.orbit.mouse_pan_gain, 0.001..=0.05)
                        .text("mouse pan gain"),
                );
                ui.add(
                    egui::Slider::new(&mut self.orbit.nonmouse_pan_gain, 0.01..=0.5)
                        .text("key pan gain"),
                );
                ui.add(
                    egui::Slider::new(&mut self.orbit.nonmouse_dolly_gain, 0.01..=0.2)
                        .text("key dolly gain"),
                );
            });
    }
}

impl Application for SandboxApp {
    fn new(app: &mut LoomApp) -> Result<Self> {
        let sandbox = Self {
            orbit: OrbitController::default(),
            backdrop: 2,
            last_frame: Instant::now(),
            fps: 0.0,
        };
        sandbox.apply_backdrop(app);
        Ok(sandbox)
    }

    fn update(&mut self, app: &mut LoomApp) {
        self.tick_fps();
        let step = match app.input() {
            Some(input) => self.process_input(input),
            None => 0,
        };
        if step != 0 {
            self.step_backdrop(app, step);
        }
        self.orbit.update();

        let ctx = app.ui().clone();
        self.draw_scene(&ctx);
        self.draw_overlay(&ctx);
    }
}

fn main() -> Result<()> {
    let config = LoomConfig::load_or_default("loom.json")?;
    init_logging(&config.log_filter);
    run::<SandboxApp>(config)?;
    Ok(())
}
