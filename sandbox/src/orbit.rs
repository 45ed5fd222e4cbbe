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

//! A camera orbiting a target on a sphere.

use std::f32::consts::PI;

/// Spherical camera rig: `theta` turns around the up axis, `phi` tilts
/// above or below the horizon, `radius` is the distance to the target.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitController {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
    pub target: [f32; 3],
    pub up: [f32; 3],
    position: [f32; 3],

    // Past ~0.48 pi the up vector converges with the view direction.
    pub phi_min: f32,
    pub phi_max: f32,

    pub radius_min: f32,
    pub radius_max: f32,

    pub mouse_pan_gain: f32,
    pub nonmouse_pan_gain: f32,

    pub mouse_dolly_gain: f32,
    pub nonmouse_dolly_gain: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        let mut orbit = Self {
            radius: 5.0,
            theta: 0.0,
            phi: 0.0,
            target: [0.0; 3],
            up: [0.0, 1.0, 0.0],
            position: [0.0; 3],
            phi_min: -0.48 * PI,
            phi_max: 0.48 * PI,
            radius_min: 1.5,
            radius_max: 150.0,
            mouse_pan_gain: 0.01,
            nonmouse_pan_gain: 0.1,
            mouse_dolly_gain: -0.1,
            nonmouse_dolly_gain: 0.05,
        };
        orbit.update();
        orbit
    }
}

impl OrbitController {
    /// Pans by a cursor movement in points. Dragging right turns the
    /// camera left around the target.
    pub fn mouse_pan(&mut self, dx: f32, dy: f32) {
        self.theta -= self.mouse_pan_gain * dx;
        self.phi += self.mouse_pan_gain * dy;
        self.enforce_pan_bounds();
    }

    /// Pans by key axis values in `-1..=1`.
    pub fn nonmouse_pan(&mut self, horizontal: f32, vertical: f32) {
        self.theta += self.nonmouse_pan_gain * horizontal;
        self.phi += self.nonmouse_pan_gain * vertical;
        self.enforce_pan_bounds();
    }

    /// Dollies by scroll lines. Scrolling up moves closer.
    pub fn mouse_dolly(&mut self, lines: f32) {
        self.radius += self.radius * self.mouse_dolly_gain * lines;
        self.radius = self.radius.clamp(self.radius_min, self.radius_max);
    }

    /// Dollies by a key axis value in `-1..=1`.
    pub fn nonmouse_dolly(&mut self, amount: f32) {
        self.radius += self.radius * self.nonmouse_dolly_gain * amount;
        self.radius = self.radius.clamp(self.radius_min, self.radius_max);
    }

    fn enforce_pan_bounds(&mut self) {
        if !(-PI..=PI).contains(&self.theta) {
            self.theta = (self.theta + PI).rem_euclid(2.0 * PI) - PI;
        }
        self.phi = self.phi.clamp(self.phi_min, self.phi_max);
    }

    /// Recomputes the camera position from the spherical coordinates.
    pub fn update(&mut self) {
        let y = self.radius * self.phi.sin();
        let yr = self.phi.cos();
        let x = self.radius * yr * self.theta.sin();
        let z = self.radius * yr * self.theta.cos();
        self.position = add(self.target, [x, y, z]);
    }

    /// The camera position as of the last [`OrbitController::update`].
    pub fn position(&self) -> [f32; 3] {
        self.position
    }

    /// Projects a world point through a pinhole camera looking at the
    /// target into a viewport of `size` points, y down.
    ///
    /// Returns `None` for points behind the near plane.
    pub fn project(&self, point: [f32; 3], size: [f32; 2]) -> Option<[f32; 2]> {
        const NEAR: f32 = 0.1;
        let forward = normalize(sub(self.target, self.position))?;
        let right = normalize(cross(forward, self.up))?;
        let up = cross(right, forward);

        let d = sub(point, self.position);
        let depth = dot(d, forward);
        if depth < NEAR {
            return None;
        }
        let focal = 0.8 * size[0].min(size[1]);
        Some([
            0.5 * size[0] + dot(d, right) / depth * focal,
            0.5 * size[1] - dot(d, up) / depth * focal,
        ])
    }
}

fn add(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f32; 3]) -> Option<[f32; 3]> {
    let len = dot(v, v).sqrt();
    (len > f32::EPSILON).then(|| [v[0] / len, v[1] / len, v[2] / len])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn starts_on_the_positive_z_axis() {
        let orbit = OrbitController::default();
        assert_eq!(orbit.position(), [0.0, 0.0, 5.0]);
    }

    #[test]
    fn quarter_turn_moves_to_the_x_axis() {
        let mut orbit = OrbitController::default();
        orbit.theta = PI / 2.0;
        orbit.update();
        let [x, y, z] = orbit.position();
        assert_relative_eq!(x, 5.0, epsilon = 1e-5);
        assert_relative_eq!(y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn theta_wraps_and_phi_clamps() {
        let mut orbit = OrbitController::default();
        orbit.nonmouse_pan(40.0, 40.0);
        assert!((-PI..=PI).contains(&orbit.theta));
        assert_relative_eq!(orbit.theta, 4.0 - 2.0 * PI, epsilon = 1e-5);
        assert_eq!(orbit.phi, orbit.phi_max);

        orbit.mouse_pan(0.0, -1.0e4);
        assert_eq!(orbit.phi, orbit.phi_min);
    }

    #[test]
    fn mouse_drag_turns_against_the_cursor() {
        let mut orbit = OrbitController::default();
        orbit.mouse_pan(10.0, 0.0);
        assert_relative_eq!(orbit.theta, -0.1, epsilon = 1e-6);
    }

    #[test]
    fn dolly_is_proportional_to_the_radius_and_clamped() {
        let mut orbit = OrbitController::default();
        orbit.mouse_dolly(1.0);
        assert_relative_eq!(orbit.radius, 4.5, epsilon = 1e-5);
        orbit.nonmouse_dolly(1.0);
        assert_relative_eq!(orbit.radius, 4.725, epsilon = 1e-5);

        for _ in 0..100 {
            orbit.mouse_dolly(5.0);
        }
        assert_eq!(orbit.radius, orbit.radius_min);
        for _ in 0..200 {
            orbit.nonmouse_dolly(1.0);
        }
        assert_eq!(orbit.radius, orbit.radius_max);
    }

    #[test]
    fn target_projects_to_the_viewport_center() {
        let orbit = OrbitController::default();
        let [x, y] = orbit.project([0.0; 3], [800.0, 600.0]).unwrap();
        assert_relative_eq!(x, 400.0, epsilon = 1e-3);
        assert_relative_eq!(y, 300.0, epsilon = 1e-3);

        // Up in the world is up on screen.
        let [_, above] = orbit.project([0.0, 1.0, 0.0], [800.0, 600.0]).unwrap();
        assert!(above < 300.0);
    }

    #[test]
    fn points_behind_the_camera_are_not_projected() {
        let orbit = OrbitController::default();
        assert_eq!(orbit.project([0.0, 0.0, 10.0], [800.0, 600.0]), None);
    }
}
