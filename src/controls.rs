//! Maps viewer input onto the animation parameters and the orbit camera.
//!
//! | Input | Effect |
//! |-------|--------|
//! | `O` | toggle oscillation |
//! | `B` | toggle blade rotation |
//! | `[` / `]` | oscillation speed -/+ 0.5 (min 0.5) |
//! | `-` / `=` | oscillation amplitude -/+ 5° (0..=90) |
//! | `,` / `.` | blade speed -/+ 50°/s (0..=1000) |
//! | `Up` / `Down` | camera height +/- 0.25 |
//! | `R` | reset everything to defaults |
//! | left drag | orbit 0.5° per pixel |
//! | wheel | distance -/+ 0.5 per notch (3..=15) |

use winit::keyboard::KeyCode;

use crate::animation::AnimationParams;
use crate::input::Input;
use crate::orbit_camera::CameraState;

/// A discrete viewer action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    ToggleOscillation,
    ToggleBlades,
    SlowerOscillation,
    FasterOscillation,
    NarrowerSweep,
    WiderSweep,
    SlowerBlades,
    FasterBlades,
    RaiseCamera,
    LowerCamera,
    Reset,
}

impl Command {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        Some(match key {
            KeyCode::KeyO => Command::ToggleOscillation,
            KeyCode::KeyB => Command::ToggleBlades,
            KeyCode::BracketLeft => Command::SlowerOscillation,
            KeyCode::BracketRight => Command::FasterOscillation,
            KeyCode::Minus => Command::NarrowerSweep,
            KeyCode::Equal => Command::WiderSweep,
            KeyCode::Comma => Command::SlowerBlades,
            KeyCode::Period => Command::FasterBlades,
            KeyCode::ArrowUp => Command::RaiseCamera,
            KeyCode::ArrowDown => Command::LowerCamera,
            KeyCode::KeyR => Command::Reset,
            _ => return None,
        })
    }
}

/// Step sizes and limits for every adjustable value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Controls {
    pub oscillation_speed_step: f32,
    pub min_oscillation_speed: f32,
    pub amplitude_step: f32,
    pub max_amplitude: f32,
    pub blade_speed_step: f32,
    pub max_blade_speed: f32,
    pub height_step: f32,
    pub degrees_per_pixel: f32,
    pub zoom_step: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Camera placement restored by [`Command::Reset`].
    pub home: CameraState,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            oscillation_speed_step: 0.5,
            min_oscillation_speed: 0.5,
            amplitude_step: 5.0,
            max_amplitude: 90.0,
            blade_speed_step: 50.0,
            max_blade_speed: 1000.0,
            height_step: 0.25,
            degrees_per_pixel: 0.5,
            zoom_step: 0.5,
            min_distance: 3.0,
            max_distance: 15.0,
            home: CameraState::default(),
        }
    }
}

impl Controls {
    /// Applies everything `input` collected this frame.
    pub fn update(&self, input: &Input, params: &mut AnimationParams, camera: &mut CameraState) {
        for &key in input.pressed_keys() {
            if let Some(command) = Command::from_key(key) {
                self.apply(command, params, camera);
            }
        }
        let drag = input.drag_delta();
        if drag.x != 0.0 {
            self.drag(drag.x, camera);
        }
        if input.wheel_notches() != 0 {
            self.zoom(input.wheel_notches(), camera);
        }
    }

    pub fn apply(&self, command: Command, params: &mut AnimationParams, camera: &mut CameraState) {
        match command {
            Command::ToggleOscillation => {
                params.oscillation_enabled = !params.oscillation_enabled;
                log::debug!("oscillation enabled: {}", params.oscillation_enabled);
            }
            Command::ToggleBlades => {
                params.blade_rotation_enabled = !params.blade_rotation_enabled;
                log::debug!("blade rotation enabled: {}", params.blade_rotation_enabled);
            }
            Command::SlowerOscillation | Command::FasterOscillation => {
                let step = signed(
                    command == Command::FasterOscillation,
                    self.oscillation_speed_step,
                );
                params.oscillation_speed =
                    (params.oscillation_speed + step).max(self.min_oscillation_speed);
                log::debug!("oscillation speed: {:.1}", params.oscillation_speed);
            }
            Command::NarrowerSweep | Command::WiderSweep => {
                let step = signed(command == Command::WiderSweep, self.amplitude_step);
                params.max_oscillation_angle =
                    (params.max_oscillation_angle + step).clamp(0.0, self.max_amplitude);
                log::debug!("oscillation amplitude: {:.0}°", params.max_oscillation_angle);
            }
            Command::SlowerBlades | Command::FasterBlades => {
                let step = signed(command == Command::FasterBlades, self.blade_speed_step);
                params.blade_speed = (params.blade_speed + step).clamp(0.0, self.max_blade_speed);
                log::debug!("blade speed: {:.0}°/s", params.blade_speed);
            }
            Command::RaiseCamera | Command::LowerCamera => {
                camera.height += signed(command == Command::RaiseCamera, self.height_step);
                log::debug!("camera height: {:.2}", camera.height);
            }
            Command::Reset => {
                params.reset();
                *camera = self.home;
                log::debug!("all settings reset to defaults");
            }
        }
    }

    /// Orbits by a horizontal drag of `dx` pixels.
    pub fn drag(&self, dx: f32, camera: &mut CameraState) {
        camera.orbit(dx * self.degrees_per_pixel);
        log::debug!("camera azimuth: {:.1}°", camera.azimuth_deg);
    }

    /// Zooms by wheel notches. Scrolling away from the user moves closer.
    pub fn zoom(&self, notches: i32, camera: &mut CameraState) {
        let distance = camera.distance - notches as f32 * self.zoom_step;
        camera.distance = distance.clamp(self.min_distance, self.max_distance);
        log::debug!("camera distance: {:.1}", camera.distance);
    }
}

fn signed(up: bool, step: f32) -> f32 {
    if up { step } else { -step }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn setup() -> (Controls, AnimationParams, CameraState) {
        (Controls::default(), AnimationParams::default(), CameraState::default())
    }

    #[test]
    fn zoom_clamps_distance() {
        let (controls, _, mut camera) = setup();
        controls.zoom(-100, &mut camera);
        assert_eq!(camera.distance, 15.0);
        controls.zoom(100, &mut camera);
        assert_eq!(camera.distance, 3.0);
        controls.zoom(-1, &mut camera);
        assert_eq!(camera.distance, 3.5);
    }

    #[test]
    fn drag_wraps_azimuth() {
        let (controls, _, mut camera) = setup();
        controls.drag(660.0, &mut camera);
        assert_abs_diff_eq!(camera.azimuth_deg, 15.0, epsilon = 1e-4);
        controls.drag(-60.0, &mut camera);
        assert_abs_diff_eq!(camera.azimuth_deg, 345.0, epsilon = 1e-4);
    }

    #[test]
    fn speed_and_amplitude_respect_limits() {
        let (controls, mut params, mut camera) = setup();
        for _ in 0..10 {
            controls.apply(Command::SlowerOscillation, &mut params, &mut camera);
            controls.apply(Command::NarrowerSweep, &mut params, &mut camera);
            controls.apply(Command::SlowerBlades, &mut params, &mut camera);
        }
        assert_eq!(params.oscillation_speed, 0.5);
        assert_eq!(params.max_oscillation_angle, 0.0);
        assert_eq!(params.blade_speed, 0.0);

        for _ in 0..30 {
            controls.apply(Command::WiderSweep, &mut params, &mut camera);
            controls.apply(Command::FasterBlades, &mut params, &mut camera);
        }
        assert_eq!(params.max_oscillation_angle, 90.0);
        assert_eq!(params.blade_speed, 1000.0);
    }

    #[test]
    fn reset_restores_defaults() {
        let (controls, mut params, mut camera) = setup();
        controls.apply(Command::ToggleOscillation, &mut params, &mut camera);
        controls.apply(Command::FasterBlades, &mut params, &mut camera);
        controls.apply(Command::RaiseCamera, &mut params, &mut camera);
        controls.drag(40.0, &mut camera);
        assert!(!params.oscillation_enabled);
        assert_eq!(camera.height, 2.25);

        controls.apply(Command::Reset, &mut params, &mut camera);
        assert_eq!(params, AnimationParams::default());
        assert_eq!(camera, CameraState::default());
        assert_eq!(camera.distance, 8.0);
        assert_eq!(camera.azimuth_deg, 45.0);
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(Command::from_key(KeyCode::KeyO), Some(Command::ToggleOscillation));
        assert_eq!(Command::from_key(KeyCode::KeyB), Some(Command::ToggleBlades));
        assert_eq!(Command::from_key(KeyCode::Equal), Some(Command::WiderSweep));
        assert_eq!(Command::from_key(KeyCode::KeyQ), None);
    }
}
