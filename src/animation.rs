//! Per-frame animation phases for the fan.
//!
//! [`AnimationClock`] owns the tunable [`AnimationParams`] and its own running
//! time. Once per rendered frame the app calls [`AnimationClock::advance`] with the
//! elapsed milliseconds, which updates the two phases in [`AnimationState`]:
//!
//! - the oscillation angle, a bounded sinusoid of total running time
//! - the blade angle, integrated from the blade speed and wrapped into `[0, 360)`
//!
//! A disabled motion keeps its last angle and is flagged inactive, so the traversal
//! skips its dynamic rotation until it is re-enabled.

use serde::Deserialize;

/// User-tunable animation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationParams {
    pub oscillation_enabled: bool,
    /// Angular frequency of the oscillation, in radians per second.
    pub oscillation_speed: f32,
    /// Peak oscillation angle in degrees.
    pub max_oscillation_angle: f32,
    pub blade_rotation_enabled: bool,
    /// Blade spin rate in degrees per second.
    pub blade_speed: f32,
}

impl AnimationParams {
    pub const DEFAULT_OSCILLATION_SPEED: f32 = 2.0;
    pub const DEFAULT_MAX_OSCILLATION_ANGLE: f32 = 30.0;
    pub const DEFAULT_BLADE_SPEED: f32 = 200.0;

    /// Restores the defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self {
            oscillation_enabled: true,
            oscillation_speed: Self::DEFAULT_OSCILLATION_SPEED,
            max_oscillation_angle: Self::DEFAULT_MAX_OSCILLATION_ANGLE,
            blade_rotation_enabled: true,
            blade_speed: Self::DEFAULT_BLADE_SPEED,
        }
    }
}

/// The phases read by the scene traversal. Written only by [`AnimationClock`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationState {
    /// Oscillation angle in degrees, within `±max_oscillation_angle`.
    pub oscillation_deg: f32,
    /// Blade angle in degrees, within `[0, 360)`.
    pub blade_deg: f32,
    pub oscillation_active: bool,
    pub blade_active: bool,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            oscillation_deg: 0.0,
            blade_deg: 0.0,
            oscillation_active: true,
            blade_active: true,
        }
    }
}

/// Advances [`AnimationState`] from frame deltas.
#[derive(Clone, Debug, Default)]
pub struct AnimationClock {
    pub params: AnimationParams,
    now_ms: f64,
}

impl AnimationClock {
    pub fn new(params: AnimationParams) -> Self {
        Self { params, now_ms: 0.0 }
    }

    /// Total simulated time in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Advances the clock by `elapsed_ms` and updates `state`.
    ///
    /// Negative or NaN deltas count as zero.
    pub fn advance(&mut self, state: &mut AnimationState, elapsed_ms: f64) {
        let elapsed_ms = if elapsed_ms > 0.0 { elapsed_ms } else { 0.0 };
        self.now_ms += elapsed_ms;

        let p = &self.params;
        state.oscillation_active = p.oscillation_enabled;
        state.blade_active = p.blade_rotation_enabled;

        if p.oscillation_enabled {
            let phase = self.now_ms * (p.oscillation_speed as f64 / 1000.0);
            state.oscillation_deg = phase.sin() as f32 * p.max_oscillation_angle;
        }

        if p.blade_rotation_enabled {
            let delta = p.blade_speed as f64 * elapsed_ms / 1000.0;
            let wrapped = (state.blade_deg as f64 + delta).rem_euclid(360.0) as f32;
            // Rounding in the f64 -> f32 cast can land exactly on 360.
            state.blade_deg = if wrapped >= 360.0 { 0.0 } else { wrapped };
        }
    }
}
