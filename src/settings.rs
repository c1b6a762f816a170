//! Tuning knobs for the Sand experience
//!
//! Defaults mirror the values shipped on the device. Settings round-trip
//! through JSON so a host can persist or override them without a rebuild.

use serde::{Deserialize, Serialize};

/// What `teardown()` does before signalling completion.
///
/// The device ships two Sand builds: one ends instantly, one lifts every
/// bubble off the top of the screen first. Both are valid; which one runs
/// is configuration, not code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TeardownStyle {
    /// Signal completion on the first call.
    #[default]
    Immediate,
    /// Pull all live particles upward until none remain on screen.
    LiftOff,
}

/// Sand tuning. All fixed-point fields are raw Q8.8.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Particles to seed at setup (capped at the array size)
    pub particle_target: usize,
    /// Base episode length, milliseconds
    pub run_duration_ms: u32,
    /// Uniform random extension added per episode, milliseconds
    pub run_extension_max_ms: u32,
    /// Tilt gain applied to the gravity vector (Q8.8)
    pub gravity_scale: i16,
    /// Multiplicative velocity decay per sub-step (Q8.8, ~0.985)
    pub friction: i16,
    /// Hard velocity cap (Q8.8, ~1.5 px/ms)
    pub vel_cap: i16,
    /// Tilt readings map linearly from +-tilt_range to +-1.0
    pub tilt_range: f32,
    /// Teardown policy
    pub teardown: TeardownStyle,
    /// Episode RNG seed
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particle_target: 400,
            run_duration_ms: 35_000,
            run_extension_max_ms: 2_500,
            gravity_scale: 80,
            friction: 252,
            vel_cap: 384,
            tilt_range: 0.35,
            teardown: TeardownStyle::Immediate,
            seed: 0,
        }
    }
}

/// Smallest accepted `tilt_range`. Anything below this would turn
/// sensor noise into full-scale gravity, and zero would divide to NaN.
const MIN_TILT_RANGE: f32 = 0.01;

impl Settings {
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Self>(json) {
            Ok(mut settings) => {
                if !(settings.tilt_range >= MIN_TILT_RANGE) {
                    log::warn!(
                        "tilt_range {} out of range, clamping to {MIN_TILT_RANGE}",
                        settings.tilt_range
                    );
                    settings.tilt_range = MIN_TILT_RANGE;
                }
                log::info!("Loaded sand settings");
                Some(settings)
            }
            Err(e) => {
                log::warn!("Ignoring bad sand settings: {e}");
                None
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
