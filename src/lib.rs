//! Sandglobe - a tilt-driven particle toy for a round display
//!
//! Core modules:
//! - `experience`: lifecycle contract and the scheduler that sequences it
//! - `sim`: the Sand particle engine (fixed-point physics, island obstacles)
//! - `platform`: narrow seams for the tilt sensor, display and clock
//! - `settings`: data-driven tuning and the teardown policy flag
//!
//! Everything runs on one cooperative thread: the host loop calls
//! `ExperienceService::tick` once per iteration and each phase method
//! returns within a bounded slice. No heap allocation happens after the
//! registry is built at startup.

pub mod experience;
pub mod fixed;
pub mod platform;
pub mod settings;
pub mod sim;

pub use experience::{Experience, ExperienceService, Phase};
pub use settings::{Settings, TeardownStyle};

/// Display geometry and fixed tuning constants
pub mod consts {
    /// Round 240x240 panel
    pub const SCREEN_W: i32 = 240;
    pub const SCREEN_H: i32 = 240;

    /// Viewport circle (the drawable region), centered on the panel
    pub const VIEW_CX: i32 = 120;
    pub const VIEW_CY: i32 = 120;
    pub const VIEW_R: i32 = 120;

    /// Bubble geometry: positions address the top-left of a 10x10 box
    pub const BUBBLE_BOX: i32 = 10;
    pub const BUBBLE_R: i32 = 5;
    /// 2x2 white highlight inset in each bubble
    pub const HIGHLIGHT_SZ: i32 = 2;

    /// Hard upper bound on live particles (array capacity)
    pub const MAX_PARTICLES: usize = 400;

    /// Physics sub-stepping: simulate up to this many milliseconds per
    /// `run()` call, in chunks no larger than `MAX_STEP_MS`.
    pub const STEP_BUDGET_MS: u32 = 10;
    pub const MAX_STEP_MS: u32 = 16;
    /// Pacing gate between physics ticks
    pub const RUN_PACE_MS: u32 = 20;

    /// RGB565 colors. Background is a deep blue; the bubble palette is
    /// fixed at three entries, indexed by `ParticleField::color`.
    pub const COLOR_BACKGROUND: u16 = 0x00B1;
    pub const COLOR_HIGHLIGHT: u16 = 0xFFFF;
    pub const PALETTE: [u16; 3] = [
        0xFF00, // yellow
        0x6E9C, // light cyan
        0x0497, // cyan
    ];
}

/// True when `(x, y)` lies inside the viewport circle shrunk by `margin`.
///
/// Used with `margin = BUBBLE_R` to test whether a whole bubble fits.
#[inline]
pub fn inside_viewport(x: i32, y: i32, margin: i32) -> bool {
    let r = consts::VIEW_R - margin;
    let dx = x - consts::VIEW_CX;
    let dy = y - consts::VIEW_CY;
    dx * dx + dy * dy <= r * r
}
