//! Peripheral seams
//!
//! The tilt sensor, display and clock are owned by the host; the active
//! experience borrows them for the duration of one phase call. Drivers
//! live outside this crate - these traits are the whole contract.

use std::cell::Cell;
use std::time::Instant;

/// Instantaneous tilt readings in acceleration-like units.
///
/// No filtering or timestamps are assumed; the simulation captures its
/// own baseline at episode start and normalizes against it.
pub trait TiltSource {
    fn read_lateral(&mut self) -> f32;
    fn read_vertical(&mut self) -> f32;
}

/// Fire-and-forget drawing primitives, RGB565, device pixel coordinates.
///
/// Layering is last-writer-wins; there is no depth buffer or blending.
pub trait RenderSurface {
    fn fill_screen(&mut self, color: u16);
    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: u16);
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u16);
    /// Blit a named sprite with its top-left at `(x, y)`.
    fn blit_image(&mut self, name: &str, x: i32, y: i32);
}

/// Monotonic milliseconds. Wraps at `u32::MAX`; callers must compare
/// with `wrapping_sub` only, never absolute values.
pub trait Clock {
    fn now_millis(&self) -> u32;
}

/// Borrowed peripherals handed to the active experience each tick.
pub struct Peripherals<'a> {
    pub tilt: &'a mut dyn TiltSource,
    pub surface: &'a mut dyn RenderSurface,
    pub clock: &'a dyn Clock,
}

/// Wall clock for the demo binary.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}

/// Hand-advanced clock for tests and scripted runs.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    pub fn starting_at(ms: u32) -> Self {
        Self { now: Cell::new(ms) }
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u32 {
        self.now.get()
    }
}

/// Fixed tilt reading; `level()` is a device at rest.
#[derive(Debug, Clone, Copy)]
pub struct SteadyTilt {
    pub lateral: f32,
    pub vertical: f32,
}

impl SteadyTilt {
    pub fn level() -> Self {
        Self {
            lateral: 0.0,
            vertical: 0.0,
        }
    }
}

impl TiltSource for SteadyTilt {
    fn read_lateral(&mut self) -> f32 {
        self.lateral
    }

    fn read_vertical(&mut self) -> f32 {
        self.vertical
    }
}

/// Surface that draws nothing and counts calls, for headless runs.
#[derive(Debug, Default)]
pub struct NullSurface {
    pub screen_fills: u64,
    pub circles: u64,
    pub rects: u64,
    pub blits: u64,
}

impl NullSurface {
    pub fn draw_calls(&self) -> u64 {
        self.screen_fills + self.circles + self.rects + self.blits
    }
}

impl RenderSurface for NullSurface {
    fn fill_screen(&mut self, _color: u16) {
        self.screen_fills += 1;
    }

    fn fill_circle(&mut self, _cx: i32, _cy: i32, _r: i32, _color: u16) {
        self.circles += 1;
    }

    fn fill_rect(&mut self, _x: i32, _y: i32, _w: i32, _h: i32, _color: u16) {
        self.rects += 1;
    }

    fn blit_image(&mut self, _name: &str, _x: i32, _y: i32) {
        self.blits += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_system_clock_starts_near_zero() {
        // SystemClock is elapsed-since-construction, not wall time. A
        // freshly built one reads ~0, so it is useless as an entropy
        // source; seeds must come from SystemTime or an RNG.
        assert!(SystemClock::new().now_millis() < 1_000);
    }

    #[test]
    fn manual_clock_advance_wraps() {
        let clock = ManualClock::starting_at(u32::MAX - 1);
        clock.advance(3);
        assert_eq!(clock.now_millis(), 1);
    }
}
