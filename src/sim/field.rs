//! Fixed-capacity particle storage and kinematics
//!
//! Struct-of-arrays, index-addressed. A dead slot is reusable but the
//! array size is the hard ceiling; nothing here allocates. Positions are
//! 16-bit pixel coordinates of the top-left of each bubble's 10x10 box,
//! velocities are Q8.8 px/ms.

use crate::consts::{BUBBLE_BOX, BUBBLE_R, MAX_PARTICLES, SCREEN_H, SCREEN_W};
use crate::fixed::Q88;
use crate::settings::Settings;

pub struct ParticleField {
    pub x: [u16; MAX_PARTICLES],
    pub y: [u16; MAX_PARTICLES],
    pub vx: [Q88; MAX_PARTICLES],
    pub vy: [Q88; MAX_PARTICLES],
    pub live: [bool; MAX_PARTICLES],
    /// Palette index, assigned at spawn and immutable after
    pub color: [u8; MAX_PARTICLES],
    count: u16,
}

impl ParticleField {
    pub fn new() -> Self {
        Self {
            x: [0; MAX_PARTICLES],
            y: [0; MAX_PARTICLES],
            vx: [Q88::ZERO; MAX_PARTICLES],
            vy: [Q88::ZERO; MAX_PARTICLES],
            live: [false; MAX_PARTICLES],
            color: [0; MAX_PARTICLES],
            count: 0,
        }
    }

    /// Kill every particle. Positions and velocities are left stale;
    /// liveness is the only authority.
    pub fn clear(&mut self) {
        self.live = [false; MAX_PARTICLES];
        self.count = 0;
    }

    pub fn live_count(&self) -> u16 {
        self.count
    }

    /// Lowest dead slot, if any.
    pub fn free_slot(&self) -> Option<usize> {
        self.live.iter().position(|l| !l)
    }

    pub fn spawn(&mut self, slot: usize, x: u16, y: u16, vy: Q88, color: u8) {
        debug_assert!(!self.live[slot]);
        self.x[slot] = x;
        self.y[slot] = y;
        self.vx[slot] = Q88::ZERO;
        self.vy[slot] = vy;
        self.color[slot] = color;
        self.live[slot] = true;
        self.count += 1;
    }

    pub fn kill(&mut self, slot: usize) {
        if self.live[slot] {
            self.live[slot] = false;
            self.count -= 1;
        }
    }

    /// Bubble center in pixels.
    #[inline]
    pub fn center(&self, slot: usize) -> (i32, i32) {
        (
            self.x[slot] as i32 + BUBBLE_R,
            self.y[slot] as i32 + BUBBLE_R,
        )
    }

    /// Apply tilt gravity, friction and the velocity cap to one particle.
    pub fn accelerate(&mut self, slot: usize, gx: Q88, gy: Q88, tuning: &Settings) {
        let gain = Q88(tuning.gravity_scale);
        let friction = Q88(tuning.friction);
        let cap = Q88(tuning.vel_cap);

        let vx = self.vx[slot]
            .saturating_add(gx.mul(gain))
            .mul(friction)
            .clamp_abs(cap);
        let vy = self.vy[slot]
            .saturating_add(gy.mul(gain))
            .mul(friction)
            .clamp_abs(cap);

        self.vx[slot] = vx;
        self.vy[slot] = vy;
    }

    /// Tentative top-left after integrating `dt_ms` at current velocity.
    /// Collision resolution decides the final position.
    #[inline]
    pub fn integrate(&self, slot: usize, dt_ms: u32) -> (i32, i32) {
        (
            self.x[slot] as i32 + self.vx[slot].travel(dt_ms),
            self.y[slot] as i32 + self.vy[slot].travel(dt_ms),
        )
    }

    /// Store a resolved position, clamped onto the panel as a last resort.
    #[inline]
    pub fn set_pos(&mut self, slot: usize, x: i32, y: i32) {
        self.x[slot] = x.clamp(0, SCREEN_W - BUBBLE_BOX) as u16;
        self.y[slot] = y.clamp(0, SCREEN_H - BUBBLE_BOX) as u16;
    }
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_and_kill_track_count() {
        let mut field = ParticleField::new();
        assert_eq!(field.free_slot(), Some(0));

        field.spawn(0, 100, 100, Q88(24), 1);
        field.spawn(1, 120, 80, Q88(24), 2);
        assert_eq!(field.live_count(), 2);
        assert_eq!(field.free_slot(), Some(2));

        field.kill(0);
        assert_eq!(field.live_count(), 1);
        assert_eq!(field.free_slot(), Some(0));
        // Double kill is harmless
        field.kill(0);
        assert_eq!(field.live_count(), 1);
    }

    #[test]
    fn clear_resets_liveness_only() {
        let mut field = ParticleField::new();
        field.spawn(3, 50, 60, Q88::ZERO, 0);
        field.clear();
        assert_eq!(field.live_count(), 0);
        assert!(field.live.iter().all(|l| !l));
    }

    #[test]
    fn accelerate_respects_cap_and_friction() {
        let tuning = Settings::default();
        let mut field = ParticleField::new();
        field.spawn(0, 100, 100, Q88::ZERO, 0);

        // Full positive tilt, many steps: velocity must settle at or
        // below the cap, never above.
        for _ in 0..200 {
            field.accelerate(0, Q88::ONE, Q88::ONE, &tuning);
            assert!(field.vx[0].0 <= tuning.vel_cap);
            assert!(field.vy[0].0 <= tuning.vel_cap);
        }
        assert!(field.vx[0].0 > 0);
    }

    #[test]
    fn integrate_moves_by_velocity() {
        let mut field = ParticleField::new();
        field.spawn(0, 100, 100, Q88::ZERO, 0);
        field.vx[0] = Q88::ONE; // 1 px/ms
        field.vy[0] = Q88(-128); // -0.5 px/ms

        let (nx, ny) = field.integrate(0, 16);
        assert_eq!((nx, ny), (116, 92));
    }

    #[test]
    fn set_pos_clamps_to_panel() {
        let mut field = ParticleField::new();
        field.spawn(0, 0, 0, Q88::ZERO, 0);
        field.set_pos(0, -5, 500);
        assert_eq!(field.x[0], 0);
        assert_eq!(field.y[0] as i32, SCREEN_H - BUBBLE_BOX);
    }
}
