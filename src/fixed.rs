//! Q8.8 fixed-point arithmetic
//!
//! All per-particle velocity state is 16-bit signed with 8 fractional
//! bits, matching the original firmware so the toy keeps its bounded-cost
//! integer math and its exact visual behavior. One unit is 1/256 px/ms.
//! Overflow saturates; it never wraps.

/// A signed Q8.8 fixed-point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Q88(pub i16);

impl Q88 {
    pub const ZERO: Q88 = Q88(0);
    pub const ONE: Q88 = Q88(256);

    /// Convert from f32, saturating at the i16 range.
    #[inline]
    pub fn from_f32(v: f32) -> Self {
        Q88((v * 256.0).clamp(i16::MIN as f32, i16::MAX as f32) as i16)
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 256.0
    }

    /// Fixed-point multiply through an i32 intermediate, saturating.
    #[inline]
    pub fn mul(self, rhs: Q88) -> Q88 {
        let wide = (self.0 as i32 * rhs.0 as i32) >> 8;
        Q88(wide.clamp(i16::MIN as i32, i16::MAX as i32) as i16)
    }

    #[inline]
    pub fn saturating_add(self, rhs: Q88) -> Q88 {
        Q88(self.0.saturating_add(rhs.0))
    }

    /// Clamp into `[-cap, cap]`.
    #[inline]
    pub fn clamp_abs(self, cap: Q88) -> Q88 {
        Q88(self.0.clamp(-cap.0, cap.0))
    }

    /// Inelastic bounce: half the magnitude, inverted.
    #[inline]
    pub fn halve_invert(self) -> Q88 {
        Q88(-(self.0 / 2))
    }

    /// Three quarters of the value (orthogonal damping on obstacle hits).
    #[inline]
    pub fn three_quarters(self) -> Q88 {
        Q88((self.0 as i32 * 3 / 4) as i16)
    }

    /// Pixels travelled over `dt_ms` milliseconds at this velocity.
    #[inline]
    pub fn travel(self, dt_ms: u32) -> i32 {
        (self.0 as i32 * dt_ms as i32) >> 8
    }
}

impl core::ops::Neg for Q88 {
    type Output = Q88;
    #[inline]
    fn neg(self) -> Q88 {
        Q88(self.0.saturating_neg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32_round_trip() {
        assert_eq!(Q88::from_f32(1.0), Q88::ONE);
        assert_eq!(Q88::from_f32(-1.5), Q88(-384));
        assert!((Q88(384).to_f32() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn from_f32_saturates() {
        assert_eq!(Q88::from_f32(1000.0), Q88(i16::MAX));
        assert_eq!(Q88::from_f32(-1000.0), Q88(i16::MIN));
    }

    #[test]
    fn mul_matches_friction_shift() {
        // 0.985 friction applied to 1.5 px/ms, same as (384 * 252) >> 8
        let v = Q88(384).mul(Q88(252));
        assert_eq!(v.0, (384i32 * 252 >> 8) as i16);
    }

    #[test]
    fn clamp_abs_is_symmetric() {
        let cap = Q88(384);
        assert_eq!(Q88(500).clamp_abs(cap), cap);
        assert_eq!(Q88(-500).clamp_abs(cap), Q88(-384));
        assert_eq!(Q88(100).clamp_abs(cap), Q88(100));
    }

    #[test]
    fn travel_scales_by_dt() {
        // 1.0 px/ms over 16 ms moves 16 px
        assert_eq!(Q88::ONE.travel(16), 16);
        assert_eq!(Q88(-256).travel(10), -10);
        // sub-pixel velocities truncate toward zero over short steps
        assert_eq!(Q88(16).travel(4), 0);
    }
}
