//! Collision response for the round screen
//!
//! Two cases only: bubble against an island's collision circle, and
//! bubble against the viewport rim. Both are pure functions over the
//! particle's top-left position and Q8.8 velocity, returning a corrected
//! state when contact occurred.

use glam::Vec2;

use crate::consts::{BUBBLE_R, VIEW_CX, VIEW_CY, VIEW_R};
use crate::fixed::Q88;
use crate::sim::islands::Island;

/// Velocity retained after a rim bounce.
const RIM_DAMPING: f32 = 0.33;

/// Tangential nudge added on island contact, Q8.8 (~0.25 px/ms). This is
/// what makes bubbles slide around an island instead of stopping dead.
const SLIDE_NUDGE: i16 = 64;

/// Resolve a bubble overlapping an island's collision circle.
///
/// Circle-vs-circle on the sum of radii. The bubble is pushed out along
/// whichever axis carries the larger penetration component, the pushed
/// velocity component is halved and inverted, and the orthogonal one is
/// damped to 3/4 plus the tangential nudge signed by the offset.
///
/// Returns the corrected `(x, y, vx, vy)` or `None` when clear.
pub fn deflect_island(
    px: i32,
    py: i32,
    vx: Q88,
    vy: Q88,
    island: &Island,
) -> Option<(i32, i32, Q88, Q88)> {
    let cx = px + BUBBLE_R;
    let cy = py + BUBBLE_R;
    let dx = cx - island.cx as i32;
    let dy = cy - island.cy as i32;
    let rsum = island.r as i32 + BUBBLE_R;

    if dx * dx + dy * dy >= rsum * rsum {
        return None;
    }

    if dx.abs() >= dy.abs() {
        let pushed_cx = if dx > 0 {
            island.cx as i32 + rsum
        } else {
            island.cx as i32 - rsum
        };
        let nudge = Q88(if dy >= 0 { SLIDE_NUDGE } else { -SLIDE_NUDGE });
        Some((
            pushed_cx - BUBBLE_R,
            py,
            vx.halve_invert(),
            vy.three_quarters().saturating_add(nudge),
        ))
    } else {
        let pushed_cy = if dy > 0 {
            island.cy as i32 + rsum
        } else {
            island.cy as i32 - rsum
        };
        let nudge = Q88(if dx >= 0 { SLIDE_NUDGE } else { -SLIDE_NUDGE });
        Some((
            px,
            pushed_cy - BUBBLE_R,
            vx.three_quarters().saturating_add(nudge),
            vy.halve_invert(),
        ))
    }
}

/// Round a snapped coordinate toward the viewport center so integer
/// truncation can never push the bubble back outside the rim.
#[inline]
fn round_inward(v: f32, toward: i32) -> i32 {
    if v < toward as f32 {
        v.ceil() as i32
    } else {
        v.floor() as i32
    }
}

/// Resolve a bubble whose center has left the usable circle
/// (`VIEW_R - BUBBLE_R` around the viewport center).
///
/// The center is clamped back onto the boundary along the outward
/// normal and the velocity is reflected about it, damped to a third.
///
/// Returns the corrected `(x, y, vx, vy)` or `None` when inside.
pub fn resolve_rim(px: i32, py: i32, vx: Q88, vy: Q88) -> Option<(i32, i32, Q88, Q88)> {
    let origin = Vec2::new(VIEW_CX as f32, VIEW_CY as f32);
    let usable = (VIEW_R - BUBBLE_R) as f32;

    let center = Vec2::new((px + BUBBLE_R) as f32, (py + BUBBLE_R) as f32);
    let offset = center - origin;
    if offset.length_squared() <= usable * usable {
        return None;
    }

    let normal = offset.try_normalize().unwrap_or(Vec2::X);
    let snapped = origin + normal * usable;

    let v = Vec2::new(vx.to_f32(), vy.to_f32());
    let reflected = (v - 2.0 * v.dot(normal) * normal) * RIM_DAMPING;

    let cx = round_inward(snapped.x, VIEW_CX);
    let cy = round_inward(snapped.y, VIEW_CY);

    Some((
        cx - BUBBLE_R,
        cy - BUBBLE_R,
        Q88::from_f32(reflected.x),
        Q88::from_f32(reflected.y),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::islands::IslandKind;
    use proptest::prelude::*;

    fn island_at(cx: u16, cy: u16, r: u8) -> Island {
        Island {
            cx,
            cy,
            r,
            kind: IslandKind::Small,
        }
    }

    #[test]
    fn clear_of_island_is_untouched() {
        let island = island_at(120, 120, 20);
        // Center at (120, 95): distance 25 == sum of radii, no overlap
        assert!(deflect_island(115, 90, Q88::ZERO, Q88(50), &island).is_none());
    }

    #[test]
    fn push_out_lands_on_boundary_with_no_inward_velocity() {
        let island = island_at(120, 120, 20);
        // Bubble center one pixel inside the contact circle, directly
        // above, moving straight down into the island.
        let (px, py) = (115, 91); // center (120, 96), distance 24 < 25
        let (nx, ny, _nvx, nvy) = deflect_island(px, py, Q88::ZERO, Q88(50), &island).unwrap();

        let (cx, cy) = (nx + BUBBLE_R, ny + BUBBLE_R);
        let dx = cx - 120;
        let dy = cy - 120;
        let dist2 = dx * dx + dy * dy;
        let rsum = 25;
        assert!(
            (dist2 - rsum * rsum).abs() <= 2 * rsum + 1,
            "center not on contact circle: {dist2} vs {}",
            rsum * rsum
        );
        // Into-island component must not survive
        assert!(nvy.0 <= 0, "still moving into the island: {}", nvy.0);
    }

    #[test]
    fn lateral_hit_pushes_along_x() {
        let island = island_at(120, 120, 20);
        // Center one pixel inside from the left, moving right
        let (px, py) = (91, 115); // center (96, 120)
        let (nx, _ny, nvx, nvy) = deflect_island(px, py, Q88(100), Q88::ZERO, &island).unwrap();

        assert_eq!(nx + BUBBLE_R, 120 - 25);
        assert!(nvx.0 <= 0);
        // Tangential nudge signed by dy (= 0 here, so positive)
        assert_eq!(nvy.0, 64);
    }

    #[test]
    fn rim_leaves_interior_alone() {
        assert!(resolve_rim(115, 115, Q88(100), Q88(100)).is_none());
        // Center exactly on the usable circle is still inside
        assert!(resolve_rim(235 - BUBBLE_R, 120 - BUBBLE_R, Q88::ZERO, Q88::ZERO).is_none());
    }

    #[test]
    fn rim_reflects_and_damps() {
        // Center at (240, 120): 120 px out on +X, usable is 115
        let (nx, ny, nvx, nvy) = resolve_rim(235, 115, Q88(256), Q88::ZERO).unwrap();

        // Snapped back onto the rim along +X
        assert_eq!(nx + BUBBLE_R, 120 + 115);
        assert_eq!(ny + BUBBLE_R, 120);
        // Outward velocity reflected inward and damped to a third
        assert!(nvx.0 < 0);
        assert!((nvx.to_f32() - (-0.33)).abs() < 0.01);
        assert_eq!(nvy.0, 0);
    }

    #[test]
    fn rim_handles_center_exactly_on_origin() {
        // Degenerate: a bubble center on the viewport center never
        // triggers, but a zero-length offset must not panic either way.
        assert!(resolve_rim(115, 115, Q88::ZERO, Q88::ZERO).is_none());
    }

    proptest! {
        /// Whatever position and velocity come in, a resolved bubble
        /// center is inside the usable circle.
        #[test]
        fn resolved_center_is_inside_rim(
            px in -50i32..300,
            py in -50i32..300,
            vx in -400i16..400,
            vy in -400i16..400,
        ) {
            if let Some((nx, ny, _, _)) = resolve_rim(px, py, Q88(vx), Q88(vy)) {
                let dx = nx + BUBBLE_R - VIEW_CX;
                let dy = ny + BUBBLE_R - VIEW_CY;
                let usable = VIEW_R - BUBBLE_R;
                prop_assert!(dx * dx + dy * dy <= usable * usable);
            }
        }
    }
}
