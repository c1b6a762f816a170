//! Island obstacles
//!
//! Islands are static circular collision regions with a decorative
//! sprite, chosen once per episode and never mutated during run. The
//! sprite footprint is larger than the collision circle; placement must
//! keep the whole sprite inside the viewport circle and keep collision
//! circles from overlapping.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::{VIEW_CX, VIEW_CY, VIEW_R};

pub const MAX_ISLANDS: usize = 4;

/// Placement retry budget per island.
const PLACE_TRIES: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IslandKind {
    #[default]
    Small,
    Medium,
    Large,
}

impl IslandKind {
    /// Collision radius in pixels.
    pub fn collision_radius(self) -> i32 {
        match self {
            IslandKind::Small => 35,
            IslandKind::Medium => 65,
            IslandKind::Large => 85,
        }
    }

    /// Sprite name and pixel size. The art is pre-rendered; the blit
    /// target centers it on the island.
    pub fn sprite(self) -> (&'static str, i32, i32) {
        match self {
            IslandKind::Small => ("sand_small.png", 61, 66),
            IslandKind::Medium => ("sand_medium.png", 124, 114),
            IslandKind::Large => ("sand_large.png", 164, 154),
        }
    }

    /// Distance from sprite center to its furthest corner, rounded up.
    /// A center placed within `VIEW_R - corner_radius` of the viewport
    /// center keeps the whole sprite inside the circle.
    pub fn corner_radius(self) -> i32 {
        let (_, w, h) = self.sprite();
        let hw = w as f32 * 0.5;
        let hh = h as f32 * 0.5;
        (hw * hw + hh * hh).sqrt().ceil() as i32
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Island {
    pub cx: u16,
    pub cy: u16,
    /// Collision radius; zero marks an unused slot
    pub r: u8,
    pub kind: IslandKind,
}

/// The per-episode obstacle set.
#[derive(Debug, Clone, Copy, Default)]
pub struct IslandLayout {
    pub(crate) islands: [Island; MAX_ISLANDS],
    pub(crate) count: u8,
}

impl IslandLayout {
    pub fn clear(&mut self) {
        self.count = 0;
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Island> {
        self.islands[..self.count as usize].iter()
    }

    /// Pick a fresh layout: one of three generation modes by uniform
    /// random selection. Placement failures degrade silently to fewer
    /// islands; an empty layout is a valid (if unlucky) outcome.
    pub fn choose(&mut self, rng: &mut Pcg32) {
        self.clear();

        match rng.random_range(0..3u8) {
            0 => {
                // 1..=3 small
                let target = rng.random_range(1..=3u8);
                let mut tries = 0;
                while self.len() < target as usize && tries < 80 {
                    self.try_place(IslandKind::Small, rng);
                    tries += 1;
                }
            }
            1 => {
                // Exactly one large
                for _ in 0..PLACE_TRIES {
                    if self.try_place(IslandKind::Large, rng) {
                        break;
                    }
                }
            }
            _ => {
                // One medium plus 0..=3 small
                for _ in 0..PLACE_TRIES {
                    if self.try_place(IslandKind::Medium, rng) {
                        break;
                    }
                }
                let extra = rng.random_range(0..=3u8);
                let target = (self.len() + extra as usize).min(MAX_ISLANDS);
                let mut tries = 0;
                while self.len() < target && tries < 120 {
                    self.try_place(IslandKind::Small, rng);
                    tries += 1;
                }
            }
        }

        log::debug!("island layout: {} islands", self.len());
    }

    /// One placement attempt by rejection sampling. Returns whether an
    /// island was added.
    fn try_place(&mut self, kind: IslandKind, rng: &mut Pcg32) -> bool {
        if self.len() == MAX_ISLANDS {
            return false;
        }

        let margin = kind.corner_radius();
        let max_center_r = VIEW_R - margin;
        if max_center_r <= 0 {
            return false; // sprite cannot fit the round screen at all
        }

        let cx = rng.random_range(VIEW_CX - max_center_r..=VIEW_CX + max_center_r);
        let cy = rng.random_range(VIEW_CY - max_center_r..=VIEW_CY + max_center_r);

        // Sprite must sit fully inside the viewport circle
        let dx = cx - VIEW_CX;
        let dy = cy - VIEW_CY;
        if dx * dx + dy * dy > max_center_r * max_center_r {
            return false;
        }

        // Collision circles may touch but not overlap
        let r = kind.collision_radius();
        for other in self.iter() {
            let dx = cx - other.cx as i32;
            let dy = cy - other.cy as i32;
            let rr = r + other.r as i32;
            if dx * dx + dy * dy < rr * rr {
                return false;
            }
        }

        self.islands[self.count as usize] = Island {
            cx: cx as u16,
            cy: cy as u16,
            r: r as u8,
            kind,
        };
        self.count += 1;
        true
    }

    /// Blit every island sprite, centered on its collision circle.
    pub fn draw(&self, surface: &mut dyn crate::platform::RenderSurface) {
        for island in self.iter() {
            let (name, w, h) = island.kind.sprite();
            surface.blit_image(name, island.cx as i32 - w / 2, island.cy as i32 - h / 2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn corner_distances(island: &Island) -> [f32; 4] {
        let (_, w, h) = island.kind.sprite();
        let hw = w as f32 / 2.0;
        let hh = h as f32 / 2.0;
        let cx = island.cx as f32 - VIEW_CX as f32;
        let cy = island.cy as f32 - VIEW_CY as f32;
        [
            ((cx - hw).powi(2) + (cy - hh).powi(2)).sqrt(),
            ((cx + hw).powi(2) + (cy - hh).powi(2)).sqrt(),
            ((cx - hw).powi(2) + (cy + hh).powi(2)).sqrt(),
            ((cx + hw).powi(2) + (cy + hh).powi(2)).sqrt(),
        ]
    }

    #[test]
    fn layouts_never_overlap_across_seeds() {
        for seed in 0..200u64 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut layout = IslandLayout::default();
            layout.choose(&mut rng);

            let islands: Vec<_> = layout.iter().copied().collect();
            for i in 0..islands.len() {
                for j in (i + 1)..islands.len() {
                    let dx = islands[i].cx as f32 - islands[j].cx as f32;
                    let dy = islands[i].cy as f32 - islands[j].cy as f32;
                    let dist = (dx * dx + dy * dy).sqrt();
                    let rsum = (islands[i].r + islands[j].r) as f32;
                    assert!(
                        dist >= rsum,
                        "seed {seed}: islands {i},{j} overlap ({dist} < {rsum})"
                    );
                }
            }
        }
    }

    #[test]
    fn sprites_fit_the_viewport_circle() {
        for seed in 0..200u64 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut layout = IslandLayout::default();
            layout.choose(&mut rng);

            for island in layout.iter() {
                for dist in corner_distances(island) {
                    assert!(
                        dist <= VIEW_R as f32,
                        "seed {seed}: sprite corner at {dist} clips the rim"
                    );
                }
            }
        }
    }

    #[test]
    fn count_stays_within_bounds() {
        for seed in 0..200u64 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut layout = IslandLayout::default();
            layout.choose(&mut rng);
            assert!(layout.len() <= MAX_ISLANDS);
        }
    }

    #[test]
    fn clear_empties_the_layout() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut layout = IslandLayout::default();
        layout.choose(&mut rng);
        layout.clear();
        assert!(layout.is_empty());
        assert_eq!(layout.iter().count(), 0);
    }

    #[test]
    fn choose_is_deterministic_per_seed() {
        let mut a = IslandLayout::default();
        let mut b = IslandLayout::default();
        a.choose(&mut Pcg32::seed_from_u64(99));
        b.choose(&mut Pcg32::seed_from_u64(99));

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!((x.cx, x.cy, x.r), (y.cx, y.cy, y.r));
        }
    }
}
