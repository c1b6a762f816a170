//! The Sand particle engine
//!
//! Deterministic under a fixed seed and a fixed tilt sequence: integer
//! positions, Q8.8 velocities, seeded RNG, stable iteration order by
//! particle index. No allocation after construction.

pub mod collision;
pub mod field;
pub mod islands;
pub mod sand;

pub use collision::{deflect_island, resolve_rim};
pub use field::ParticleField;
pub use islands::{Island, IslandKind, IslandLayout, MAX_ISLANDS};
pub use sand::Sand;
