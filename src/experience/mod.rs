//! Experience lifecycle contract
//!
//! An experience is one self-contained interactive episode (Sand is the
//! demanding one; peers follow the same shape). Phase methods are plain
//! functions called repeatedly by the scheduler until the experience
//! raises its own completion flag - no coroutines, no suspension points.
//! "Yielding" is returning from the call.

pub mod service;

pub use service::{ExperienceService, Phase};

use crate::platform::Peripherals;

/// Completion flags observed by the scheduler.
///
/// Each experience owns one of these and raises flags itself; the
/// scheduler only ever reads them. `clear()` re-arms an instance for the
/// next episode.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleFlags {
    pub setup_complete: bool,
    pub run_complete: bool,
    pub teardown_complete: bool,
    pub stopped: bool,
    pub idle: bool,
}

impl LifecycleFlags {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// The four-phase episode contract.
///
/// Instances are constructed once at program start and reused across
/// episodes; `init` must be idempotent because the scheduler gives no
/// teardown guarantee when an episode is abandoned mid-phase.
pub trait Experience {
    /// Reset flags and per-episode state. Called by the scheduler before
    /// every episode, including restarts over an abandoned one.
    fn init(&mut self);

    /// Called every tick until `is_setup_complete`.
    fn setup(&mut self, io: &mut Peripherals<'_>);

    /// Called every tick until `is_run_complete`.
    fn run(&mut self, io: &mut Peripherals<'_>);

    /// Called every tick until `is_teardown_complete`.
    fn teardown(&mut self, io: &mut Peripherals<'_>);

    fn flags(&self) -> &LifecycleFlags;

    fn name(&self) -> &'static str;

    fn is_setup_complete(&self) -> bool {
        self.flags().setup_complete
    }

    fn is_run_complete(&self) -> bool {
        self.flags().run_complete
    }

    fn is_teardown_complete(&self) -> bool {
        self.flags().teardown_complete
    }

    fn is_stopped(&self) -> bool {
        self.flags().stopped
    }

    fn is_idle(&self) -> bool {
        self.flags().idle
    }
}
