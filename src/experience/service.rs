//! Experience scheduler
//!
//! Owns the registry and the Setup/Run/Teardown/Stopped state machine.
//! Advances exactly one experience by exactly one phase call per tick.
//! Transitions are edge-triggered on the experience's own flags; the
//! scheduler never times a phase out, so a phase that never completes is
//! a defect in that experience, caught by its tests.

use crate::experience::Experience;
use crate::platform::Peripherals;

/// Scheduler state. Initial and terminal state is `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    Setup,
    Run,
    Teardown,
    #[default]
    Stopped,
}

pub struct ExperienceService {
    experiences: Vec<Box<dyn Experience>>,
    active: Option<usize>,
    phase: Phase,
}

impl ExperienceService {
    pub fn new() -> Self {
        Self {
            experiences: Vec::new(),
            active: None,
            phase: Phase::Stopped,
        }
    }

    /// Add an experience to the registry, returning its selector id.
    /// Registration happens once at startup, before the host loop runs.
    pub fn register(&mut self, experience: Box<dyn Experience>) -> usize {
        self.experiences.push(experience);
        self.experiences.len() - 1
    }

    /// Select and arm an experience.
    ///
    /// An unknown id is a logged no-op. Starting while another episode is
    /// mid-phase abandons it without teardown; `init` being idempotent is
    /// what makes that safe.
    pub fn start(&mut self, id: usize) {
        let Some(experience) = self.experiences.get_mut(id) else {
            log::warn!("start: no experience registered under id {id}");
            return;
        };

        log::info!("starting experience {}", experience.name());
        experience.init();
        self.active = Some(id);
        self.phase = Phase::Setup;
    }

    /// Advance the active experience by one phase call.
    pub fn tick(&mut self, io: &mut Peripherals<'_>) {
        let Some(idx) = self.active else {
            return;
        };
        let experience = &mut self.experiences[idx];

        match self.phase {
            Phase::Setup => {
                experience.setup(io);
                if experience.is_setup_complete() {
                    self.phase = Phase::Run;
                }
            }
            Phase::Run => {
                experience.run(io);
                if experience.is_run_complete() {
                    self.phase = Phase::Teardown;
                }
            }
            Phase::Teardown => {
                experience.teardown(io);
                if experience.is_teardown_complete() {
                    log::info!("experience {} finished", experience.name());
                    self.phase = Phase::Stopped;
                }
            }
            Phase::Stopped => {}
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active(&self) -> bool {
        self.phase != Phase::Stopped
    }
}

impl Default for ExperienceService {
    fn default() -> Self {
        Self::new()
    }
}
