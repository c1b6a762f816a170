//! The Sand experience
//!
//! Up to 400 bubbles fall under tilt-derived gravity inside the round
//! viewport, deflecting off a per-episode set of islands and bouncing off
//! the rim. All physics is Q8.8 over fixed arrays; a 20 ms pacing gate
//! and a 10 ms sub-step budget bound the work done per `run()` call.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::experience::{Experience, LifecycleFlags};
use crate::fixed::Q88;
use crate::inside_viewport;
use crate::platform::{Peripherals, RenderSurface, TiltSource};
use crate::settings::{Settings, TeardownStyle};
use crate::sim::collision::{deflect_island, resolve_rim};
use crate::sim::field::ParticleField;
use crate::sim::islands::IslandLayout;

/// Rejection-sampling budget per seeded particle.
const SEED_TRIES: u32 = 25;

/// Initial downward drift, Q8.8, for the settling look.
const SETTLE_VY: Q88 = Q88(24);

/// Upward pull during lift-off teardown, Q8.8 tilt units.
const LIFT_PULL: Q88 = Q88(-160);

pub struct Sand {
    flags: LifecycleFlags,
    settings: Settings,
    field: ParticleField,
    islands: IslandLayout,
    rng: Pcg32,

    /// Tilt baseline captured at setup; gravity is relative to it
    ax0: f32,
    ay0: f32,

    /// Episode clock, all wrapping milliseconds
    episode_start: u32,
    run_deadline_ms: u32,
    pace: u32,
}

impl Sand {
    pub fn new(settings: Settings) -> Self {
        Self {
            flags: LifecycleFlags::default(),
            rng: Pcg32::seed_from_u64(settings.seed),
            settings,
            field: ParticleField::new(),
            islands: IslandLayout::default(),
            ax0: 0.0,
            ay0: 0.0,
            episode_start: 0,
            run_deadline_ms: 0,
            pace: 0,
        }
    }

    /// Map raw tilt to a gravity vector: subtract the baseline, clamp to
    /// the configured range, scale linearly into +-1.0 Q8.8.
    fn read_tilt(&mut self, tilt: &mut dyn TiltSource) -> (Q88, Q88) {
        let ax = tilt.read_lateral();
        let ay = tilt.read_vertical();

        let gx = ((ax - self.ax0) / self.settings.tilt_range).clamp(-1.0, 1.0);
        let gy = ((ay - self.ay0) / self.settings.tilt_range).clamp(-1.0, 1.0);
        log::trace!("tilt {gx:.2} {gy:.2}");

        (Q88::from_f32(gx), Q88::from_f32(gy))
    }

    fn seed_particles(&mut self, surface: &mut dyn RenderSurface) {
        let target = self.settings.particle_target.min(MAX_PARTICLES);

        for _ in 0..target {
            let Some(slot) = self.field.free_slot() else {
                break;
            };

            let mut placed = None;
            for _ in 0..SEED_TRIES {
                let x = self.rng.random_range(0..=(SCREEN_W - BUBBLE_BOX)) as u16;
                let y = self.rng.random_range(0..=(SCREEN_H - BUBBLE_BOX)) as u16;
                if inside_viewport(x as i32 + BUBBLE_R, y as i32 + BUBBLE_R, BUBBLE_R) {
                    placed = Some((x, y));
                    break;
                }
            }

            // Budget exhausted: degrade to fewer particles
            let Some((x, y)) = placed else {
                continue;
            };

            let color = self.rng.random_range(0..PALETTE.len() as u8);
            self.field.spawn(slot, x, y, SETTLE_VY, color);
            draw_bubble(surface, &self.islands, x as i32, y as i32, color);
        }

        log::debug!("seeded {} of {} particles", self.field.live_count(), target);
    }

    /// One physics sub-step of `dt_ms` over every live particle.
    fn substep(&mut self, surface: &mut dyn RenderSurface, gx: Q88, gy: Q88, dt_ms: u32) {
        for i in 0..MAX_PARTICLES {
            if !self.field.live[i] {
                continue;
            }

            erase_bubble(
                surface,
                self.field.x[i] as i32,
                self.field.y[i] as i32,
            );

            self.field.accelerate(i, gx, gy, &self.settings);
            let (mut nx, mut ny) = self.field.integrate(i, dt_ms);
            let mut vx = self.field.vx[i];
            let mut vy = self.field.vy[i];

            for island in self.islands.iter() {
                if let Some(hit) = deflect_island(nx, ny, vx, vy, island) {
                    (nx, ny, vx, vy) = hit;
                }
            }
            if let Some(hit) = resolve_rim(nx, ny, vx, vy) {
                (nx, ny, vx, vy) = hit;
            }

            self.field.vx[i] = vx;
            self.field.vy[i] = vy;
            self.field.set_pos(i, nx, ny);

            draw_bubble(
                surface,
                &self.islands,
                self.field.x[i] as i32,
                self.field.y[i] as i32,
                self.field.color[i],
            );
        }
    }

    /// Lift-off teardown step: pull everything up and out the top.
    fn lift_step(&mut self, surface: &mut dyn RenderSurface, dt_ms: u32) {
        for i in 0..MAX_PARTICLES {
            if !self.field.live[i] {
                continue;
            }

            erase_bubble(surface, self.field.x[i] as i32, self.field.y[i] as i32);

            self.field.accelerate(i, Q88::ZERO, LIFT_PULL, &self.settings);
            let (nx, ny) = self.field.integrate(i, dt_ms);

            if ny <= 0 {
                self.field.kill(i);
                continue;
            }

            self.field.set_pos(i, nx, ny);
            draw_bubble(
                surface,
                &self.islands,
                self.field.x[i] as i32,
                self.field.y[i] as i32,
                self.field.color[i],
            );
        }
    }

    /// Pacing gate: true when at least `RUN_PACE_MS` have elapsed since
    /// the last accepted tick. Wrapping arithmetic only.
    fn pace_elapsed(&mut self, now: u32) -> bool {
        if now.wrapping_sub(self.pace) < RUN_PACE_MS {
            return false;
        }
        self.pace = now;
        true
    }
}

impl Experience for Sand {
    fn init(&mut self) {
        self.flags.clear();
        self.field.clear();
        self.islands.clear();
        self.rng = Pcg32::seed_from_u64(self.settings.seed);
        self.ax0 = 0.0;
        self.ay0 = 0.0;
    }

    fn setup(&mut self, io: &mut Peripherals<'_>) {
        log::info!("{} setup", self.name());

        io.surface.fill_screen(COLOR_BACKGROUND);
        self.seed_particles(io.surface);

        // Zero-reference for gravity: however the device is held right
        // now counts as level.
        self.ax0 = io.tilt.read_lateral();
        self.ay0 = io.tilt.read_vertical();

        self.islands.choose(&mut self.rng);
        self.islands.draw(io.surface);

        let now = io.clock.now_millis();
        self.episode_start = now;
        self.pace = now;
        self.run_deadline_ms = self.settings.run_duration_ms
            + self.rng.random_range(0..=self.settings.run_extension_max_ms);

        self.flags.setup_complete = true;
    }

    fn run(&mut self, io: &mut Peripherals<'_>) {
        let now = io.clock.now_millis();
        if !self.pace_elapsed(now) {
            return;
        }

        let (gx, gy) = self.read_tilt(io.tilt);

        let mut budget = STEP_BUDGET_MS;
        while budget > 0 {
            let step = budget.min(MAX_STEP_MS);
            self.substep(io.surface, gx, gy, step);
            budget -= step;
        }

        // Islands render last so they sit on top of the bubbles
        self.islands.draw(io.surface);

        if now.wrapping_sub(self.episode_start) > self.run_deadline_ms {
            log::info!("{} run complete", self.name());
            self.flags.run_complete = true;
        }
    }

    fn teardown(&mut self, io: &mut Peripherals<'_>) {
        match self.settings.teardown {
            TeardownStyle::Immediate => {
                log::info!("{} teardown", self.name());
                self.flags.teardown_complete = true;
            }
            TeardownStyle::LiftOff => {
                let now = io.clock.now_millis();
                if !self.pace_elapsed(now) {
                    return;
                }

                self.lift_step(io.surface, STEP_BUDGET_MS);

                if self.field.live_count() == 0 {
                    log::info!("{} teardown", self.name());
                    self.flags.teardown_complete = true;
                }
            }
        }
    }

    fn flags(&self) -> &LifecycleFlags {
        &self.flags
    }

    fn name(&self) -> &'static str {
        "Sand"
    }
}

/// Paint one bubble with its highlight. Skipped when the bubble is
/// outside the viewport or under an island footprint, which keeps
/// islands visually on top without redrawing them per particle.
fn draw_bubble(surface: &mut dyn RenderSurface, islands: &IslandLayout, px: i32, py: i32, color: u8) {
    let cx = px + BUBBLE_R;
    let cy = py + BUBBLE_R;
    if !inside_viewport(cx, cy, BUBBLE_R) {
        return;
    }

    for island in islands.iter() {
        let dx = cx - island.cx as i32;
        let dy = cy - island.cy as i32;
        let rr = island.r as i32 + BUBBLE_R - 1;
        if dx * dx + dy * dy <= rr * rr {
            return;
        }
    }

    surface.fill_circle(cx, cy, BUBBLE_R, PALETTE[color as usize]);
    surface.fill_rect(
        px + 2,
        py + 2,
        HIGHLIGHT_SZ,
        HIGHLIGHT_SZ,
        COLOR_HIGHLIGHT,
    );
}

fn erase_bubble(surface: &mut dyn RenderSurface, px: i32, py: i32) {
    let cx = px + BUBBLE_R;
    let cy = py + BUBBLE_R;
    if !inside_viewport(cx, cy, BUBBLE_R) {
        return;
    }
    surface.fill_circle(cx, cy, BUBBLE_R, COLOR_BACKGROUND);
}
