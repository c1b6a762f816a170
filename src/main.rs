//! Sandglobe demo harness
//!
//! Runs the experience scheduler headless: stub peripherals stand in for
//! the tilt sensor and display, and the host loop ticks the service
//! cooperatively until the episode reaches Stopped. Useful for profiling
//! the physics and for watching the lifecycle logs.

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sandglobe::platform::{Clock, NullSurface, Peripherals, SystemClock, TiltSource};
use sandglobe::sim::Sand;
use sandglobe::{ExperienceService, Phase, Settings};

/// Slow figure-eight wobble, as if the device were being rocked.
struct WobbleTilt {
    clock: SystemClock,
}

impl TiltSource for WobbleTilt {
    fn read_lateral(&mut self) -> f32 {
        let t = self.clock.now_millis() as f32 / 1000.0;
        0.25 * t.sin()
    }

    fn read_vertical(&mut self) -> f32 {
        let t = self.clock.now_millis() as f32 / 1000.0;
        0.25 * (t * 0.5).cos()
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut settings = Settings::default();
    // Short episode for the demo; the watch runs 35 s
    settings.run_duration_ms = 5_000;
    settings.run_extension_max_ms = 0;
    // SystemClock counts from its own construction, so wall time for the
    // seed has to come from the system clock proper
    settings.seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64);

    log::info!("sandglobe demo, seed {}", settings.seed);

    // Registry is built once; experiences are reused across episodes
    let mut service = ExperienceService::new();
    let sand = service.register(Box::new(Sand::new(settings)));

    let clock = SystemClock::new();
    let mut tilt = WobbleTilt {
        clock: SystemClock::new(),
    };
    let mut surface = NullSurface::default();

    service.start(sand);

    // Cooperative host loop: one phase call per iteration, nothing blocks
    while service.phase() != Phase::Stopped {
        let mut io = Peripherals {
            tilt: &mut tilt,
            surface: &mut surface,
            clock: &clock,
        };
        service.tick(&mut io);
        thread::sleep(Duration::from_millis(2));
    }

    log::info!(
        "episode finished after {} ms, {} draw calls ({} circles, {} blits)",
        clock.now_millis(),
        surface.draw_calls(),
        surface.circles,
        surface.blits,
    );
}
