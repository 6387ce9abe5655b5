//! Brickfall entry point
//!
//! Headless autoplay: a simple autopilot steers the platform under the ball
//! at 60 Hz until the round ends. Pass a settings JSON path and, optionally,
//! `--realtime` to measure frames on the wall clock.

use brickfall::Settings;
use brickfall::consts::SIM_DT;
use brickfall::sim::{Engine, GameStatus, HeldKeys, Key, KeyState};
use brickfall::timer::FrameTimer;
use std::time::{Duration, Instant};

/// Stop after this many ticks even if the round is still going (10 minutes)
const MAX_TICKS: u64 = 60 * 60 * 10;

/// Autopilot: chase the ball's centre with a small dead zone
struct Autopilot {
    keys: HeldKeys,
}

impl Autopilot {
    fn steer(engine: &Engine) -> Self {
        let mut keys = HeldKeys::default();
        let centres = engine
            .ball()
            .zip(engine.platform())
            .and_then(|(ball, platform)| {
                let b = engine.world.position(ball)?.center().x;
                let p = engine.world.position(platform)?.center().x;
                Some((b, p))
            });
        if let Some((ball_x, platform_x)) = centres {
            let dead_zone = 8.0;
            keys.left = ball_x < platform_x - dead_zone;
            keys.right = ball_x > platform_x + dead_zone;
        }
        Self { keys }
    }
}

impl KeyState for Autopilot {
    fn key_down(&self, key: Key) -> bool {
        self.keys.key_down(key)
    }
}

fn main() {
    env_logger::init();
    log::info!("Brickfall (headless) starting...");

    // `--realtime` paces frames on the wall clock; otherwise a virtual clock
    // advances by exactly SIM_DT per frame.
    let realtime = std::env::args().skip(1).any(|a| a == "--realtime");
    let settings = match std::env::args().skip(1).find(|a| !a.starts_with("--")) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load settings from {}: {}", path, e);
                std::process::exit(2);
            }
        },
        None => Settings::default(),
    };

    let mut timer = FrameTimer::new(settings.min_dt, settings.max_dt);
    let frame = Duration::from_secs_f32(SIM_DT);

    let mut engine = Engine::new(settings);
    engine.start();
    let total_bricks = engine.bricks_left();

    let mut clock = Instant::now();
    timer.reset();
    timer.mark(clock);

    let mut ticks = 0u64;
    let mut sim_time = 0.0f32;
    while engine.status() == GameStatus::Playing && ticks < MAX_TICKS {
        if realtime {
            std::thread::sleep(frame);
            clock = Instant::now();
        } else {
            clock += frame;
        }
        let dt = timer.mark(clock);

        let pilot = Autopilot::steer(&engine);
        if let Err(e) = engine.tick(&pilot, dt) {
            log::error!("Simulation invariant broken: {}", e);
            std::process::exit(1);
        }
        ticks += 1;
        sim_time += dt;

        if engine.bricks_left() == 0 {
            log::info!("All bricks cleared");
            break;
        }
    }

    log::info!(
        "Finished after {} ticks ({:.1}s): status {:?}, {}/{} bricks destroyed, {} sound cues",
        ticks,
        sim_time,
        engine.status(),
        total_bricks - engine.bricks_left(),
        total_bricks,
        engine.sound().total_played()
    );

    if engine.status() == GameStatus::GameOver {
        engine.monitor_mut().request_exit();
    }
}
