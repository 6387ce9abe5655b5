//! Frame timer
//!
//! Turns wall-clock instants into the `dt` fed to the simulation. The
//! simulation never clamps `dt` itself, so the clamp lives here: a zero
//! `dt` would stall the ball at a wall and `PLATFORM_DEFLECTION / dt` would
//! blow up.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct FrameTimer {
    last: Option<Instant>,
    min_dt: f32,
    max_dt: f32,
}

impl FrameTimer {
    pub fn new(min_dt: f32, max_dt: f32) -> Self {
        Self {
            last: None,
            min_dt,
            max_dt,
        }
    }

    /// Clamp a raw frame duration into the configured range
    pub fn clamp(&self, raw: f32) -> f32 {
        if raw.is_nan() {
            return self.min_dt;
        }
        raw.clamp(self.min_dt, self.max_dt)
    }

    /// Seconds since the previous call (the first call reports `min_dt`)
    pub fn mark(&mut self, now: Instant) -> f32 {
        let elapsed = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last = Some(now);

        let dt = self.clamp(elapsed.as_secs_f32());
        if elapsed.as_secs_f32() > self.max_dt {
            log::debug!("frame took {:?}, clamped to {:.3}s", elapsed, dt);
        }
        dt
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
