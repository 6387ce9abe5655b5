//! Brickfall - collision core for an axis-aligned brick-breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (store, collisions, motion, round state)
//! - `audio`: Fire-and-forget sound cues
//! - `settings`: Field size, layout and timing configuration
//! - `timer`: Frame timer producing `dt`

pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;
pub mod timer;

pub use error::{ConfigError, SimError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Default play-field size in pixels
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Horizontal speed reached at the platform edge is `PLATFORM_DEFLECTION / dt`
    pub const PLATFORM_DEFLECTION: f32 = 10.0;
    /// Keyboard-driven platform speed is `PLATFORM_STEP / dt`
    pub const PLATFORM_STEP: f32 = 20.0;

    /// Default ball speed (pixels/s)
    pub const BALL_START_SPEED: f32 = 300.0;

    /// Brick grid defaults
    pub const BRICK_ROWS: u32 = 10;
    pub const BRICK_COLS: u32 = 10;
    /// Upper bound on either brick grid dimension
    pub const MAX_BRICK_GRID: u32 = 256;

    /// Frame timer clamps (seconds)
    pub const MIN_DT: f32 = 1.0 / 1000.0;
    pub const MAX_DT: f32 = 0.1;

    /// Fixed step used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
}
