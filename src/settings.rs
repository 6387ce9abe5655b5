//! Game settings
//!
//! Stored as JSON next to the binary. Anything missing from the file takes
//! its default value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Field ===
    /// Play-field width in pixels
    pub screen_width: f32,
    /// Play-field height in pixels
    pub screen_height: f32,

    // === Layout ===
    pub brick_rows: u32,
    pub brick_cols: u32,
    /// Initial ball speed (pixels/s)
    pub ball_speed: f32,
    /// Seed for the serve direction
    pub seed: u64,

    // === Timing ===
    /// Smallest `dt` handed to the simulation (seconds)
    pub min_dt: f32,
    /// Largest `dt` handed to the simulation (seconds)
    pub max_dt: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            brick_rows: BRICK_ROWS,
            brick_cols: BRICK_COLS,
            ball_speed: BALL_START_SPEED,
            seed: 0x5eed,

            min_dt: MIN_DT,
            max_dt: MAX_DT,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.screen_width > 0.0 && self.screen_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "field size {}x{} must be positive",
                self.screen_width, self.screen_height
            )));
        }
        if self.brick_rows == 0 || self.brick_cols == 0 {
            return Err(ConfigError::Invalid("brick grid must not be empty".into()));
        }
        if self.brick_rows > MAX_BRICK_GRID || self.brick_cols > MAX_BRICK_GRID {
            return Err(ConfigError::Invalid(format!(
                "brick grid {}x{} exceeds {} per side",
                self.brick_rows, self.brick_cols, MAX_BRICK_GRID
            )));
        }
        if !(self.min_dt > 0.0 && self.min_dt <= self.max_dt) {
            return Err(ConfigError::Invalid(format!(
                "dt range [{}, {}] must be positive and ordered",
                self.min_dt, self.max_dt
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file; a missing file yields defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
