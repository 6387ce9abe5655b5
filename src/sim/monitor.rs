//! Round state machine
//!
//! Only `Playing -> GameOver` is decided by the simulation (ball below the
//! field). Menu transitions come from the UI.

use serde::{Deserialize, Serialize};

use super::world::{Role, World};
use crate::error::SimError;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    MainMenu,
    Playing,
    GameOver,
    Exit,
}

#[derive(Debug, Clone, Default)]
pub struct RoundMonitor {
    status: GameStatus,
}

impl RoundMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Menu "start" button
    pub fn start(&mut self) -> bool {
        if self.status == GameStatus::MainMenu {
            self.set(GameStatus::Playing);
            true
        } else {
            false
        }
    }

    /// Menu "exit" button (also closes the game-over screen)
    pub fn request_exit(&mut self) -> bool {
        match self.status {
            GameStatus::MainMenu | GameStatus::GameOver => {
                self.set(GameStatus::Exit);
                true
            }
            _ => false,
        }
    }

    /// End the round once the ball's bottom edge passes the field bottom
    pub fn check_game_over(&mut self, world: &World, screen_height: f32) -> Result<bool, SimError> {
        if self.status != GameStatus::Playing {
            return Ok(self.status == GameStatus::GameOver);
        }

        let ball = world.require_role(Role::Ball)?;
        let bottom = world.require_position(ball)?.bottom();
        if bottom > screen_height {
            log::info!("ball left the field (bottom {:.1} > {:.1})", bottom, screen_height);
            self.set(GameStatus::GameOver);
            return Ok(true);
        }
        Ok(false)
    }

    fn set(&mut self, status: GameStatus) {
        log::info!("status {:?} -> {:?}", self.status, status);
        self.status = status;
    }
}
