//! Sound cue boundary
//!
//! The simulation only fires named cues. Decoding and playback belong to the
//! host; `AudioManager` is the in-crate sink that applies volume settings,
//! logs every cue and remembers the most recent ones.

use std::collections::VecDeque;

/// How a cue should be played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Once,
    Looping,
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits a wall, the platform or a brick
    HitBall,
    /// Background music
    Background,
}

impl SoundEffect {
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::HitBall => "hit_ball",
            SoundEffect::Background => "background",
        }
    }
}

/// Anything that can receive fire-and-forget sound cues
pub trait SoundSink {
    fn play(&mut self, name: &str, mode: PlayMode);

    fn play_effect(&mut self, effect: SoundEffect, mode: PlayMode) {
        self.play(effect.name(), mode);
    }
}

/// A cue the manager accepted
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedCue {
    pub name: String,
    pub mode: PlayMode,
    pub volume: f32,
}

/// Maximum cues kept in history
pub const CUE_HISTORY: usize = 64;

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    history: VecDeque<PlayedCue>,
    total_played: u64,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            history: VecDeque::with_capacity(CUE_HISTORY),
            total_played: 0,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Recent cues, oldest first
    pub fn history(&self) -> impl Iterator<Item = &PlayedCue> {
        self.history.iter()
    }

    /// Number of times `name` appears in the history
    pub fn count(&self, name: &str) -> usize {
        self.history.iter().filter(|c| c.name == name).count()
    }

    /// Cues played since creation (including muted ones)
    pub fn total_played(&self) -> u64 {
        self.total_played
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl SoundSink for AudioManager {
    fn play(&mut self, name: &str, mode: PlayMode) {
        self.total_played += 1;
        let volume = self.effective_volume();
        if volume <= 0.0 {
            log::trace!("sound '{}' skipped (muted)", name);
            return;
        }

        log::debug!("sound '{}' ({:?}) at volume {:.2}", name, mode, volume);
        if self.history.len() == CUE_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(PlayedCue {
            name: name.to_string(),
            mode,
            volume,
        });
    }
}
