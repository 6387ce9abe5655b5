//! Keyboard-driven velocity
//!
//! Input-controlled entities (the platform) get a horizontal speed of
//! `PLATFORM_STEP / dt` toward the held arrow key, or stop when no arrow is
//! held. Runs before the collision resolver.

use super::world::World;
use crate::consts::PLATFORM_STEP;

/// Keys the simulation cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
}

/// Key-state query supplied by the host
pub trait KeyState {
    fn key_down(&self, key: Key) -> bool;
}

/// Plain key snapshot, handy for scripted input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
}

impl KeyState for HeldKeys {
    fn key_down(&self, key: Key) -> bool {
        match key {
            Key::Left => self.left,
            Key::Right => self.right,
        }
    }
}

/// Set horizontal speed of input-controlled entities from the key state.
/// Right wins when both arrows are held.
pub fn apply_input(world: &mut World, keys: &dyn KeyState, dt: f32) {
    let speed = PLATFORM_STEP / dt;
    let left = keys.key_down(Key::Left);
    let right = keys.key_down(Key::Right);

    let controlled: Vec<_> = world.input_controlled_entities().collect();
    for id in controlled {
        let Some(velocity) = world.velocity_mut(id) else {
            continue;
        };
        velocity.speed_x = if right {
            speed
        } else if left {
            -speed
        } else {
            0.0
        };
    }
}
