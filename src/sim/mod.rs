//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied `dt` only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod monitor;
pub mod motion;
pub mod quad;
pub mod tick;
pub mod world;

pub use collision::{Axis, CollisionReport, Field, brick_reflection_axis, collision_tick};
pub use input::{HeldKeys, Key, KeyState, apply_input};
pub use monitor::{GameStatus, RoundMonitor};
pub use motion::integrate_tick;
pub use quad::{Extents, Quad};
pub use tick::Engine;
pub use world::{EntityId, Role, Sprite, Velocity, World};
