//! Motion integration
//!
//! Commits `position += velocity * dt` for every entity that has both
//! components. Entities are independent of each other.

use super::world::World;

/// Advance every moving entity by its velocity
pub fn integrate_tick(world: &mut World, dt: f32) {
    for (quad, velocity) in world.moving_entities_mut() {
        quad.translate(velocity.step(dt));
    }
}
