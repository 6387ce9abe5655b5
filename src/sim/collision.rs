//! Collision detection and response
//!
//! Runs before motion integration. Every test projects the ball one step
//! ahead (`vertex + velocity * dt`) and compares it with the current,
//! non-projected geometry of the other party. Only velocities change here;
//! positions are committed later by the motion integrator.

use serde::{Deserialize, Serialize};

use super::quad::Extents;
use super::world::{EntityId, Role, World};
use crate::audio::{PlayMode, SoundEffect, SoundSink};
use crate::consts::PLATFORM_DEFLECTION;
use crate::error::SimError;

/// Play-field bounds. The field is not an entity, just two scalars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Velocity axis flipped by a bounce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// What happened during one resolver pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Ball bounced off the left or right wall
    pub wall_x: bool,
    /// Ball bounced off the top wall
    pub wall_y: bool,
    /// Bricks destroyed this tick, ascending id
    pub destroyed: Vec<EntityId>,
    /// The brick whose impact decided the reflection, and the flipped axis
    pub reflection: Option<(EntityId, Axis)>,
    /// Ball bounced off the platform
    pub platform_hit: bool,
    /// Platform was stopped at a wall
    pub platform_stopped: bool,
}

impl CollisionReport {
    pub fn is_quiet(&self) -> bool {
        *self == Self::default()
    }
}

/// Resolve every collision for this tick.
///
/// Order: ball vs walls, ball vs bricks, ball vs platform, platform vs walls.
/// Each step reads the velocity left behind by the previous one.
pub fn collision_tick(
    world: &mut World,
    field: Field,
    dt: f32,
    sound: &mut dyn SoundSink,
) -> Result<CollisionReport, SimError> {
    let ball = world.require_role(Role::Ball)?;
    let platform = world.require_role(Role::Platform)?;
    let mut report = CollisionReport::default();

    let (wall_x, wall_y) = resolve_ball_vs_walls(world, ball, field, dt, sound)?;
    report.wall_x = wall_x;
    report.wall_y = wall_y;

    let (destroyed, reflection) = resolve_ball_vs_bricks(world, ball, platform, dt, sound)?;
    report.destroyed = destroyed;
    report.reflection = reflection;

    report.platform_hit = resolve_ball_vs_platform(world, ball, platform, dt, sound)?;
    report.platform_stopped = resolve_platform_vs_walls(world, platform, field, dt)?;

    if !report.is_quiet() {
        log::debug!("collision tick: {:?}", report);
    }
    Ok(report)
}

/// Projected extents of `entity` after `dt`
fn projected_extents(world: &World, entity: EntityId, dt: f32) -> Result<Extents, SimError> {
    let velocity = world.require_velocity(entity)?;
    let quad = world.require_position(entity)?;
    Ok(quad.translated(velocity.step(dt)).extents())
}

fn flip(world: &mut World, entity: EntityId, axis: Axis) {
    if let Some(velocity) = world.velocity_mut(entity) {
        match axis {
            Axis::X => velocity.speed_x = -velocity.speed_x,
            Axis::Y => velocity.speed_y = -velocity.speed_y,
        }
    }
}

fn hit_sound(sound: &mut dyn SoundSink) {
    sound.play_effect(SoundEffect::HitBall, PlayMode::Once);
}

/// Bounce the ball off the left, right and top walls.
///
/// The bottom edge is never reflected: leaving through it ends the round.
/// Each axis flips at most once per tick.
pub fn resolve_ball_vs_walls(
    world: &mut World,
    ball: EntityId,
    field: Field,
    dt: f32,
    sound: &mut dyn SoundSink,
) -> Result<(bool, bool), SimError> {
    let velocity = world.require_velocity(ball)?;
    let projected = world.require_position(ball)?.translated(velocity.step(dt));

    let out_x = projected
        .vertices
        .iter()
        .any(|v| v.x < 0.0 || v.x > field.width);
    let out_top = projected.vertices.iter().any(|v| v.y < 0.0);

    if out_x {
        flip(world, ball, Axis::X);
        hit_sound(sound);
    }
    if out_top {
        flip(world, ball, Axis::Y);
        hit_sound(sound);
    }
    Ok((out_x, out_top))
}

/// Destroy every brick the projected ball overlaps and reflect once.
///
/// All bricks are tested against the same projection. The lowest-id hit
/// decides the reflection; the rest are destroyed without further bounces.
pub fn resolve_ball_vs_bricks(
    world: &mut World,
    ball: EntityId,
    platform: EntityId,
    dt: f32,
    sound: &mut dyn SoundSink,
) -> Result<(Vec<EntityId>, Option<(EntityId, Axis)>), SimError> {
    let ball_ext = projected_extents(world, ball, dt)?;

    let mut hits: Vec<(EntityId, Extents)> = Vec::new();
    for id in world.all_collidable_entities() {
        if id == ball || id == platform {
            continue;
        }
        let brick_ext = world.require_position(id)?.extents();
        if ball_ext.overlaps(&brick_ext) {
            hits.push((id, brick_ext));
        }
    }

    let reflection = hits
        .first()
        .map(|(id, brick_ext)| (*id, brick_reflection_axis(&ball_ext, brick_ext)));
    if let Some((_, axis)) = reflection {
        flip(world, ball, axis);
    }

    let destroyed: Vec<EntityId> = hits.into_iter().map(|(id, _)| id).collect();
    for id in &destroyed {
        world.destroy_entity(*id);
        hit_sound(sound);
    }

    Ok((destroyed, reflection))
}

/// Pick the velocity axis to flip for a ball (projected) hitting a brick.
///
/// - ball horizontally inside the brick: it hit a horizontal face, flip y
/// - ball vertically inside the brick: it hit a vertical face, flip x
/// - otherwise a corner: compare penetration depths and flip x when the
///   vertical depth is at least the horizontal one
///
/// This is a heuristic, not a time-of-impact solve.
pub fn brick_reflection_axis(ball: &Extents, brick: &Extents) -> Axis {
    if ball.inside_horizontally(brick) {
        return Axis::Y;
    }
    if ball.inside_vertically(brick) {
        return Axis::X;
    }

    let lx = if ball.left < brick.left {
        (brick.left - ball.right).abs()
    } else {
        (brick.right - ball.left).abs()
    };
    let ly = if ball.top < brick.top {
        (brick.top - ball.bottom).abs()
    } else {
        (brick.bottom - ball.top).abs()
    };

    if ly >= lx { Axis::X } else { Axis::Y }
}

/// Bounce the ball off the platform and steer it by the contact offset.
///
/// A centred hit leaves no horizontal speed; a hit at either edge sends the
/// ball outward at `PLATFORM_DEFLECTION / dt`.
pub fn resolve_ball_vs_platform(
    world: &mut World,
    ball: EntityId,
    platform: EntityId,
    dt: f32,
    sound: &mut dyn SoundSink,
) -> Result<bool, SimError> {
    let ball_ext = projected_extents(world, ball, dt)?;
    let platform_ext = world.require_position(platform)?.extents();

    if !ball_ext.overlaps(&platform_ext) {
        return Ok(false);
    }

    flip(world, ball, Axis::Y);
    hit_sound(sound);

    let half_width = (platform_ext.right - platform_ext.left) / 2.0;
    if half_width > 0.0 {
        let offset = ball_ext.center_x() - platform_ext.center_x();
        let tau = (offset.abs() / half_width).min(1.0);
        let speed_x = offset.signum() * tau * PLATFORM_DEFLECTION / dt;
        if let Some(velocity) = world.velocity_mut(ball) {
            velocity.speed_x = speed_x;
        }
    }
    Ok(true)
}

/// Stop the platform when its next step would leave the field horizontally
pub fn resolve_platform_vs_walls(
    world: &mut World,
    platform: EntityId,
    field: Field,
    dt: f32,
) -> Result<bool, SimError> {
    let velocity = world.require_velocity(platform)?;
    let projected = world.require_position(platform)?.translated(velocity.step(dt));

    let out_x = projected
        .vertices
        .iter()
        .any(|v| v.x < 0.0 || v.x > field.width);
    if out_x {
        if let Some(velocity) = world.velocity_mut(platform) {
            velocity.speed_x = 0.0;
        }
    }
    Ok(out_x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioManager;
    use crate::sim::quad::Quad;
    use crate::sim::world::Velocity;
    use proptest::prelude::*;

    const FIELD: Field = Field {
        width: 800.0,
        height: 600.0,
    };

    /// Ball and a parked platform in the bottom-left corner
    fn world_with(ball: Quad, vel: Velocity) -> (World, EntityId, EntityId) {
        let mut world = World::new();
        let ball_id = world.create_entity();
        world.insert_position(ball_id, ball);
        world.set_velocity(ball_id, vel);
        world.assign_role(Role::Ball, ball_id);

        let platform = world.create_entity();
        world.insert_position(platform, Quad::from_rect(0.0, 590.0, 100.0, 10.0));
        world.set_velocity(platform, Velocity::default());
        world.assign_role(Role::Platform, platform);
        (world, ball_id, platform)
    }

    fn add_brick(world: &mut World, quad: Quad) -> EntityId {
        let id = world.create_entity();
        world.insert_position(id, quad);
        world.mark_collidable(id);
        id
    }

    fn ext(x: f32, y: f32, w: f32, h: f32) -> Extents {
        Quad::from_rect(x, y, w, h).extents()
    }

    #[test]
    fn test_right_wall_flips_x_only() {
        let (mut world, ball, _) =
            world_with(Quad::from_rect(780.0, 300.0, 10.0, 10.0), Velocity::new(50.0, 30.0));
        let mut audio = AudioManager::new();
        let report = collision_tick(&mut world, FIELD, 1.0, &mut audio).unwrap();
        assert!(report.wall_x);
        assert!(!report.wall_y);
        assert_eq!(world.velocity(ball), Some(Velocity::new(-50.0, 30.0)));
        assert_eq!(audio.count("hit_ball"), 1);
    }

    #[test]
    fn test_left_wall_flips_x() {
        let (mut world, ball, _) =
            world_with(Quad::from_rect(5.0, 300.0, 10.0, 10.0), Velocity::new(-20.0, 0.0));
        let mut audio = AudioManager::new();
        collision_tick(&mut world, FIELD, 1.0, &mut audio).unwrap();
        assert_eq!(world.velocity(ball), Some(Velocity::new(20.0, 0.0)));
    }

    #[test]
    fn test_top_wall_flips_y() {
        let (mut world, ball, _) =
            world_with(Quad::from_rect(300.0, 5.0, 10.0, 10.0), Velocity::new(10.0, -20.0));
        let mut audio = AudioManager::new();
        let report = collision_tick(&mut world, FIELD, 1.0, &mut audio).unwrap();
        assert!(report.wall_y);
        assert_eq!(world.velocity(ball), Some(Velocity::new(10.0, 20.0)));
    }

    #[test]
    fn test_corner_flips_both_axes_once() {
        let (mut world, ball, _) =
            world_with(Quad::from_rect(795.0, 2.0, 4.0, 4.0), Velocity::new(10.0, -10.0));
        let mut audio = AudioManager::new();
        collision_tick(&mut world, FIELD, 1.0, &mut audio).unwrap();
        assert_eq!(world.velocity(ball), Some(Velocity::new(-10.0, 10.0)));
        assert_eq!(audio.count("hit_ball"), 2);
    }

    #[test]
    fn test_bottom_is_not_a_wall() {
        let (mut world, ball, _) =
            world_with(Quad::from_rect(400.0, 595.0, 4.0, 4.0), Velocity::new(0.0, 50.0));
        let mut audio = AudioManager::new();
        let report = collision_tick(&mut world, FIELD, 1.0, &mut audio).unwrap();
        assert!(report.is_quiet());
        assert_eq!(world.velocity(ball), Some(Velocity::new(0.0, 50.0)));
    }

    #[test]
    fn test_brick_horizontal_face_flips_y() {
        let (mut world, ball, _) =
            world_with(Quad::from_rect(100.0, 100.0, 20.0, 20.0), Velocity::new(0.0, -50.0));
        let brick = add_brick(&mut world, Quad::from_rect(90.0, 40.0, 50.0, 20.0));
        let mut audio = AudioManager::new();
        let report = collision_tick(&mut world, FIELD, 1.0, &mut audio).unwrap();
        assert_eq!(report.destroyed, vec![brick]);
        assert_eq!(report.reflection, Some((brick, Axis::Y)));
        assert_eq!(world.velocity(ball), Some(Velocity::new(0.0, 50.0)));
        assert!(world.position(brick).is_none());
    }

    #[test]
    fn test_many_bricks_destroyed_single_reflection() {
        // Projected ball: x 120..140, y 50..70
        let (mut world, ball, _) =
            world_with(Quad::from_rect(100.0, 100.0, 20.0, 20.0), Velocity::new(20.0, -50.0));
        // Spans the ball horizontally: flips y
        let a = add_brick(&mut world, Quad::from_rect(110.0, 40.0, 40.0, 20.0));
        // Corner hits that would flip x on their own
        let b = add_brick(&mut world, Quad::from_rect(135.0, 55.0, 20.0, 10.0));
        let c = add_brick(&mut world, Quad::from_rect(100.0, 60.0, 20.0, 20.0));
        let mut audio = AudioManager::new();
        let report = collision_tick(&mut world, FIELD, 1.0, &mut audio).unwrap();

        assert_eq!(report.destroyed, vec![a, b, c]);
        assert_eq!(report.reflection, Some((a, Axis::Y)));
        assert_eq!(world.velocity(ball), Some(Velocity::new(20.0, 50.0)));
        assert_eq!(world.brick_count(), 0);
        assert_eq!(audio.count("hit_ball"), 3);
    }

    #[test]
    fn test_lowest_id_brick_picks_the_axis() {
        let ball_quad = Quad::from_rect(100.0, 100.0, 20.0, 20.0);
        let projected = ball_quad.translated(glam::Vec2::new(20.0, -50.0)).extents();
        let corner = Quad::from_rect(135.0, 55.0, 20.0, 10.0);
        let face = Quad::from_rect(110.0, 40.0, 40.0, 20.0);
        assert_eq!(brick_reflection_axis(&projected, &corner.extents()), Axis::X);
        assert_eq!(brick_reflection_axis(&projected, &face.extents()), Axis::Y);

        // Same bricks, corner brick created first this time
        let (mut world, ball, _) = world_with(ball_quad, Velocity::new(20.0, -50.0));
        let first = add_brick(&mut world, corner);
        let second = add_brick(&mut world, face);
        let mut audio = AudioManager::new();
        let report = collision_tick(&mut world, FIELD, 1.0, &mut audio).unwrap();

        assert_eq!(report.destroyed, vec![first, second]);
        assert_eq!(report.reflection, Some((first, Axis::X)));
        assert_eq!(world.velocity(ball), Some(Velocity::new(-20.0, -50.0)));
    }

    #[test]
    fn test_brick_miss_is_noop() {
        let (mut world, ball, _) =
            world_with(Quad::from_rect(100.0, 100.0, 20.0, 20.0), Velocity::new(0.0, -10.0));
        let brick = add_brick(&mut world, Quad::from_rect(300.0, 40.0, 50.0, 20.0));
        let mut audio = AudioManager::new();
        let report = collision_tick(&mut world, FIELD, 1.0, &mut audio).unwrap();
        assert!(report.is_quiet());
        assert!(world.position(brick).is_some());
        assert_eq!(world.velocity(ball), Some(Velocity::new(0.0, -10.0)));
    }

    #[test]
    fn test_reflection_axis_vertical_face() {
        // Ball taller band fully inside brick rows, sticking out to the left
        let ball = ext(85.0, 45.0, 10.0, 10.0);
        let brick = ext(90.0, 40.0, 50.0, 20.0);
        assert_eq!(brick_reflection_axis(&ball, &brick), Axis::X);
    }

    #[test]
    fn test_reflection_axis_corner_shallow_x() {
        // Top-left corner, 2px deep in x, 5px deep in y
        let ball = ext(0.0, 0.0, 10.0, 10.0);
        let brick = ext(8.0, 5.0, 40.0, 20.0);
        assert_eq!(brick_reflection_axis(&ball, &brick), Axis::X);
    }

    #[test]
    fn test_reflection_axis_corner_shallow_y() {
        // Bottom-right corner, 6px deep in x, 1px deep in y
        let ball = ext(44.0, 24.0, 10.0, 10.0);
        let brick = ext(10.0, 0.0, 40.0, 25.0);
        assert_eq!(brick_reflection_axis(&ball, &brick), Axis::Y);
    }

    #[test]
    fn test_reflection_axis_corner_level_tops_flips_x() {
        // Tall ball left of the brick with matching top edges
        let ball = ext(0.0, 0.0, 10.0, 30.0);
        let brick = ext(8.0, 0.0, 40.0, 20.0);
        assert_eq!(brick_reflection_axis(&ball, &brick), Axis::X);
    }

    #[test]
    fn test_reflection_axis_corner_tie_flips_x() {
        let ball = ext(0.0, 0.0, 10.0, 10.0);
        let brick = ext(7.0, 7.0, 40.0, 20.0);
        assert_eq!(brick_reflection_axis(&ball, &brick), Axis::X);
    }

    #[test]
    fn test_platform_center_hit() {
        let mut world = World::new();
        let ball = world.create_entity();
        // Centred over the platform, falling into it
        world.insert_position(ball, Quad::from_rect(395.0, 570.0, 10.0, 10.0));
        world.set_velocity(ball, Velocity::new(0.0, 20.0));
        world.assign_role(Role::Ball, ball);
        let platform = world.create_entity();
        world.insert_position(platform, Quad::from_rect(350.0, 585.0, 100.0, 15.0));
        world.set_velocity(platform, Velocity::default());
        world.assign_role(Role::Platform, platform);

        let mut audio = AudioManager::new();
        let report = collision_tick(&mut world, FIELD, 0.5, &mut audio).unwrap();
        assert!(report.platform_hit);
        let vel = world.velocity(ball).unwrap();
        assert!(vel.speed_x.abs() < 1e-4);
        assert_eq!(vel.speed_y, -20.0);
    }

    #[test]
    fn test_platform_edge_hits() {
        for (ball_x, sign) in [(340.0, -1.0), (445.0, 1.0)] {
            let mut world = World::new();
            let ball = world.create_entity();
            world.insert_position(ball, Quad::from_rect(ball_x, 570.0, 10.0, 10.0));
            world.set_velocity(ball, Velocity::new(0.0, 20.0));
            world.assign_role(Role::Ball, ball);
            let platform = world.create_entity();
            world.insert_position(platform, Quad::from_rect(350.0, 585.0, 100.0, 15.0));
            world.set_velocity(platform, Velocity::default());
            world.assign_role(Role::Platform, platform);

            let dt = 0.5;
            let mut audio = AudioManager::new();
            collision_tick(&mut world, FIELD, dt, &mut audio).unwrap();
            let vel = world.velocity(ball).unwrap();
            assert!((vel.speed_x - sign * PLATFORM_DEFLECTION / dt).abs() < 1e-3);
        }
    }

    #[test]
    fn test_platform_stops_at_wall() {
        let (mut world, _, platform) =
            world_with(Quad::from_rect(400.0, 300.0, 10.0, 10.0), Velocity::default());
        world.set_velocity(platform, Velocity::new(-20.0, 0.0));
        let mut audio = AudioManager::new();
        let report = collision_tick(&mut world, FIELD, 1.0, &mut audio).unwrap();
        assert!(report.platform_stopped);
        assert_eq!(world.velocity(platform), Some(Velocity::default()));
    }

    #[test]
    fn test_missing_velocity_is_error() {
        let mut world = World::new();
        let ball = world.create_entity();
        world.insert_position(ball, Quad::from_rect(0.0, 0.0, 1.0, 1.0));
        world.assign_role(Role::Ball, ball);
        let platform = world.create_entity();
        world.assign_role(Role::Platform, platform);

        let mut audio = AudioManager::new();
        let err = collision_tick(&mut world, FIELD, 1.0, &mut audio).unwrap_err();
        assert_eq!(
            err,
            SimError::MissingComponent {
                entity: ball,
                component: "velocity"
            }
        );
    }

    proptest! {
        #[test]
        fn prop_disjoint_platform_leaves_velocity(
            vx in -100.0f32..100.0,
            vy in -100.0f32..100.0,
            x in 200.0f32..600.0,
            y in 150.0f32..350.0,
        ) {
            // Far from every wall and from the platform parked at y=590
            let (mut world, ball, platform) =
                world_with(Quad::from_rect(x, y, 10.0, 10.0), Velocity::new(vx, vy));
            let mut audio = AudioManager::new();
            let hit = resolve_ball_vs_platform(&mut world, ball, platform, 1.0, &mut audio).unwrap();
            prop_assert!(!hit);
            prop_assert_eq!(world.velocity(ball), Some(Velocity::new(vx, vy)));
        }

        #[test]
        fn prop_wall_flip_preserves_magnitude(
            vx in 60.0f32..200.0,
            vy in -50.0f32..50.0,
            y in 100.0f32..400.0,
        ) {
            let (mut world, ball, _) =
                world_with(Quad::from_rect(750.0, y, 10.0, 10.0), Velocity::new(vx, vy));
            let mut audio = AudioManager::new();
            resolve_ball_vs_walls(&mut world, ball, FIELD, 1.0, &mut audio).unwrap();
            prop_assert_eq!(world.velocity(ball), Some(Velocity::new(-vx, vy)));
        }

        #[test]
        fn prop_left_wall_flip_preserves_magnitude(
            vx in 60.0f32..200.0,
            vy in -50.0f32..50.0,
            x in 5.0f32..40.0,
            y in 100.0f32..400.0,
        ) {
            let (mut world, ball, _) =
                world_with(Quad::from_rect(x, y, 10.0, 10.0), Velocity::new(-vx, vy));
            let mut audio = AudioManager::new();
            let (wall_x, wall_y) =
                resolve_ball_vs_walls(&mut world, ball, FIELD, 1.0, &mut audio).unwrap();
            prop_assert!(wall_x && !wall_y);
            prop_assert_eq!(world.velocity(ball), Some(Velocity::new(vx, vy)));
        }

        #[test]
        fn prop_top_wall_flip_preserves_magnitude(
            vx in -50.0f32..50.0,
            vy in 60.0f32..200.0,
            x in 100.0f32..600.0,
            y in 5.0f32..40.0,
        ) {
            let (mut world, ball, _) =
                world_with(Quad::from_rect(x, y, 10.0, 10.0), Velocity::new(vx, -vy));
            let mut audio = AudioManager::new();
            let (wall_x, wall_y) =
                resolve_ball_vs_walls(&mut world, ball, FIELD, 1.0, &mut audio).unwrap();
            prop_assert!(!wall_x && wall_y);
            prop_assert_eq!(world.velocity(ball), Some(Velocity::new(vx, vy)));
            prop_assert_eq!(audio.count("hit_ball"), 1);
        }
    }
}
