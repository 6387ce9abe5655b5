//! Engine instance and per-frame tick
//!
//! The engine owns the world, the round monitor and the sound sink. One frame
//! is input -> collision -> motion -> game-over check, in that fixed order.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{CollisionReport, Field, collision_tick};
use super::input::{KeyState, apply_input};
use super::monitor::{GameStatus, RoundMonitor};
use super::motion::integrate_tick;
use super::quad::Quad;
use super::world::{EntityId, Role, Sprite, Velocity, World};
use crate::audio::{AudioManager, PlayMode, SoundEffect, SoundSink};
use crate::error::SimError;
use crate::settings::Settings;

/// Largest angle (radians) between the serve direction and straight up
const SERVE_SPREAD: f32 = std::f32::consts::FRAC_PI_4;

/// Owned simulation instance
pub struct Engine<S: SoundSink = AudioManager> {
    pub world: World,
    pub field: Field,
    monitor: RoundMonitor,
    sound: S,
    settings: Settings,
}

impl Engine<AudioManager> {
    /// Engine with the default audio manager configured from `settings`
    pub fn new(settings: Settings) -> Self {
        let mut audio = AudioManager::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        Self::with_sound(settings, audio)
    }
}

impl<S: SoundSink> Engine<S> {
    pub fn with_sound(settings: Settings, sound: S) -> Self {
        Self {
            world: World::new(),
            field: Field::new(settings.screen_width, settings.screen_height),
            monitor: RoundMonitor::new(),
            sound,
            settings,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.monitor.status()
    }

    pub fn monitor_mut(&mut self) -> &mut RoundMonitor {
        &mut self.monitor
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Leave the menu: lay out the scene and begin playing
    pub fn start(&mut self) -> bool {
        if !self.monitor.start() {
            return false;
        }
        self.world = World::new();
        self.populate_world();
        true
    }

    /// Resolve collisions by adjusting velocities for the coming step
    pub fn collision_tick(&mut self, dt: f32) -> Result<CollisionReport, SimError> {
        collision_tick(&mut self.world, self.field, dt, &mut self.sound)
    }

    /// Commit positions
    pub fn integrate_tick(&mut self, dt: f32) {
        integrate_tick(&mut self.world, dt);
    }

    pub fn check_game_over(&mut self) -> Result<bool, SimError> {
        self.monitor.check_game_over(&self.world, self.field.height)
    }

    /// Run one full frame. Does nothing outside `Playing`.
    pub fn tick(&mut self, keys: &dyn KeyState, dt: f32) -> Result<Option<CollisionReport>, SimError> {
        if self.monitor.status() != GameStatus::Playing {
            return Ok(None);
        }

        apply_input(&mut self.world, keys, dt);
        let report = self.collision_tick(dt)?;
        self.integrate_tick(dt);
        self.check_game_over()?;
        Ok(Some(report))
    }

    /// Background, brick grid, ball and platform, in that id order
    pub fn populate_world(&mut self) {
        let (w, h) = (self.field.width, self.field.height);

        let background = self.world.create_entity();
        self.world.insert_position(background, Quad::from_rect(0.0, 0.0, w, h));
        self.world.insert_sprite(background, sprite("background.png"));

        let rows = self.settings.brick_rows;
        let cols = self.settings.brick_cols;
        let brick_w = w / cols as f32;
        let brick_h = h / (2.0 * rows as f32);
        for row in 0..rows {
            for col in 0..cols {
                let brick = self.world.create_entity();
                let quad = Quad::from_rect(brick_w * col as f32, brick_h * row as f32, brick_w, brick_h);
                self.world.insert_position(brick, quad);
                self.world.insert_sprite(brick, sprite("yellow_brick.png"));
                self.world.mark_collidable(brick);
            }
        }

        let ball = self.world.create_entity();
        let ball_size = w / 35.0;
        self.world.insert_position(
            ball,
            Quad::centered(Vec2::new(w / 2.0, 3.0 * h / 4.0), ball_size, ball_size),
        );
        self.world.insert_sprite(ball, sprite("ball.png"));
        self.world.set_velocity(ball, self.serve_velocity());
        self.world.assign_role(Role::Ball, ball);

        let platform = self.world.create_entity();
        let platform_w = w / 5.0;
        let platform_h = w / 25.0;
        self.world.insert_position(
            platform,
            Quad::from_rect(w / 2.0 - platform_w / 2.0, h - platform_h, platform_w, platform_h),
        );
        self.world.insert_sprite(platform, sprite("platform.png"));
        self.world.set_velocity(platform, Velocity::default());
        self.world.mark_input_controlled(platform);
        self.world.assign_role(Role::Platform, platform);

        self.sound.play_effect(SoundEffect::Background, PlayMode::Looping);
        log::info!(
            "World populated: {} entities, {}x{} bricks, field {}x{}",
            self.world.entity_count(),
            rows,
            cols,
            w,
            h
        );
    }

    /// Upward serve with a seeded sideways tilt
    fn serve_velocity(&self) -> Velocity {
        let mut rng = Pcg32::seed_from_u64(self.settings.seed);
        let angle = rng.random_range(-SERVE_SPREAD..SERVE_SPREAD);
        let speed = self.settings.ball_speed;
        Velocity::new(speed * angle.sin(), -speed * angle.cos())
    }

    pub fn ball(&self) -> Option<EntityId> {
        self.world.collidable_role(Role::Ball)
    }

    pub fn platform(&self) -> Option<EntityId> {
        self.world.collidable_role(Role::Platform)
    }

    /// Bricks still standing
    pub fn bricks_left(&self) -> usize {
        self.world.brick_count()
    }
}

fn sprite(texture: &str) -> Sprite {
    Sprite {
        texture: texture.to_string(),
    }
}
