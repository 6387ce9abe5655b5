//! Entity/component store
//!
//! Entities are plain ids. Each component lives in its own ordered map so
//! that every system iterates by ascending id, which keeps the simulation
//! deterministic.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::quad::Quad;
use crate::error::SimError;

/// Opaque entity identifier (allocated from 1, never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Speed vector applied by the motion integrator (pixels/s)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub speed_x: f32,
    pub speed_y: f32,
}

impl Velocity {
    pub fn new(speed_x: f32, speed_y: f32) -> Self {
        Self { speed_x, speed_y }
    }

    /// Displacement covered over `dt` seconds
    #[inline]
    pub fn step(&self, dt: f32) -> Vec2 {
        Vec2::new(self.speed_x * dt, self.speed_y * dt)
    }
}

/// Texture handle owned by the renderer; the core only carries the name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    pub texture: String,
}

/// Named collidable roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Ball,
    Platform,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Ball => "ball",
            Role::Platform => "platform",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ball" => Some(Role::Ball),
            "platform" => Some(Role::Platform),
            _ => None,
        }
    }
}

/// All entities and their components
#[derive(Debug, Clone, Default)]
pub struct World {
    positions: BTreeMap<EntityId, Quad>,
    velocities: BTreeMap<EntityId, Velocity>,
    sprites: BTreeMap<EntityId, Sprite>,
    input_controlled: BTreeSet<EntityId>,
    collidable: BTreeSet<EntityId>,
    roles: HashMap<Role, EntityId>,
    /// Next entity ID
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Allocate a new entity ID
    pub fn create_entity(&mut self) -> EntityId {
        // `Default` leaves next_id at 0; ids start at 1 either way
        if self.next_id == 0 {
            self.next_id = 1;
        }
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert_position(&mut self, entity: EntityId, quad: Quad) {
        self.positions.insert(entity, quad);
    }

    pub fn position(&self, entity: EntityId) -> Option<&Quad> {
        self.positions.get(&entity)
    }

    pub fn set_position(&mut self, entity: EntityId, quad: Quad) {
        self.positions.insert(entity, quad);
    }

    pub fn velocity(&self, entity: EntityId) -> Option<Velocity> {
        self.velocities.get(&entity).copied()
    }

    pub fn set_velocity(&mut self, entity: EntityId, velocity: Velocity) {
        self.velocities.insert(entity, velocity);
    }

    pub fn velocity_mut(&mut self, entity: EntityId) -> Option<&mut Velocity> {
        self.velocities.get_mut(&entity)
    }

    pub fn insert_sprite(&mut self, entity: EntityId, sprite: Sprite) {
        self.sprites.insert(entity, sprite);
    }

    pub fn sprite(&self, entity: EntityId) -> Option<&Sprite> {
        self.sprites.get(&entity)
    }

    pub fn mark_collidable(&mut self, entity: EntityId) {
        self.collidable.insert(entity);
    }

    pub fn mark_input_controlled(&mut self, entity: EntityId) {
        self.input_controlled.insert(entity);
    }

    pub fn is_input_controlled(&self, entity: EntityId) -> bool {
        self.input_controlled.contains(&entity)
    }

    /// Register `entity` under a named role (also makes it collidable)
    pub fn assign_role(&mut self, role: Role, entity: EntityId) {
        self.collidable.insert(entity);
        self.roles.insert(role, entity);
    }

    pub fn collidable_role(&self, role: Role) -> Option<EntityId> {
        self.roles.get(&role).copied()
    }

    pub fn role_by_name(&self, name: &str) -> Option<EntityId> {
        Role::from_name(name).and_then(|role| self.collidable_role(role))
    }

    /// Collidable entities in ascending id order
    pub fn all_collidable_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.collidable.iter().copied()
    }

    /// Input-controlled entities in ascending id order
    pub fn input_controlled_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.input_controlled.iter().copied()
    }

    /// Entities carrying both a position and a velocity
    pub fn moving_entities_mut(&mut self) -> impl Iterator<Item = (&mut Quad, Velocity)> + '_ {
        let velocities = &self.velocities;
        self.positions
            .iter_mut()
            .filter_map(move |(id, quad)| velocities.get(id).map(|v| (quad, *v)))
    }

    /// Remove every component of `entity`. Unknown ids are a no-op.
    pub fn destroy_entity(&mut self, entity: EntityId) -> bool {
        let mut found = self.positions.remove(&entity).is_some();
        found |= self.velocities.remove(&entity).is_some();
        found |= self.sprites.remove(&entity).is_some();
        found |= self.input_controlled.remove(&entity);
        found |= self.collidable.remove(&entity);
        self.roles.retain(|_, id| *id != entity);

        if !found {
            log::warn!("destroy_entity: {} not found, ignoring", entity);
        }
        found
    }

    /// Number of entities holding a position
    pub fn entity_count(&self) -> usize {
        self.positions.len()
    }

    /// Collidable entities that carry no role (the bricks)
    pub fn brick_count(&self) -> usize {
        self.collidable
            .iter()
            .filter(|id| !self.roles.values().any(|r| r == *id))
            .count()
    }

    /// Position lookup that fails loudly
    pub fn require_position(&self, entity: EntityId) -> Result<&Quad, SimError> {
        self.position(entity).ok_or(SimError::MissingComponent {
            entity,
            component: "position",
        })
    }

    /// Velocity lookup that fails loudly
    pub fn require_velocity(&self, entity: EntityId) -> Result<Velocity, SimError> {
        self.velocity(entity).ok_or(SimError::MissingComponent {
            entity,
            component: "velocity",
        })
    }

    /// Role lookup that fails loudly
    pub fn require_role(&self, role: Role) -> Result<EntityId, SimError> {
        self.collidable_role(role).ok_or(SimError::MissingRole(role))
    }
}
