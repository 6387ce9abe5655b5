//! Error taxonomy
//!
//! The simulation works on trusted data, so `SimError` only reports broken
//! setup invariants. Callers treat it as fatal.

use crate::sim::world::{EntityId, Role};

/// Errors raised by the simulation core
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A collidable entity lacks a component the resolver needs
    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        entity: EntityId,
        component: &'static str,
    },

    /// No entity is registered under the given collidable role
    #[error("no entity registered for role '{}'", .0.as_str())]
    MissingRole(Role),
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Value out of range
    #[error("invalid setting: {0}")]
    Invalid(String),
}
