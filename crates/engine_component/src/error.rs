//! Error taxonomy for the ECS core.
//!
//! Every variant is a logic error on the caller's side. Nothing here is retried
//! or recovered from inside the core.

use crate::entity::Entity;

/// Errors raised by the component store, the entity handles, and the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EcsError {
    /// The entity is alive but does not hold the requested component kind.
    #[error("entity {entity} has no `{kind}` component")]
    MissingComponent {
        /// The entity that was queried.
        entity: Entity,
        /// Name of the missing component kind.
        kind: &'static str,
    },

    /// The entity was removed (and possibly its slot recycled).
    #[error("entity {0} is no longer alive")]
    StaleEntity(Entity),

    /// A system with this name is already registered.
    #[error("system `{0}` is already registered")]
    DuplicateRegistration(String),

    /// Two distinct Rust types declared the same component name.
    #[error("component name `{0}` is already bound to another type")]
    KindCollision(&'static str),

    /// A tick was asked to advance by a negative or non-finite time step.
    #[error("tick delta must be finite and non-negative, got {0}")]
    InvalidDelta(f64),
}
