//! # engine_component
//!
//! The bookkeeping half of the ECS core: what a component is, where it lives,
//! and how systems find the entities they care about.
//!
//! This crate provides:
//!
//! - [`Component`] trait: the contract all ECS data must satisfy.
//! - [`Entity`]: generational entity identifiers, and their [`EntityAllocator`].
//! - [`ComponentStore`]: per-kind typed columns keyed by entity.
//! - [`EntityRef`] / [`EntityMut`]: borrow-scoped handles to one entity.
//! - [`Query`]: conjunctive selection over component kinds.
//! - [`EntityBuilder`]: a recorded list of components for a new entity.
//! - [`EcsError`]: the error taxonomy shared by every layer above.

pub mod builder;
pub mod component;
pub mod entity;
pub mod error;
pub mod handle;
pub mod query;
pub mod store;

pub use builder::EntityBuilder;
pub use component::{Component, ComponentTypeId};
pub use entity::{Entity, EntityAllocator};
pub use error::EcsError;
pub use handle::{EntityMut, EntityRef};
pub use query::Query;
pub use store::ComponentStore;
