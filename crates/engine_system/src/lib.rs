//! # engine_system
//!
//! Per-tick behavior for the ECS core.
//!
//! - [`System`]: a unit of logic bound to a [`Query`](engine_component::Query),
//!   with a whole-frame hook and a per-entity hook.
//! - [`TemporalSystem`]: fires a wrapped system at a fixed interval.
//! - [`SystemContext`]: the tick timing, store access and
//!   deferred [`Commands`] queue.
//! - [`run_system`]: one system's select-then-update turn.
//!
//! ## Usage
//!
//! ```rust
//! use engine_component::{Component, EcsError, Entity, Query};
//! use engine_system::{System, SystemContext};
//!
//! struct Terrain;
//!
//! impl Component for Terrain {
//!     fn type_name() -> &'static str { "Terrain" }
//! }
//!
//! struct TerrainMove {
//!     query: Query,
//! }
//!
//! impl System for TerrainMove {
//!     fn query(&self) -> &Query {
//!         &self.query
//!     }
//!
//!     fn update_entity(
//!         &mut self,
//!         ctx: &mut SystemContext<'_>,
//!         entity: Entity,
//!     ) -> Result<(), EcsError> {
//!         let _terrain = ctx.get::<Terrain>(entity)?;
//!         Ok(())
//!     }
//! }
//!
//! let system = TerrainMove { query: Query::of::<Terrain>() };
//! assert_eq!(system.name(), "TerrainMove");
//! ```

pub mod commands;
pub mod context;
pub mod runner;
pub mod system;
pub mod temporal;

pub use commands::{Command, Commands, CommitSummary};
pub use context::SystemContext;
pub use runner::{TickInfo, run_system};
pub use system::{FnSystem, System};
pub use temporal::TemporalSystem;
