//! Runs one system's turn within a tick.
//!
//! A turn has two phases: **selecting** (evaluate the system's query against
//! the tick-start snapshot) and **updating** (whole-frame hook once, then the
//! per-entity hook for each match, in snapshot order).

use tracing::{debug_span, trace};

use engine_component::{ComponentStore, EcsError, Entity};

use crate::commands::Commands;
use crate::context::SystemContext;
use crate::system::System;

/// Timing information for the tick being run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInfo {
    /// Tick number, starting at 1.
    pub tick_id: u64,
    /// Seconds since the previous tick.
    pub delta: f64,
}

/// Run `system` for one tick.
///
/// Returns the number of entities the system's query matched. The first error
/// raised by a hook stops the turn and is returned as-is.
pub fn run_system<S: System + ?Sized>(
    system: &mut S,
    tick: TickInfo,
    store: &mut ComponentStore,
    snapshot: &[Entity],
    commands: &mut Commands,
) -> Result<usize, EcsError> {
    let span = debug_span!("system", name = system.name(), tick_id = tick.tick_id);
    let _guard = span.enter();

    let matched: Vec<Entity> = system.query().select(store, snapshot).collect();
    trace!(matched = matched.len(), "selected entities");

    let mut ctx = SystemContext::new(
        tick.tick_id,
        tick.delta,
        store,
        snapshot,
        &matched,
        commands,
    );
    system.update(&mut ctx)?;
    for &entity in &matched {
        system.update_entity(&mut ctx, entity)?;
    }
    Ok(matched.len())
}
