//! The engine: owns every entity and system and runs the tick.
//!
//! ## Tick lifecycle
//!
//! 1. Snapshot the live entities.
//! 2. For each system in registration order: select its matches from the
//!    snapshot, run the whole-frame hook, run the per-entity hook per match.
//! 3. Commit the structural changes queued by the systems, as one batch.
//!
//! Every system in a tick therefore sees the same set of entities: nothing
//! created or removed by an earlier system shows up (or disappears) until the
//! next tick.
//!
//! Outside a tick, [`Engine::create`] and [`Engine::remove`] apply
//! immediately.
//!
//! ## Failure policy
//!
//! Fail-fast. The first error returned by any hook aborts the tick and is
//! returned from [`Engine::tick`]. Structural changes queued during the aborted
//! tick are discarded; component writes already made are kept.

use tracing::{debug, info, trace, warn};

use engine_component::{
    ComponentStore, EcsError, Entity, EntityBuilder, EntityMut, EntityRef, Query,
};
use engine_system::{Commands, System, TickInfo, run_system};

use crate::registry::SystemRegistry;

/// Summary of one completed tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The tick number.
    pub tick_id: u64,
    /// Systems that ran.
    pub systems: usize,
    /// Sum over systems of the entities their query matched.
    pub matched: usize,
    /// Entities created at commit.
    pub spawned: usize,
    /// Entities removed at commit.
    pub removed: usize,
}

/// Owns the component store, the registered systems and the tick counter.
#[derive(Debug, Default)]
pub struct Engine {
    store: ComponentStore,
    registry: SystemRegistry,
    commands: Commands,
    tick_id: u64,
    elapsed: f64,
}

impl Engine {
    /// Create an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The component store.
    #[must_use]
    pub fn store(&self) -> &ComponentStore {
        &self.store
    }

    /// Mutable access to the component store.
    pub fn store_mut(&mut self) -> &mut ComponentStore {
        &mut self.store
    }

    /// Number of completed (or aborted) ticks.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Simulated time accumulated by successful ticks, in seconds.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.store.len()
    }

    /// Number of registered systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.registry.len()
    }

    /// Create an entity from `builder`, immediately.
    pub fn create(&mut self, builder: EntityBuilder) -> Result<EntityMut<'_>, EcsError> {
        let entity = builder.build(&mut self.store)?;
        trace!(%entity, "entity created");
        self.store.entity_mut(entity)
    }

    /// Remove an entity, immediately. Removing twice is a no-op.
    pub fn remove(&mut self, entity: Entity) -> bool {
        self.store.remove(entity)
    }

    /// Read-only handle to `entity`.
    pub fn entity(&self, entity: Entity) -> Result<EntityRef<'_>, EcsError> {
        self.store.entity(entity)
    }

    /// Mutable handle to `entity`.
    pub fn entity_mut(&mut self, entity: Entity) -> Result<EntityMut<'_>, EcsError> {
        self.store.entity_mut(entity)
    }

    /// Live entities matching `query`, in creation order.
    #[must_use]
    pub fn select(&self, query: &Query) -> Vec<Entity> {
        query.select(&self.store, self.store.entities()).collect()
    }

    /// Register a system. It runs every tick after the ones registered before.
    pub fn register<S: System + 'static>(&mut self, system: S) -> Result<(), EcsError> {
        self.register_boxed(Box::new(system))
    }

    /// Register an already boxed system.
    pub fn register_boxed(&mut self, system: Box<dyn System>) -> Result<(), EcsError> {
        let name = system.name().to_string();
        self.registry.register(system)?;
        info!(system = %name, position = self.registry.len(), "system registered");
        Ok(())
    }

    /// Advance the world by `delta` seconds.
    ///
    /// A negative or non-finite `delta` is rejected with
    /// [`EcsError::InvalidDelta`] before anything runs; the tick id is not
    /// consumed.
    pub fn tick(&mut self, delta: f64) -> Result<TickReport, EcsError> {
        if !delta.is_finite() || delta < 0.0 {
            warn!(tick_id = self.tick_id + 1, delta, "tick rejected");
            return Err(EcsError::InvalidDelta(delta));
        }
        self.tick_id += 1;
        let tick = TickInfo {
            tick_id: self.tick_id,
            delta,
        };
        let snapshot = self.store.entities().to_vec();

        debug!(
            tick_id = self.tick_id,
            delta,
            entities = snapshot.len(),
            systems = self.registry.len(),
            "tick start"
        );

        let mut report = TickReport {
            tick_id: self.tick_id,
            ..TickReport::default()
        };

        for system in self.registry.iter_mut() {
            match run_system(
                &mut **system,
                tick,
                &mut self.store,
                &snapshot,
                &mut self.commands,
            ) {
                Ok(matched) => {
                    report.systems += 1;
                    report.matched += matched;
                }
                Err(err) => {
                    warn!(
                        tick_id = self.tick_id,
                        system = system.name(),
                        discarded = self.commands.len(),
                        %err,
                        "tick aborted"
                    );
                    self.commands.clear();
                    return Err(err);
                }
            }
        }

        let summary = self.commands.apply(&mut self.store)?;
        report.spawned = summary.spawned;
        report.removed = summary.removed;
        self.elapsed += delta;

        debug!(
            tick_id = self.tick_id,
            spawned = report.spawned,
            removed = report.removed,
            entities = self.store.len(),
            "tick committed"
        );
        Ok(report)
    }

    /// Tear the scene down: every system's teardown hook runs, then all
    /// systems and entities are dropped.
    pub fn teardown(&mut self) {
        let systems = self.registry.teardown();
        let entities = self.store.len();
        self.store.clear();
        self.commands.clear();
        info!(systems, entities, "engine torn down");
    }
}
