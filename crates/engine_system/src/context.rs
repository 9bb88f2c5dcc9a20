//! Per-tick execution context provided to system hooks.

use engine_component::{
    Component, ComponentStore, EcsError, Entity, EntityBuilder, EntityMut, EntityRef, Query,
};

use crate::commands::Commands;

/// Context handed to a system's hooks for one tick.
///
/// Component reads and writes go straight to the store. Structural changes
/// (creating or removing entities) are queued and only applied once every
/// system has finished the current tick.
#[derive(Debug)]
pub struct SystemContext<'w> {
    tick_id: u64,
    delta: f64,
    store: &'w mut ComponentStore,
    /// Entities alive when the tick started.
    snapshot: &'w [Entity],
    /// Entities matched by the running system's query this tick.
    matched: &'w [Entity],
    commands: &'w mut Commands,
}

impl<'w> SystemContext<'w> {
    /// Create a context for one system's turn.
    #[must_use]
    pub fn new(
        tick_id: u64,
        delta: f64,
        store: &'w mut ComponentStore,
        snapshot: &'w [Entity],
        matched: &'w [Entity],
        commands: &'w mut Commands,
    ) -> Self {
        Self {
            tick_id,
            delta,
            store,
            snapshot,
            matched,
            commands,
        }
    }

    /// The current tick number (starts at 1).
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Time since the previous tick, in seconds.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// [`SystemContext::delta`] as `f32`, for component math.
    #[must_use]
    pub fn delta_f32(&self) -> f32 {
        self.delta as f32
    }

    /// Entities matched by the running system's query, in creation order.
    #[must_use]
    pub fn entities(&self) -> &'w [Entity] {
        self.matched
    }

    /// Evaluate another query against the entities alive at tick start.
    #[must_use]
    pub fn select(&self, query: &Query) -> Vec<Entity> {
        query.select(self.store, self.snapshot).collect()
    }

    /// The first entity matching `query`, if any.
    #[must_use]
    pub fn first(&self, query: &Query) -> Option<Entity> {
        query.select(self.store, self.snapshot).next()
    }

    /// Read access to the whole store.
    #[must_use]
    pub fn store(&self) -> &ComponentStore {
        self.store
    }

    /// Read-only handle to `entity`.
    pub fn entity(&self, entity: Entity) -> Result<EntityRef<'_>, EcsError> {
        self.store.entity(entity)
    }

    /// Mutable handle to `entity`.
    pub fn entity_mut(&mut self, entity: Entity) -> Result<EntityMut<'_>, EcsError> {
        self.store.entity_mut(entity)
    }

    /// Shortcut for `entity(e)?.get::<T>()`.
    pub fn get<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.store.get::<T>(entity)
    }

    /// Shortcut for `entity_mut(e)?.get_mut::<T>()`.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.store.get_mut::<T>(entity)
    }

    /// Queue the creation of a new entity. It becomes visible next tick.
    pub fn spawn(&mut self, builder: EntityBuilder) {
        self.commands.spawn(builder);
    }

    /// Queue the removal of `entity`. It stays visible until the tick ends.
    pub fn despawn(&mut self, entity: Entity) {
        self.commands.despawn(entity);
    }

    /// Number of structural changes queued so far this tick.
    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }
}
