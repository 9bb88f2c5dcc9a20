//! Deferred structural changes.
//!
//! Systems never create or remove entities while a query result is being
//! consumed. They queue a [`Command`] instead; the engine drains the queue as a
//! single batch once every system has run.

use tracing::trace;

use engine_component::{ComponentStore, EcsError, Entity, EntityBuilder};

/// A structural change requested during a tick.
#[derive(Debug)]
pub enum Command {
    /// Create an entity from the recorded components.
    Spawn(EntityBuilder),
    /// Remove an entity and all of its components.
    Despawn(Entity),
}

/// What a [`Commands::apply`] batch changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Entities created.
    pub spawned: usize,
    /// Entities actually removed (repeated or stale removals are not counted).
    pub removed: usize,
}

/// FIFO queue of structural changes.
#[derive(Debug, Default)]
pub struct Commands {
    queue: Vec<Command>,
}

impl Commands {
    /// An empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the creation of an entity.
    pub fn spawn(&mut self, builder: EntityBuilder) {
        self.queue.push(Command::Spawn(builder));
    }

    /// Queue the removal of an entity.
    pub fn despawn(&mut self, entity: Entity) {
        self.queue.push(Command::Despawn(entity));
    }

    /// Number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every queued command without applying it.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Apply every queued command to `store`, in queue order.
    ///
    /// The queue is empty afterwards, even when a spawn fails; the failing
    /// command's error is returned and the rest of the batch is discarded.
    /// Consecutive removals are committed together.
    pub fn apply(&mut self, store: &mut ComponentStore) -> Result<CommitSummary, EcsError> {
        let mut summary = CommitSummary::default();
        let mut doomed = Vec::new();
        for command in self.queue.drain(..) {
            match command {
                Command::Spawn(builder) => {
                    summary.removed += remove_batch(store, &mut doomed);
                    let entity = builder.build(store)?;
                    trace!(%entity, "deferred spawn committed");
                    summary.spawned += 1;
                }
                Command::Despawn(entity) => doomed.push(entity),
            }
        }
        summary.removed += remove_batch(store, &mut doomed);
        Ok(summary)
    }
}

fn remove_batch(store: &mut ComponentStore, doomed: &mut Vec<Entity>) -> usize {
    if doomed.is_empty() {
        return 0;
    }
    let removed = store.remove_all(doomed.as_slice());
    trace!(requested = doomed.len(), removed, "deferred removals committed");
    doomed.clear();
    removed
}

#[cfg(test)]
mod tests {
    use engine_component::Component;

    use super::*;

    struct Bullet;

    impl Component for Bullet {
        fn type_name() -> &'static str {
            "Bullet"
        }
    }

    struct NotBullet;

    impl Component for NotBullet {
        fn type_name() -> &'static str {
            "Bullet"
        }
    }

    #[test]
    fn test_apply_in_queue_order() {
        let mut store = ComponentStore::new();
        let doomed = store.spawn();

        let mut commands = Commands::new();
        commands.despawn(doomed);
        commands.spawn(EntityBuilder::new().with(Bullet));
        assert_eq!(commands.len(), 2);

        let summary = commands.apply(&mut store).unwrap();
        assert_eq!(
            summary,
            CommitSummary {
                spawned: 1,
                removed: 1
            }
        );
        assert!(commands.is_empty());
        assert!(!store.is_alive(doomed));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_repeated_despawn_counts_once() {
        let mut store = ComponentStore::new();
        let e = store.spawn();
        let mut commands = Commands::new();
        commands.despawn(e);
        commands.despawn(e);
        let summary = commands.apply(&mut store).unwrap();
        assert_eq!(summary.removed, 1);
    }

    #[test]
    fn test_failed_spawn_empties_queue() {
        let mut store = ComponentStore::new();
        let e = store.spawn();
        store.add(e, Bullet).unwrap();

        let mut commands = Commands::new();
        commands.spawn(EntityBuilder::new().with(NotBullet));
        commands.despawn(e);

        assert_eq!(
            commands.apply(&mut store).unwrap_err(),
            EcsError::KindCollision("Bullet")
        );
        assert!(commands.is_empty());
        assert!(store.is_alive(e));
    }

    #[test]
    fn test_removals_before_a_spawn_free_their_slots_first() {
        let mut store = ComponentStore::new();
        let first = store.spawn();
        let second = store.spawn();

        let mut commands = Commands::new();
        commands.despawn(first);
        commands.despawn(second);
        commands.spawn(EntityBuilder::new().with(Bullet));
        commands.despawn(first);

        let summary = commands.apply(&mut store).unwrap();
        assert_eq!(summary.removed, 2);
        assert_eq!(summary.spawned, 1);
        assert_eq!(store.len(), 1);

        // The new entity reuses a freed slot under a newer generation.
        let spawned = store.entities()[0];
        assert!(spawned.index() == first.index() || spawned.index() == second.index());
        assert!(!store.is_alive(first));
        assert!(!store.is_alive(second));
    }
}
