//! The component store.
//!
//! Components live in one typed column per kind, keyed by [`Entity`]. Each live
//! entity also carries the set of kinds it currently holds, which is what
//! query matching reads. Live entities are kept in creation order so every
//! iteration over the store is deterministic.

use std::any::Any;
use std::collections::{BTreeSet, HashMap};

use tracing::trace;

use crate::component::{Component, ComponentTypeId};
use crate::entity::{Entity, EntityAllocator};
use crate::error::EcsError;
use crate::handle::{EntityMut, EntityRef};

/// Type-erased view of a [`Column`], so the store can drop an entity's
/// components without knowing their types.
trait ErasedColumn {
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// All instances of one component kind.
struct Column<T> {
    values: HashMap<Entity, Vec<T>>,
}

impl<T> Default for Column<T> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
        }
    }
}

impl<T: Component> ErasedColumn for Column<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.values.remove(&entity).is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Owns every live entity and all of their components.
#[derive(Default)]
pub struct ComponentStore {
    allocator: EntityAllocator,
    /// Live entities in creation order.
    order: Vec<Entity>,
    /// Component kinds held by each live entity.
    kinds: HashMap<Entity, BTreeSet<ComponentTypeId>>,
    columns: HashMap<ComponentTypeId, Box<dyn ErasedColumn>>,
}

impl ComponentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity with no components.
    pub fn spawn(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        self.order.push(entity);
        self.kinds.insert(entity, BTreeSet::new());
        trace!(%entity, "entity allocated");
        entity
    }

    /// Returns `true` if the entity has been spawned and not yet removed.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity) && self.kinds.contains_key(&entity)
    }

    /// Fails with [`EcsError::StaleEntity`] unless the entity is alive.
    pub fn ensure_alive(&self, entity: Entity) -> Result<(), EcsError> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::StaleEntity(entity))
        }
    }

    /// Live entities, in creation order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.order
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no entity is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Attach a component to an entity.
    ///
    /// Replaces the existing instance for single-valued kinds and appends for
    /// kinds declared with [`Component::MULTIPLE`].
    pub fn add<T: Component>(&mut self, entity: Entity, component: T) -> Result<(), EcsError> {
        self.ensure_alive(entity)?;
        let kind = T::component_type_id();
        let column = self
            .columns
            .entry(kind)
            .or_insert_with(|| Box::new(Column::<T>::default()))
            .as_any_mut()
            .downcast_mut::<Column<T>>()
            .ok_or(EcsError::KindCollision(T::type_name()))?;

        let slot = column.values.entry(entity).or_default();
        if !T::MULTIPLE {
            slot.clear();
        }
        slot.push(component);

        if let Some(kinds) = self.kinds.get_mut(&entity) {
            kinds.insert(kind);
        }
        Ok(())
    }

    /// The instance of `T` held by `entity`.
    ///
    /// For multi-valued kinds this is the first instance added.
    pub fn get<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.find(entity)?.ok_or_else(|| missing::<T>(entity))
    }

    /// Mutable access to the instance of `T` held by `entity`.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.find_mut(entity)?.ok_or_else(|| missing::<T>(entity))
    }

    /// The instance of `T` held by `entity`, or `None` when it has none.
    pub fn find<T: Component>(&self, entity: Entity) -> Result<Option<&T>, EcsError> {
        self.ensure_alive(entity)?;
        Ok(self.slice::<T>(entity).first())
    }

    /// Mutable variant of [`ComponentStore::find`].
    pub fn find_mut<T: Component>(&mut self, entity: Entity) -> Result<Option<&mut T>, EcsError> {
        self.ensure_alive(entity)?;
        Ok(self.slice_mut::<T>(entity).first_mut())
    }

    /// Every instance of `T` held by `entity`; empty when it has none.
    pub fn find_all<T: Component>(&self, entity: Entity) -> Result<&[T], EcsError> {
        self.ensure_alive(entity)?;
        Ok(self.slice::<T>(entity))
    }

    /// Mutable variant of [`ComponentStore::find_all`].
    pub fn find_all_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut [T], EcsError> {
        self.ensure_alive(entity)?;
        Ok(self.slice_mut::<T>(entity))
    }

    /// Detach every instance of `T` from `entity`.
    ///
    /// Returns `false` if the entity held none.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<bool, EcsError> {
        self.ensure_alive(entity)?;
        let kind = T::component_type_id();
        let removed = self
            .columns
            .get_mut(&kind)
            .is_some_and(|column| column.remove_entity(entity));
        if let Some(kinds) = self.kinds.get_mut(&entity) {
            kinds.remove(&kind);
        }
        Ok(removed)
    }

    /// Delete an entity and all of its components.
    ///
    /// Removing an entity that is already gone is a no-op and returns `false`.
    pub fn remove(&mut self, entity: Entity) -> bool {
        if !self.detach(entity) {
            return false;
        }
        self.order.retain(|&e| e != entity);
        true
    }

    /// Delete several entities, compacting the creation-order list once.
    ///
    /// Entities already gone, or listed twice, are skipped. Returns how many
    /// were actually removed.
    pub fn remove_all(&mut self, entities: &[Entity]) -> usize {
        let removed: BTreeSet<Entity> = entities
            .iter()
            .copied()
            .filter(|&entity| self.detach(entity))
            .collect();
        if !removed.is_empty() {
            self.order.retain(|e| !removed.contains(e));
        }
        removed.len()
    }

    /// Drop an entity's components and free its slot, leaving `order` alone.
    fn detach(&mut self, entity: Entity) -> bool {
        let Some(kinds) = self.kinds.remove(&entity) else {
            return false;
        };
        for kind in &kinds {
            if let Some(column) = self.columns.get_mut(kind) {
                column.remove_entity(entity);
            }
        }
        self.allocator.deallocate(entity);
        trace!(%entity, components = kinds.len(), "entity removed");
        true
    }

    /// Delete every entity.
    pub fn clear(&mut self) {
        let entities = std::mem::take(&mut self.order);
        for entity in entities {
            self.kinds.remove(&entity);
            self.allocator.deallocate(entity);
        }
        self.columns.clear();
    }

    /// Returns `true` if the entity currently holds a component of `kind`.
    #[must_use]
    pub fn has(&self, entity: Entity, kind: ComponentTypeId) -> bool {
        self.kinds
            .get(&entity)
            .is_some_and(|kinds| kinds.contains(&kind))
    }

    /// Returns `true` if the entity currently holds every kind in `kinds`.
    ///
    /// Dead entities hold nothing, so this is `false` for them.
    #[must_use]
    pub fn has_all(&self, entity: Entity, kinds: &BTreeSet<ComponentTypeId>) -> bool {
        self.kinds
            .get(&entity)
            .is_some_and(|held| kinds.is_subset(held))
    }

    /// Returns `true` if the entity holds at least one kind in `kinds`.
    #[must_use]
    pub fn has_any(&self, entity: Entity, kinds: &BTreeSet<ComponentTypeId>) -> bool {
        self.kinds
            .get(&entity)
            .is_some_and(|held| !held.is_disjoint(kinds))
    }

    /// Read-only handle scoped to one live entity.
    pub fn entity(&self, entity: Entity) -> Result<EntityRef<'_>, EcsError> {
        self.ensure_alive(entity)?;
        Ok(EntityRef::new(entity, self))
    }

    /// Mutable handle scoped to one live entity.
    pub fn entity_mut(&mut self, entity: Entity) -> Result<EntityMut<'_>, EcsError> {
        self.ensure_alive(entity)?;
        Ok(EntityMut::new(entity, self))
    }

    fn column<T: Component>(&self) -> Option<&Column<T>> {
        self.columns
            .get(&T::component_type_id())?
            .as_any()
            .downcast_ref::<Column<T>>()
    }

    fn column_mut<T: Component>(&mut self) -> Option<&mut Column<T>> {
        self.columns
            .get_mut(&T::component_type_id())?
            .as_any_mut()
            .downcast_mut::<Column<T>>()
    }

    /// Instances of `T` for `entity`, without a liveness check.
    pub(crate) fn slice<T: Component>(&self, entity: Entity) -> &[T] {
        self.column::<T>()
            .and_then(|column| column.values.get(&entity))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Mutable instances of `T` for `entity`, without a liveness check.
    pub(crate) fn slice_mut<T: Component>(&mut self, entity: Entity) -> &mut [T] {
        match self
            .column_mut::<T>()
            .and_then(|column| column.values.get_mut(&entity))
        {
            Some(values) => values.as_mut_slice(),
            None => &mut [],
        }
    }
}

impl std::fmt::Debug for ComponentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentStore")
            .field("entities", &self.order.len())
            .field("kinds", &self.columns.len())
            .finish()
    }
}

fn missing<T: Component>(entity: Entity) -> EcsError {
    EcsError::MissingComponent {
        entity,
        kind: T::type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Position {
        z: f32,
    }

    impl Component for Position {
        fn type_name() -> &'static str {
            "Position"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Bullet {
        fired: bool,
    }

    impl Component for Bullet {
        fn type_name() -> &'static str {
            "Bullet"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Mesh(&'static str);

    impl Component for Mesh {
        const MULTIPLE: bool = true;

        fn type_name() -> &'static str {
            "Mesh"
        }
    }

    struct FakePosition;

    impl Component for FakePosition {
        fn type_name() -> &'static str {
            "Position"
        }
    }

    fn kinds(ids: &[ComponentTypeId]) -> BTreeSet<ComponentTypeId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_get_returns_last_added_instance() {
        let mut store = ComponentStore::new();
        let e = store.spawn();
        store.add(e, Position { z: 1.0 }).unwrap();
        assert_eq!(store.get::<Position>(e).unwrap(), &Position { z: 1.0 });

        store.add(e, Position { z: 2.0 }).unwrap();
        assert_eq!(store.get::<Position>(e).unwrap(), &Position { z: 2.0 });
        assert_eq!(store.find_all::<Position>(e).unwrap().len(), 1);
    }

    #[test]
    fn test_get_missing_component() {
        let mut store = ComponentStore::new();
        let e = store.spawn();
        let err = store.get::<Bullet>(e).unwrap_err();
        assert_eq!(
            err,
            EcsError::MissingComponent {
                entity: e,
                kind: "Bullet"
            }
        );
        assert_eq!(store.find::<Bullet>(e).unwrap(), None);
    }

    #[test]
    fn test_get_mut_changes_are_visible() {
        let mut store = ComponentStore::new();
        let e = store.spawn();
        store.add(e, Bullet { fired: false }).unwrap();
        store.get_mut::<Bullet>(e).unwrap().fired = true;
        assert!(store.get::<Bullet>(e).unwrap().fired);
    }

    #[test]
    fn test_multi_valued_kind_accumulates() {
        let mut store = ComponentStore::new();
        let e = store.spawn();
        store.add(e, Mesh("hull")).unwrap();
        store.add(e, Mesh("wing")).unwrap();
        assert_eq!(
            store.find_all::<Mesh>(e).unwrap(),
            &[Mesh("hull"), Mesh("wing")]
        );
        assert_eq!(store.get::<Mesh>(e).unwrap(), &Mesh("hull"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = ComponentStore::new();
        let e = store.spawn();
        store.add(e, Position { z: 0.0 }).unwrap();
        assert!(store.remove(e));
        assert!(!store.remove(e));
        assert!(store.is_empty());
    }

    #[test]
    fn test_removed_entity_is_stale() {
        let mut store = ComponentStore::new();
        let e = store.spawn();
        store.add(e, Position { z: 0.0 }).unwrap();
        store.remove(e);

        assert_eq!(
            store.get::<Position>(e).unwrap_err(),
            EcsError::StaleEntity(e)
        );
        assert_eq!(
            store.add(e, Bullet { fired: true }).unwrap_err(),
            EcsError::StaleEntity(e)
        );
        assert!(!store.has_all(e, &kinds(&[])));
    }

    #[test]
    fn test_recycled_slot_does_not_leak_components() {
        let mut store = ComponentStore::new();
        let old = store.spawn();
        store.add(old, Position { z: 5.0 }).unwrap();
        store.remove(old);

        let new = store.spawn();
        assert_eq!(new.index(), old.index());
        assert_eq!(store.find::<Position>(new).unwrap(), None);
        assert!(store.entity(old).is_err());
    }

    #[test]
    fn test_has_all() {
        let mut store = ComponentStore::new();
        let e = store.spawn();
        store.add(e, Position { z: 0.0 }).unwrap();

        let position = Position::component_type_id();
        let bullet = Bullet::component_type_id();
        assert!(store.has_all(e, &kinds(&[position])));
        assert!(!store.has_all(e, &kinds(&[position, bullet])));

        store.add(e, Bullet { fired: false }).unwrap();
        assert!(store.has_all(e, &kinds(&[position, bullet])));

        store.remove_component::<Bullet>(e).unwrap();
        assert!(!store.has(e, bullet));
    }

    #[test]
    fn test_entities_keep_creation_order() {
        let mut store = ComponentStore::new();
        let a = store.spawn();
        let b = store.spawn();
        let c = store.spawn();
        store.remove(b);
        let d = store.spawn();
        assert_eq!(store.entities(), &[a, c, d]);
    }

    #[test]
    fn test_remove_all_skips_stale_and_repeated() {
        let mut store = ComponentStore::new();
        let entities: Vec<Entity> = (0..5).map(|_| store.spawn()).collect();
        store.add(entities[1], Position { z: 1.0 }).unwrap();
        store.remove(entities[4]);

        let removed = store.remove_all(&[entities[1], entities[3], entities[1], entities[4]]);
        assert_eq!(removed, 2);
        assert_eq!(store.entities(), &[entities[0], entities[2]]);
        assert_eq!(
            store.get::<Position>(entities[1]).unwrap_err(),
            EcsError::StaleEntity(entities[1])
        );
        assert_eq!(store.remove_all(&[]), 0);
    }

    #[test]
    fn test_kind_collision_is_rejected() {
        let mut store = ComponentStore::new();
        let e = store.spawn();
        store.add(e, Position { z: 0.0 }).unwrap();
        assert_eq!(
            store.add(e, FakePosition).unwrap_err(),
            EcsError::KindCollision("Position")
        );
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut store = ComponentStore::new();
        let a = store.spawn();
        store.add(a, Position { z: 0.0 }).unwrap();
        store.spawn();
        store.clear();
        assert!(store.is_empty());
        assert!(!store.is_alive(a));
    }
}
