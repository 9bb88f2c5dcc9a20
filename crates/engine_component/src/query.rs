//! Queries: which entities a system cares about.
//!
//! A [`Query`] is a conjunction of required component kinds, optionally
//! narrowed by kinds the entity must *not* hold. Matching is evaluated against
//! the store every time, so a query never reports a stale membership.

use std::collections::BTreeSet;

use crate::component::{Component, ComponentTypeId};
use crate::entity::Entity;
use crate::store::ComponentStore;

/// An immutable description of the component kinds a system selects on.
///
/// A query with no required kind matches nothing; it is what systems without
/// per-entity behavior use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    required: BTreeSet<ComponentTypeId>,
    excluded: BTreeSet<ComponentTypeId>,
}

impl Query {
    /// A query that matches no entity.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A query requiring a single component kind.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self::none().with::<T>()
    }

    /// Additionally require component kind `T`.
    #[must_use]
    pub fn with<T: Component>(mut self) -> Self {
        self.required.insert(T::component_type_id());
        self
    }

    /// Reject entities holding component kind `T`.
    #[must_use]
    pub fn without<T: Component>(mut self) -> Self {
        self.excluded.insert(T::component_type_id());
        self
    }

    /// The required component kinds.
    #[must_use]
    pub fn required(&self) -> &BTreeSet<ComponentTypeId> {
        &self.required
    }

    /// Returns `true` if the query can never match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    /// Returns `true` if `entity` currently satisfies the query.
    #[must_use]
    pub fn matches(&self, store: &ComponentStore, entity: Entity) -> bool {
        !self.is_empty()
            && store.has_all(entity, &self.required)
            && !store.has_any(entity, &self.excluded)
    }

    /// Lazily select the matching entities out of `entities`, preserving their
    /// order.
    pub fn select<'a>(
        &'a self,
        store: &'a ComponentStore,
        entities: &'a [Entity],
    ) -> impl Iterator<Item = Entity> + 'a {
        entities
            .iter()
            .copied()
            .filter(move |&entity| self.matches(store, entity))
    }
}
