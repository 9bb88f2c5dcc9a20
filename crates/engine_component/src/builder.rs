//! Deferred entity construction.
//!
//! An [`EntityBuilder`] records a sequence of `add` calls. It is applied to the
//! store either immediately (setup code) or once the current tick finished
//! (creation requested from inside a system).

use std::fmt;

use crate::component::Component;
use crate::entity::Entity;
use crate::error::EcsError;
use crate::store::ComponentStore;

type Insert = Box<dyn FnOnce(&mut ComponentStore, Entity) -> Result<(), EcsError>>;

/// A recorded list of components to attach to a new entity.
#[derive(Default)]
pub struct EntityBuilder {
    inserts: Vec<Insert>,
    kinds: Vec<&'static str>,
}

impl EntityBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a component, builder style.
    #[must_use]
    pub fn with<T: Component>(mut self, component: T) -> Self {
        self.add(component);
        self
    }

    /// Record a component.
    pub fn add<T: Component>(&mut self, component: T) -> &mut Self {
        self.kinds.push(T::type_name());
        self.inserts.push(Box::new(move |store, entity| store.add(entity, component)));
        self
    }

    /// Number of recorded components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inserts.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty()
    }

    /// Spawn a new entity in `store` and attach every recorded component.
    ///
    /// If any insertion fails the half-built entity is removed again.
    pub fn build(self, store: &mut ComponentStore) -> Result<Entity, EcsError> {
        let entity = store.spawn();
        for insert in self.inserts {
            if let Err(err) = insert(store, entity) {
                store.remove(entity);
                return Err(err);
            }
        }
        Ok(entity)
    }
}

impl fmt::Debug for EntityBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityBuilder")
            .field("components", &self.kinds)
            .finish()
    }
}
