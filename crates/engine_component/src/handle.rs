//! Entity handles: typed views over the store scoped to one entity.
//!
//! A handle borrows the [`ComponentStore`], so it cannot outlive the tick (or
//! the setup call) that produced it. Keeping a plain [`Entity`] around is fine;
//! resolving it again after its removal committed yields
//! [`EcsError::StaleEntity`].

use crate::component::{Component, ComponentTypeId};
use crate::entity::Entity;
use crate::error::EcsError;
use crate::store::ComponentStore;

/// Read-only handle to a live entity.
#[derive(Debug, Clone, Copy)]
pub struct EntityRef<'s> {
    entity: Entity,
    store: &'s ComponentStore,
}

impl<'s> EntityRef<'s> {
    pub(crate) fn new(entity: Entity, store: &'s ComponentStore) -> Self {
        Self { entity, store }
    }

    /// The entity this handle refers to.
    #[must_use]
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// The component of kind `T`, failing with `MissingComponent` when absent.
    pub fn get<T: Component>(&self) -> Result<&'s T, EcsError> {
        self.find::<T>().ok_or(EcsError::MissingComponent {
            entity: self.entity,
            kind: T::type_name(),
        })
    }

    /// The component of kind `T`, if present.
    #[must_use]
    pub fn find<T: Component>(&self) -> Option<&'s T> {
        self.store.slice::<T>(self.entity).first()
    }

    /// Every instance of kind `T`.
    #[must_use]
    pub fn find_all<T: Component>(&self) -> &'s [T] {
        self.store.slice::<T>(self.entity)
    }

    /// Returns `true` if the entity holds a component of kind `T`.
    #[must_use]
    pub fn has<T: Component>(&self) -> bool {
        self.store.has(self.entity, ComponentTypeId::of::<T>())
    }
}

/// Mutable handle to a live entity.
#[derive(Debug)]
pub struct EntityMut<'s> {
    entity: Entity,
    store: &'s mut ComponentStore,
}

impl<'s> EntityMut<'s> {
    pub(crate) fn new(entity: Entity, store: &'s mut ComponentStore) -> Self {
        Self { entity, store }
    }

    /// The entity this handle refers to.
    #[must_use]
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Attach a component, replacing an existing single-valued instance.
    pub fn add<T: Component>(&mut self, component: T) -> Result<&mut Self, EcsError> {
        self.store.add(self.entity, component)?;
        Ok(self)
    }

    /// The component of kind `T`, failing with `MissingComponent` when absent.
    pub fn get<T: Component>(&self) -> Result<&T, EcsError> {
        self.find::<T>().ok_or(EcsError::MissingComponent {
            entity: self.entity,
            kind: T::type_name(),
        })
    }

    /// Mutable access to the component of kind `T`.
    pub fn get_mut<T: Component>(&mut self) -> Result<&mut T, EcsError> {
        let entity = self.entity;
        self.find_mut::<T>().ok_or(EcsError::MissingComponent {
            entity,
            kind: T::type_name(),
        })
    }

    /// The component of kind `T`, if present.
    #[must_use]
    pub fn find<T: Component>(&self) -> Option<&T> {
        self.store.slice::<T>(self.entity).first()
    }

    /// Mutable access to the component of kind `T`, if present.
    pub fn find_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.store.slice_mut::<T>(self.entity).first_mut()
    }

    /// Every instance of kind `T`.
    #[must_use]
    pub fn find_all<T: Component>(&self) -> &[T] {
        self.store.slice::<T>(self.entity)
    }

    /// Mutable access to every instance of kind `T`.
    pub fn find_all_mut<T: Component>(&mut self) -> &mut [T] {
        self.store.slice_mut::<T>(self.entity)
    }

    /// Detach every instance of kind `T`. Returns `false` if there was none.
    pub fn remove<T: Component>(&mut self) -> bool {
        self.store
            .remove_component::<T>(self.entity)
            .unwrap_or(false)
    }

    /// Returns `true` if the entity holds a component of kind `T`.
    #[must_use]
    pub fn has<T: Component>(&self) -> bool {
        self.store.has(self.entity, ComponentTypeId::of::<T>())
    }
}
