//! System registry: the ordered list of systems an engine runs.
//!
//! Registration order is execution order. Names are unique: registering a
//! second system under a name already in use is rejected.

use engine_component::EcsError;
use engine_system::System;

/// Ordered collection of registered systems.
#[derive(Default)]
pub struct SystemRegistry {
    systems: Vec<Box<dyn System>>,
}

impl SystemRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a system.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::DuplicateRegistration`] if a system with the same
    /// name is already registered.
    pub fn register(&mut self, system: Box<dyn System>) -> Result<(), EcsError> {
        if self.contains(system.name()) {
            return Err(EcsError::DuplicateRegistration(system.name().to_string()));
        }
        self.systems.push(system);
        Ok(())
    }

    /// Returns `true` if a system with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.systems.iter().any(|s| s.name() == name)
    }

    /// System names, in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|s| s.name())
    }

    /// Systems, in execution order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn System>> {
        self.systems.iter_mut()
    }

    /// Number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if no system is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Call every system's teardown hook, in order, and drop them all.
    ///
    /// Returns how many systems were torn down.
    pub fn teardown(&mut self) -> usize {
        let count = self.systems.len();
        for mut system in self.systems.drain(..) {
            system.teardown();
        }
        count
    }
}

impl std::fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
