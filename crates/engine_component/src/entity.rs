//! Entity type and allocation utilities.
//!
//! An [`Entity`] is a lightweight generational index with no inherent data.
//! Slots are recycled after removal, and every recycle bumps the slot's
//! generation so an old `Entity` value never aliases the slot's new occupant.

use std::fmt;

/// A unique entity identifier.
///
/// Entities are pure identifiers; they carry no data of their own. Components
/// are attached to entities through the
/// [`ComponentStore`](crate::store::ComponentStore) to give them meaning.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Build an entity from its raw parts.
    ///
    /// Mostly useful in tests; real entities come from [`EntityAllocator`].
    #[must_use]
    pub const fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the slot index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation of the slot at allocation time.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Allocates entity identifiers and recycles freed slots.
///
/// ```text
/// generations: [0, 1, 0, 2]   one generation per slot ever handed out
/// free_list:   [1, 3]         slots waiting for reuse
/// ```
#[derive(Debug, Default)]
pub struct EntityAllocator {
    generations: Vec<u32>,
    free_list: Vec<u32>,
}

impl EntityAllocator {
    /// Creates a new, empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an entity, reusing a freed slot when one is available.
    ///
    /// # Panics
    ///
    /// Panics once every `u32` index is in use.
    pub fn allocate(&mut self) -> Entity {
        if let Some(index) = self.free_list.pop() {
            // Generation was already bumped on deallocation.
            let generation = self.generations[index as usize];
            return Entity { index, generation };
        }
        let index = next_index(self.generations.len());
        self.generations.push(0);
        Entity {
            index,
            generation: 0,
        }
    }

    /// Frees an entity's slot.
    ///
    /// Returns `false` if the entity was already stale.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let slot = &mut self.generations[entity.index as usize];
        *slot = slot.wrapping_add(1);
        self.free_list.push(entity.index);
        true
    }

    /// Returns `true` if the entity's generation still matches its slot.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.generations
            .get(entity.index as usize)
            .is_some_and(|&generation| generation == entity.generation)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.generations.len() - self.free_list.len()
    }
}

/// Index for the slot after `slots` existing ones.
fn next_index(slots: usize) -> u32 {
    match u32::try_from(slots) {
        Ok(index) => index,
        Err(_) => panic!("entity index space exhausted after {slots} slots"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_produces_sequential_indices() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.allocate();
        let e1 = alloc.allocate();
        let e2 = alloc.allocate();
        assert_eq!(e0.index(), 0);
        assert_eq!(e1.index(), 1);
        assert_eq!(e2.index(), 2);
        assert_eq!(alloc.alive_count(), 3);
    }

    #[test]
    fn test_recycled_slot_gets_new_generation() {
        let mut alloc = EntityAllocator::new();
        let first = alloc.allocate();
        assert!(alloc.deallocate(first));
        let second = alloc.allocate();
        assert_eq!(second.index(), first.index());
        assert_eq!(second.generation(), first.generation() + 1);
        assert_ne!(first, second);
    }

    #[test]
    fn test_stale_entity_detected() {
        let mut alloc = EntityAllocator::new();
        let e = alloc.allocate();
        assert!(alloc.is_alive(e));
        alloc.deallocate(e);
        assert!(!alloc.is_alive(e));
        // Still stale after the slot is reused.
        let _reused = alloc.allocate();
        assert!(!alloc.is_alive(e));
    }

    #[test]
    fn test_double_deallocate_is_rejected() {
        let mut alloc = EntityAllocator::new();
        let e = alloc.allocate();
        assert!(alloc.deallocate(e));
        assert!(!alloc.deallocate(e));
        assert_eq!(alloc.alive_count(), 0);
    }

    #[test]
    fn test_entity_display() {
        let e = Entity::from_raw_parts(7, 2);
        assert_eq!(e.to_string(), "7v2");
        assert_eq!(format!("{e:?}"), "Entity(7v2)");
    }

    #[test]
    fn test_next_index_covers_full_range() {
        assert_eq!(next_index(0), 0);
        assert_eq!(next_index(u32::MAX as usize), u32::MAX);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    #[should_panic(expected = "entity index space exhausted")]
    fn test_exhausted_index_space_panics() {
        let _ = next_index(u32::MAX as usize + 1);
    }
}
