// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata contributors

//! Per-kind entity storage: a generation-counted slot arena.
//!
//! Handles pack a slot index and a generation counter. Removing an entity
//! bumps its slot's generation, so a handle issued before the removal can
//! never resolve again, even after the slot is recycled for a new entity.

use crate::registry::Entity;
use crate::types::Payload;

/// Opaque per-kind identifier for a stored entity.
///
/// Unique within its store for the lifetime of the store: a handle is never
/// re-issued, and a stale handle (kept across a remove) fails lookup instead
/// of aliasing the slot's next occupant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Handle(u64);

impl Handle {
    fn new(index: u32, generation: u32) -> Self {
        Self((u64::from(generation) << 32) | u64::from(index))
    }

    fn index(self) -> usize {
        (self.0 & 0xFFFF_FFFF) as usize
    }

    fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Raw integer form, for callers that need to stash a handle compactly.
    #[must_use]
    pub fn as_bits(self) -> u64 {
        self.0
    }
}

struct Slot<T: Payload> {
    generation: u32,
    entry: Option<Entity<T>>,
}

/// Homogeneous collection of entities of one payload type.
pub struct EntityStore<T: Payload> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T: Payload> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }
}

impl<T: Payload> EntityStore<T> {
    /// Store an entity, returning its handle.
    pub fn insert(&mut self, entity: Entity<T>) -> Handle {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entity);
            Handle::new(index, slot.generation)
        } else {
            let index = u32::try_from(self.slots.len()).expect("entity store exceeds u32 slots");
            self.slots.push(Slot {
                generation: 0,
                entry: Some(entity),
            });
            Handle::new(index, 0)
        }
    }

    /// Look up a live entity. `None` for unknown, removed, or stale handles.
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&Entity<T>> {
        let slot = self.slots.get(handle.index())?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.entry.as_ref()
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut Entity<T>> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.entry.as_mut()
    }

    /// Remove and return an entity. The slot's generation is bumped, so the
    /// handle is dead from this point on.
    pub fn remove(&mut self, handle: Handle) -> Option<Entity<T>> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation() {
            return None;
        }
        let entity = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index() as u32);
        self.live -= 1;
        Some(entity)
    }

    /// Drop every entity in one pass, invalidating all outstanding handles.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index as u32);
        }
        self.live = 0;
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// True when no entities are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::EntityData;

    fn scalar(name: &str, value: i32) -> Entity<i32> {
        Entity::new(name.to_string(), EntityData::Scalar(value), None)
    }

    #[test]
    fn test_insert_get_round_trip() {
        let mut store = EntityStore::default();
        let handle = store.insert(scalar("a", 7));
        assert_eq!(store.len(), 1);
        let entity = store.get(handle).expect("entity must resolve");
        assert_eq!(entity.name(), "a");
        assert_eq!(entity.data(), &EntityData::Scalar(7));
    }

    #[test]
    fn test_stale_handle_after_remove() {
        let mut store = EntityStore::default();
        let handle = store.insert(scalar("a", 1));
        assert!(store.remove(handle).is_some());
        assert!(store.get(handle).is_none());
        assert!(store.remove(handle).is_none());

        // Slot recycling must not resurrect the stale handle.
        let replacement = store.insert(scalar("b", 2));
        assert_ne!(replacement, handle);
        assert!(store.get(handle).is_none());
        assert_eq!(store.get(replacement).map(Entity::name), Some("b"));
    }

    #[test]
    fn test_clear_invalidates_everything() {
        let mut store = EntityStore::default();
        let h1 = store.insert(scalar("a", 1));
        let h2 = store.insert(scalar("b", 2));
        store.clear();
        assert!(store.is_empty());
        assert!(store.get(h1).is_none());
        assert!(store.get(h2).is_none());

        let h3 = store.insert(scalar("c", 3));
        assert_ne!(h3, h1);
        assert_eq!(store.len(), 1);
    }
}
