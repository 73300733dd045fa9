//! Id-indexed object arena with free-id recycling.
//!
//! `SlotStorage` is the single ownership primitive behind entities, system
//! records, and ECS instances. Objects are addressed by a plain `SlotId`
//! rather than a reference, so ids can be held across frames and handed to
//! code that cannot borrow the storage.
//!
//! Freed ids go into an ordered set and the lowest one is reused first,
//! keeping [`SlotStorage::capacity`] minimal under churn.

// Slot ids are u32 by contract; the backing Vec never exceeds u32::MAX slots.
#![allow(clippy::cast_possible_truncation)]

use std::collections::BTreeSet;
use std::fmt;

use cadence_foundation::{Error, Result, SlotId};

/// Cleanup hook run on every value leaving the storage.
///
/// Receives the id the value occupied and the value itself. When no
/// deallocator is installed the value is simply dropped.
pub type Deallocator<T> = Box<dyn FnMut(SlotId, T)>;

/// Id-indexed arena with lowest-id recycling.
pub struct SlotStorage<T> {
    /// Backing slots; `None` marks a freed id.
    slots: Vec<Option<T>>,
    /// Freed ids, ascending.
    free_ids: BTreeSet<SlotId>,
    /// Optional cleanup hook.
    deallocator: Option<Deallocator<T>>,
    /// Number of live objects.
    count: usize,
    /// Highest issued id + 1, excluding trailing freed ids.
    capacity: SlotId,
}

impl<T> Default for SlotStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SlotStorage<T> {
    /// Creates an empty storage that drops freed values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_ids: BTreeSet::new(),
            deallocator: None,
            count: 0,
            capacity: 0,
        }
    }

    /// Creates an empty storage with room for `additional` slots.
    #[must_use]
    pub fn with_reserved(additional: usize) -> Self {
        let mut storage = Self::new();
        storage.slots.reserve(additional);
        storage
    }

    /// Installs a deallocator, replacing any previous one.
    #[must_use]
    pub fn with_deallocator(mut self, deallocator: impl FnMut(SlotId, T) + 'static) -> Self {
        self.deallocator = Some(Box::new(deallocator));
        self
    }

    /// Returns the id the next [`create`](Self::create) will issue.
    #[must_use]
    pub fn next_id(&self) -> SlotId {
        self.free_ids
            .first()
            .copied()
            .unwrap_or(self.slots.len() as SlotId)
    }

    /// Stores `value`, reusing the lowest freed id if there is one.
    pub fn create(&mut self, value: T) -> SlotId {
        self.create_with(|_| value)
    }

    /// Stores the value built by `init`, which receives the id it will occupy.
    pub fn create_with(&mut self, init: impl FnOnce(SlotId) -> T) -> SlotId {
        self.count += 1;

        if let Some(id) = self.free_ids.pop_first() {
            self.slots[id as usize] = Some(init(id));
            self.capacity = self.capacity.max(id + 1);
            id
        } else {
            let id = self.slots.len() as SlotId;
            self.slots.push(Some(init(id)));
            self.capacity = id + 1;
            id
        }
    }

    /// Returns the value at `id`, or `None` if the id is free or was never issued.
    #[must_use]
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id as usize)?.as_ref()
    }

    /// Returns the value at `id` mutably.
    #[must_use]
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id as usize)?.as_mut()
    }

    /// Checks whether `id` currently holds a value.
    #[must_use]
    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Destroys the value at `id` and makes the id reusable.
    ///
    /// The deallocator, if any, runs before the id is recycled.
    ///
    /// # Errors
    ///
    /// Returns `SlotVacant` if the id is already free or was never issued.
    pub fn free(&mut self, id: SlotId) -> Result<()> {
        let value = self
            .slots
            .get_mut(id as usize)
            .and_then(Option::take)
            .ok_or_else(|| Error::slot_vacant(id))?;

        match self.deallocator.as_mut() {
            Some(deallocate) => deallocate(id, value),
            None => drop(value),
        }

        self.count -= 1;
        self.free_ids.insert(id);
        while self.capacity > 0 && self.slots[self.capacity as usize - 1].is_none() {
            self.capacity -= 1;
        }

        Ok(())
    }

    /// Returns the number of live objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if no objects are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the iteration bound: highest live id + 1.
    #[must_use]
    pub fn capacity(&self) -> SlotId {
        self.capacity
    }

    /// Iterates over live `(id, value)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> + '_ {
        self.slots[..self.capacity as usize]
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|value| (id as SlotId, value)))
    }

    /// Iterates mutably over live `(id, value)` pairs in ascending id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> + '_ {
        self.slots[..self.capacity as usize]
            .iter_mut()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_mut().map(|value| (id as SlotId, value)))
    }

    /// Iterates over live ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.iter().map(|(id, _)| id)
    }
}

impl<T> Drop for SlotStorage<T> {
    fn drop(&mut self) {
        if let Some(deallocate) = self.deallocator.as_mut() {
            for (id, slot) in self.slots.iter_mut().enumerate() {
                if let Some(value) = slot.take() {
                    deallocate(id as SlotId, value);
                }
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SlotStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotStorage")
            .field("len", &self.count)
            .field("capacity", &self.capacity)
            .field("free_ids", &self.free_ids)
            .field("has_deallocator", &self.deallocator.is_some())
            .field("slots", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}
