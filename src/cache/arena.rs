//! Record arena - owner of every resident object record.
//!
//! Vacant slots are chained into a free list stored in the slots
//! themselves, so a freed [`SlotId`] is handed out again before the
//! arena grows. Its length never exceeds the peak number of residents.

use std::ops::Index;

use crate::common::SlotId;

#[derive(Debug)]
enum Slot<T> {
    Occupied(T),
    /// Link to the next vacant slot.
    Vacant(Option<usize>),
}

/// Slot storage addressed by stable [`SlotId`]s.
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    /// Most recently freed slot.
    free_head: Option<usize>,
    occupied: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            occupied: 0,
        }
    }

    /// Store `value`, reusing the most recently freed slot if any.
    pub fn insert(&mut self, value: T) -> SlotId {
        self.occupied += 1;
        match self.free_head {
            Some(idx) => {
                if let Slot::Vacant(next) = self.slots[idx] {
                    self.free_head = next;
                }
                self.slots[idx] = Slot::Occupied(value);
                SlotId(idx)
            }
            None => {
                self.slots.push(Slot::Occupied(value));
                SlotId(self.slots.len() - 1)
            }
        }
    }

    /// Free the slot and return its value, or `None` if already vacant.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.0)?;
        if let Slot::Vacant(_) = slot {
            return None;
        }

        let value = match std::mem::replace(slot, Slot::Vacant(self.free_head)) {
            Slot::Occupied(value) => value,
            Slot::Vacant(_) => unreachable!("slot checked occupied above"),
        };
        self.free_head = Some(id.0);
        self.occupied -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        match self.slots.get(id.0)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        match self.slots.get_mut(id.0)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.occupied
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<SlotId> for SlotArena<T> {
    type Output = T;

    /// # Panics
    /// Panics if the slot is vacant.
    fn index(&self, id: SlotId) -> &T {
        match self.get(id) {
            Some(value) => value,
            None => panic!("{} is vacant", id),
        }
    }
}
