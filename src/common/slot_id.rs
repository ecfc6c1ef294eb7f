//! Slot identifier type.

use std::fmt;

/// Stable handle to an object record stored in the cache's slot arena.
///
/// Eviction-queue links are stored as `SlotId`s instead of pointers, so a
/// record can be unlinked or moved knowing nothing but its own handle.
/// Slots are recycled after a record is freed; a stale `SlotId` must not be
/// used once its record has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    /// Position of the slot inside the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}
