//! Eviction queue - a doubly linked order over object records.
//!
//! The queue owns no records. It only rewires the `prev`/`next` links of
//! records that live in the cache's [`SlotArena`], so every operation is
//! O(1) and allocation-free.
//!
//! ```text
//!   head ─► [new] ◄──► [ ... ] ◄──► [old] ◄── tail
//!            prev: None                next: None
//! ```

use crate::cache::arena::SlotArena;
use crate::cache::object::ObjectRecord;
use crate::common::SlotId;

/// Head/tail anchors of one intrusive list threaded through the arena.
///
/// Insertion happens only at the head; removal may target any record.
/// `head` and `tail` are `None` iff the queue is empty.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EvictionQueue {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl EvictionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn head(&self) -> Option<SlotId> {
        self.head
    }

    #[inline]
    pub fn tail(&self) -> Option<SlotId> {
        self.tail
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Link an unlinked record in at the head.
    ///
    /// # Panics
    /// Panics if `id` is not resident in `objects`.
    pub fn prepend(&mut self, objects: &mut SlotArena<ObjectRecord>, id: SlotId) {
        let old_head = self.head;
        {
            let record = resident(objects, id);
            debug_assert!(record.is_unlinked(), "{} is already linked", id);
            record.prev = None;
            record.next = old_head;
        }

        match old_head {
            Some(old_head) => resident(objects, old_head).prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.len += 1;
    }

    /// Unlink a record from wherever it sits, using only its own links.
    ///
    /// # Panics
    /// Panics if `id` is not resident in `objects`.
    pub fn remove(&mut self, objects: &mut SlotArena<ObjectRecord>, id: SlotId) {
        let (prev, next) = {
            let record = resident(objects, id);
            let links = (record.prev, record.next);
            record.prev = None;
            record.next = None;
            links
        };

        match prev {
            Some(prev_id) => resident(objects, prev_id).next = next,
            None => {
                debug_assert_eq!(self.head, Some(id), "{} is not in this queue", id);
                self.head = next;
            }
        }

        match next {
            Some(next_id) => resident(objects, next_id).prev = prev,
            None => {
                debug_assert_eq!(self.tail, Some(id), "{} is not in this queue", id);
                self.tail = prev;
            }
        }

        self.len -= 1;
    }

    /// Move a linked record to the head.
    pub fn move_to_head(&mut self, objects: &mut SlotArena<ObjectRecord>, id: SlotId) {
        if self.head == Some(id) {
            return;
        }
        self.remove(objects, id);
        self.prepend(objects, id);
    }

    /// Iterate from head to tail.
    pub fn iter<'a>(&self, objects: &'a SlotArena<ObjectRecord>) -> QueueIter<'a> {
        QueueIter {
            objects,
            current: self.head,
            forward: true,
        }
    }

    /// Iterate from tail to head.
    pub fn iter_rev<'a>(&self, objects: &'a SlotArena<ObjectRecord>) -> QueueIter<'a> {
        QueueIter {
            objects,
            current: self.tail,
            forward: false,
        }
    }

    /// Walk the queue both ways and check every link.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self, objects: &SlotArena<ObjectRecord>) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len, 0);
            return;
        }

        let mut seen = std::collections::HashSet::new();
        let mut prev = None;
        let mut current = self.head;
        while let Some(id) = current {
            assert!(seen.insert(id), "cycle at {}", id);
            assert!(seen.len() <= self.len, "queue longer than its length");
            let record = objects.get(id);
            assert!(record.is_some(), "{} is linked but not resident", id);
            let record = record.map(|r| (r.prev, r.next)).unwrap_or_default();
            assert_eq!(record.0, prev);
            prev = Some(id);
            current = record.1;
        }
        assert_eq!(prev, self.tail);
        assert_eq!(seen.len(), self.len);

        let forward: Vec<SlotId> = self.iter(objects).map(|(id, _)| id).collect();
        let mut backward: Vec<SlotId> = self.iter_rev(objects).map(|(id, _)| id).collect();
        backward.reverse();
        assert_eq!(forward, backward);
    }
}

/// Iterator over `(SlotId, &ObjectRecord)` in queue order.
pub struct QueueIter<'a> {
    objects: &'a SlotArena<ObjectRecord>,
    current: Option<SlotId>,
    forward: bool,
}

impl<'a> Iterator for QueueIter<'a> {
    type Item = (SlotId, &'a ObjectRecord);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let record = self.objects.get(id)?;
        self.current = if self.forward {
            record.next
        } else {
            record.prev
        };
        Some((id, record))
    }
}

fn resident(objects: &mut SlotArena<ObjectRecord>, id: SlotId) -> &mut ObjectRecord {
    match objects.get_mut(id) {
        Some(record) => record,
        None => panic!("{} is not a resident object record", id),
    }
}
