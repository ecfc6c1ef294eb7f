//! Object record - one resident cache item.
//!
//! An [`ObjectRecord`] holds the object's identity plus the bookkeeping the
//! eviction policy needs:
//! - `freq`, the hotness counter bumped on hits
//! - `next_access`, the oracle's view of the next reference
//! - `prev`/`next` links placing it in exactly one eviction queue

use std::fmt;

use crate::common::{ObjId, SlotId};
use crate::trace::{NextAccess, Request};

/// A resident object and its policy metadata.
///
/// Links are [`SlotId`]s into the cache's arena; they are owned by the
/// eviction queue and only change through [`EvictionQueue`] operations.
///
/// [`EvictionQueue`]: crate::cache::EvictionQueue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    obj_id: ObjId,
    obj_size: u64,
    /// Hotness counter.
    pub freq: u32,
    pub next_access: NextAccess,
    pub(crate) prev: Option<SlotId>,
    pub(crate) next: Option<SlotId>,
}

impl ObjectRecord {
    /// Create an unlinked record for the object `req` refers to.
    ///
    /// Negative sizes are clamped to zero.
    pub fn new(req: &Request) -> Self {
        Self {
            obj_id: req.obj_id,
            obj_size: req.obj_size.max(0) as u64,
            freq: 0,
            next_access: req.next_access,
            prev: None,
            next: None,
        }
    }

    #[inline]
    pub fn obj_id(&self) -> ObjId {
        self.obj_id
    }

    /// Size in bytes.
    #[inline]
    pub fn obj_size(&self) -> u64 {
        self.obj_size
    }

    /// Neighbour towards the head.
    #[inline]
    pub fn prev(&self) -> Option<SlotId> {
        self.prev
    }

    /// Neighbour towards the tail.
    #[inline]
    pub fn next(&self) -> Option<SlotId> {
        self.next
    }

    #[inline]
    pub(crate) fn is_unlinked(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }
}

impl fmt::Display for ObjectRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {{ size: {}, freq: {}, next_access: {} }}",
            self.obj_id, self.obj_size, self.freq, self.next_access
        )
    }
}
