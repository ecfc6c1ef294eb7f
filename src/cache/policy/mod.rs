//! Eviction policy implementations.
//!
//! A policy decides ordering and victims; the [`Cache`](crate::cache::Cache)
//! owns the records, the index and the byte accounting. Policies see the
//! record arena only through the hooks of [`EvictionPolicy`].
//!
//! Currently implements:
//! - [`FifoReinsertion`] - lazy-promotion FIFO with re-insertion

mod fifo_reinsertion;

use std::fmt;
use std::str::FromStr;

use crate::cache::arena::SlotArena;
use crate::cache::object::ObjectRecord;
use crate::common::{Error, Result, SlotId};
use crate::trace::Request;

pub use fifo_reinsertion::FifoReinsertion;

/// Hooks every eviction policy implements.
///
/// The cache calls these in lockstep with its index updates:
/// `on_insert` after a record is registered, `on_remove` before it is freed.
pub trait EvictionPolicy: fmt::Debug {
    /// Display name, e.g. `"FIFO_Reinsertion"`.
    fn name(&self) -> &str;

    /// Per-hit bookkeeping for a resident record.
    fn on_hit(&mut self, objects: &mut SlotArena<ObjectRecord>, id: SlotId);

    /// Take ownership of the ordering of a freshly inserted record.
    fn on_insert(&mut self, objects: &mut SlotArena<ObjectRecord>, id: SlotId);

    /// Pick the next victim. May reorder records while scanning.
    ///
    /// Returns `None` only when nothing is resident.
    fn to_evict(&mut self, objects: &mut SlotArena<ObjectRecord>) -> Option<SlotId>;

    /// Drop a record from the policy's structures.
    fn on_remove(&mut self, objects: &mut SlotArena<ObjectRecord>, id: SlotId);

    /// Records in policy order, next-inserted end first.
    fn order(&self, objects: &SlotArena<ObjectRecord>) -> Vec<SlotId>;

    /// Admission check. Defaults to "fits in an empty cache".
    fn can_insert(&self, capacity: u64, req: &Request) -> bool {
        req.obj_size >= 0 && req.obj_size as u64 <= capacity
    }

    /// Validate policy-internal structures against the arena.
    #[cfg(any(test, debug_assertions))]
    fn debug_validate_invariants(&self, _objects: &SlotArena<ObjectRecord>) {}
}

/// Selects which policy a cache is built with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    #[default]
    FifoReinsertion,
}

impl PolicyKind {
    /// Construct the policy.
    ///
    /// # Errors
    /// Returns `Error::UnsupportedParams` if the policy rejects `params`.
    pub fn build(self, params: Option<&str>, oracle: bool) -> Result<Box<dyn EvictionPolicy>> {
        match self {
            PolicyKind::FifoReinsertion => Ok(Box::new(FifoReinsertion::new(params, oracle)?)),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::FifoReinsertion => write!(f, "FIFO_Reinsertion"),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "fifo_reinsertion" | "fifo_reinsert" | "lazy_lru" => Ok(PolicyKind::FifoReinsertion),
            _ => Err(Error::InvalidConfig(format!("unknown eviction policy {}", s))),
        }
    }
}
