//! Cache layer - the simulated cache and its eviction policies.
//!
//! # Components
//! - [`Cache`] - The policy-agnostic engine (index, accounting, operations)
//! - [`ObjectRecord`] - One resident object plus policy metadata
//! - [`EvictionQueue`] - Doubly linked order threaded through the records
//! - [`SlotArena`] - Owner of every resident record
//! - [`CacheStats`] - Hit/miss/eviction counters
//! - [`policy`] - Eviction policy implementations

mod arena;
#[allow(clippy::module_inception)]
mod cache;
mod object;
pub mod policy;
mod queue;
mod stats;

pub use arena::SlotArena;
pub use cache::{Cache, CacheConfig};
pub use object::ObjectRecord;
pub use policy::{EvictionPolicy, FifoReinsertion, PolicyKind};
pub use queue::{EvictionQueue, QueueIter};
pub use stats::CacheStats;
