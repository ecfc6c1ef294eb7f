//! Cache - the policy-agnostic simulation shell.
//!
//! The [`Cache`] provides:
//! - A key→record index over an arena of [`ObjectRecord`]s
//! - Byte and object accounting against a fixed capacity
//! - The uniform operation set every eviction policy is driven through

use std::collections::HashMap;

use tracing::{debug, info};

use crate::cache::arena::SlotArena;
use crate::cache::object::ObjectRecord;
use crate::cache::policy::{EvictionPolicy, PolicyKind};
use crate::cache::CacheStats;
use crate::common::{Error, ObjId, Result, SlotId};
use crate::trace::Request;

/// Runtime configuration for a [`Cache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Capacity in bytes.
    pub capacity: u64,
    pub policy: PolicyKind,
    /// Enable the policy's Belady oracle shortcut.
    pub oracle: bool,
    /// Policy-specific parameter string.
    pub params: Option<String>,
}

impl CacheConfig {
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            policy: PolicyKind::default(),
            oracle: false,
            params: None,
        }
    }

    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_oracle(mut self, oracle: bool) -> Self {
        self.oracle = oracle;
        self
    }

    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params = Some(params.into());
        self
    }
}

/// A simulated cache driven by an eviction policy.
///
/// # Architecture
/// ```text
/// ┌─────────────────────────────────────────────────────────────┐
/// │                           Cache                             │
/// │  ┌──────────────┐  ┌───────────────────────────────────┐   │
/// │  │    index     │  │  objects: SlotArena<ObjectRecord> │   │
/// │  │ObjId → Slot  │─▶│  [Rec0] [Rec1] [free] [Rec3] ...  │   │
/// │  └──────────────┘  └───────────────────────────────────┘   │
/// │  ┌──────────────────────┐  ┌──────────────────────────┐    │
/// │  │ policy               │  │ capacity / occupied /    │    │
/// │  │ Box<dyn Eviction...> │  │ stats                    │    │
/// │  └──────────────────────┘  └──────────────────────────┘    │
/// └─────────────────────────────────────────────────────────────┘
/// ```
///
/// A record is in the index iff it is in the arena iff the policy has it
/// linked, and `occupied_bytes` is the sum of resident record sizes.
///
/// # Thread Safety
/// `Cache` is **single-threaded**. Every operation runs to completion;
/// eviction happens inline on the calling thread.
///
/// # Usage
/// ```
/// use lcsim::{Cache, CacheConfig, Request};
///
/// let mut cache = Cache::new(CacheConfig::new(100)).unwrap();
/// assert!(!cache.get(&Request::new(1, 60)));
/// assert!(cache.get(&Request::new(1, 60)));
/// assert!(!cache.get(&Request::new(2, 60))); // evicts object 1
/// assert_eq!(cache.n_obj(), 1);
/// ```
#[derive(Debug)]
pub struct Cache {
    /// Storage for every resident record.
    objects: SlotArena<ObjectRecord>,

    /// Maps object ids to their arena slots.
    index: HashMap<ObjId, SlotId>,

    /// Ordering and victim selection.
    policy: Box<dyn EvictionPolicy>,

    /// Capacity in bytes (immutable after construction).
    capacity: u64,

    /// Bytes held by resident records.
    occupied_bytes: u64,

    stats: CacheStats,
}

impl Cache {
    /// Create a cache from `config`.
    ///
    /// # Errors
    /// - `Error::InvalidConfig` if the capacity is zero
    /// - `Error::UnsupportedParams` if the policy rejects `config.params`
    pub fn new(config: CacheConfig) -> Result<Self> {
        if config.capacity == 0 {
            return Err(Error::InvalidConfig("capacity must be > 0".to_string()));
        }

        let policy = config
            .policy
            .build(config.params.as_deref(), config.oracle)?;

        info!(
            policy = policy.name(),
            capacity = config.capacity,
            "cache created"
        );

        Ok(Self {
            objects: SlotArena::new(),
            index: HashMap::new(),
            policy,
            capacity: config.capacity,
            occupied_bytes: 0,
            stats: CacheStats::default(),
        })
    }

    // ========================================================================
    // Public API: Simulation
    // ========================================================================

    /// Process one request: check, and on a miss admit and insert.
    ///
    /// Victims are evicted until the new object fits. Returns `true` on a hit.
    pub fn get(&mut self, req: &Request) -> bool {
        if self.check(req, true) {
            return true;
        }

        if !self.admit(req) {
            return false;
        }

        let size = req.obj_size.max(0) as u64;
        while self.occupied_bytes + size > self.capacity {
            if self.evict().is_none() {
                break;
            }
        }

        self.insert(req);
        false
    }

    // ========================================================================
    // Public API: Policy contract
    // ========================================================================

    /// Find the resident record for `req`, counting a hit if present.
    ///
    /// The record's position in the eviction order is not touched.
    pub fn lookup(&mut self, req: &Request) -> Option<&ObjectRecord> {
        let id = *self.index.get(&req.obj_id)?;
        self.stats.hits += 1;
        self.objects.get(id)
    }

    /// Check whether `req` hits.
    ///
    /// With `update` set, the request is counted and a hit runs the
    /// policy's per-hit bookkeeping. No record is reordered here.
    pub fn check(&mut self, req: &Request, update: bool) -> bool {
        let found = self.index.get(&req.obj_id).copied();

        if !update {
            return found.is_some();
        }

        self.stats.requests += 1;
        match found {
            Some(id) => {
                self.stats.hits += 1;
                if let Some(record) = self.objects.get_mut(id) {
                    record.next_access = req.next_access;
                }
                self.policy.on_hit(&mut self.objects, id);
                true
            }
            None => {
                self.stats.misses += 1;
                false
            }
        }
    }

    /// Insert the object `req` refers to. Does not evict.
    ///
    /// # Panics
    /// Panics if the object is already resident.
    pub fn insert(&mut self, req: &Request) -> &ObjectRecord {
        assert!(
            !self.index.contains_key(&req.obj_id),
            "duplicate insertion of {}",
            req.obj_id
        );

        let record = ObjectRecord::new(req);
        self.occupied_bytes += record.obj_size();
        let id = self.objects.insert(record);
        self.index.insert(req.obj_id, id);
        self.policy.on_insert(&mut self.objects, id);
        self.stats.insertions += 1;

        &self.objects[id]
    }

    /// Whether `req` may be inserted at all.
    pub fn admit(&self, req: &Request) -> bool {
        self.policy.can_insert(self.capacity, req)
    }

    /// Select the next victim without evicting it.
    ///
    /// The policy's scan still runs, so records may be reordered.
    pub fn to_evict(&mut self) -> Option<&ObjectRecord> {
        let id = self.policy.to_evict(&mut self.objects)?;
        self.objects.get(id)
    }

    /// Evict one victim and return its state as of eviction.
    ///
    /// Returns `None` if the cache is empty.
    pub fn evict(&mut self) -> Option<ObjectRecord> {
        let id = self.policy.to_evict(&mut self.objects)?;
        let record = self.release(id);
        self.stats.evictions += 1;

        debug!(
            obj = %record.obj_id(),
            size = record.obj_size(),
            occupied = self.occupied_bytes,
            "evicted"
        );
        Some(record)
    }

    /// Delete an object regardless of the policy's order.
    ///
    /// Returns `false` if the object is not resident.
    pub fn remove(&mut self, obj_id: ObjId) -> bool {
        let Some(&id) = self.index.get(&obj_id) else {
            return false;
        };

        let record = self.release(id);
        self.stats.removals += 1;
        debug!(obj = %record.obj_id(), "removed");
        true
    }

    // ========================================================================
    // Public API: Stats and info
    // ========================================================================

    /// Policy display name.
    pub fn name(&self) -> &str {
        self.policy.name()
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn occupied_bytes(&self) -> u64 {
        self.occupied_bytes
    }

    /// Number of resident objects.
    pub fn n_obj(&self) -> usize {
        self.index.len()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Peek at a resident record without any accounting.
    pub fn get_object(&self, obj_id: ObjId) -> Option<&ObjectRecord> {
        let id = *self.index.get(&obj_id)?;
        self.objects.get(id)
    }

    pub fn contains(&self, obj_id: ObjId) -> bool {
        self.index.contains_key(&obj_id)
    }

    /// Resident object ids in policy order, most recently inserted first.
    pub fn queue_order(&self) -> Vec<ObjId> {
        self.policy
            .order(&self.objects)
            .into_iter()
            .filter_map(|id| self.objects.get(id).map(ObjectRecord::obj_id))
            .collect()
    }

    /// Check index/arena/policy coherence and byte accounting.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.index.len(), self.objects.len());

        let mut bytes = 0;
        for (&obj_id, &id) in &self.index {
            let record = self.objects.get(id);
            assert!(record.is_some(), "{} indexed but not resident", obj_id);
            if let Some(record) = record {
                assert_eq!(record.obj_id(), obj_id);
                bytes += record.obj_size();
            }
        }
        assert_eq!(bytes, self.occupied_bytes);

        let order = self.policy.order(&self.objects);
        assert_eq!(order.len(), self.index.len());
        for id in order {
            assert!(self.objects.contains(id));
        }
        self.policy.debug_validate_invariants(&self.objects);
    }

    // ========================================================================
    // Internal
    // ========================================================================

    /// Unlink, unindex and free a resident record.
    fn release(&mut self, id: SlotId) -> ObjectRecord {
        self.policy.on_remove(&mut self.objects, id);
        let record = match self.objects.remove(id) {
            Some(record) => record,
            None => panic!("{} is not a resident object record", id),
        };
        self.index.remove(&record.obj_id());
        self.occupied_bytes -= record.obj_size();
        record
    }
}
