//! FIFO-Reinsertion (lazy promotion) eviction policy.
//!
//! Hits only bump a record's hotness; nothing moves until eviction time.
//! The victim scan then walks from the tail: a hot record (freq > 1) is
//! cooled to freq 1 and reinserted at the head among the new arrivals, and
//! the first cold tail record is the victim.
//!
//! Unlike CLOCK, reinserted records are mixed with newly inserted ones.
//! Unlike segmented FIFO-Reinsertion, any number of records may be promoted
//! in a single scan.
//!
//! In oracle mode a record whose next access is [`NextAccess::Never`] is
//! evicted even when hot, approximating Belady for comparison runs.
//!
//! [`NextAccess::Never`]: crate::trace::NextAccess::Never

use tracing::{error, trace};

use crate::cache::arena::SlotArena;
use crate::cache::object::ObjectRecord;
use crate::cache::policy::EvictionPolicy;
use crate::cache::queue::EvictionQueue;
use crate::common::{Error, Result, SlotId};

/// Lazy-promotion FIFO with re-insertion.
///
/// The queue runs newest-at-head to oldest-at-tail.
#[derive(Debug)]
pub struct FifoReinsertion {
    queue: EvictionQueue,
    oracle: bool,
}

impl FifoReinsertion {
    pub const NAME: &'static str = "FIFO_Reinsertion";
    pub const ORACLE_NAME: &'static str = "FIFO_Reinsertion_Belady";

    /// Create the policy.
    ///
    /// # Errors
    /// The policy takes no parameters; any non-empty `params` string is
    /// rejected with `Error::UnsupportedParams`.
    pub fn new(params: Option<&str>, oracle: bool) -> Result<Self> {
        if let Some(params) = params.filter(|p| !p.is_empty()) {
            error!(policy = Self::NAME, params, "policy does not take parameters");
            return Err(Error::UnsupportedParams {
                policy: Self::NAME.to_string(),
                params: params.to_string(),
            });
        }

        Ok(Self {
            queue: EvictionQueue::new(),
            oracle,
        })
    }

    /// Whether the Belady oracle shortcut is enabled.
    #[inline]
    pub fn is_oracle(&self) -> bool {
        self.oracle
    }

    /// True if the scan must stop at this record.
    fn is_victim(&self, record: &ObjectRecord) -> bool {
        record.freq <= 1 || (self.oracle && record.next_access.is_never())
    }
}

impl EvictionPolicy for FifoReinsertion {
    fn name(&self) -> &str {
        if self.oracle {
            Self::ORACLE_NAME
        } else {
            Self::NAME
        }
    }

    fn on_hit(&mut self, objects: &mut SlotArena<ObjectRecord>, id: SlotId) {
        if let Some(record) = objects.get_mut(id) {
            record.freq = record.freq.saturating_add(1);
        }
    }

    fn on_insert(&mut self, objects: &mut SlotArena<ObjectRecord>, id: SlotId) {
        self.queue.prepend(objects, id);
        if let Some(record) = objects.get_mut(id) {
            record.freq = 1;
        }
    }

    fn to_evict(&mut self, objects: &mut SlotArena<ObjectRecord>) -> Option<SlotId> {
        let mut candidate = self.queue.tail()?;

        // Each pass cools one record to freq 1, so at most `len` reinsertions
        // happen before a victim surfaces.
        loop {
            let record = objects.get_mut(candidate)?;
            if self.is_victim(record) {
                return Some(candidate);
            }

            trace!(obj = %record.obj_id(), freq = record.freq, "reinserting");
            record.freq = 1;
            self.queue.move_to_head(objects, candidate);
            candidate = self.queue.tail()?;
        }
    }

    fn on_remove(&mut self, objects: &mut SlotArena<ObjectRecord>, id: SlotId) {
        self.queue.remove(objects, id);
    }

    fn order(&self, objects: &SlotArena<ObjectRecord>) -> Vec<SlotId> {
        self.queue.iter(objects).map(|(id, _)| id).collect()
    }

    #[cfg(any(test, debug_assertions))]
    fn debug_validate_invariants(&self, objects: &SlotArena<ObjectRecord>) {
        self.queue.debug_validate_invariants(objects);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{NextAccess, Request};

    fn insert(
        policy: &mut FifoReinsertion,
        objects: &mut SlotArena<ObjectRecord>,
        req: Request,
    ) -> SlotId {
        let id = objects.insert(ObjectRecord::new(&req));
        policy.on_insert(objects, id);
        id
    }

    #[test]
    fn test_rejects_params() {
        assert!(FifoReinsertion::new(None, false).is_ok());
        assert!(FifoReinsertion::new(Some(""), false).is_ok());
        assert!(matches!(
            FifoReinsertion::new(Some("n-seg=2"), false),
            Err(Error::UnsupportedParams { .. })
        ));
        assert!(matches!(
            FifoReinsertion::new(Some(" "), true),
            Err(Error::UnsupportedParams { .. })
        ));
    }

    #[test]
    fn test_insert_sets_freq_one() {
        let mut policy = FifoReinsertion::new(None, false).unwrap();
        let mut objects = SlotArena::new();
        let a = insert(&mut policy, &mut objects, Request::new(1, 1));

        assert_eq!(objects.get(a).unwrap().freq, 1);
        assert_eq!(policy.order(&objects), vec![a]);
    }

    #[test]
    fn test_cold_tail_is_victim() {
        let mut policy = FifoReinsertion::new(None, false).unwrap();
        let mut objects = SlotArena::new();
        let a = insert(&mut policy, &mut objects, Request::new(1, 1));
        let _b = insert(&mut policy, &mut objects, Request::new(2, 1));

        assert_eq!(policy.to_evict(&mut objects), Some(a));
    }

    #[test]
    fn test_hit_does_not_move() {
        let mut policy = FifoReinsertion::new(None, false).unwrap();
        let mut objects = SlotArena::new();
        let a = insert(&mut policy, &mut objects, Request::new(1, 1));
        let b = insert(&mut policy, &mut objects, Request::new(2, 1));

        policy.on_hit(&mut objects, a);
        assert_eq!(objects.get(a).unwrap().freq, 2);
        assert_eq!(policy.order(&objects), vec![b, a]);
    }

    #[test]
    fn test_hot_tail_is_reinserted() {
        let mut policy = FifoReinsertion::new(None, false).unwrap();
        let mut objects = SlotArena::new();
        let a = insert(&mut policy, &mut objects, Request::new(1, 1));
        policy.on_hit(&mut objects, a);
        let b = insert(&mut policy, &mut objects, Request::new(2, 1));
        let c = insert(&mut policy, &mut objects, Request::new(3, 1));

        assert_eq!(policy.to_evict(&mut objects), Some(b));
        assert_eq!(objects.get(a).unwrap().freq, 1);
        assert_eq!(policy.order(&objects), vec![a, c, b]);
        policy.debug_validate_invariants(&objects);
    }

    #[test]
    fn test_all_hot_terminates() {
        let mut policy = FifoReinsertion::new(None, false).unwrap();
        let mut objects = SlotArena::new();
        let ids: Vec<SlotId> = (0..4)
            .map(|i| insert(&mut policy, &mut objects, Request::new(i, 1)))
            .collect();
        for &id in &ids {
            policy.on_hit(&mut objects, id);
            policy.on_hit(&mut objects, id);
        }

        // Every record is cooled once; the original tail comes back around.
        assert_eq!(policy.to_evict(&mut objects), Some(ids[0]));
        assert!(ids.iter().all(|&id| objects.get(id).unwrap().freq == 1));
    }

    #[test]
    fn test_oracle_evicts_never_accessed_hot_record() {
        let mut policy = FifoReinsertion::new(None, true).unwrap();
        let mut objects = SlotArena::new();
        let a = insert(&mut policy, &mut objects, Request::new(1, 1));
        let _b = insert(
            &mut policy,
            &mut objects,
            Request::new(2, 1).with_next_access(NextAccess::At(10)),
        );
        policy.on_hit(&mut objects, a);

        // `a` is hot but never requested again.
        assert_eq!(policy.to_evict(&mut objects), Some(a));
        assert_eq!(objects.get(a).unwrap().freq, 2);
    }

    #[test]
    fn test_oracle_keeps_hot_record_with_future_access() {
        let mut policy = FifoReinsertion::new(None, true).unwrap();
        let mut objects = SlotArena::new();
        let a = insert(
            &mut policy,
            &mut objects,
            Request::new(1, 1).with_next_access(NextAccess::At(5)),
        );
        let b = insert(&mut policy, &mut objects, Request::new(2, 1));
        policy.on_hit(&mut objects, a);

        assert_eq!(policy.to_evict(&mut objects), Some(b));
    }

    #[test]
    fn test_empty_queue_has_no_victim() {
        let mut policy = FifoReinsertion::new(None, false).unwrap();
        let mut objects = SlotArena::new();
        assert_eq!(policy.to_evict(&mut objects), None);
    }
}
