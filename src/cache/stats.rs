//! Cache statistics tracking.

use std::fmt;

/// Raw counters maintained by a [`Cache`](crate::cache::Cache).
///
/// The cache is single-threaded, so these are plain integers rather than
/// atomics. The struct is `Copy` and can be snapshotted by value.
///
/// # Example
/// ```
/// use lcsim::CacheStats;
///
/// let mut stats = CacheStats::default();
/// stats.hits += 3;
/// stats.misses += 1;
/// stats.requests += 4;
/// assert_eq!(stats.hit_rate(), 0.75);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests checked with `update` set.
    pub requests: u64,

    /// Number of requests that found their object resident.
    pub hits: u64,

    /// Number of requests that did not.
    pub misses: u64,

    /// Objects admitted into the cache.
    pub insertions: u64,

    /// Objects chosen as eviction victims.
    pub evictions: u64,

    /// Objects deleted explicitly.
    pub removals: u64,
}

impl CacheStats {
    /// Calculate cache hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Calculate miss ratio (0.0 to 1.0).
    pub fn miss_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.misses as f64 / total as f64
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ requests: {}, hits: {}, misses: {}, evictions: {}, miss_ratio: {:.4} }}",
            self.requests,
            self.hits,
            self.misses,
            self.evictions,
            self.miss_ratio()
        )
    }
}
