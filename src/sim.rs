//! Trace replay.

use std::io::{Read, Seek};

use tracing::info;

use crate::cache::{Cache, CacheStats};
use crate::common::Result;
use crate::trace::{LcsReader, Request};

/// Feed every remaining request of `reader` through `cache`.
///
/// Returns the cache's counters once the reader is exhausted.
///
/// # Errors
/// Propagates I/O errors from the reader.
pub fn replay<R: Read + Seek>(reader: &mut LcsReader<R>, cache: &mut Cache) -> Result<CacheStats> {
    let mut req = Request::default();
    while reader.read_one_req(&mut req)? {
        cache.get(&req);
    }

    let stats = *cache.stats();
    info!(
        policy = cache.name(),
        capacity = cache.capacity(),
        requests = stats.requests,
        miss_ratio = stats.miss_ratio(),
        "replay finished"
    );
    Ok(stats)
}
