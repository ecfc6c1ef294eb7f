//! End-to-end replay of LCS traces through a cache.

use std::fs::File;
use std::path::{Path, PathBuf};

use lcsim::trace::{LcsVersion, LcsWriter, ReadDirection, TraceStat};
use lcsim::{replay, Cache, CacheConfig, LcsReader, NextAccess, ObjId, ReaderConfig, Request};
use tempfile::{tempdir, TempDir};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Annotate `ids` with next-access times and write them as a v3 trace.
fn write_annotated(dir: &TempDir, ids: &[u64], size: i64) -> PathBuf {
    let next = next_access_times(ids);
    let path = dir.path().join("annotated.lcs");
    let stat = TraceStat {
        n_req: ids.len() as i64,
        ..TraceStat::default()
    };
    let mut writer = LcsWriter::new(File::create(&path).unwrap(), LcsVersion::V3, stat).unwrap();
    for (i, (&id, &next)) in ids.iter().zip(&next).enumerate() {
        let req = Request::new(id, size)
            .with_clock_time(i as i64)
            .with_next_access(next);
        writer.write_request(&req).unwrap();
    }
    writer.finish().unwrap();
    path
}

fn next_access_times(ids: &[u64]) -> Vec<NextAccess> {
    let mut next = vec![NextAccess::Never; ids.len()];
    let mut seen = std::collections::HashMap::new();
    for (i, id) in ids.iter().enumerate().rev() {
        if let Some(&later) = seen.get(id) {
            next[i] = NextAccess::At(later);
        }
        seen.insert(*id, i as i64);
    }
    next
}

fn run(path: &Path, config: CacheConfig) -> lcsim::CacheStats {
    let mut reader = LcsReader::open(path, ReaderConfig::default()).unwrap();
    let mut cache = Cache::new(config).unwrap();
    let stats = replay(&mut reader, &mut cache).unwrap();
    cache.debug_validate_invariants();
    stats
}

#[test]
fn test_replay_counts_every_request() {
    init_tracing();
    let dir = tempdir().unwrap();
    let ids = [1, 2, 1, 3, 1, 2];
    let path = write_annotated(&dir, &ids, 10);

    let stats = run(&path, CacheConfig::new(20));
    assert_eq!(stats.requests, 6);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 4);
    assert_eq!(stats.evictions, 2);
}

#[test]
fn test_replay_skips_zero_size_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("zeros.lcs");
    let mut writer =
        LcsWriter::new(File::create(&path).unwrap(), LcsVersion::V1, TraceStat::default()).unwrap();
    for (id, size) in [(1, 10), (2, 0), (1, 10), (3, 0)] {
        writer.write_request(&Request::new(id, size)).unwrap();
    }
    writer.finish().unwrap();

    let stats = run(&path, CacheConfig::new(100));
    assert_eq!(stats.requests, 2);
    assert_eq!(stats.hits, 1);
}

#[test]
fn test_oracle_never_misses_more() {
    init_tracing();
    let dir = tempdir().unwrap();

    // A hot set that is hammered early and then abandoned, followed by a
    // scan over a second working set that keeps recurring.
    let mut ids = Vec::new();
    for _ in 0..4 {
        ids.extend(0..8u64);
    }
    for _ in 0..6 {
        ids.extend(100..112u64);
    }
    let path = write_annotated(&dir, &ids, 1);

    let plain = run(&path, CacheConfig::new(12));
    let oracle = run(&path, CacheConfig::new(12).with_oracle(true));

    assert_eq!(plain.requests, oracle.requests);
    assert!(
        oracle.misses < plain.misses,
        "oracle {} vs plain {}",
        oracle.misses,
        plain.misses
    );
}

#[test]
fn test_backward_replay_visits_reverse_order() {
    let dir = tempdir().unwrap();
    let ids = [10, 20, 30];
    let path = write_annotated(&dir, &ids, 1);

    let config = ReaderConfig::default().with_direction(ReadDirection::Backward);
    let reader = LcsReader::open(&path, config).unwrap();
    let seen: Vec<ObjId> = reader.map(|r| r.unwrap().obj_id).collect();
    assert_eq!(seen, vec![ObjId(30), ObjId(20), ObjId(10)]);
}

#[test]
fn test_replay_resumes_after_reset() {
    let dir = tempdir().unwrap();
    let ids = [1, 2, 3];
    let path = write_annotated(&dir, &ids, 1);

    let mut reader = LcsReader::open(&path, ReaderConfig::default()).unwrap();
    let mut cache = Cache::new(CacheConfig::new(10)).unwrap();
    replay(&mut reader, &mut cache).unwrap();

    reader.reset().unwrap();
    let stats = replay(&mut reader, &mut cache).unwrap();
    assert_eq!(stats.requests, 6);
    assert_eq!(stats.hits, 3);
}
