//! lcsim - a trace-driven cache simulation core.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                             lcsim                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                 Replay (sim::replay)                     │   │
//! │  │        next request → Cache::get → hit / miss            │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                   Cache (cache/)                         │   │
//! │  │   index + SlotArena<ObjectRecord> + byte accounting      │   │
//! │  │   ┌─────────────────────────────────────────────────┐   │   │
//! │  │   │  Eviction Policy: FIFO-Reinsertion (+ oracle)   │   │   │
//! │  │   │          over an intrusive EvictionQueue         │   │   │
//! │  │   └─────────────────────────────────────────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↑                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                  Trace Layer (trace/)                    │   │
//! │  │    LcsReader + TraceHeader/TraceStat + record frames     │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (ObjId, SlotId, Error, config)
//! - [`cache`] - The cache engine and eviction policies
//! - [`trace`] - LCS binary trace reading and writing
//! - [`sim`] - Replaying a trace through a cache
//!
//! # Quick Start
//! ```no_run
//! use lcsim::{Cache, CacheConfig, LcsReader, ReaderConfig};
//!
//! let mut reader = LcsReader::open("trace.lcs", ReaderConfig::default()).unwrap();
//! let mut cache = Cache::new(CacheConfig::new(1 << 30)).unwrap();
//!
//! let stats = lcsim::replay(&mut reader, &mut cache).unwrap();
//! println!("{}", stats);
//! ```

pub mod cache;
pub mod common;
pub mod sim;
pub mod trace;

// Re-export commonly used items at crate root for convenience
pub use common::{Error, ObjId, Result, SlotId};

pub use cache::{Cache, CacheConfig, CacheStats, EvictionPolicy, ObjectRecord, PolicyKind};
pub use sim::replay;
pub use trace::{LcsReader, NextAccess, Op, ReadDirection, ReaderConfig, Request};
