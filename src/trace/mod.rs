//! Trace layer - the LCS binary trace format.
//!
//! This module handles trace ingestion:
//! - [`LcsReader`] - Header validation and record streaming
//! - [`LcsWriter`] - Produces traces in the same format
//! - [`TraceHeader`] / [`TraceStat`] - The fixed header and its statistics
//! - [`LcsVersion`] - Version-dependent record layouts
//! - [`Request`] - One decoded trace event

mod header;
mod reader;
mod record;
mod request;
mod writer;

pub use header::{TraceHeader, TraceStat};
pub use reader::{LcsReader, ReadDirection, ReaderConfig, ReaderState};
pub use record::LcsVersion;
pub use request::{NextAccess, Op, Request};
pub use writer::LcsWriter;
