//! Common types and utilities shared across lcsim.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants
//! - Error types
//! - Identifiers (ObjId, SlotId)

pub mod config;
pub mod error;
mod obj_id;
mod slot_id;

pub use error::{Error, Result};
pub use obj_id::ObjId;
pub use slot_id::SlotId;
