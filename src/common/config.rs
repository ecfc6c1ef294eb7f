//! Configuration constants for the simulator and the LCS trace format.

/// Magic number opening every LCS trace header.
pub const LCS_TRACE_START_MAGIC: u64 = 0x1234_5678_9abc_def0;

/// Magic number closing every LCS trace header.
pub const LCS_TRACE_END_MAGIC: u64 = 0x1234_5678_9abc_def0;

/// Highest LCS format version this reader understands.
pub const MAX_LCS_VERSION: i64 = 3;

/// Number of entries kept in each "most common" table of the stat block.
pub const N_MOST_COMMON: usize = 4;

/// Size of the embedded statistics block in bytes.
pub const LCS_STAT_SIZE: usize = 1000;

/// Size of the full trace header in bytes.
///
/// # Layout
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       8     start_magic
/// 8       8     version
/// 16      1000  stat block
/// 1016    8     end_magic
/// ```
pub const LCS_HEADER_SIZE: usize = 8 + 8 + LCS_STAT_SIZE + 8;

/// Record frame size of an LCS v1 trace.
pub const LCS_V1_RECORD_SIZE: usize = 24;

/// Record frame size of an LCS v2 trace.
pub const LCS_V2_RECORD_SIZE: usize = 28;

/// Record frame size of an LCS v3 trace.
pub const LCS_V3_RECORD_SIZE: usize = 36;

/// Bytes per GiB, used when reporting trace totals.
pub const GIB: f64 = (1u64 << 30) as f64;
