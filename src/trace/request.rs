//! Request types produced by trace ingestion.

use std::fmt;

use crate::common::ObjId;

/// Operation code carried by v2/v3 records.
///
/// Uses `#[repr(u8)]` because the code occupies the low 8 bits of the
/// packed op/tenant word on disk.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    #[default]
    Nop = 0,
    Get = 1,
    Gets = 2,
    Set = 3,
    Add = 4,
    Cas = 5,
    Replace = 6,
    Append = 7,
    Prepend = 8,
    Delete = 9,
    Incr = 10,
    Decr = 11,
    Read = 12,
    Write = 13,
    Update = 14,
    /// Unknown or corrupted operation code.
    Invalid = 15,
}

impl Op {
    /// Convert from u8, returning Invalid for unknown values.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Op::Nop,
            1 => Op::Get,
            2 => Op::Gets,
            3 => Op::Set,
            4 => Op::Add,
            5 => Op::Cas,
            6 => Op::Replace,
            7 => Op::Append,
            8 => Op::Prepend,
            9 => Op::Delete,
            10 => Op::Incr,
            11 => Op::Decr,
            12 => Op::Read,
            13 => Op::Write,
            14 => Op::Update,
            _ => Op::Invalid,
        }
    }
}

/// Logical time of an object's next access.
///
/// Traces encode "never accessed again" as either `-1` or `i64::MAX`; both
/// decode to [`NextAccess::Never`], so a finite value is always a real
/// future virtual time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NextAccess {
    /// The object is requested again at this virtual time.
    At(i64),
    /// The object is never requested again in the trace.
    #[default]
    Never,
}

impl NextAccess {
    /// Normalize a raw on-disk value.
    #[inline]
    pub fn from_raw(raw: i64) -> Self {
        if raw == -1 || raw == i64::MAX {
            NextAccess::Never
        } else {
            NextAccess::At(raw)
        }
    }

    /// Encode back to the on-disk representation.
    #[inline]
    pub fn to_raw(self) -> i64 {
        match self {
            NextAccess::At(vtime) => vtime,
            NextAccess::Never => -1,
        }
    }

    #[inline]
    pub fn is_never(self) -> bool {
        self == NextAccess::Never
    }
}

impl fmt::Display for NextAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextAccess::At(vtime) => write!(f, "{}", vtime),
            NextAccess::Never => write!(f, "never"),
        }
    }
}

/// One trace event.
///
/// `tenant_id` and `op` are only populated by v2/v3 records; a v1 record
/// leaves them `None`. `valid` turns false when the reader hits
/// end-of-stream while filling this request.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    /// Wall-clock timestamp of the request.
    pub clock_time: i64,
    pub obj_id: ObjId,
    /// Object size in bytes.
    pub obj_size: i64,
    pub next_access: NextAccess,
    pub tenant_id: Option<u32>,
    pub op: Option<Op>,
    pub valid: bool,
}

impl Request {
    /// Create a valid request for `obj_id` with the given size.
    ///
    /// The remaining fields take their defaults; this is mostly useful when
    /// driving a cache directly rather than from a trace.
    pub fn new(obj_id: u64, obj_size: i64) -> Self {
        Self {
            obj_id: ObjId(obj_id),
            obj_size,
            valid: true,
            ..Self::default()
        }
    }

    /// Set the next-access time.
    pub fn with_next_access(mut self, next_access: NextAccess) -> Self {
        self.next_access = next_access;
        self
    }

    /// Set the timestamp.
    pub fn with_clock_time(mut self, clock_time: i64) -> Self {
        self.clock_time = clock_time;
        self
    }
}
