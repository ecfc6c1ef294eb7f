//! LCS trace header and statistics block.
//!
//! Every LCS trace starts with a fixed 1024-byte [`TraceHeader`]:
//! - start/end magic numbers bracketing the header
//! - the format version, which fixes the record frame layout
//! - a [`TraceStat`] block summarizing the whole trace
//!
//! All fields are little-endian and packed.

use std::fmt;

use crate::common::config::{
    GIB, LCS_HEADER_SIZE, LCS_STAT_SIZE, LCS_TRACE_END_MAGIC, LCS_TRACE_START_MAGIC,
    MAX_LCS_VERSION, N_MOST_COMMON,
};
use crate::common::{Error, Result};

/// Sequential little-endian field reader over a fixed buffer.
struct FieldReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    fn i64(&mut self) -> i64 {
        i64::from_le_bytes(self.take())
    }

    fn u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take())
    }

    fn i32(&mut self) -> i32 {
        i32::from_le_bytes(self.take())
    }

    fn f32(&mut self) -> f32 {
        f32::from_le_bytes(self.take())
    }

    fn f64(&mut self) -> f64 {
        f64::from_le_bytes(self.take())
    }

    fn i64s(&mut self) -> [i64; N_MOST_COMMON] {
        std::array::from_fn(|_| self.i64())
    }

    fn i32s(&mut self) -> [i32; N_MOST_COMMON] {
        std::array::from_fn(|_| self.i32())
    }

    fn f32s(&mut self) -> [f32; N_MOST_COMMON] {
        std::array::from_fn(|_| self.f32())
    }
}

/// Sequential little-endian field writer over a fixed buffer.
struct FieldWriter<'a> {
    data: &'a mut [u8],
    pos: usize,
}

impl<'a> FieldWriter<'a> {
    fn new(data: &'a mut [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn put(&mut self, bytes: &[u8]) {
        self.data[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    fn i64s(&mut self, values: &[i64]) {
        values.iter().for_each(|v| self.put(&v.to_le_bytes()));
    }

    fn i32s(&mut self, values: &[i32]) {
        values.iter().for_each(|v| self.put(&v.to_le_bytes()));
    }

    fn f32s(&mut self, values: &[f32]) {
        values.iter().for_each(|v| self.put(&v.to_le_bytes()));
    }
}

/// Summary statistics embedded in the trace header.
///
/// The block is 1000 bytes on disk; bytes past the last field are
/// reserved and written as zeros.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TraceStat {
    pub n_req: i64,
    pub n_obj: i64,
    /// Total bytes requested.
    pub n_req_byte: i64,
    /// Total bytes of unique objects.
    pub n_obj_byte: i64,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub n_read: i64,
    pub n_write: i64,
    pub n_delete: i64,
    pub smallest_obj_size: i64,
    pub largest_obj_size: i64,
    pub most_common_obj_sizes: [i64; N_MOST_COMMON],
    pub most_common_obj_size_ratio: [f32; N_MOST_COMMON],
    pub highest_freq: [i64; N_MOST_COMMON],
    pub most_common_freq: [i32; N_MOST_COMMON],
    pub most_common_freq_ratio: [f32; N_MOST_COMMON],
    pub skewness: f64,
    pub n_tenant: i32,
    pub most_common_tenants: [i32; N_MOST_COMMON],
    pub most_common_tenant_ratio: [f32; N_MOST_COMMON],
    pub n_ttl: i32,
    pub smallest_ttl: i32,
    pub largest_ttl: i32,
    pub most_common_ttls: [i32; N_MOST_COMMON],
    pub most_common_ttl_ratio: [f32; N_MOST_COMMON],
}

impl TraceStat {
    /// Size of the stat block in bytes.
    pub const SIZE: usize = LCS_STAT_SIZE;

    /// Read a stat block from the beginning of a byte slice.
    ///
    /// # Panics
    /// Panics if `data.len() < TraceStat::SIZE`.
    pub fn from_bytes(data: &[u8]) -> Self {
        assert!(data.len() >= Self::SIZE, "buffer too small for TraceStat");

        let mut r = FieldReader::new(data);
        Self {
            n_req: r.i64(),
            n_obj: r.i64(),
            n_req_byte: r.i64(),
            n_obj_byte: r.i64(),
            start_timestamp: r.i64(),
            end_timestamp: r.i64(),
            n_read: r.i64(),
            n_write: r.i64(),
            n_delete: r.i64(),
            smallest_obj_size: r.i64(),
            largest_obj_size: r.i64(),
            most_common_obj_sizes: r.i64s(),
            most_common_obj_size_ratio: r.f32s(),
            highest_freq: r.i64s(),
            most_common_freq: r.i32s(),
            most_common_freq_ratio: r.f32s(),
            skewness: r.f64(),
            n_tenant: r.i32(),
            most_common_tenants: r.i32s(),
            most_common_tenant_ratio: r.f32s(),
            n_ttl: r.i32(),
            smallest_ttl: r.i32(),
            largest_ttl: r.i32(),
            most_common_ttls: r.i32s(),
            most_common_ttl_ratio: r.f32s(),
        }
    }

    /// Write this stat block to the beginning of a byte slice.
    ///
    /// The reserved tail of the block is zeroed.
    ///
    /// # Panics
    /// Panics if `data.len() < TraceStat::SIZE`.
    pub fn write_to(&self, data: &mut [u8]) {
        assert!(data.len() >= Self::SIZE, "buffer too small for TraceStat");

        data[..Self::SIZE].fill(0);
        let mut w = FieldWriter::new(data);
        w.i64s(&[
            self.n_req,
            self.n_obj,
            self.n_req_byte,
            self.n_obj_byte,
            self.start_timestamp,
            self.end_timestamp,
            self.n_read,
            self.n_write,
            self.n_delete,
            self.smallest_obj_size,
            self.largest_obj_size,
        ]);
        w.i64s(&self.most_common_obj_sizes);
        w.f32s(&self.most_common_obj_size_ratio);
        w.i64s(&self.highest_freq);
        w.i32s(&self.most_common_freq);
        w.f32s(&self.most_common_freq_ratio);
        w.put(&self.skewness.to_le_bytes());
        w.i32s(&[self.n_tenant]);
        w.i32s(&self.most_common_tenants);
        w.f32s(&self.most_common_tenant_ratio);
        w.i32s(&[self.n_ttl, self.smallest_ttl, self.largest_ttl]);
        w.i32s(&self.most_common_ttls);
        w.f32s(&self.most_common_ttl_ratio);
    }
}

impl fmt::Display for TraceStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "trace stat: n_req {}, n_obj {}, n_byte {} ({:.2} GiB), n_uniq_byte {} ({:.2} GiB)",
            self.n_req,
            self.n_obj,
            self.n_req_byte,
            self.n_req_byte as f64 / GIB,
            self.n_obj_byte,
            self.n_obj_byte as f64 / GIB
        )?;

        if self.n_read > 0 {
            writeln!(
                f,
                "n_read {}, n_write {}, n_delete {}",
                self.n_read, self.n_write, self.n_delete
            )?;
        }

        let duration = self.end_timestamp - self.start_timestamp;
        writeln!(
            f,
            "start time {}, end time {}, duration {} seconds {:.2} days",
            self.start_timestamp,
            self.end_timestamp,
            duration,
            duration as f64 / (24.0 * 3600.0)
        )?;

        writeln!(
            f,
            "object size: smallest {}, largest {}",
            self.smallest_obj_size, self.largest_obj_size
        )?;
        write!(f, "most common object sizes (req fraction):")?;
        for (size, ratio) in self
            .most_common_obj_sizes
            .iter()
            .zip(&self.most_common_obj_size_ratio)
        {
            write!(f, " {}({:.4})", size, ratio)?;
        }
        writeln!(f, "...")?;

        write!(f, "highest freq:")?;
        for freq in &self.highest_freq {
            write!(f, " {}", freq)?;
        }
        writeln!(f, " skewness {:.4}", self.skewness)?;
        write!(f, "most common freq (req fraction):")?;
        for (freq, ratio) in self.most_common_freq.iter().zip(&self.most_common_freq_ratio) {
            write!(f, " {}({:.4})", freq, ratio)?;
        }
        writeln!(f, "...")?;

        if self.n_tenant > 1 {
            writeln!(f, "#tenant: {}", self.n_tenant)?;
            write!(f, "most common tenants (req fraction):")?;
            for (tenant, ratio) in self
                .most_common_tenants
                .iter()
                .zip(&self.most_common_tenant_ratio)
            {
                write!(f, " {}({:.4})", tenant, ratio)?;
            }
            writeln!(f, "...")?;
        }

        if self.n_ttl > 1 {
            writeln!(f, "#ttl: {}", self.n_ttl)?;
            writeln!(
                f,
                "smallest ttl: {}, largest ttl: {}",
                self.smallest_ttl, self.largest_ttl
            )?;
            write!(f, "most common ttls (req fraction):")?;
            for (ttl, ratio) in self.most_common_ttls.iter().zip(&self.most_common_ttl_ratio) {
                write!(f, " {}({:.4})", ttl, ratio)?;
            }
            writeln!(f, "...")?;
        }

        Ok(())
    }
}

/// The fixed prologue of an LCS trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHeader {
    pub start_magic: u64,
    pub version: i64,
    pub stat: TraceStat,
    pub end_magic: u64,
}

impl TraceHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = LCS_HEADER_SIZE;

    /// Offset of each field within the header.
    pub const OFFSET_START_MAGIC: usize = 0;
    pub const OFFSET_VERSION: usize = 8;
    pub const OFFSET_STAT: usize = 16;
    pub const OFFSET_END_MAGIC: usize = 16 + TraceStat::SIZE;

    /// Create a well-formed header for `version` carrying `stat`.
    pub fn new(version: i64, stat: TraceStat) -> Self {
        Self {
            start_magic: LCS_TRACE_START_MAGIC,
            version,
            stat,
            end_magic: LCS_TRACE_END_MAGIC,
        }
    }

    /// Read a header from the beginning of a byte slice.
    ///
    /// No validation happens here; see [`TraceHeader::verify`].
    ///
    /// # Panics
    /// Panics if `data.len() < TraceHeader::SIZE`.
    pub fn from_bytes(data: &[u8]) -> Self {
        assert!(data.len() >= Self::SIZE, "buffer too small for TraceHeader");

        let mut r = FieldReader::new(&data[..Self::OFFSET_STAT]);
        let start_magic = r.u64();
        let version = r.i64();
        let stat = TraceStat::from_bytes(&data[Self::OFFSET_STAT..Self::OFFSET_END_MAGIC]);
        let end_magic = FieldReader::new(&data[Self::OFFSET_END_MAGIC..Self::SIZE]).u64();

        Self {
            start_magic,
            version,
            stat,
            end_magic,
        }
    }

    /// Write this header to the beginning of a byte slice.
    ///
    /// # Panics
    /// Panics if `data.len() < TraceHeader::SIZE`.
    pub fn write_to(&self, data: &mut [u8]) {
        assert!(data.len() >= Self::SIZE, "buffer too small for TraceHeader");

        data[Self::OFFSET_START_MAGIC..Self::OFFSET_VERSION]
            .copy_from_slice(&self.start_magic.to_le_bytes());
        data[Self::OFFSET_VERSION..Self::OFFSET_STAT].copy_from_slice(&self.version.to_le_bytes());
        self.stat
            .write_to(&mut data[Self::OFFSET_STAT..Self::OFFSET_END_MAGIC]);
        data[Self::OFFSET_END_MAGIC..Self::SIZE].copy_from_slice(&self.end_magic.to_le_bytes());
    }

    /// Check magics, version bound and stat sanity.
    ///
    /// # Errors
    /// - `Error::InvalidStartMagic` / `Error::InvalidEndMagic` on a magic mismatch
    /// - `Error::UnsupportedVersion` if the version exceeds [`MAX_LCS_VERSION`]
    /// - `Error::InvalidStat` if the request or object count is negative
    pub fn verify(&self) -> Result<()> {
        if self.start_magic != LCS_TRACE_START_MAGIC {
            return Err(Error::InvalidStartMagic(self.start_magic));
        }

        if self.end_magic != LCS_TRACE_END_MAGIC {
            return Err(Error::InvalidEndMagic(self.end_magic));
        }

        if self.version > MAX_LCS_VERSION {
            return Err(Error::UnsupportedVersion(self.version));
        }

        if self.stat.n_req < 0 || self.stat.n_obj < 0 {
            return Err(Error::InvalidStat {
                n_req: self.stat.n_req,
                n_obj: self.stat.n_obj,
            });
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
