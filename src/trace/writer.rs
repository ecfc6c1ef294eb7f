//! LCS Writer - produces traces in the binary LCS format.
//!
//! Used to convert other trace sources into LCS and to build fixtures.

use std::io::Write;

use tracing::debug;

use crate::common::Result;
use crate::trace::header::{TraceHeader, TraceStat};
use crate::trace::record::LcsVersion;
use crate::trace::request::Request;

/// Writes a header followed by fixed-size record frames.
///
/// The header is written on construction, so the statistics block must be
/// known up front.
///
/// # Example
/// ```
/// use lcsim::trace::{LcsVersion, LcsWriter, TraceStat};
/// use lcsim::Request;
///
/// let mut writer = LcsWriter::new(Vec::new(), LcsVersion::V1, TraceStat::default()).unwrap();
/// writer.write_request(&Request::new(1, 4096)).unwrap();
/// let bytes = writer.finish().unwrap();
/// assert_eq!(bytes.len(), 1024 + 24);
/// ```
#[derive(Debug)]
pub struct LcsWriter<W: Write> {
    sink: W,
    version: LcsVersion,
    frame: Vec<u8>,
    n_written: u64,
}

impl<W: Write> LcsWriter<W> {
    /// Write the header to `sink` and return a writer for `version` records.
    ///
    /// # Errors
    /// Returns an error if the header cannot be written.
    pub fn new(mut sink: W, version: LcsVersion, stat: TraceStat) -> Result<Self> {
        let mut header = vec![0u8; TraceHeader::SIZE];
        TraceHeader::new(version.as_i64(), stat).write_to(&mut header);
        sink.write_all(&header)?;

        Ok(Self {
            sink,
            version,
            frame: vec![0u8; version.record_size()],
            n_written: 0,
        })
    }

    /// Append one record.
    pub fn write_request(&mut self, req: &Request) -> Result<()> {
        self.version.encode(req, &mut self.frame);
        self.sink.write_all(&self.frame)?;
        self.n_written += 1;
        Ok(())
    }

    /// Number of records written so far.
    #[inline]
    pub fn n_written(&self) -> u64 {
        self.n_written
    }

    /// Flush and return the sink.
    pub fn finish(mut self) -> Result<W> {
        self.sink.flush()?;
        debug!(
            version = self.version.as_i64(),
            n_req = self.n_written,
            "lcs trace written"
        );
        Ok(self.sink)
    }
}
