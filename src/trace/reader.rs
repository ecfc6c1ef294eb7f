//! LCS Reader - streaming ingestion of binary LCS traces.
//!
//! The [`LcsReader`] handles:
//! - Validating the trace header before any record is read
//! - Decoding fixed-size record frames into [`Request`]s
//! - Reading forward or backward through the records
//! - Re-reading the header statistics without disturbing the stream position

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{error, info, warn};

use crate::common::config::LCS_HEADER_SIZE;
use crate::common::{Error, Result};
use crate::trace::header::{TraceHeader, TraceStat};
use crate::trace::record::LcsVersion;
use crate::trace::request::Request;

/// Direction in which records are consumed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReadDirection {
    /// First record to last.
    #[default]
    Forward,
    /// Last record to first.
    Backward,
}

/// Runtime options for an [`LcsReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Skip records whose object size is zero while reading forward.
    pub ignore_zero_size: bool,
    pub direction: ReadDirection,
}

impl ReaderConfig {
    pub fn with_ignore_zero_size(mut self, ignore: bool) -> Self {
        self.ignore_zero_size = ignore;
        self
    }

    pub fn with_direction(mut self, direction: ReadDirection) -> Self {
        self.direction = direction;
        self
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            ignore_zero_size: true,
            direction: ReadDirection::Forward,
        }
    }
}

/// Lifecycle of a reader.
///
/// ```text
/// Unopened ──setup──▶ HeaderValidated ──read──▶ Streaming ──EOF──▶ Exhausted
///                            ▲                                        │
///                            └────────────────── reset ───────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    Unopened,
    HeaderValidated,
    Streaming,
    Exhausted,
}

/// Streaming reader over an LCS trace.
///
/// # Stream Layout
/// ```text
/// ┌──────────────┬──────────┬──────────┬─────┬──────────┐
/// │ TraceHeader  │ Record 0 │ Record 1 │ ... │ Record N │
/// │ (1024 bytes) │          │          │     │          │
/// └──────────────┴──────────┴──────────┴─────┴──────────┘
/// Offset: 0     1024    1024 + S   ...
/// ```
/// where `S` is the record size fixed by the header version.
///
/// # Read Position
/// The reader tracks its own logical offset and seeks to it before every
/// frame read. Any other access to the source (such as [`trace_stat`])
/// therefore cannot perturb the position used by [`read_one_req`].
///
/// [`trace_stat`]: LcsReader::trace_stat
/// [`read_one_req`]: LcsReader::read_one_req
///
/// # Thread Safety
/// `LcsReader` is **single-threaded**. Use one reader per cursor.
#[derive(Debug)]
pub struct LcsReader<R> {
    source: R,
    config: ReaderConfig,
    state: ReaderState,
    /// Record layout, known once `setup` succeeds.
    version: Option<LcsVersion>,
    /// Offset of the first record.
    start_offset: u64,
    /// Offset of the next forward read, or the end of the next backward read.
    offset: u64,
    /// Scratch buffer holding one frame.
    frame: Vec<u8>,
}

impl LcsReader<File> {
    /// Open a trace file and validate its header.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or the header is invalid.
    pub fn open<P: AsRef<Path>>(path: P, config: ReaderConfig) -> Result<Self> {
        let file = File::open(&path)?;
        let mut reader = Self::new(file, config);
        reader.setup()?;
        Ok(reader)
    }
}

impl<R: Read + Seek> LcsReader<R> {
    /// Wrap a byte source. No bytes are read until [`setup`](Self::setup).
    pub fn new(source: R, config: ReaderConfig) -> Self {
        Self {
            source,
            config,
            state: ReaderState::Unopened,
            version: None,
            start_offset: 0,
            offset: 0,
            frame: Vec::new(),
        }
    }

    /// Read and validate the header, then position at the first record.
    ///
    /// # Errors
    /// - `Error::TruncatedHeader` if the stream is shorter than a header
    /// - `Error::InvalidStartMagic` / `Error::InvalidEndMagic` on a magic mismatch
    /// - `Error::UnsupportedVersion` if the version is above the supported maximum
    /// - `Error::InvalidStat` if the stat block has negative counts
    /// - `Error::UnknownRecordVersion` if the version has no record layout
    pub fn setup(&mut self) -> Result<()> {
        let header = self.read_header()?;

        if let Err(e) = header.verify() {
            error!(error = %e, "rejecting trace header");
            return Err(e);
        }

        let version = LcsVersion::from_i64(header.version).map_err(|e| {
            error!(error = %e, "rejecting trace header");
            e
        })?;

        self.version = Some(version);
        self.frame = vec![0u8; version.record_size()];
        self.start_offset = LCS_HEADER_SIZE as u64;
        self.state = ReaderState::HeaderValidated;
        self.rewind()?;

        info!(
            version = version.as_i64(),
            record_size = version.record_size(),
            start_offset = self.start_offset,
            n_req = header.stat.n_req,
            "lcs trace opened"
        );

        Ok(())
    }

    /// Read the next request into `req`.
    ///
    /// Returns `Ok(true)` when `req` holds a new request and `Ok(false)` at
    /// end-of-stream, in which case `req.valid` is cleared. A trailing
    /// partial frame counts as end-of-stream. Once exhausted, the reader
    /// stays exhausted until [`reset`](Self::reset).
    ///
    /// While reading forward with `ignore_zero_size` set, zero-size records
    /// are skipped and never surface.
    ///
    /// # Errors
    /// - `Error::NotSetUp` if `setup` has not succeeded
    /// - I/O errors from the source
    pub fn read_one_req(&mut self, req: &mut Request) -> Result<bool> {
        let version = self.version.ok_or(Error::NotSetUp)?;
        let size = version.record_size() as u64;

        if self.state == ReaderState::Exhausted {
            return Ok(self.exhaust(req));
        }

        loop {
            let frame_offset = match self.config.direction {
                ReadDirection::Forward => self.offset,
                ReadDirection::Backward => {
                    if self.offset < self.start_offset + size {
                        return Ok(self.exhaust(req));
                    }
                    self.offset - size
                }
            };

            let got = read_full_at(&mut self.source, frame_offset, &mut self.frame)?;
            if got < self.frame.len() {
                if got > 0 {
                    warn!(
                        offset = frame_offset,
                        bytes = got,
                        "dropping partial record at end of trace"
                    );
                }
                return Ok(self.exhaust(req));
            }

            self.state = ReaderState::Streaming;
            let decoded = version.decode(&self.frame);

            match self.config.direction {
                ReadDirection::Forward => {
                    self.offset += size;
                    if decoded.obj_size == 0 && self.config.ignore_zero_size {
                        continue;
                    }
                }
                ReadDirection::Backward => self.offset -= size,
            }

            *req = decoded;
            return Ok(true);
        }
    }

    /// Read the next request, or `None` at end-of-stream.
    pub fn next_request(&mut self) -> Result<Option<Request>> {
        let mut req = Request::default();
        if self.read_one_req(&mut req)? {
            Ok(Some(req))
        } else {
            Ok(None)
        }
    }

    /// Move back to the first record in the configured direction.
    ///
    /// # Errors
    /// Returns `Error::NotSetUp` if `setup` has not succeeded.
    pub fn reset(&mut self) -> Result<()> {
        if self.version.is_none() {
            return Err(Error::NotSetUp);
        }
        self.rewind()?;
        self.state = ReaderState::HeaderValidated;
        Ok(())
    }

    /// Skip up to `n` record frames in the configured direction.
    ///
    /// Frames are skipped as stored; zero-size suppression does not apply.
    /// Returns the number of frames actually skipped.
    pub fn skip_records(&mut self, n: u64) -> Result<u64> {
        let version = self.version.ok_or(Error::NotSetUp)?;
        let size = version.record_size() as u64;

        let skipped = match self.config.direction {
            ReadDirection::Forward => {
                let end = self.data_end()?;
                let available = end.saturating_sub(self.offset) / size;
                let skipped = n.min(available);
                self.offset += skipped * size;
                skipped
            }
            ReadDirection::Backward => {
                let available = self.offset.saturating_sub(self.start_offset) / size;
                let skipped = n.min(available);
                self.offset -= skipped * size;
                skipped
            }
        };

        Ok(skipped)
    }

    /// Number of complete records in the trace.
    pub fn num_requests(&mut self) -> Result<u64> {
        let version = self.version.ok_or(Error::NotSetUp)?;
        let end = self.data_end()?;
        Ok((end - self.start_offset) / version.record_size() as u64)
    }

    /// Re-read the header and return its statistics block.
    ///
    /// The read uses its own offset; the record stream position is unchanged.
    pub fn trace_stat(&mut self) -> Result<TraceStat> {
        Ok(self.read_header()?.stat)
    }

    /// Write a human-readable summary of the header statistics to `out`.
    pub fn print_trace_stat<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let stat = self.trace_stat()?;
        write!(out, "{}", stat)?;
        Ok(())
    }

    #[inline]
    pub fn state(&self) -> ReaderState {
        self.state
    }

    #[inline]
    pub fn version(&self) -> Option<LcsVersion> {
        self.version
    }

    /// Record size in bytes, once set up.
    #[inline]
    pub fn record_size(&self) -> Option<usize> {
        self.version.map(LcsVersion::record_size)
    }

    #[inline]
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Offset of the first record, once set up.
    #[inline]
    pub fn start_offset(&self) -> u64 {
        self.start_offset
    }

    /// Give back the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }

    fn read_header(&mut self) -> Result<TraceHeader> {
        let mut buf = vec![0u8; TraceHeader::SIZE];
        let got = read_full_at(&mut self.source, 0, &mut buf)?;
        if got < TraceHeader::SIZE {
            error!(got, expected = TraceHeader::SIZE, "trace shorter than its header");
            return Err(Error::TruncatedHeader {
                got,
                expected: TraceHeader::SIZE,
            });
        }
        Ok(TraceHeader::from_bytes(&buf))
    }

    fn rewind(&mut self) -> Result<()> {
        self.offset = match self.config.direction {
            ReadDirection::Forward => self.start_offset,
            ReadDirection::Backward => self.data_end()?,
        };
        Ok(())
    }

    /// Offset just past the last complete record.
    fn data_end(&mut self) -> Result<u64> {
        let size = self.record_size().ok_or(Error::NotSetUp)? as u64;
        let len = self.source.seek(SeekFrom::End(0))?;
        let data = len.saturating_sub(self.start_offset);
        Ok(self.start_offset + data / size * size)
    }

    fn exhaust(&mut self, req: &mut Request) -> bool {
        req.valid = false;
        self.state = ReaderState::Exhausted;
        false
    }
}

impl<R: Read + Seek> Iterator for LcsReader<R> {
    type Item = Result<Request>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_request().transpose()
    }
}

/// Fill `buf` from `offset`, stopping early only at end-of-stream.
///
/// Returns the number of bytes read.
fn read_full_at<R: Read + Seek>(source: &mut R, offset: u64, buf: &mut [u8]) -> Result<usize> {
    source.seek(SeekFrom::Start(offset))?;

    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(filled)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io::Cursor;
    use std::rc::Rc;

    use super::*;
    use crate::common::ObjId;
    use crate::trace::request::NextAccess;
    use crate::trace::writer::LcsWriter;

    fn build_trace(version: LcsVersion, reqs: &[Request]) -> Vec<u8> {
        let mut writer = LcsWriter::new(Vec::new(), version, TraceStat::default()).unwrap();
        for req in reqs {
            writer.write_request(req).unwrap();
        }
        writer.finish().unwrap()
    }

    fn open(bytes: Vec<u8>, config: ReaderConfig) -> LcsReader<Cursor<Vec<u8>>> {
        let mut reader = LcsReader::new(Cursor::new(bytes), config);
        reader.setup().unwrap();
        reader
    }

    #[test]
    fn test_state_transitions() {
        let bytes = build_trace(LcsVersion::V1, &[Request::new(1, 10)]);
        let mut reader = LcsReader::new(Cursor::new(bytes), ReaderConfig::default());
        assert_eq!(reader.state(), ReaderState::Unopened);

        reader.setup().unwrap();
        assert_eq!(reader.state(), ReaderState::HeaderValidated);

        assert!(reader.next_request().unwrap().is_some());
        assert_eq!(reader.state(), ReaderState::Streaming);

        assert!(reader.next_request().unwrap().is_none());
        assert_eq!(reader.state(), ReaderState::Exhausted);

        reader.reset().unwrap();
        assert_eq!(reader.state(), ReaderState::HeaderValidated);
        assert!(reader.next_request().unwrap().is_some());
    }

    #[test]
    fn test_read_before_setup() {
        let bytes = build_trace(LcsVersion::V1, &[Request::new(1, 10)]);
        let mut reader = LcsReader::new(Cursor::new(bytes), ReaderConfig::default());
        assert!(matches!(reader.next_request(), Err(Error::NotSetUp)));
    }

    #[test]
    fn test_end_of_stream_marks_request_invalid() {
        let bytes = build_trace(LcsVersion::V1, &[]);
        let mut reader = open(bytes, ReaderConfig::default());

        let mut req = Request::new(9, 9);
        assert!(!reader.read_one_req(&mut req).unwrap());
        assert!(!req.valid);
    }

    #[test]
    fn test_truncated_header() {
        let mut reader = LcsReader::new(Cursor::new(vec![0u8; 100]), ReaderConfig::default());
        assert!(matches!(
            reader.setup(),
            Err(Error::TruncatedHeader { got: 100, .. })
        ));
    }

    #[test]
    fn test_partial_trailing_frame_is_eof() {
        let mut bytes = build_trace(LcsVersion::V1, &[Request::new(1, 10)]);
        bytes.extend_from_slice(&[0xAB; 5]);
        let mut reader = open(bytes, ReaderConfig::default());

        assert_eq!(reader.num_requests().unwrap(), 1);
        assert!(reader.next_request().unwrap().is_some());
        assert!(reader.next_request().unwrap().is_none());
    }

    /// Cursor that counts every `read` call against it.
    struct CountingSource {
        inner: Cursor<Vec<u8>>,
        reads: Rc<Cell<usize>>,
    }

    impl Read for CountingSource {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.reads.set(self.reads.get() + 1);
            self.inner.read(buf)
        }
    }

    impl Seek for CountingSource {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    #[test]
    fn test_exhausted_reader_stops_reading() {
        let mut bytes = build_trace(LcsVersion::V1, &[Request::new(1, 10)]);
        bytes.extend_from_slice(&[0xAB; 5]);
        let reads = Rc::new(Cell::new(0));
        let source = CountingSource {
            inner: Cursor::new(bytes),
            reads: Rc::clone(&reads),
        };
        let mut reader = LcsReader::new(source, ReaderConfig::default());
        reader.setup().unwrap();

        assert!(reader.next_request().unwrap().is_some());
        assert!(reader.next_request().unwrap().is_none());
        let after_eof = reads.get();

        let mut req = Request::new(7, 7);
        for _ in 0..3 {
            assert!(!reader.read_one_req(&mut req).unwrap());
            assert!(!req.valid);
        }
        assert_eq!(reads.get(), after_eof);
        assert_eq!(reader.state(), ReaderState::Exhausted);

        reader.reset().unwrap();
        assert_eq!(reader.next_request().unwrap().unwrap().obj_id, ObjId(1));
    }

    #[test]
    fn test_backward_read() {
        let reqs: Vec<Request> = (1..=3).map(|i| Request::new(i, 10)).collect();
        let bytes = build_trace(LcsVersion::V2, &reqs);
        let mut reader = open(
            bytes,
            ReaderConfig::default().with_direction(ReadDirection::Backward),
        );

        let ids: Vec<ObjId> = reader.by_ref().map(|r| r.unwrap().obj_id).collect();
        assert_eq!(ids, vec![ObjId(3), ObjId(2), ObjId(1)]);
        assert_eq!(reader.state(), ReaderState::Exhausted);
    }

    #[test]
    fn test_backward_read_keeps_zero_size() {
        let reqs = [Request::new(1, 10), Request::new(2, 0)];
        let bytes = build_trace(LcsVersion::V1, &reqs);
        let mut reader = open(
            bytes,
            ReaderConfig::default().with_direction(ReadDirection::Backward),
        );

        let first = reader.next_request().unwrap().unwrap();
        assert_eq!(first.obj_id, ObjId(2));
        assert_eq!(first.obj_size, 0);
    }

    #[test]
    fn test_skip() {
        let reqs: Vec<Request> = (1..=5).map(|i| Request::new(i, 10)).collect();
        let bytes = build_trace(LcsVersion::V1, &reqs);
        let mut reader = open(bytes, ReaderConfig::default());

        assert_eq!(reader.skip_records(3).unwrap(), 3);
        assert_eq!(reader.next_request().unwrap().unwrap().obj_id, ObjId(4));
        assert_eq!(reader.skip_records(10).unwrap(), 1);
        assert!(reader.next_request().unwrap().is_none());
    }

    #[test]
    fn test_trace_stat_does_not_move_cursor() {
        let reqs: Vec<Request> = (1..=3)
            .map(|i| Request::new(i, 10).with_next_access(NextAccess::At(i as i64 + 5)))
            .collect();
        let bytes = build_trace(LcsVersion::V1, &reqs);
        let mut reader = open(bytes, ReaderConfig::default());

        assert_eq!(reader.next_request().unwrap().unwrap().obj_id, ObjId(1));
        let _ = reader.trace_stat().unwrap();
        assert_eq!(reader.next_request().unwrap().unwrap().obj_id, ObjId(2));
    }
}
