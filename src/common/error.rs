//! Error types for lcsim.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in lcsim.
///
/// Every variant except [`Error::Io`] describes a trace or configuration
/// that is unusable as a whole. Callers are expected to stop the simulation
/// rather than retry. End-of-stream and cache misses are not errors.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the underlying byte stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a full header could be read.
    #[error("truncated trace header: got {got} of {expected} bytes")]
    TruncatedHeader { got: usize, expected: usize },

    /// The header's start magic does not match.
    #[error("invalid trace file, start magic is wrong {0:#x}")]
    InvalidStartMagic(u64),

    /// The header's end magic does not match.
    #[error("invalid trace file, end magic is wrong {0:#x}")]
    InvalidEndMagic(u64),

    /// The header declares a version newer than this reader supports.
    #[error("invalid trace file, lcs version {0} is not supported")]
    UnsupportedVersion(i64),

    /// The header declares a version with no known record layout.
    #[error("invalid lcs version {0}")]
    UnknownRecordVersion(i64),

    /// The embedded statistics block is not sane.
    #[error("invalid trace file, n_req {n_req}, n_obj {n_obj}")]
    InvalidStat { n_req: i64, n_obj: i64 },

    /// The reader was used before `setup` succeeded.
    #[error("trace reader is not set up")]
    NotSetUp,

    /// A policy was handed parameters it does not accept.
    #[error("{policy} does not support any parameters, but got {params}")]
    UnsupportedParams { policy: String, params: String },

    /// A cache configuration value is out of range.
    #[error("invalid cache configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedVersion(9);
        assert_eq!(
            format!("{}", err),
            "invalid trace file, lcs version 9 is not supported"
        );

        let err = Error::InvalidStartMagic(0xdead);
        assert_eq!(
            format!("{}", err),
            "invalid trace file, start magic is wrong 0xdead"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_unsupported_params_message() {
        let err = Error::UnsupportedParams {
            policy: "FIFO_Reinsertion".to_string(),
            params: "k=2".to_string(),
        };
        assert!(err.to_string().contains("FIFO_Reinsertion"));
        assert!(err.to_string().contains("k=2"));
    }
}
