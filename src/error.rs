//! Error types for raftlog.

use std::io;
use thiserror::Error;

/// Result type alias for raftlog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for segment operations.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// I/O error from file operations.
    #[error("I/O error: {0}")]
    Io(String),

    /// All index slots of the segment are occupied.
    ///
    /// This is the expected signal for the caller to roll over to a new
    /// segment; the file is left untouched.
    #[error("segment is full")]
    SegmentFull,

    /// The file header carries an unsupported format version.
    #[error("invalid segment version: {0}")]
    InvalidSegmentVersion(u16),

    /// CRC checksum mismatch on a read payload.
    #[error("CRC mismatch: expected {expected:#x}, got {actual:#x}")]
    CrcMismatch { expected: u32, actual: u32 },

    /// Data corruption detected.
    #[error("corruption detected: {0}")]
    Corruption(String),

    /// The segment was not opened in append mode.
    #[error("segment not opened in append mode")]
    NotAppendable,

    /// The segment was not opened in read mode.
    #[error("segment not opened in read mode")]
    NotReadable,

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl Error {
    /// Create a corruption error with the given message.
    pub fn corruption<S: Into<String>>(msg: S) -> Self {
        Error::Corruption(msg.into())
    }

    /// Create an I/O error with the given message.
    pub fn io<S: Into<String>>(msg: S) -> Self {
        Error::Io(msg.into())
    }

    /// Check if this error is recoverable.
    ///
    /// Only `SegmentFull` is recoverable: the caller rolls over to a fresh
    /// segment and retries there. Every other error invalidates the segment
    /// state.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::SegmentFull)
    }

    /// Check if this error indicates on-disk corruption.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::Corruption(_) | Error::CrcMismatch { .. } | Error::InvalidSegmentVersion(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::corruption("bad data");
        assert_eq!(format!("{}", err), "corruption detected: bad data");

        let err = Error::CrcMismatch {
            expected: 0xdead,
            actual: 0xbeef,
        };
        assert_eq!(
            format!("{}", err),
            "CRC mismatch: expected 0xdead, got 0xbeef"
        );

        let err = Error::InvalidSegmentVersion(2);
        assert_eq!(format!("{}", err), "invalid segment version: 2");
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::SegmentFull.is_recoverable());
        assert!(!Error::Io("disk on fire".into()).is_recoverable());
        assert!(!Error::NotAppendable.is_recoverable());
    }

    #[test]
    fn test_error_is_corruption() {
        assert!(Error::corruption("bad").is_corruption());
        assert!(Error::CrcMismatch {
            expected: 1,
            actual: 2
        }
        .is_corruption());
        assert!(Error::InvalidSegmentVersion(7).is_corruption());
        assert!(!Error::SegmentFull.is_corruption());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
