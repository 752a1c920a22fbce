//! Archive Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The archive file does not exist.
    #[display("archive not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The file exists but is not in a supported archive format.
    #[display("unsupported archive format: {}", _0.display())]
    UnsupportedFormat(#[error(not(source))] PathBuf),
    /// Archive is corrupt or malformed. Don't retry with the same input.
    #[display("invalid or corrupted archive")]
    InvalidData,
    /// An entry would be written outside of the destination directory.
    #[display("unsafe archive entry: {_0}")]
    UnsafeEntry(#[error(not(source))] String),
    /// An I/O operation failed while reading the archive or writing entries.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::InvalidData.to_string(), "invalid or corrupted archive");
        assert_eq!(ErrorKind::UnsafeEntry("../x".to_string()).to_string(), "unsafe archive entry: ../x");
        assert_eq!(ErrorKind::NotFound(PathBuf::from("a.zip")).to_string(), "archive not found: a.zip");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(!ErrorKind::InvalidData.is_retryable());
        assert!(!ErrorKind::UnsafeEntry(String::new()).is_retryable());
        assert!(ErrorKind::Io.is_retryable());
    }
}
