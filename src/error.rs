//! Binary Error Types
//!
//! Errors raised by the binaries themselves, before or around the library
//! crates doing the actual work.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A binary-level error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for binary-level operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The log file could not be opened for appending.
    #[display("unable to open log file: {}", _0.display())]
    LogFile(#[error(not(source))] PathBuf),
    /// A global subscriber was already installed.
    #[display("unable to install log subscriber")]
    Subscriber,
    /// The file given on the command line does not exist.
    #[display("no such file: {}", _0.display())]
    MissingInput(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
