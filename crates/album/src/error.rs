//! Album Import Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An album import error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for album import operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// ### User Input Errors
/// - [`ErrorKind::InvalidTable`]
/// - [`ErrorKind::MissingArchive`]
/// - [`ErrorKind::BadTrackName`]
/// - [`ErrorKind::MissingCover`]
///
/// ### Other Errors
/// - [`ErrorKind::Archive`]
/// - [`ErrorKind::Image`]
/// - [`ErrorKind::Template`]
/// - [`ErrorKind::Io`]
/// - [`ErrorKind::Incomplete`]
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The album table is unreadable or lacks the `Artist`, `Album` or `Year`
    /// columns.
    #[display("invalid album table")]
    InvalidTable,
    #[display("album archive not found: {}", _0.display())]
    MissingArchive(#[error(not(source))] PathBuf),
    /// A `.flac` file doesn't contain a two-digit track number followed by a
    /// space.
    #[display("bad format for track \"{_0}\"")]
    BadTrackName(#[error(not(source))] String),
    /// Neither `cover.jpg` nor `cover.png` exists in the album directory.
    #[display("no cover.jpg or cover.png in {}", _0.display())]
    MissingCover(#[error(not(source))] PathBuf),
    #[display("unable to extract album archive")]
    Archive,
    /// Cover art could not be decoded, resized or encoded.
    #[display("unable to process cover art")]
    Image,
    #[display("unable to generate path from template")]
    Template,
    #[display("I/O error")]
    Io,
    /// With keep-going enabled, some rows failed.
    #[display("{failed} of {total} albums failed to import")]
    Incomplete { failed: usize, total: usize },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io)
    }

    /// Returns `true` for problems with the table or the downloaded files
    /// rather than with the program or its environment.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidTable | Self::MissingArchive(_) | Self::BadTrackName(_) | Self::MissingCover(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ErrorKind::BadTrackName("bonus.flac".into()).to_string(), "bad format for track \"bonus.flac\"");
        assert_eq!(ErrorKind::Incomplete { failed: 1, total: 3 }.to_string(), "1 of 3 albums failed to import");
    }

    #[test]
    fn test_classification() {
        assert!(ErrorKind::MissingCover(PathBuf::from("a")).is_user_error());
        assert!(!ErrorKind::Image.is_user_error());
        assert!(ErrorKind::Io.is_retryable());
        assert!(!ErrorKind::BadTrackName("x".into()).is_retryable());
    }
}
