//! Paper Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A paper renaming error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for paper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// ### User Input Errors
/// - [`ErrorKind::InvalidAuthor`]
/// - [`ErrorKind::MissingField`]
/// - [`ErrorKind::NoMetadata`]
/// - [`ErrorKind::TitleMismatch`]
/// - [`ErrorKind::AlreadyExists`]
///
/// ### Dependency Errors
/// - [`ErrorKind::Pdf`]
/// - [`ErrorKind::Lookup`]
/// - [`ErrorKind::InvalidBibtex`]
/// - [`ErrorKind::Template`]
/// - [`ErrorKind::Io`]
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The PDF could not be opened or its text extracted.
    #[display("unable to read PDF")]
    Pdf,
    /// A metadata service failed to answer.
    #[display("metadata lookup failed")]
    Lookup,
    /// A service answered with something that isn't a usable BibTeX entry.
    #[display("invalid BibTeX: {_0}")]
    InvalidBibtex(#[error(not(source))] String),
    /// A field required for the filename is absent from the record.
    #[display("record has no {_0}")]
    MissingField(#[error(not(source))] &'static str),
    /// The first author is missing, `unknown`, or not a "Family, Given" name.
    #[display("record doesn't have a proper author: \"{_0}\"")]
    InvalidAuthor(#[error(not(source))] String),
    /// No resolution strategy produced a record.
    #[display("could not find any metadata for \"{}\"", _0.display())]
    NoMetadata(#[error(not(source))] PathBuf),
    /// Full-text search found a record whose title differs from the override.
    #[display("the retrieved entry is not the correct one, expected title \"{expected}\", retrieved \"{found}\"")]
    TitleMismatch { expected: String, found: String },
    /// The filename template could not be rendered.
    #[display("unable to generate filename")]
    Template,
    /// Another file already occupies the target name.
    #[display("refusing to overwrite existing file: {}", _0.display())]
    AlreadyExists(#[error(not(source))] PathBuf),
    /// Moving the file failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Lookup | Self::Io)
    }

    /// Returns `true` for problems with the input (the PDF, its metadata or
    /// the overrides) rather than with the program or its environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAuthor(_)
                | Self::MissingField(_)
                | Self::NoMetadata(_)
                | Self::TitleMismatch { .. }
                | Self::AlreadyExists(_)
        )
    }
}
