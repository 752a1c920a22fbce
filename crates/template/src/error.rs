//! Template Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A template error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for template operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The template source could not be compiled.
    #[display("invalid template syntax")]
    Syntax,
    /// The template compiled, but rendering it against the parameters failed
    /// (usually a variable the template references doesn't exist).
    #[display("failed to render template")]
    Render,
    /// The rendered path is empty, escapes its root, or contains null bytes.
    #[display("invalid path: {_0}")]
    InvalidPath(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Rendering is deterministic.
        false
    }
}
