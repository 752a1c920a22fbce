//! Lookup Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A lookup error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for lookup operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// "Not found" is not an error: lookups return `Ok(None)` for it.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The service answered with an unexpected HTTP status.
    #[display("service responded with HTTP {_0}")]
    Status(#[error(not(source))] u16),
    /// The request never got an answer (DNS, connection, TLS, timeout).
    #[display("network error")]
    Network,
    /// The response body could not be decoded.
    #[display("malformed response from {_0}")]
    MalformedResponse(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status(code) => matches!(code, 408 | 429 | 500 | 502 | 503 | 504),
            Self::Network => true,
            Self::MalformedResponse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Status(503), true)]
    #[case(ErrorKind::Status(429), true)]
    #[case(ErrorKind::Status(400), false)]
    #[case(ErrorKind::Network, true)]
    #[case(ErrorKind::MalformedResponse("arXiv"), false)]
    fn test_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorKind::Status(500).to_string(), "service responded with HTTP 500");
        assert_eq!(ErrorKind::MalformedResponse("Crossref").to_string(), "malformed response from Crossref");
    }
}
