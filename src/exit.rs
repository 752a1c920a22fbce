//! Process exit codes.
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | success                                   |
//! | 1    | unexpected failure (I/O, decoding, …)     |
//! | 2    | bad input (table, archive, PDF metadata)  |
//! | 3    | no metadata found for the paper           |
//! | 4    | configuration or usage error              |

use std::error::Error as StdError;
use std::process::ExitCode;

pub const FAILURE: u8 = 1;
pub const USER_ERROR: u8 = 2;
pub const NO_METADATA: u8 = 3;
pub const CONFIG_ERROR: u8 = 4;

/// An error kind that knows which exit code it ends the process with.
pub trait ExitStatus {
    fn exit_code(&self) -> u8;
}

impl ExitStatus for sltools_config::error::ErrorKind {
    fn exit_code(&self) -> u8 {
        CONFIG_ERROR
    }
}

impl ExitStatus for crate::error::ErrorKind {
    fn exit_code(&self) -> u8 {
        match self {
            Self::MissingInput(_) => USER_ERROR,
            Self::LogFile(_) | Self::Subscriber => CONFIG_ERROR,
        }
    }
}

impl ExitStatus for sltools_album::error::ErrorKind {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Template => CONFIG_ERROR,
            kind if kind.is_user_error() => USER_ERROR,
            _ => FAILURE,
        }
    }
}

impl ExitStatus for sltools_paper::error::ErrorKind {
    fn exit_code(&self) -> u8 {
        match self {
            Self::NoMetadata(_) => NO_METADATA,
            Self::Template => CONFIG_ERROR,
            kind if kind.is_user_error() => USER_ERROR,
            _ => FAILURE,
        }
    }
}

/// Logs the error, prints its full tree to stderr and returns the exit code
/// of its kind.
pub fn report<K>(err: &exn::Exn<K>) -> ExitCode
where
    K: ExitStatus + StdError + Send + Sync + 'static,
{
    let kind: &K = err;
    tracing::error!("{kind}");
    eprintln!("{err:?}");
    ExitCode::from(kind.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use sltools_album::error::ErrorKind as AlbumErrorKind;
    use sltools_paper::error::ErrorKind as PaperErrorKind;
    use std::path::PathBuf;

    #[rstest]
    #[case(AlbumErrorKind::BadTrackName("bonus.flac".into()), USER_ERROR)]
    #[case(AlbumErrorKind::MissingCover(PathBuf::from("a")), USER_ERROR)]
    #[case(AlbumErrorKind::Io, FAILURE)]
    #[case(AlbumErrorKind::Incomplete { failed: 1, total: 2 }, FAILURE)]
    #[case(AlbumErrorKind::Template, CONFIG_ERROR)]
    fn test_album_codes(#[case] kind: AlbumErrorKind, #[case] code: u8) {
        assert_eq!(kind.exit_code(), code);
    }

    #[rstest]
    #[case(PaperErrorKind::NoMetadata(PathBuf::from("a.pdf")), NO_METADATA)]
    #[case(PaperErrorKind::TitleMismatch { expected: "a".into(), found: "b".into() }, USER_ERROR)]
    #[case(PaperErrorKind::InvalidAuthor("unknown".into()), USER_ERROR)]
    #[case(PaperErrorKind::Pdf, FAILURE)]
    #[case(PaperErrorKind::Template, CONFIG_ERROR)]
    fn test_paper_codes(#[case] kind: PaperErrorKind, #[case] code: u8) {
        assert_eq!(kind.exit_code(), code);
    }

    #[test]
    fn test_config_errors() {
        assert_eq!(sltools_config::error::ErrorKind::Load.exit_code(), CONFIG_ERROR);
        assert_eq!(crate::error::ErrorKind::MissingInput(PathBuf::from("x")).exit_code(), USER_ERROR);
    }
}
