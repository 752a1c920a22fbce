//! The album table: one row per album to import.

use crate::error::{ErrorKind, Result};
use csv::{ReaderBuilder, Trim};
use exn::ResultExt;
use serde::Deserialize;
use sltools_template::Parameters;
use std::path::Path;
use tracing::instrument;

/// One album to import. Columns other than these three are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AlbumRow {
    #[serde(rename = "Artist")]
    pub artist: String,
    #[serde(rename = "Album")]
    pub album: String,
    #[serde(rename = "Year")]
    pub year: String,
}

impl Parameters for AlbumRow {
    fn parameters(&self) -> upon::Value {
        upon::value! {
            artist: self.artist.as_str(),
            album: self.album.as_str(),
            year: self.year.as_str(),
        }
    }
}

/// Reads every row of the delimited file at `path`, in file order.
///
/// The first line is the header. Cells are trimmed.
#[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn read_table(path: impl AsRef<Path>, separator: char) -> Result<Vec<AlbumRow>> {
    let Ok(delimiter) = u8::try_from(separator) else {
        exn::bail!(ErrorKind::InvalidTable);
    };
    let mut reader =
        ReaderBuilder::new().delimiter(delimiter).trim(Trim::All).from_path(path).or_raise(|| ErrorKind::InvalidTable)?;
    let rows = reader.deserialize().collect::<std::result::Result<Vec<AlbumRow>, _>>().or_raise(|| ErrorKind::InvalidTable)?;
    tracing::debug!(rows = rows.len(), "Album table loaded");
    Ok(rows)
}

/// Parses a separator argument: a single ASCII character, or one of the
/// spellings of tab (`\t` typed literally, `tab`).
pub fn parse_separator(value: &str) -> std::result::Result<char, String> {
    match value {
        "\\t" | "tab" | "TAB" => return Ok('\t'),
        _ => {},
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(format!("separator must be a single ASCII character, got '{value}'")),
    }
}
