//! Album archive import.
//!
//! Reads a table of albums (`Artist`, `Album`, `Year`) and, for each row,
//! unpacks `{Artist} - {Album}.zip` from the download directory into
//! `{Artist}/{Year} - {Album}/` of the music library, renames the tracks to
//! `NN - Title.flac` and writes 120x120 and 60x60 cover thumbnails.
//!
//! Both the archive name and the album directory come from templates
//! ([`AlbumConfig`](sltools_config::AlbumConfig)).

mod consts;
pub mod cover;
pub mod error;
mod import;
pub mod table;
pub mod tracks;

pub use crate::import::{Importer, Summary};
pub use crate::table::{AlbumRow, parse_separator, read_table};
