//! Academic paper renaming.
//!
//! Given a PDF and optional hints (arXiv identifier, DOI, title), resolve the
//! paper's bibliographic record through a [`Lookup`](sltools_lookup::Lookup)
//! and rename the file after it, e.g.
//! `2023 - J. Doe - A Study - Of Things.pdf`.
//!
//! - [`resolve`]: strategy planning and first-found-wins resolution.
//! - [`filename`]: canonical filenames from records.
//! - [`names`]: author name normalization.
//! - [`pdf`]: DOI and text extraction from the document.

mod consts;
pub mod error;
pub mod filename;
pub mod names;
pub mod pdf;
mod record;
mod rename;
pub mod resolve;

pub use crate::filename::{FilenameGenerator, normalize_title};
pub use crate::pdf::{PaperSource, PdfDocument};
pub use crate::record::Record;
pub use crate::rename::{Action, Renamer};
pub use crate::resolve::{Request, Resolver, Strategy};
