//! Bibliographic metadata lookups.
//!
//! Every lookup answers with a BibTeX record (or `None` when the service has
//! nothing for the request), so callers only ever parse one format:
//!
//! - **DOI registry**: `https://doi.org/<doi>` with BibTeX content
//!   negotiation, which works for Crossref and DataCite DOIs alike.
//! - **arXiv**: the export API's Atom feed, converted to BibTeX.
//! - **Full-text search**: Crossref's bibliographic search picks the best
//!   matching work, whose DOI is then resolved as above.
//!
//! [`HttpLookup`] talks to the live services. With the `mock` feature,
//! [`MockLookup`] provides canned answers and records calls.

mod arxiv;
mod crossref;
pub mod error;
mod http;
#[cfg(feature = "mock")]
mod mock;

pub use crate::arxiv::{ArxivEntry, parse_feed as parse_arxiv_feed};
use crate::error::Result;
pub use crate::http::HttpLookup;
#[cfg(feature = "mock")]
pub use crate::mock::{Call, MockLookup};

/// A source of BibTeX records.
///
/// Implementations return `Ok(None)` for "no such record" and reserve `Err`
/// for failures of the lookup itself.
pub trait Lookup {
    fn by_arxiv(&self, id: &str) -> Result<Option<String>>;
    fn by_doi(&self, doi: &str) -> Result<Option<String>>;
    fn by_fulltext(&self, query: &str) -> Result<Option<String>>;
}
