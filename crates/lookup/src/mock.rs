//! In-memory [`Lookup`] for tests in other crates.

use crate::Lookup;
use crate::error::{ErrorKind, Result};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// A request received by [`MockLookup`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Arxiv(String),
    Doi(String),
    FullText(String),
}

/// Canned responses keyed by identifier. Unknown identifiers are "not found";
/// identifiers registered with [`failing_doi`](Self::failing_doi) fail with a
/// network error.
#[derive(Debug, Default)]
pub struct MockLookup {
    arxiv: HashMap<String, String>,
    doi: HashMap<String, String>,
    failing: HashSet<String>,
    fulltext: Option<String>,
    calls: RefCell<Vec<Call>>,
}
impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_arxiv(mut self, id: impl Into<String>, bibtex: impl Into<String>) -> Self {
        self.arxiv.insert(id.into(), bibtex.into());
        self
    }

    pub fn with_doi(mut self, doi: impl Into<String>, bibtex: impl Into<String>) -> Self {
        self.doi.insert(doi.into(), bibtex.into());
        self
    }

    pub fn failing_doi(mut self, doi: impl Into<String>) -> Self {
        self.failing.insert(doi.into());
        self
    }

    /// Answer every full-text query with this record.
    pub fn with_fulltext(mut self, bibtex: impl Into<String>) -> Self {
        self.fulltext = Some(bibtex.into());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl Lookup for MockLookup {
    fn by_arxiv(&self, id: &str) -> Result<Option<String>> {
        self.calls.borrow_mut().push(Call::Arxiv(id.to_string()));
        Ok(self.arxiv.get(id).cloned())
    }

    fn by_doi(&self, doi: &str) -> Result<Option<String>> {
        self.calls.borrow_mut().push(Call::Doi(doi.to_string()));
        if self.failing.contains(doi) {
            exn::bail!(ErrorKind::Network);
        }
        Ok(self.doi.get(doi).cloned())
    }

    fn by_fulltext(&self, query: &str) -> Result<Option<String>> {
        self.calls.borrow_mut().push(Call::FullText(query.to_string()));
        Ok(self.fulltext.clone())
    }
}
