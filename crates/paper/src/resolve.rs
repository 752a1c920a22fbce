//! Metadata resolution.
//!
//! A [`Request`] (the user's overrides plus the text-search switch) turns into
//! a plan: an ordered list of [`Strategy`] values. The [`Resolver`] tries them
//! in order and the first record found wins. A strategy that fails is logged
//! and skipped; running out of strategies is [`ErrorKind::NoMetadata`].

use crate::error::{Error, ErrorKind, Result};
use crate::pdf::{PaperSource, find_doi};
use crate::record::Record;
use derive_more::Display;
use exn::ResultExt;
use sltools_lookup::Lookup;
use tracing::instrument;

/// User-supplied hints for one paper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub arxiv_id: Option<String>,
    pub doi: Option<String>,
    /// Replaces the first page's text as the full-text query, and must match
    /// the title of whatever that query finds.
    pub title: Option<String>,
    /// Whether full-text search may be attempted at all.
    pub text_search: bool,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    #[display("arXiv")]
    Arxiv,
    #[display("DOI registry")]
    DoiRegistry,
    #[display("full-text search")]
    FullText,
}

/// Result of a single strategy.
#[derive(Debug)]
pub enum Outcome {
    Found(Record),
    NotFound,
    /// The strategy could not complete; the next one is tried.
    Failed(Error),
}

impl Request {
    /// The ordered strategies for this request.
    ///
    /// An arXiv identifier is authoritative: nothing else is tried. Otherwise
    /// the DOI registry comes first, followed by full-text search when it is
    /// enabled.
    pub fn plan(&self) -> Vec<Strategy> {
        if self.arxiv_id.is_some() {
            return vec![Strategy::Arxiv];
        }
        let mut plan = vec![Strategy::DoiRegistry];
        if self.text_search {
            plan.push(Strategy::FullText);
        }
        plan
    }
}

pub struct Resolver<'a, L: Lookup + ?Sized> {
    lookup: &'a L,
    query_words: usize,
}

impl<'a, L: Lookup + ?Sized> Resolver<'a, L> {
    /// `query_words` caps the number of first-page words sent to full-text
    /// search.
    pub fn new(lookup: &'a L, query_words: usize) -> Self {
        Self { lookup, query_words }
    }

    /// Runs the request's plan against `source`.
    ///
    /// # Errors
    /// - [`ErrorKind::NoMetadata`] when every strategy came back empty.
    /// - [`ErrorKind::TitleMismatch`] when full-text search found a record
    ///   whose title differs from [`Request::title`].
    /// - [`ErrorKind::Pdf`] when the document itself cannot be read.
    #[instrument(skip_all, fields(path = %source.path().display()))]
    pub fn resolve<S: PaperSource + ?Sized>(&self, request: &Request, source: &S) -> Result<Record> {
        for strategy in request.plan() {
            tracing::debug!(%strategy, "Trying strategy");
            match self.attempt(strategy, request, source)? {
                Outcome::Found(record) => {
                    tracing::info!(%strategy, key = %record.key, "Metadata found");
                    return Ok(record);
                },
                Outcome::NotFound => tracing::debug!(%strategy, "Nothing found"),
                Outcome::Failed(err) => tracing::warn!(%strategy, error = ?err, "Strategy failed"),
            }
        }
        exn::bail!(ErrorKind::NoMetadata(source.path().to_path_buf()))
    }

    /// Runs one strategy. `Err` is reserved for problems that must stop the
    /// whole resolution.
    pub fn attempt<S: PaperSource + ?Sized>(
        &self,
        strategy: Strategy,
        request: &Request,
        source: &S,
    ) -> Result<Outcome> {
        match strategy {
            Strategy::Arxiv => {
                let Some(id) = request.arxiv_id.as_deref() else {
                    return Ok(Outcome::NotFound);
                };
                Ok(self.fetch(|| self.lookup.by_arxiv(id)))
            },
            Strategy::DoiRegistry => {
                let doi = match &request.doi {
                    Some(doi) => Some(doi.clone()),
                    None => find_doi(source)?,
                };
                let Some(doi) = doi else {
                    tracing::info!("No DOI found in document");
                    return Ok(Outcome::NotFound);
                };
                tracing::info!(%doi, "Querying DOI registry");
                let outcome = self.fetch(|| self.lookup.by_doi(&doi));
                if !matches!(outcome, Outcome::Found(_)) {
                    tracing::warn!(%doi, "Metadata couldn't be loaded from DOI");
                }
                Ok(outcome)
            },
            Strategy::FullText => self.full_text(request, source),
        }
    }

    fn full_text<S: PaperSource + ?Sized>(&self, request: &Request, source: &S) -> Result<Outcome> {
        let query = match &request.title {
            Some(title) => title.trim().to_lowercase(),
            None => first_words(&source.first_page_text()?, self.query_words),
        };
        if query.is_empty() {
            tracing::info!("No text to search with");
            return Ok(Outcome::NotFound);
        }
        let outcome = self.fetch(|| self.lookup.by_fulltext(&query));
        if let (Some(expected), Outcome::Found(record)) = (&request.title, &outcome) {
            let found = record.title().unwrap_or_default();
            if comparable(expected) != comparable(found) {
                exn::bail!(ErrorKind::TitleMismatch { expected: expected.clone(), found: found.to_string() });
            }
        }
        Ok(outcome)
    }

    fn fetch(&self, lookup: impl FnOnce() -> sltools_lookup::error::Result<Option<String>>) -> Outcome {
        match lookup().or_raise(|| ErrorKind::Lookup) {
            Ok(Some(bibtex)) => match Record::from_bibtex(&bibtex) {
                Ok(record) => Outcome::Found(record),
                Err(err) => Outcome::Failed(err),
            },
            Ok(None) => Outcome::NotFound,
            Err(err) => Outcome::Failed(err),
        }
    }
}

/// At most `limit` whitespace-separated words of `text`, single-spaced.
fn first_words(text: &str, limit: usize) -> String {
    text.split_whitespace().take(limit).collect::<Vec<_>>().join(" ")
}

fn comparable(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}
