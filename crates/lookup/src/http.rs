//! Lookups against the live services over blocking HTTP.

use crate::arxiv;
use crate::crossref::SearchResponse;
use crate::error::{ErrorKind, Result};
use crate::Lookup;
use exn::ResultExt;
use sltools_config::LookupConfig;
use std::time::Duration;
use tracing::instrument;
use ureq::{Agent, AgentBuilder, Request, Response};

const BIBTEX_MIME: &str = "application/x-bibtex; charset=utf-8";

/// [`Lookup`] backed by doi.org content negotiation, the arXiv export API and
/// the Crossref search API.
pub struct HttpLookup {
    agent: Agent,
    config: LookupConfig,
}
impl HttpLookup {
    pub fn new(config: LookupConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let agent = AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .user_agent(&config.user_agent)
            .build();
        Self { agent, config }
    }

    /// Sends the request, mapping 404 to `None`.
    fn send(request: Request) -> Result<Option<Response>> {
        match request.call() {
            Ok(response) => Ok(Some(response)),
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(ureq::Error::Status(code, _)) => exn::bail!(ErrorKind::Status(code)),
            Err(ureq::Error::Transport(transport)) => Err(transport).or_raise(|| ErrorKind::Network),
        }
    }

    fn url(base: &str, path: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

impl Lookup for HttpLookup {
    #[instrument(skip(self))]
    fn by_arxiv(&self, id: &str) -> Result<Option<String>> {
        let request = self.agent.get(&self.config.arxiv_url).query("id_list", id.trim());
        let Some(response) = Self::send(request)? else {
            return Ok(None);
        };
        let body = response.into_string().or_raise(|| ErrorKind::MalformedResponse("arXiv"))?;
        Ok(arxiv::parse_feed(&body)?.map(|entry| entry.to_bibtex()))
    }

    #[instrument(skip(self))]
    fn by_doi(&self, doi: &str) -> Result<Option<String>> {
        let request = self.agent.get(&Self::url(&self.config.doi_url, doi.trim())).set("Accept", BIBTEX_MIME);
        let Some(response) = Self::send(request)? else {
            return Ok(None);
        };
        let body = response.into_string().or_raise(|| ErrorKind::MalformedResponse("DOI registry"))?;
        let body = body.trim();
        if body.is_empty() {
            return Ok(None);
        }
        // Registries without content negotiation answer with their landing page.
        if !body.starts_with('@') {
            exn::bail!(ErrorKind::MalformedResponse("DOI registry"));
        }
        Ok(Some(body.to_string()))
    }

    #[instrument(skip(self, query), fields(query_len = query.len()))]
    fn by_fulltext(&self, query: &str) -> Result<Option<String>> {
        let mut request = self
            .agent
            .get(&Self::url(&self.config.crossref_url, "works"))
            .query("query.bibliographic", query)
            .query("rows", "1")
            .query("select", "DOI,title");
        if let Some(mailto) = &self.config.mailto {
            request = request.query("mailto", mailto);
        }
        let Some(response) = Self::send(request)? else {
            return Ok(None);
        };
        let results: SearchResponse = response.into_json().or_raise(|| ErrorKind::MalformedResponse("Crossref"))?;
        let Some(work) = results.best() else {
            return Ok(None);
        };
        tracing::debug!(doi = %work.doi, title = ?work.title.first(), "Full-text search matched a work");
        self.by_doi(&work.doi)
    }
}
