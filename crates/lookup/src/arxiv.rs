//! arXiv Atom feed parsing.
//!
//! The arXiv export API answers with an Atom feed rather than BibTeX, so the
//! single entry is converted into an `@misc` BibTeX record shaped like the one
//! arXiv's own "Export BibTeX citation" produces.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use roxmltree::{Document, Node};
use std::fmt::Write;

/// One paper from an arXiv Atom feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArxivEntry {
    /// Versioned identifier, e.g. `1706.03762v7`.
    pub id: String,
    pub title: String,
    /// Names in "Given Family" order, as arXiv lists them.
    pub authors: Vec<String>,
    pub year: Option<String>,
    pub doi: Option<String>,
    pub primary_category: Option<String>,
}

/// Parses the first entry of an arXiv API response.
///
/// Returns `Ok(None)` for an empty feed or for arXiv's error pseudo-entry
/// (served with HTTP 200 for malformed or unknown identifiers).
pub fn parse_feed(xml: &str) -> Result<Option<ArxivEntry>> {
    let document = Document::parse(xml).or_raise(|| ErrorKind::MalformedResponse("arXiv"))?;
    let Some(entry) = document.root_element().children().find(|n| is(n, "entry")) else {
        return Ok(None);
    };
    let raw_id = child_text(&entry, "id").unwrap_or_default();
    if raw_id.contains("/api/errors") {
        tracing::debug!(id = %raw_id, "arXiv returned an error entry");
        return Ok(None);
    }
    let id = raw_id.rsplit_once("/abs/").map(|(_, id)| id.to_string()).unwrap_or(raw_id);
    let Some(title) = child_text(&entry, "title").filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let authors = entry
        .children()
        .filter(|n| is(n, "author"))
        .filter_map(|author| child_text(&author, "name"))
        .filter(|name| !name.is_empty())
        .collect();
    let year = child_text(&entry, "published").and_then(|date| date.get(..4).map(str::to_string));
    let doi = child_text(&entry, "doi");
    let primary_category = entry
        .children()
        .find(|n| is(n, "primary_category"))
        .and_then(|n| n.attribute("term"))
        .map(str::to_string);
    Ok(Some(ArxivEntry { id, title, authors, year, doi, primary_category }))
}

impl ArxivEntry {
    /// Citation key: first author's family name followed by the year.
    pub fn key(&self) -> String {
        let family = self.authors.first().and_then(|name| name.split_whitespace().last()).unwrap_or("arxiv");
        let mut key: String = family.chars().filter(|c| c.is_alphanumeric()).flat_map(char::to_lowercase).collect();
        if key.is_empty() {
            key.push_str("arxiv");
        }
        key.push_str(self.year.as_deref().unwrap_or(""));
        key
    }

    pub fn to_bibtex(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        _ = writeln!(out, "@misc{{{},", self.key());
        _ = writeln!(out, "  title = {{{}}},", sanitize(&self.title));
        if !self.authors.is_empty() {
            let authors = self.authors.iter().map(|a| sanitize(a)).collect::<Vec<_>>().join(" and ");
            _ = writeln!(out, "  author = {{{authors}}},");
        }
        if let Some(year) = &self.year {
            _ = writeln!(out, "  year = {{{year}}},");
        }
        _ = writeln!(out, "  eprint = {{{}}},", self.id);
        _ = writeln!(out, "  archivePrefix = {{arXiv}},");
        if let Some(category) = &self.primary_category {
            _ = writeln!(out, "  primaryClass = {{{category}}},");
        }
        if let Some(doi) = &self.doi {
            _ = writeln!(out, "  doi = {{{doi}}},");
        }
        _ = writeln!(out, "  url = {{https://arxiv.org/abs/{}}}", self.id);
        out.push('}');
        out
    }
}

fn is(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

/// Whitespace-collapsed text of the first child element called `name`.
fn child_text(node: &Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|n| is(n, name))
        .and_then(|n| n.text())
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Braces would unbalance the BibTeX field.
fn sanitize(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, '{' | '}')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <title type="html">ArXiv Query: id_list=1706.03762</title>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <published>2017-06-12T17:57:34Z</published>
    <title>Attention Is All
      You Need</title>
    <author><name>Ashish Vaswani</name></author>
    <author><name>Noam Shazeer</name></author>
    <arxiv:doi>10.48550/arXiv.1706.03762</arxiv:doi>
    <arxiv:primary_category term="cs.CL" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
</feed>"#;

    const ERROR_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/api/errors#incorrect_id_format_for_nope</id>
    <title>Error</title>
    <summary>incorrect id format for nope</summary>
  </entry>
</feed>"#;

    #[test]
    fn test_parses_entry() {
        let entry = parse_feed(FEED).unwrap().unwrap();
        assert_eq!(entry.id, "1706.03762v7");
        assert_eq!(entry.title, "Attention Is All You Need");
        assert_eq!(entry.authors, vec!["Ashish Vaswani", "Noam Shazeer"]);
        assert_eq!(entry.year.as_deref(), Some("2017"));
        assert_eq!(entry.doi.as_deref(), Some("10.48550/arXiv.1706.03762"));
        assert_eq!(entry.primary_category.as_deref(), Some("cs.CL"));
    }

    #[test]
    fn test_bibtex_output() {
        let bibtex = parse_feed(FEED).unwrap().unwrap().to_bibtex();
        assert!(bibtex.starts_with("@misc{vaswani2017,"));
        assert!(bibtex.contains("author = {Ashish Vaswani and Noam Shazeer},"));
        assert!(bibtex.contains("title = {Attention Is All You Need},"));
        assert!(bibtex.contains("year = {2017},"));
        assert!(bibtex.ends_with('}'));
    }

    #[test]
    fn test_error_entry_is_not_found() {
        assert_eq!(parse_feed(ERROR_FEED).unwrap(), None);
    }

    #[test]
    fn test_empty_feed_is_not_found() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>empty</title></feed>"#;
        assert_eq!(parse_feed(xml).unwrap(), None);
    }

    #[test]
    fn test_malformed_xml() {
        let err = parse_feed("<feed><entry>").unwrap_err();
        assert_eq!(*err, ErrorKind::MalformedResponse("arXiv"));
    }
}
