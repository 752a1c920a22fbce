use crate::consts::LEADING_YEAR_REGEX;
use crate::error::{ErrorKind, Result};
use biblatex::{Bibliography, Chunk, Spanned};
use exn::OptionExt;
use std::collections::BTreeMap;

/// The first entry of a BibTeX document, with each field flattened to plain
/// text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    fields: BTreeMap<String, String>,
}

impl Record {
    /// Parses `source` and keeps its first entry. Field names are lowercased;
    /// brace groups and math are flattened into their text, except in `author`
    /// where brace groups are kept so that protected names stay whole.
    pub fn from_bibtex(source: &str) -> Result<Self> {
        let bibliography = match Bibliography::parse(source) {
            Ok(bibliography) => bibliography,
            Err(e) => exn::bail!(ErrorKind::InvalidBibtex(e.to_string())),
        };
        let entry = bibliography.into_iter().next().ok_or_raise(|| ErrorKind::InvalidBibtex("no entry".into()))?;
        let fields = entry
            .fields
            .iter()
            .map(|(name, chunks)| {
                let name = name.to_lowercase();
                let value = flatten(chunks, name == "author");
                (name, value)
            })
            .filter(|(_, value)| !value.is_empty())
            .collect();
        Ok(Self { key: entry.key, fields })
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn author(&self) -> Option<&str> {
        self.get("author")
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    /// The `year` field, or the leading year of `date` when only the latter
    /// is present.
    pub fn year(&self) -> Option<&str> {
        self.get("year").or_else(|| {
            let date = self.get("date")?;
            LEADING_YEAR_REGEX.captures(date).and_then(|c| c.get(1)).map(|m| m.as_str())
        })
    }

    pub fn require(&self, field: &'static str) -> Result<&str> {
        self.get(field).ok_or_raise(|| ErrorKind::MissingField(field))
    }
}

fn flatten(chunks: &[Spanned<Chunk>], keep_groups: bool) -> String {
    let text = chunks
        .iter()
        .map(|chunk| match &chunk.v {
            Chunk::Verbatim(s) if keep_groups => format!("{{{s}}}"),
            Chunk::Normal(s) | Chunk::Verbatim(s) | Chunk::Math(s) => s.clone(),
        })
        .collect::<String>();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
