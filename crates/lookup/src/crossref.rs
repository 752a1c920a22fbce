//! Crossref `/works` search response models.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub message: SearchMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchMessage {
    #[serde(default)]
    pub items: Vec<Work>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Work {
    #[serde(rename = "DOI")]
    pub doi: String,
    #[serde(default)]
    pub title: Vec<String>,
}

impl SearchResponse {
    /// The best-ranked work, if Crossref matched anything at all.
    pub fn best(self) -> Option<Work> {
        self.message.items.into_iter().next()
    }
}
