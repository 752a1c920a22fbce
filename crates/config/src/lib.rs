//! Layered configuration for the sltools binaries.
//!
//! Values are merged, lowest priority first, from:
//!
//! 1. built-in defaults ([`Config::default`]),
//! 2. a TOML file: the one passed explicitly, else `config.toml` in the
//!    platform configuration directory (`~/.config/sltools/` on Linux),
//! 3. environment variables prefixed with `SLTOOLS_`, sections separated by a
//!    double underscore (`SLTOOLS_LOOKUP__TIMEOUT_SECS=10`).
//!
//! Command-line flags are applied on top by the binaries themselves.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const ENV_PREFIX: &str = "SLTOOLS_";
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub lookup: LookupConfig,
    pub album: AlbumConfig,
    pub paper: PaperConfig,
}

/// Output format of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}
impl FromStr for LogFormat {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected 'text' or 'json')")),
        }
    }
}
impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Additional log sink; stderr is always written to.
    pub file: Option<PathBuf>,
}

/// Endpoints and HTTP behaviour of the metadata lookup services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Connect and read timeout, in seconds, for every request.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Contact address sent to Crossref to be routed to its "polite" pool.
    pub mailto: Option<String>,
    pub doi_url: String,
    pub arxiv_url: String,
    pub crossref_url: String,
}
impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: format!("sltools/{}", env!("CARGO_PKG_VERSION")),
            mailto: None,
            doi_url: "https://doi.org".to_string(),
            arxiv_url: "https://export.arxiv.org/api/query".to_string(),
            crossref_url: "https://api.crossref.org".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumConfig {
    /// Field separator of the input table.
    pub separator: char,
    /// Archive name (without `.zip`) looked up in the input directory.
    pub archive_template: String,
    /// Album directory created below the output directory.
    pub directory_template: String,
}
impl Default for AlbumConfig {
    fn default() -> Self {
        Self {
            separator: '\t',
            archive_template: "{{ artist }} - {{ album }}".to_string(),
            directory_template: "{{ artist }}/{{ year }} - {{ album }}".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperConfig {
    /// Filename (without `.pdf`) of a renamed paper.
    pub filename_template: String,
    /// Upper bound on the number of first-page words sent to full-text search.
    pub query_words: usize,
}
impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            filename_template: "{{ year }} - {{ initial }}. {{ family }} - {{ title }}".to_string(),
            query_words: 100,
        }
    }
}

impl Config {
    /// Loads and validates the layered configuration.
    ///
    /// An explicitly requested file must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config: Self = Self::figment(explicit)?.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the provider stack without extracting it.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment> {
        let file = match explicit {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path(),
        };
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file {
            tracing::debug!(path = %file.display(), "Configuration file");
            figment = figment.merge(Toml::file(file));
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// `config.toml` inside the platform configuration directory, if one can be
    /// determined for the current user.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "sltools").map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.album.separator.is_ascii() {
            exn::bail!(ErrorKind::Invalid { field: "album.separator", reason: "must be a single ASCII character" });
        }
        for (field, template) in [
            ("album.archive_template", &self.album.archive_template),
            ("album.directory_template", &self.album.directory_template),
            ("paper.filename_template", &self.paper.filename_template),
        ] {
            if template.trim().is_empty() {
                exn::bail!(ErrorKind::Invalid { field, reason: "template must not be empty" });
            }
        }
        if self.paper.query_words == 0 {
            exn::bail!(ErrorKind::Invalid { field: "paper.query_words", reason: "must be greater than zero" });
        }
        if self.lookup.timeout_secs == 0 {
            exn::bail!(ErrorKind::Invalid { field: "lookup.timeout_secs", reason: "must be greater than zero" });
        }
        Ok(())
    }
}
