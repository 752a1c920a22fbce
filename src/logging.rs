//! Subscriber installation.
//!
//! Log lines always go to stderr, and additionally to a file when one is
//! configured. Both sinks share the level and the output format.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use sltools_config::LogFormat;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// `-v` count to level for `bandcamp-import`.
pub const IMPORT_LEVELS: &[LevelFilter] = &[LevelFilter::WARN, LevelFilter::INFO, LevelFilter::DEBUG];
/// `-v` count to level for `pdf-rename`.
pub const RENAME_LEVELS: &[LevelFilter] = &[LevelFilter::INFO, LevelFilter::DEBUG];

const TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[day]/[month repr:short]/[year] [hour]:[minute]:[second]");

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Level chosen by a `-v` count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verbosity {
    pub level: LevelFilter,
    /// The count exceeded the highest level; that level was used instead.
    pub clamped: bool,
}
impl Verbosity {
    pub fn from_count(levels: &[LevelFilter], count: u8) -> Self {
        let index = usize::from(count);
        match levels.get(index) {
            Some(level) => Self { level: *level, clamped: false },
            None => Self { level: levels.last().copied().unwrap_or(LevelFilter::INFO), clamped: true },
        }
    }

    /// Emits the clamp warning, once, through the installed subscriber.
    pub fn warn_if_clamped(&self) {
        if self.clamped {
            tracing::warn!("Verbosity level is too high, using the highest ({})", self.level);
        }
    }
}

/// Everything needed to install the subscriber, resolved from command-line
/// flags and configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingOptions {
    pub level: LevelFilter,
    pub file: Option<PathBuf>,
    pub format: LogFormat,
}

impl LoggingOptions {
    /// Installs the global subscriber. `RUST_LOG` directives, when set, take
    /// precedence over [`level`](Self::level).
    pub fn init(&self) -> Result<()> {
        let mut layers: Vec<BoxedLayer> = vec![self.layer(std::io::stderr, true)];
        if let Some(path) = &self.file {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .or_raise(|| ErrorKind::LogFile(path.clone()))?;
            layers.push(self.layer(Arc::new(file), false));
        }
        let filter = EnvFilter::builder().with_default_directive(self.level.into()).from_env_lossy();
        tracing_subscriber::registry().with(layers).with(filter).try_init().or_raise(|| ErrorKind::Subscriber)
    }

    fn layer<W>(&self, writer: W, ansi: bool) -> BoxedLayer
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let timer = UtcTime::new(TIMESTAMP);
        match self.format {
            LogFormat::Text => fmt::layer().with_writer(writer).with_timer(timer).with_ansi(ansi).boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(writer).with_timer(timer).boxed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(IMPORT_LEVELS, 0, LevelFilter::WARN, false)]
    #[case(IMPORT_LEVELS, 2, LevelFilter::DEBUG, false)]
    #[case(IMPORT_LEVELS, 5, LevelFilter::DEBUG, true)]
    #[case(RENAME_LEVELS, 0, LevelFilter::INFO, false)]
    #[case(RENAME_LEVELS, 1, LevelFilter::DEBUG, false)]
    #[case(RENAME_LEVELS, 2, LevelFilter::DEBUG, true)]
    fn test_verbosity(
        #[case] levels: &[LevelFilter],
        #[case] count: u8,
        #[case] level: LevelFilter,
        #[case] clamped: bool,
    ) {
        assert_eq!(Verbosity::from_count(levels, count), Verbosity { level, clamped });
    }
}
