//! Template-driven names for album directories, archives and paper files.
//!
//! A [`PathGenerator`] wraps a compiled [upon] template. Rendering goes
//! through [`Parameters`], which every nameable type implements to expose its
//! variables. Besides upon's built-in syntax, two helpers are registered:
//!
//! - `{{ value|slug }}` lowercases and hyphenates, dropping any quote
//!   characters beforehand.
//! - `{{ value|truncate: n }}` (or `truncate(value, n)`) keeps at most `n`
//!   bytes without splitting a character.
//!
//! Every rendered path is checked by [`validate_path`] before it is returned.
//!
//! # Example
//!
//! ```
//! use sltools_template::{Parameters, PathGenerator};
//!
//! struct Album(&'static str, &'static str);
//! impl Parameters for Album {
//!     fn parameters(&self) -> upon::Value {
//!         upon::value! { artist: self.0, album: self.1 }
//!     }
//! }
//!
//! let generator: PathGenerator = "{{ artist }}/{{ album|slug }}".parse().unwrap();
//! let path = generator.generate(&Album("Boards of Canada", "Music Has the Right")).unwrap();
//! assert_eq!(path, "Boards of Canada/music-has-the-right");
//! ```

pub mod error;
mod path;

use crate::error::{Error, ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use std::str::FromStr;
use tracing::instrument;
use upon::{Engine, Template};

pub use crate::path::validate as validate_path;

/// A value whose fields can be substituted into a [`PathGenerator`].
pub trait Parameters {
    fn parameters(&self) -> upon::Value;
}

/// A compiled naming template.
///
/// Parsing compiles eagerly, so a bad template is reported when the
/// configuration is loaded instead of on the first album or paper.
pub struct PathGenerator {
    engine: Engine<'static>,
    template: Template<'static>,
}

impl FromStr for PathGenerator {
    type Err = Error;

    fn from_str(source: &str) -> std::result::Result<Self, Self::Err> {
        if source.trim().is_empty() {
            exn::bail!(ErrorKind::Syntax);
        }
        let mut engine = Engine::new();
        helpers::register(&mut engine);
        let template = engine.compile(source.to_owned()).or_raise(|| ErrorKind::Syntax)?;
        Ok(Self { engine, template })
    }
}

impl PathGenerator {
    /// Renders `item` into a relative path, without extension.
    #[instrument(level = "debug", skip_all)]
    pub fn generate(&self, item: &impl Parameters) -> Result<String> {
        let rendered =
            self.template.render(&self.engine, item.parameters()).to_string().or_raise(|| ErrorKind::Render)?;
        tidy(&rendered)
    }

    /// Like [`generate`](Self::generate) with `.{ext}` appended. Leading dots
    /// on `ext` are ignored.
    pub fn generate_with_ext(&self, item: &impl Parameters, ext: impl AsRef<str>) -> Result<String> {
        let ext = ext.as_ref().trim().trim_matches('.');
        Ok(format!("{}.{ext}", self.generate(item)?))
    }

    /// Like [`generate_with_ext`](Self::generate_with_ext), but the result
    /// must be a bare filename.
    pub fn generate_filename(&self, item: &impl Parameters, ext: impl AsRef<str>) -> Result<String> {
        let name = self.generate_with_ext(item, ext)?;
        match name.contains('/') {
            true => exn::bail!(ErrorKind::InvalidPath(name)),
            false => Ok(name),
        }
    }
}

/// Strips whitespace around every `/`-separated segment, then validates.
fn tidy(rendered: &str) -> Result<String> {
    let joined = rendered.split('/').map(str::trim).collect::<Vec<_>>().join("/");
    let path = validate_path(joined.trim_matches('/'))?;
    path.to_str().map(str::to_owned).ok_or_raise(|| ErrorKind::InvalidPath(joined.clone()))
}

mod helpers {
    use rslug::slugify;
    use std::fmt::Write;
    use upon::{Engine, Value, fmt};

    /// Quote characters removed before slugifying, so that `"Hello"` doesn't
    /// become `-hello-`.
    const QUOTES: &[char] = &[
        '\'', '"', '`', '\u{2018}', '\u{2019}', '\u{201B}', '\u{201C}', '\u{201D}', '\u{201E}', '\u{00AB}',
        '\u{00BB}', '\u{2039}', '\u{203A}',
    ];

    fn slug(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
        let Value::String(text) = value else {
            return fmt::default(f, value);
        };
        let unquoted = text.replace(QUOTES, "");
        write!(f, "{}", slugify!(&unquoted))?;
        Ok(())
    }

    fn truncate(text: &str, max_bytes: usize) -> String {
        text[..text.floor_char_boundary(max_bytes)].to_owned()
    }

    pub(crate) fn register(engine: &mut Engine<'_>) {
        engine.add_formatter("slug", slug);
        engine.add_function("truncate", truncate);
    }
}
