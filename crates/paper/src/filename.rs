//! Canonical paper filenames.
//!
//! A [`Record`] is reduced to the handful of values exposed to the filename
//! template:
//!
//! | Variable   | Value                                           |
//! |------------|-------------------------------------------------|
//! | `year`     | `year` field, or the year of `date`             |
//! | `initial`  | uppercase first letter of the first given name  |
//! | `family`   | first author's family name, first letter upper  |
//! | `given`    | first author's full given name                  |
//! | `title`    | title, normalized by [`normalize_title`]        |
//! | `key`      | BibTeX citation key                             |

use crate::error::{ErrorKind, Result};
use crate::names::parse_authors;
use crate::record::Record;
use exn::{OptionExt, ResultExt};
use sltools_config::PaperConfig;
use sltools_template::{Parameters, PathGenerator};

/// Makes a title usable inside a single filename component.
///
/// `": "` becomes `" - "`, `/` becomes `_`, straight and curly quotes are
/// removed and whitespace runs collapse to one space. Applying it twice
/// changes nothing.
pub fn normalize_title(title: &str) -> String {
    let stripped: String = title
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}'))
        .map(|c| if c == '/' { '_' } else { c })
        .collect();
    let mut title = collapse_whitespace(&stripped);
    // "a:: b" needs two passes.
    while title.contains(": ") {
        title = title.replace(": ", " - ");
    }
    collapse_whitespace(&title)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct FilenameParts<'a> {
    year: &'a str,
    initial: String,
    family: String,
    given: String,
    title: String,
    key: &'a str,
}
impl Parameters for FilenameParts<'_> {
    fn parameters(&self) -> upon::Value {
        upon::value! {
            year: self.year,
            initial: self.initial.as_str(),
            family: self.family.as_str(),
            given: self.given.as_str(),
            title: self.title.as_str(),
            key: self.key,
        }
    }
}

impl<'a> FilenameParts<'a> {
    fn from_record(record: &'a Record) -> Result<Self> {
        let author = record.author().unwrap_or_default();
        let invalid = || ErrorKind::InvalidAuthor(author.to_string());
        let Some(first) = parse_authors(author).into_iter().next() else {
            exn::bail!(invalid());
        };
        if first.is_unknown() {
            exn::bail!(invalid());
        }
        let Some(initial) = first.initial() else {
            exn::bail!(invalid());
        };
        let year = record.year().ok_or_raise(|| ErrorKind::MissingField("year"))?;
        let title = normalize_title(record.require("title")?);
        if title.is_empty() {
            exn::bail!(ErrorKind::MissingField("title"));
        }
        Ok(Self { year, initial, family: first.capitalized_family(), given: first.given, title, key: &record.key })
    }
}

/// Renders the filename (with `.pdf` extension) of a paper from its record.
pub struct FilenameGenerator {
    template: PathGenerator,
}
impl FilenameGenerator {
    pub fn new(template: &str) -> Result<Self> {
        let template = template.parse::<PathGenerator>().or_raise(|| ErrorKind::Template)?;
        Ok(Self { template })
    }

    pub fn from_config(config: &PaperConfig) -> Result<Self> {
        Self::new(&config.filename_template)
    }

    /// # Errors
    /// - [`ErrorKind::InvalidAuthor`] when the first author is absent,
    ///   `unknown`, or has no given name.
    /// - [`ErrorKind::MissingField`] when the year or title is absent.
    pub fn generate(&self, record: &Record) -> Result<String> {
        let parts = FilenameParts::from_record(record)?;
        self.template.generate_filename(&parts, "pdf").or_raise(|| ErrorKind::Template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn generator() -> FilenameGenerator {
        FilenameGenerator::from_config(&PaperConfig::default()).unwrap()
    }

    fn record(author: &str, year: &str, title: &str) -> Record {
        Record::from_bibtex(&format!("@article{{key, author = {{{author}}}, year = {{{year}}}, title = {{{title}}}}}"))
            .unwrap()
    }

    #[test]
    fn test_default_filename() {
        let name = generator().generate(&record("Doe, Jane", "2023", "A Study: Of Things")).unwrap();
        assert_eq!(name, "2023 - J. Doe - A Study - Of Things.pdf");
    }

    #[rstest]
    #[case("Jane Doe and Richard Roe")]
    #[case("Doe, Jane and Roe, Richard")]
    #[case("doe, jane; Roe, Richard")]
    fn test_first_author_formats(#[case] author: &str) {
        let name = generator().generate(&record(author, "2023", "Title")).unwrap();
        assert_eq!(name, "2023 - J. Doe - Title.pdf");
    }

    #[rstest]
    #[case("A: B", "A - B")]
    #[case("Input/Output", "Input_Output")]
    #[case("\u{201C}Quoted\u{201D} and 'single'", "Quoted and single")]
    #[case("Lots   of\n  space", "Lots of space")]
    #[case("It\u{2019}s \"fine\"", "Its fine")]
    fn test_normalize_title(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_title(raw), expected);
    }

    #[rstest]
    #[case("A Study: Of Things")]
    #[case("Input/Output: \u{2018}Quoted\u{2019}")]
    #[case("  a:b:  c ")]
    #[case("x:: y")]
    #[case("a:\nb")]
    fn test_normalize_title_is_idempotent(#[case] raw: &str) {
        let once = normalize_title(raw);
        assert_eq!(normalize_title(&once), once);
    }

    #[rstest]
    #[case("unknown")]
    #[case("Doe")]
    #[case("{World Health Organization}")]
    fn test_invalid_author(#[case] author: &str) {
        let err = generator().generate(&record(author, "2023", "Title")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidAuthor(_)));
    }

    #[test]
    fn test_missing_author() {
        let record = Record::from_bibtex("@misc{key, year = {2023}, title = {Title}}").unwrap();
        let err = generator().generate(&record).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidAuthor(_)));
    }

    #[test]
    fn test_missing_year() {
        let record = Record::from_bibtex("@misc{key, author = {Doe, Jane}, title = {Title}}").unwrap();
        let err = generator().generate(&record).unwrap_err();
        assert_eq!(*err, ErrorKind::MissingField("year"));
    }

    #[test]
    fn test_custom_template() {
        let generator = FilenameGenerator::new("{{ family }}{{ year }} {{ title|slug }}").unwrap();
        let name = generator.generate(&record("Doe, Jane", "2023", "A Study: Of Things")).unwrap();
        assert_eq!(name, "Doe2023 a-study-of-things.pdf");
    }

    #[test]
    fn test_invalid_template() {
        let err = FilenameGenerator::new("{{ title ").err().unwrap();
        assert_eq!(*err, ErrorKind::Template);
    }
}
