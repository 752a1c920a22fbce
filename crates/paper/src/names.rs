//! Author name normalization.
//!
//! BibTeX author lists arrive in every shape: `"Doe, Jane and Roe, Richard"`,
//! `"Jane Doe and Richard Roe"`, semicolon-separated lists from some services.
//! Everything is reduced to [`Name`] values with a family and a given part.
//!
//! Brace groups are never split: `{World Health Organization}` is a single
//! family name and `{Barnes and Noble}` a single author.

use crate::consts::AUTHOR_SEPARATOR_REGEX;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A person's name split into family and given parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub family: String,
    /// Empty when the source only had a single word.
    pub given: String,
}

impl Name {
    /// Parses either `"Family, Given"` or `"Given Family"`.
    ///
    /// For `"von Family, Jr, Given"` the given part is the last comma
    /// component. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if raw.is_empty() {
            return None;
        }
        let commas = top_level(&raw, ',');
        let (family, given) = match (commas.first(), commas.last()) {
            (Some(&first), Some(&last)) => (&raw[..first], &raw[last + 1..]),
            _ => match top_level(&raw, ' ').last() {
                Some(&space) => (&raw[space + 1..], &raw[..space]),
                None => (raw.as_str(), ""),
            },
        };
        Some(Self { family: unbrace(family), given: unbrace(given) })
    }

    /// Uppercase first letter of the given name.
    pub fn initial(&self) -> Option<String> {
        self.given.chars().find(|c| c.is_alphabetic()).map(|c| c.to_uppercase().collect())
    }

    /// Family name with its first character uppercased, the rest untouched
    /// (`"van Beethoven"` becomes `"Van Beethoven"`, `"McDonald"` stays).
    pub fn capitalized_family(&self) -> String {
        let mut chars = self.family.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// `"unknown"` is what several services put in place of a missing author.
    pub fn is_unknown(&self) -> bool {
        self.family.eq_ignore_ascii_case("unknown") || (self.family.is_empty() && self.given.is_empty())
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.given.is_empty() { write!(f, "{}", self.family) } else { write!(f, "{}, {}", self.family, self.given) }
    }
}

/// Splits an author field into names, dropping blank entries.
pub fn parse_authors(field: &str) -> Vec<Name> {
    let field = field.trim();
    let mut names = Vec::new();
    let mut start = 0;
    for separator in AUTHOR_SEPARATOR_REGEX.find_iter(field) {
        if depth(&field[..separator.start()]) > 0 {
            continue;
        }
        names.extend(Name::parse(&field[start..separator.start()]));
        start = separator.end();
    }
    names.extend(Name::parse(&field[start..]));
    names
}

/// Brace nesting depth at the end of `prefix`.
fn depth(prefix: &str) -> usize {
    prefix.chars().fold(0usize, |depth, c| match c {
        '{' => depth + 1,
        '}' => depth.saturating_sub(1),
        _ => depth,
    })
}

/// Byte offsets of `needle` outside of any brace group.
fn top_level(s: &str, needle: char) -> Vec<usize> {
    let mut depth = 0usize;
    let mut found = Vec::new();
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            c if c == needle && depth == 0 => found.push(i),
            _ => {}
        }
    }
    found
}

fn unbrace(part: &str) -> String {
    part.replace(['{', '}'], "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Doe, Jane", "Doe", "Jane")]
    #[case("Jane Doe", "Doe", "Jane")]
    #[case("Jane Mary Doe", "Doe", "Jane Mary")]
    #[case("  Doe ,   Jane  ", "Doe", "Jane")]
    #[case("von Neumann, Jr, John", "von Neumann", "John")]
    #[case("Plato", "Plato", "")]
    fn test_parse(#[case] raw: &str, #[case] family: &str, #[case] given: &str) {
        let name = Name::parse(raw).unwrap();
        assert_eq!(name.family, family);
        assert_eq!(name.given, given);
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(Name::parse("   "), None);
    }

    #[rstest]
    #[case("Doe, Jane and Roe, Richard")]
    #[case("Jane Doe and Richard Roe")]
    #[case("Jane Doe AND Richard Roe")]
    #[case("Doe, Jane; Roe, Richard")]
    #[case("Jane Doe;Richard Roe")]
    fn test_separators(#[case] field: &str) {
        let names = parse_authors(field).iter().map(Name::to_string).collect::<Vec<_>>();
        assert_eq!(names, ["Doe, Jane", "Roe, Richard"]);
    }

    #[rstest]
    #[case("{World Health Organization}", "World Health Organization", "")]
    #[case("Jane {de la Cruz}", "de la Cruz", "Jane")]
    #[case("{Doe, Smith}, Jane", "Doe, Smith", "Jane")]
    fn test_brace_groups_are_not_split(#[case] raw: &str, #[case] family: &str, #[case] given: &str) {
        let name = Name::parse(raw).unwrap();
        assert_eq!(name.family, family);
        assert_eq!(name.given, given);
    }

    #[test]
    fn test_separator_inside_braces_is_kept() {
        let names = parse_authors("{Barnes and Noble} and Doe, Jane; {R; D Labs}");
        let families = names.iter().map(|name| name.family.as_str()).collect::<Vec<_>>();
        assert_eq!(families, ["Barnes and Noble", "Doe", "R; D Labs"]);
    }

    #[test]
    fn test_and_inside_a_name_is_kept() {
        let names = parse_authors("Sandra Anderson and Alexander Hand");
        assert_eq!(names.len(), 2);
        assert_eq!(names[0].family, "Anderson");
        assert_eq!(names[1].family, "Hand");
    }

    #[test]
    fn test_initial_and_capitalization() {
        let name = Name::parse("van Beethoven, ludwig").unwrap();
        assert_eq!(name.initial().as_deref(), Some("L"));
        assert_eq!(name.capitalized_family(), "Van Beethoven");
        assert_eq!(Name::parse("Doe, J.").unwrap().initial().as_deref(), Some("J"));
        assert_eq!(Name::parse("Doe").unwrap().initial(), None);
    }

    #[rstest]
    #[case("unknown")]
    #[case("Unknown")]
    #[case("UNKNOWN, ")]
    fn test_unknown(#[case] raw: &str) {
        assert!(Name::parse(raw).unwrap().is_unknown());
    }
}
