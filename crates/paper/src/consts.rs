use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

regex!(DOI_REGEX, r"10\.\d{4,9}/[-._;()/:A-Za-z0-9]+[A-Za-z0-9]");
// Author lists are joined with "and" in BibTeX, some services use semicolons.
regex!(AUTHOR_SEPARATOR_REGEX, r"(?i)\s+and\s+|\s*;\s*");
regex!(LEADING_YEAR_REGEX, r"^\s*(\d{4})");
