use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

regex!(TRACK_REGEX, r"(\d{2}) (.*)");
regex!(CANONICAL_TRACK_REGEX, r"^\d{2} - ");
