//! Path validation for rendered templates.

use crate::error::{ErrorKind, Result};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Resolves a rendered relative path lexically and rejects it if it would
/// climb above its starting directory, is absolute, is empty, or contains a
/// NUL byte.
///
/// `.` segments and `..` segments that stay inside the path are folded away.
/// Backslashes and other platform quirks are left as they are.
///
/// ```
/// use std::path::Path;
/// use sltools_template::validate_path;
/// assert!(validate_path("Artist/2020 - Album").is_ok());
/// assert!(validate_path("Artist/../../elsewhere").is_err());
/// assert_eq!(validate_path("a/./b//c/").unwrap(), Path::new("a/b/c"));
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let rejected = || ErrorKind::InvalidPath(path.display().to_string());
    let mut kept: Vec<&OsStr> = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => exn::bail!(rejected()),
            Component::CurDir => continue,
            Component::ParentDir if kept.pop().is_some() => continue,
            Component::ParentDir => exn::bail!(rejected()),
            // The OS would silently cut the name at the NUL.
            Component::Normal(name) if name.as_encoded_bytes().contains(&0) => exn::bail!(rejected()),
            Component::Normal(name) => kept.push(name),
        }
    }
    if kept.is_empty() {
        exn::bail!(rejected());
    }
    Ok(kept.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths() {
        assert_eq!(validate("Artist/2020 - Album").unwrap(), Path::new("Artist/2020 - Album"));
        assert_eq!(validate("2023 - J. Doe - Title.pdf").unwrap(), Path::new("2023 - J. Doe - Title.pdf"));
    }

    #[test]
    fn test_dots_inside_names_are_kept() {
        // "...And You Will Know Us" is a normal component, not a traversal.
        assert_eq!(validate("...And You/2002 - Source").unwrap(), Path::new("...And You/2002 - Source"));
    }

    #[test]
    fn test_escaping_paths_are_rejected() {
        assert!(validate("../etc/passwd").is_err());
        assert!(validate("a/../../b").is_err());
        assert!(validate("..").is_err());
        assert!(validate("/etc/passwd").is_err());
        assert_eq!(validate("a/b/..").unwrap(), Path::new("a"));
    }

    #[test]
    fn test_empty_and_null() {
        assert!(validate("").is_err());
        assert!(validate("./").is_err());
        assert!(validate("a\0b").is_err());
    }
}
