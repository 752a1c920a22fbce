use crate::error::{ErrorKind, Result};
use crate::filename::FilenameGenerator;
use crate::pdf::PaperSource;
use crate::resolve::{Request, Resolver};
use exn::ResultExt;
use sltools_lookup::Lookup;
use std::fs;
use std::path::PathBuf;
use tracing::instrument;

/// What happened to the paper. Each variant carries the target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Renamed(PathBuf),
    /// The file already had its canonical name.
    AlreadyCorrect(PathBuf),
    /// Nothing was moved; the path is where it would have gone.
    DryRun(PathBuf),
}

/// Resolves a paper's metadata and moves it to its canonical name in the
/// same directory.
pub struct Renamer<'a, L: Lookup + ?Sized> {
    resolver: Resolver<'a, L>,
    filenames: FilenameGenerator,
    dry_run: bool,
}

impl<'a, L: Lookup + ?Sized> Renamer<'a, L> {
    pub fn new(resolver: Resolver<'a, L>, filenames: FilenameGenerator, dry_run: bool) -> Self {
        Self { resolver, filenames, dry_run }
    }

    #[instrument(skip_all, fields(path = %source.path().display(), dry_run = self.dry_run))]
    pub fn rename<S: PaperSource + ?Sized>(&self, request: &Request, source: &S) -> Result<Action> {
        let record = self.resolver.resolve(request, source)?;
        let filename = self.filenames.generate(&record)?;
        let current = source.path();
        let target = current.with_file_name(&filename);

        if target == current {
            tracing::info!(%filename, "Already correctly named");
            return Ok(Action::AlreadyCorrect(target));
        }
        if target.exists() {
            exn::bail!(ErrorKind::AlreadyExists(target));
        }
        if self.dry_run {
            tracing::info!("[dry-run] {} renamed to {}", current.display(), target.display());
            return Ok(Action::DryRun(target));
        }
        fs::rename(current, &target).or_raise(|| ErrorKind::Io)?;
        tracing::info!("{} renamed to {}", current.display(), target.display());
        Ok(Action::Renamed(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::tests::{BIBTEX, FakePaper};
    use sltools_config::PaperConfig;
    use sltools_lookup::MockLookup;
    use std::path::Path;
    use tempfile::TempDir;

    const EXPECTED: &str = "2023 - J. Doe - A Study - Of Things.pdf";

    fn paper_at(path: &Path) -> FakePaper {
        fs::write(path, b"%PDF-1.5").unwrap();
        let mut paper = FakePaper::new("");
        paper.path = path.to_path_buf();
        paper
    }

    fn renamer(lookup: &MockLookup, dry_run: bool) -> Renamer<'_, MockLookup> {
        let filenames = FilenameGenerator::from_config(&PaperConfig::default()).unwrap();
        Renamer::new(Resolver::new(lookup, 100), filenames, dry_run)
    }

    fn request() -> Request {
        Request { doi: Some("10.1/x".into()), ..Request::default() }
    }

    #[test]
    fn test_renames_in_place() {
        let dir = TempDir::new().unwrap();
        let paper = paper_at(&dir.path().join("download.pdf"));
        let lookup = MockLookup::new().with_doi("10.1/x", BIBTEX);

        let action = renamer(&lookup, false).rename(&request(), &paper).unwrap();
        assert_eq!(action, Action::Renamed(dir.path().join(EXPECTED)));
        assert!(dir.path().join(EXPECTED).is_file());
        assert!(!dir.path().join("download.pdf").exists());
    }

    #[test]
    fn test_dry_run_leaves_file() {
        let dir = TempDir::new().unwrap();
        let paper = paper_at(&dir.path().join("download.pdf"));
        let lookup = MockLookup::new().with_doi("10.1/x", BIBTEX);

        let action = renamer(&lookup, true).rename(&request(), &paper).unwrap();
        assert_eq!(action, Action::DryRun(dir.path().join(EXPECTED)));
        assert!(dir.path().join("download.pdf").is_file());
        assert!(!dir.path().join(EXPECTED).exists());
    }

    #[test]
    fn test_already_correct() {
        let dir = TempDir::new().unwrap();
        let paper = paper_at(&dir.path().join(EXPECTED));
        let lookup = MockLookup::new().with_doi("10.1/x", BIBTEX);

        let action = renamer(&lookup, false).rename(&request(), &paper).unwrap();
        assert_eq!(action, Action::AlreadyCorrect(dir.path().join(EXPECTED)));
        assert!(dir.path().join(EXPECTED).is_file());
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let paper = paper_at(&dir.path().join("download.pdf"));
        fs::write(dir.path().join(EXPECTED), b"other").unwrap();
        let lookup = MockLookup::new().with_doi("10.1/x", BIBTEX);

        let err = renamer(&lookup, false).rename(&request(), &paper).unwrap_err();
        assert!(matches!(&*err, ErrorKind::AlreadyExists(_)));
        assert_eq!(fs::read(dir.path().join(EXPECTED)).unwrap(), b"other");
    }

    #[test]
    fn test_unresolved_paper_is_untouched() {
        let dir = TempDir::new().unwrap();
        let paper = paper_at(&dir.path().join("download.pdf"));
        let lookup = MockLookup::new();

        let err = renamer(&lookup, false).rename(&request(), &paper).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NoMetadata(_)));
        assert!(dir.path().join("download.pdf").is_file());
    }
}
