use crate::cover::generate_covers;
use crate::error::{ErrorKind, Result};
use crate::table::AlbumRow;
use crate::tracks::rename_tracks;
use exn::ResultExt;
use sltools_archive::{Archive, is_zip_path};
use sltools_config::AlbumConfig;
use sltools_template::PathGenerator;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Counts of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub imported: usize,
    pub failed: usize,
}

/// Imports album archives from an input directory into an output library.
///
/// For each row: locate the archive, extract it into the album directory,
/// rename the tracks, then generate cover thumbnails.
pub struct Importer {
    input_dir: PathBuf,
    output_dir: PathBuf,
    archive_names: PathGenerator,
    directories: PathGenerator,
    keep_going: bool,
}

impl Importer {
    pub fn new(config: &AlbumConfig, input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            archive_names: config.archive_template.parse::<PathGenerator>().or_raise(|| ErrorKind::Template)?,
            directories: config.directory_template.parse::<PathGenerator>().or_raise(|| ErrorKind::Template)?,
            keep_going: false,
        })
    }

    /// Continue with the next row when one fails instead of stopping.
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Imports every row, in order.
    ///
    /// # Errors
    /// Without keep-going, the first failing row's error. With it, failures
    /// are logged and [`ErrorKind::Incomplete`] is returned at the end if any
    /// row failed.
    pub fn import_all(&self, rows: &[AlbumRow]) -> Result<Summary> {
        let mut summary = Summary::default();
        for row in rows {
            tracing::info!("Import \"{}\" from \"{}\"", row.artist, row.album);
            match self.import(row) {
                Ok(_) => summary.imported += 1,
                Err(err) if self.keep_going => {
                    tracing::error!(artist = %row.artist, album = %row.album, error = ?err, "Album import failed");
                    summary.failed += 1;
                },
                Err(err) => return Err(err),
            }
        }
        if summary.failed > 0 {
            exn::bail!(ErrorKind::Incomplete { failed: summary.failed, total: rows.len() });
        }
        Ok(summary)
    }

    /// Imports a single album and returns its directory.
    #[instrument(skip_all, fields(artist = %row.artist, album = %row.album))]
    pub fn import(&self, row: &AlbumRow) -> Result<PathBuf> {
        let archive = self.archive_path(row)?;
        let album_dir = self.album_dir(row)?;

        tracing::debug!("Create directory \"{}\"", album_dir.display());
        fs::create_dir_all(&album_dir).or_raise(|| ErrorKind::Io)?;

        tracing::debug!("Extract \"{}\"", archive.display());
        Archive::open(&archive)
            .and_then(|mut archive| archive.extract_to(&album_dir))
            .or_raise(|| ErrorKind::Archive)?;

        rename_tracks(&album_dir)?;
        generate_covers(&album_dir)?;
        tracing::debug!("Album imported into \"{}\"", album_dir.display());
        Ok(album_dir)
    }

    /// Where the row's album is unpacked.
    pub fn album_dir(&self, row: &AlbumRow) -> Result<PathBuf> {
        let relative = self.directories.generate(row).or_raise(|| ErrorKind::Template)?;
        Ok(self.output_dir.join(relative))
    }

    /// The row's archive in the input directory. When the exact name is
    /// absent, a zip archive whose name differs only in letter case is
    /// accepted.
    ///
    /// # Errors
    /// [`ErrorKind::MissingArchive`] with the expected path.
    pub fn archive_path(&self, row: &AlbumRow) -> Result<PathBuf> {
        let name = self.archive_names.generate_filename(row, "zip").or_raise(|| ErrorKind::Template)?;
        let expected = self.input_dir.join(&name);
        if expected.is_file() {
            return Ok(expected);
        }
        match find_case_insensitive(&self.input_dir, &name)? {
            Some(found) => {
                tracing::debug!(expected = %expected.display(), found = %found.display(), "Using archive with different case");
                Ok(found)
            },
            None => exn::bail!(ErrorKind::MissingArchive(expected)),
        }
    }
}

fn find_case_insensitive(dir: &Path, name: &str) -> Result<Option<PathBuf>> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Ok(None);
    };
    for entry in entries {
        let path = entry.or_raise(|| ErrorKind::Io)?.path();
        let matches = path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.eq_ignore_ascii_case(name));
        if matches && path.is_file() && is_zip_path(&path) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}
