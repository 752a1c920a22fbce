//! Album archive detection and extraction.
//!
//! Store downloads arrive as zip archives. This crate wraps the [`zip`] crate
//! behind a small [`Archive`] type that:
//!
//! - **Detects** the format from magic bytes before handing the file to the
//!   decoder, so a mislabelled download fails with
//!   [`UnsupportedFormat`](error::ErrorKind::UnsupportedFormat) instead of an
//!   opaque decoding error.
//! - **Extracts** every entry into a destination directory, refusing entries
//!   whose names would escape it.

mod detect;
pub mod error;

pub use crate::detect::{is_zip_magic, is_zip_path};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::instrument;
use zip::ZipArchive;

/// An opened, validated zip archive.
pub struct Archive {
    path: PathBuf,
    inner: ZipArchive<File>,
}
impl Archive {
    /// Opens the archive at `path`, checking its magic bytes first.
    #[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => exn::bail!(ErrorKind::NotFound(path)),
            Err(e) => Err(e).or_raise(|| ErrorKind::Io)?,
        };
        let head = detect::sniff(&mut file).or_raise(|| ErrorKind::Io)?;
        if !is_zip_magic(&head) {
            exn::bail!(ErrorKind::UnsupportedFormat(path));
        }
        file.seek(SeekFrom::Start(0)).or_raise(|| ErrorKind::Io)?;
        let inner = ZipArchive::new(file).or_raise(|| ErrorKind::InvalidData)?;
        Ok(Self { path, inner })
    }

    /// Path the archive was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries (files and directories) in the archive.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Extracts every entry below `destination`, creating it if needed.
    /// Existing files are overwritten.
    ///
    /// Returns the paths of the extracted files (directories excluded), in
    /// archive order.
    ///
    /// # Errors
    /// [`ErrorKind::UnsafeEntry`] if an entry name is absolute or traverses
    /// outside of `destination`; nothing after that entry is written.
    #[instrument(skip_all, fields(archive = %self.path.display(), destination = %destination.as_ref().display()))]
    pub fn extract_to(&mut self, destination: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let destination = destination.as_ref();
        fs::create_dir_all(destination).or_raise(|| ErrorKind::Io)?;
        let mut extracted = Vec::with_capacity(self.inner.len());
        for index in 0..self.inner.len() {
            let mut entry = self.inner.by_index(index).or_raise(|| ErrorKind::InvalidData)?;
            let Some(relative) = entry.enclosed_name() else {
                exn::bail!(ErrorKind::UnsafeEntry(entry.name().to_string()));
            };
            let target = destination.join(relative);
            if entry.is_dir() {
                fs::create_dir_all(&target).or_raise(|| ErrorKind::Io)?;
                continue;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).or_raise(|| ErrorKind::Io)?;
            }
            // A previous run may have left a read-only copy behind.
            match fs::remove_file(&target) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => Err(e).or_raise(|| ErrorKind::Io)?,
            }
            let mut out = File::create(&target).or_raise(|| ErrorKind::Io)?;
            io::copy(&mut entry, &mut out).or_raise(|| ErrorKind::Io)?;
            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&target, fs::Permissions::from_mode(mode)).or_raise(|| ErrorKind::Io)?;
            }
            tracing::trace!(entry = %target.display(), "Extracted archive entry");
            extracted.push(target);
        }
        tracing::debug!(files = extracted.len(), "Archive extracted");
        Ok(extracted)
    }
}
