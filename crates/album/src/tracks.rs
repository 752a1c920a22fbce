use crate::consts::{CANONICAL_TRACK_REGEX, TRACK_REGEX};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Canonical name for a track file stem, `None` when the stem carries no
/// track number.
///
/// `"Artist - Album - 03 Title"` becomes `"03 - Title.flac"`.
pub fn canonical_track_name(stem: &str) -> Option<String> {
    let captures = TRACK_REGEX.captures(stem)?;
    Some(format!("{} - {}.flac", &captures[1], &captures[2]))
}

/// Renames every `.flac` file directly inside `dir` to `NN - Title.flac`,
/// in sorted order. Files already named that way are left alone.
///
/// Returns the final path of every track.
///
/// # Errors
/// [`ErrorKind::BadTrackName`] on the first track without a number. Tracks
/// sorted before it have already been renamed.
#[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
pub fn rename_tracks(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut tracks = Vec::new();
    for entry in fs::read_dir(dir).or_raise(|| ErrorKind::Io)? {
        let path = entry.or_raise(|| ErrorKind::Io)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "flac") {
            tracks.push(path);
        }
    }
    tracks.sort();

    let mut renamed = Vec::with_capacity(tracks.len());
    for track in tracks {
        let stem = track.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        if CANONICAL_TRACK_REGEX.is_match(&stem) {
            tracing::trace!(track = %stem, "Track already named");
            renamed.push(track);
            continue;
        }
        let Some(name) = canonical_track_name(&stem) else {
            let name = track.file_name().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
            exn::bail!(ErrorKind::BadTrackName(name));
        };
        let target = dir.join(&name);
        tracing::debug!("Rename track \"{stem}.flac\" -> \"{name}\"");
        fs::rename(&track, &target).or_raise(|| ErrorKind::Io)?;
        renamed.push(target);
    }
    Ok(renamed)
}
