//! Cover art thumbnails.
//!
//! Albums ship a full-size `cover.jpg` (sometimes `cover.png`). Players want
//! two small square versions next to it: `cover_med.jpg` (120x120) and
//! `cover_small.jpg` (60x60).

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use image::imageops::{self, FilterType};
use image::{ImageReader, RgbImage};
use std::path::{Path, PathBuf};
use tracing::instrument;

pub const MEDIUM_SIZE: u32 = 120;
pub const SMALL_SIZE: u32 = 60;
pub const MEDIUM_NAME: &str = "cover_med.jpg";
pub const SMALL_NAME: &str = "cover_small.jpg";
/// Looked up in this order; a later name is only used when every earlier one
/// is absent.
const SOURCE_NAMES: [&str; 2] = ["cover.jpg", "cover.png"];
const FILTER: FilterType = FilterType::CatmullRom;

/// Paths written by [`generate_covers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Covers {
    pub source: PathBuf,
    pub medium: PathBuf,
    pub small: PathBuf,
}

/// The cover art file present in `dir`.
pub fn find_cover(dir: &Path) -> Result<PathBuf> {
    SOURCE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_raise(|| ErrorKind::MissingCover(dir.to_path_buf()))
}

/// Medium and small thumbnails of `image`. The small one is derived from the
/// medium one, not from the original.
pub fn derive(image: &RgbImage) -> (RgbImage, RgbImage) {
    let medium = imageops::resize(image, MEDIUM_SIZE, MEDIUM_SIZE, FILTER);
    let small = imageops::resize(&medium, SMALL_SIZE, SMALL_SIZE, FILTER);
    (medium, small)
}

/// Writes `cover_med.jpg` and `cover_small.jpg` into `dir`.
///
/// # Errors
/// - [`ErrorKind::MissingCover`] when there is no cover art.
/// - [`ErrorKind::Image`] when the cover art exists but cannot be decoded.
#[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
pub fn generate_covers(dir: &Path) -> Result<Covers> {
    let source = find_cover(dir)?;
    tracing::debug!(source = %source.display(), "Generating cover thumbnails");
    let image = ImageReader::open(&source)
        .or_raise(|| ErrorKind::Image)?
        .with_guessed_format()
        .or_raise(|| ErrorKind::Image)?
        .decode()
        .or_raise(|| ErrorKind::Image)?
        .into_rgb8();
    let (medium, small) = derive(&image);

    let covers = Covers { source, medium: dir.join(MEDIUM_NAME), small: dir.join(SMALL_NAME) };
    medium.save(&covers.medium).or_raise(|| ErrorKind::Image)?;
    small.save(&covers.small).or_raise(|| ErrorKind::Image)?;
    Ok(covers)
}
