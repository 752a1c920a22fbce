use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Local file header, the first record of any non-empty zip.
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
/// End of central directory, the only record of an empty zip.
const ZIP_EMPTY_MAGIC: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

/// Detect a zip archive from its leading magic bytes.
#[must_use]
pub fn is_zip_magic(bytes: &[u8]) -> bool {
    bytes.starts_with(&ZIP_MAGIC) || bytes.starts_with(&ZIP_EMPTY_MAGIC)
}

/// Detect a zip archive from a file extension.
#[must_use]
pub fn is_zip_path(path: impl AsRef<Path>) -> bool {
    path.as_ref().extension().and_then(|ext| ext.to_str()).is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Peek at the first bytes of a file. Short files yield fewer bytes.
pub(crate) fn sniff(file: &mut File) -> std::io::Result<Vec<u8>> {
    let mut head = Vec::with_capacity(ZIP_MAGIC.len());
    file.take(ZIP_MAGIC.len() as u64).read_to_end(&mut head)?;
    Ok(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[0x50, 0x4B, 0x03, 0x04, 0x14], true)]
    #[case(&[0x50, 0x4B, 0x05, 0x06], true)]
    #[case(&[0x50, 0x4B], false)]
    #[case(&[0x1F, 0x8B, 0x08], false)]
    #[case(&[], false)]
    fn test_magic_bytes(#[case] bytes: &[u8], #[case] expected: bool) {
        assert_eq!(is_zip_magic(bytes), expected);
    }

    #[rstest]
    #[case("Artist - Album.zip", true)]
    #[case("Artist - Album.ZIP", true)]
    #[case("Artist - Album.tar.gz", false)]
    #[case("zip", false)]
    fn test_extension(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_zip_path(path), expected);
    }
}
