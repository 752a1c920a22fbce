//! Access to the PDF being renamed.

use crate::consts::DOI_REGEX;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use lopdf::{Dictionary, Document, Object};
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// What the resolver needs to know about a paper.
///
/// [`PdfDocument`] reads real files; tests substitute canned values.
pub trait PaperSource {
    fn path(&self) -> &Path;
    /// DOI recorded in the document's own metadata, if any.
    fn metadata_doi(&self) -> Result<Option<String>>;
    /// Plain text of the first page.
    fn first_page_text(&self) -> Result<String>;
}

/// Finds the paper's DOI: the metadata value wins, otherwise the first match
/// in the first page's text.
#[instrument(level = "debug", skip_all, fields(path = %source.path().display()))]
pub fn find_doi<S: PaperSource + ?Sized>(source: &S) -> Result<Option<String>> {
    if let Some(doi) = source.metadata_doi()? {
        tracing::debug!(%doi, "DOI found in document metadata");
        return Ok(Some(doi));
    }
    let text = source.first_page_text()?;
    let doi = scan_doi(&text);
    if let Some(doi) = &doi {
        tracing::debug!(%doi, "DOI found in first page text");
    }
    Ok(doi)
}

/// First DOI-shaped substring of `text`.
pub fn scan_doi(text: &str) -> Option<String> {
    DOI_REGEX.find(text).map(|m| m.as_str().to_string())
}

/// A PDF on disk, parsed on first access.
pub struct PdfDocument {
    path: PathBuf,
    document: OnceCell<Document>,
}
impl PdfDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), document: OnceCell::new() }
    }

    fn document(&self) -> Result<&Document> {
        if let Some(document) = self.document.get() {
            return Ok(document);
        }
        let document = Document::load(&self.path).or_raise(|| ErrorKind::Pdf)?;
        Ok(self.document.get_or_init(|| document))
    }

    fn info(&self) -> Result<Option<&Dictionary>> {
        let document = self.document()?;
        let info = match document.trailer.get(b"Info") {
            Ok(Object::Reference(id)) => document.get_object(*id).and_then(Object::as_dict).ok(),
            Ok(Object::Dictionary(info)) => Some(info),
            _ => None,
        };
        Ok(info)
    }
}

impl PaperSource for PdfDocument {
    fn path(&self) -> &Path {
        &self.path
    }

    fn metadata_doi(&self) -> Result<Option<String>> {
        let Some(info) = self.info()? else {
            return Ok(None);
        };
        let value = info
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(b"doi"))
            .and_then(|(_, value)| match value {
                Object::String(bytes, _) => Some(decode_text_string(bytes)),
                _ => None,
            });
        // Producers store "doi:10.…" or a resolver URL as often as the bare DOI.
        Ok(value.and_then(|value| scan_doi(&value).or_else(|| Some(value.trim().to_string()).filter(|v| !v.is_empty()))))
    }

    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn first_page_text(&self) -> Result<String> {
        let document = self.document()?;
        let Some(first) = document.get_pages().keys().next().copied() else {
            return Ok(String::new());
        };
        document.extract_text(&[first]).or_raise(|| ErrorKind::Pdf)
    }
}

/// Decodes a PDF text string: UTF-16BE when it carries a byte order mark,
/// otherwise treated as single-byte text.
fn decode_text_string(bytes: &[u8]) -> String {
    match bytes.strip_prefix(&[0xFE, 0xFF]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]])).collect();
            String::from_utf16_lossy(&units)
        },
        None => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Stream, dictionary};
    use rstest::rstest;
    use tempfile::TempDir;

    /// Writes a one-page PDF showing `text`, with `info` as its document
    /// information dictionary.
    fn write_pdf(path: &Path, text: &str, info: Option<Dictionary>) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);
        if let Some(info) = info {
            let info_id = doc.add_object(info);
            doc.trailer.set("Info", info_id);
        }
        doc.save(path).unwrap();
    }

    #[test]
    fn test_metadata_doi_wins_over_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("paper.pdf");
        let info = dictionary! { "doi" => Object::string_literal("10.1234/meta.1") };
        write_pdf(&path, "See doi 10.5555/text.2 for details", Some(info));

        let pdf = PdfDocument::new(&path);
        assert_eq!(find_doi(&pdf).unwrap().as_deref(), Some("10.1234/meta.1"));
    }

    #[test]
    fn test_metadata_doi_with_prefix() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("paper.pdf");
        let info = dictionary! { "DOI" => Object::string_literal("doi:10.1234/meta.1") };
        write_pdf(&path, "Nothing here", Some(info));

        assert_eq!(PdfDocument::new(&path).metadata_doi().unwrap().as_deref(), Some("10.1234/meta.1"));
    }

    #[test]
    fn test_doi_from_first_page() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("paper.pdf");
        write_pdf(&path, "Published as 10.5555/text.2 in 2021", None);

        let pdf = PdfDocument::new(&path);
        assert_eq!(pdf.metadata_doi().unwrap(), None);
        assert!(pdf.first_page_text().unwrap().contains("Published"));
        assert_eq!(find_doi(&pdf).unwrap().as_deref(), Some("10.5555/text.2"));
    }

    #[test]
    fn test_unreadable_pdf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();

        let err = find_doi(&PdfDocument::new(&path)).unwrap_err();
        assert_eq!(*err, ErrorKind::Pdf);
    }

    #[rstest]
    #[case("https://doi.org/10.1145/3292500.3330701.", Some("10.1145/3292500.3330701"))]
    #[case("DOI: 10.1016/j.cell.2020.01.001)", Some("10.1016/j.cell.2020.01.001"))]
    #[case("arXiv:1706.03762v7", None)]
    #[case("no identifier", None)]
    fn test_scan_doi(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(scan_doi(text).as_deref(), expected);
    }

    #[test]
    fn test_decode_utf16_text_string() {
        let bytes = [0xFE, 0xFF, 0x00, b'1', 0x00, b'0', 0x00, b'.'];
        assert_eq!(decode_text_string(&bytes), "10.");
        assert_eq!(decode_text_string(b"10.1/x"), "10.1/x");
    }
}
