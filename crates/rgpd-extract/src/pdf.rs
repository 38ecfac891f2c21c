//! PDF document text extraction

use crate::{
    config::ExtractorConfig, document::FileType, error::Result, ExtractError, ExtractResult,
    Extractor,
};
use lopdf::{Dictionary, Document};
use tracing::debug;

/// Separator placed between the text of consecutive pages
const PAGE_SEPARATOR: &str = "\n";

/// PDF document text extractor
pub struct PdfExtractor {
    config: ExtractorConfig,
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl PdfExtractor {
    /// Create a new PDF extractor with the given configuration
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extract text from PDF bytes
    pub fn extract_from_bytes(&self, bytes: &[u8], source: &str) -> Result<ExtractResult> {
        let doc = Document::load_mem(bytes)?;
        if doc.trailer.get(b"Encrypt").is_ok() {
            return Err(ExtractError::Pdf(
                "document is encrypted or password-protected".to_string(),
            ));
        }
        self.extract_from_document(&doc, source)
    }

    /// Extract text from a lopdf Document, one chunk per page in page order
    fn extract_from_document(&self, doc: &Document, source: &str) -> Result<ExtractResult> {
        let pages = doc.get_pages();
        let mut page_texts: Vec<String> = Vec::with_capacity(pages.len());
        let mut total = 0;

        for page_num in pages.keys() {
            // A page without extractable text still takes its slot
            let page_text = match doc.extract_text(&[*page_num]) {
                Ok(text) => text.trim_end().to_string(),
                Err(e) => {
                    debug!(page = page_num, error = %e, "page yielded no text");
                    String::new()
                }
            };
            total += page_text.len() + PAGE_SEPARATOR.len();
            if total > self.config.max_length + PAGE_SEPARATOR.len() {
                return Err(ExtractError::ContentTooLarge {
                    size: total - PAGE_SEPARATOR.len(),
                    max: self.config.max_length,
                });
            }
            page_texts.push(page_text);
        }

        let mut result = ExtractResult::new(page_texts.join(PAGE_SEPARATOR), source, FileType::Pdf)
            .with_page_count(pages.len());

        if let Some(info) = info_dictionary(doc) {
            for (key, name) in [(b"Title".as_slice(), "title"), (b"Author".as_slice(), "author")] {
                if let Some(value) = info_string(info, key) {
                    result = result.with_metadata(name, value);
                }
            }
        }

        Ok(result)
    }
}

/// Locate the document information dictionary, if any
fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    match info.as_reference() {
        Ok(id) => doc.get_object(id).ok()?.as_dict().ok(),
        Err(_) => info.as_dict().ok(),
    }
}

fn info_string(info: &Dictionary, key: &[u8]) -> Option<String> {
    let bytes = info.get(key).ok()?.as_str().ok()?;
    let value = std::str::from_utf8(bytes).ok()?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl Extractor for PdfExtractor {
    fn file_type(&self) -> FileType {
        FileType::Pdf
    }

    fn extract(&self, bytes: &[u8], source: &str) -> Result<ExtractResult> {
        self.extract_from_bytes(bytes, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a PDF whose pages carry the given lines; `None` is a blank page
    fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let operations = match page {
                Some(line) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
                None => vec![],
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_pages_joined_with_newlines() {
        let bytes = build_pdf(&[Some("Hello World!"), None, Some("Page three")]);
        let result = PdfExtractor::default()
            .extract_from_bytes(&bytes, "three.pdf")
            .unwrap();

        assert_eq!(result.page_count, Some(3));
        assert_eq!(result.text, "Hello World!\n\nPage three");
    }

    #[test]
    fn test_trailing_blank_page_keeps_its_slot() {
        let bytes = build_pdf(&[Some("Only page with text"), None]);
        let result = PdfExtractor::default()
            .extract_from_bytes(&bytes, "two.pdf")
            .unwrap();
        assert_eq!(result.text, "Only page with text\n");
        assert_eq!(result.page_count, Some(2));
    }

    #[test]
    fn test_encrypted_pdf_is_rejected() {
        let mut doc = Document::load_mem(&build_pdf(&[Some("secret")])).unwrap();
        let encrypt_id = doc.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => 1,
            "R" => 2,
            "P" => -4,
        });
        doc.trailer.set("Encrypt", encrypt_id);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let result = PdfExtractor::default().extract_from_bytes(&bytes, "locked.pdf");
        assert!(matches!(result, Err(ExtractError::Pdf(_))));
    }

    #[test]
    fn test_page_text_over_limit_stops_early() {
        let bytes = build_pdf(&[Some("first page"), Some("second page")]);
        let extractor = PdfExtractor::new(ExtractorConfig::default().with_max_length(12));
        assert!(matches!(
            extractor.extract_from_bytes(&bytes, "long.pdf"),
            Err(ExtractError::ContentTooLarge { size: 22, max: 12 })
        ));

        let extractor = PdfExtractor::new(ExtractorConfig::default().with_max_length(22));
        let result = extractor.extract_from_bytes(&bytes, "long.pdf").unwrap();
        assert_eq!(result.text, "first page\nsecond page");
    }

    #[test]
    fn test_corrupted_pdf_is_typed_failure() {
        let extractor = PdfExtractor::default();
        let result = extractor.extract_from_bytes(b"%PDF-1.5\nthis is not a pdf", "broken.pdf");
        assert!(matches!(result, Err(ExtractError::Pdf(_))));
    }

    #[test]
    fn test_not_a_pdf() {
        let extractor = PdfExtractor::default();
        assert!(extractor.extract(b"hello", "hello.pdf").is_err());
    }
}
