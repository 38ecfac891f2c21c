//! Plain-text decoding with heuristic encoding detection

use crate::{document::FileType, error::Result, ExtractError, ExtractResult, Extractor};
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use tracing::debug;

/// Plain-text extractor
///
/// Resolution order: byte-order mark, strict UTF-8, then a statistical guess
/// over legacy encodings (windows-1252, ISO-8859-x, Shift_JIS, ...). The guess
/// is decoded strictly, so malformed input is a [`ExtractError::DecodingFailure`]
/// rather than text full of replacement characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {

    /// Pick the encoding for `bytes`, returning it with the BOM length to skip
    pub fn detect_encoding(bytes: &[u8]) -> (&'static Encoding, usize) {
        if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
            return (encoding, bom_len);
        }
        if std::str::from_utf8(bytes).is_ok() {
            return (UTF_8, 0);
        }

        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        (detector.guess(None, false), 0)
    }

    /// Decode bytes into a string using the detected encoding
    pub fn decode(bytes: &[u8]) -> Result<(String, &'static Encoding)> {
        let (encoding, bom_len) = Self::detect_encoding(bytes);
        let body = &bytes[bom_len..];
        debug!(encoding = encoding.name(), bom = bom_len > 0, "decoding plain text");

        encoding
            .decode_without_bom_handling_and_without_replacement(body)
            .map(|text| (text.into_owned(), encoding))
            .ok_or_else(|| ExtractError::DecodingFailure {
                encoding: encoding.name().to_string(),
            })
    }
}

impl Extractor for PlainTextExtractor {
    fn file_type(&self) -> FileType {
        FileType::PlainText
    }

    fn extract(&self, bytes: &[u8], source: &str) -> Result<ExtractResult> {
        let (text, encoding) = Self::decode(bytes)?;
        Ok(ExtractResult::new(text, source, FileType::PlainText).with_encoding(encoding.name()))
    }
}
