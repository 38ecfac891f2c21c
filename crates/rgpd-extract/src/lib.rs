//! # RGPD Extract
//!
//! Text extraction for documents submitted to PII analysis.
//!
//! Every supported format is normalized into a single UTF-8 string that the
//! entity detector can scan:
//!
//! - **PDF**: per-page text joined with newlines (`pdf` feature, via `lopdf`)
//! - **CSV**: the full table rendered as aligned text, header included
//!   (`csv` feature)
//! - **Plain text**: encoding detected from the raw bytes and decoded strictly
//!
//! ## Example
//!
//! ```rust,ignore
//! use rgpd_extract::{Document, FileType, TextExtractor};
//!
//! let extractor = TextExtractor::default();
//! let doc = Document::new("notes.txt", FileType::PlainText, b"Contact: jean@example.fr".to_vec());
//! let result = extractor.extract(&doc)?;
//! assert_eq!(result.text, "Contact: jean@example.fr");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌───────────────┐     ┌─────────────────┐
//! │  Document   │ ──► │ TextExtractor │ ──► │  ExtractResult  │
//! │ (bytes+tag) │     │  (dispatch)   │     │ (non-empty text)│
//! └─────────────┘     └───────────────┘     └─────────────────┘
//!                       │    │     │
//!                      PDF  CSV  Plain
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod result;
pub mod text;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(feature = "csv")]
pub mod tabular;

pub use config::ExtractorConfig;
pub use document::{Document, FileType};
pub use error::{ExtractError, Result};
pub use result::ExtractResult;
pub use text::PlainTextExtractor;

#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;

#[cfg(feature = "csv")]
pub use tabular::CsvExtractor;

use tracing::debug;

/// Common trait for all format extractors
///
/// Extraction is synchronous and may block on parsing; implementations hold
/// no per-request state and can be shared between threads.
pub trait Extractor: Send + Sync {
    /// The file type this extractor handles
    fn file_type(&self) -> FileType;

    /// Extract text from raw bytes
    fn extract(&self, bytes: &[u8], source: &str) -> Result<ExtractResult>;
}

/// Dispatches a [`Document`] to the extractor for its declared type
pub struct TextExtractor {
    config: ExtractorConfig,
    extractors: Vec<Box<dyn Extractor>>,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl TextExtractor {
    /// Create a dispatcher with every format compiled into this build
    pub fn new(config: ExtractorConfig) -> Self {
        let mut extractors: Vec<Box<dyn Extractor>> = vec![Box::new(PlainTextExtractor)];

        #[cfg(feature = "pdf")]
        extractors.push(Box::new(PdfExtractor::new(config.clone())));

        #[cfg(feature = "csv")]
        extractors.push(Box::new(CsvExtractor::new(config.clone())));

        Self { config, extractors }
    }

    /// File types this dispatcher can extract
    pub fn supported_types(&self) -> Vec<FileType> {
        self.extractors.iter().map(|e| e.file_type()).collect()
    }

    /// Extract the text of a document
    ///
    /// Fails with [`ExtractError::EmptyContent`] when the result is empty or
    /// whitespace-only. The document itself is left untouched.
    pub fn extract(&self, document: &Document) -> Result<ExtractResult> {
        let extractor = self
            .extractors
            .iter()
            .find(|e| e.file_type() == document.file_type)
            .ok_or_else(|| ExtractError::UnsupportedFormat(document.file_type.to_string()))?;

        let result = extractor
            .extract(&document.bytes, &document.file_name)?
            .with_original_length(document.size());

        if result.text.trim().is_empty() {
            return Err(ExtractError::EmptyContent);
        }

        if result.text.len() > self.config.max_length {
            return Err(ExtractError::ContentTooLarge {
                size: result.text.len(),
                max: self.config.max_length,
            });
        }

        debug!(
            source = %document.file_name,
            file_type = %document.file_type,
            text_length = result.text.len(),
            "extracted text"
        );
        Ok(result)
    }
}
