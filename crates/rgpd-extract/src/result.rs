//! Extraction result types

use crate::document::FileType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of text extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResult {
    /// The extracted text content
    pub text: String,

    /// Source file name
    pub source: String,

    /// Declared file type
    pub file_type: FileType,

    /// Original content length in bytes
    pub original_length: usize,

    /// Encoding used to decode plain text
    pub encoding: Option<String>,

    /// Number of pages (PDF)
    pub page_count: Option<usize>,

    /// Number of data rows, header excluded (CSV)
    pub row_count: Option<usize>,

    /// Metadata extracted from the source
    pub metadata: BTreeMap<String, String>,
}

impl ExtractResult {
    /// Create a new extraction result
    pub fn new(text: String, source: impl Into<String>, file_type: FileType) -> Self {
        Self {
            text,
            source: source.into(),
            file_type,
            original_length: 0,
            encoding: None,
            page_count: None,
            row_count: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Set the original length
    pub fn with_original_length(mut self, length: usize) -> Self {
        self.original_length = length;
        self
    }

    /// Set the detected encoding
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Set the page count
    pub fn with_page_count(mut self, pages: usize) -> Self {
        self.page_count = Some(pages);
        self
    }

    /// Set the row count
    pub fn with_row_count(mut self, rows: usize) -> Self {
        self.row_count = Some(rows);
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Length of the extracted text in bytes
    pub fn text_length(&self) -> usize {
        self.text.len()
    }
}
