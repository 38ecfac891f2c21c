//! Extractor configuration

use serde::{Deserialize, Serialize};

/// Configuration for text extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum extracted text length (in bytes)
    pub max_length: usize,

    /// Field delimiter for CSV documents
    pub csv_delimiter: char,

    /// Whether CSV documents carry a header row
    pub csv_has_headers: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_length: 10_000_000,
            csv_delimiter: ',',
            csv_has_headers: true,
        }
    }
}

impl ExtractorConfig {
    /// Create a new config with custom max length
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Use a different CSV delimiter (e.g. `;` for French exports)
    pub fn with_csv_delimiter(mut self, delimiter: char) -> Self {
        self.csv_delimiter = delimiter;
        self
    }
}
