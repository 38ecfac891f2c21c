//! Error types for text extraction

use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur during text extraction
#[derive(Error, Debug)]
pub enum ExtractError {
    /// File type is not one of the supported formats
    #[error("Unsupported file format: {0} (supported: pdf, csv, txt)")]
    UnsupportedFormat(String),

    /// Nothing readable could be extracted
    #[error("Document contains no readable text")]
    EmptyContent,

    /// Byte encoding could not be resolved
    #[error("Could not decode text as {encoding}")]
    DecodingFailure { encoding: String },

    /// PDF parsing error (corrupted, encrypted, ...)
    #[error("PDF error: {0}")]
    Pdf(String),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(String),

    /// Extracted text too large
    #[error("Content too large: {size} bytes exceeds max {max} bytes")]
    ContentTooLarge { size: usize, max: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "pdf")]
impl From<lopdf::Error> for ExtractError {
    fn from(err: lopdf::Error) -> Self {
        ExtractError::Pdf(err.to_string())
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for ExtractError {
    fn from(err: csv::Error) -> Self {
        ExtractError::Csv(err.to_string())
    }
}
