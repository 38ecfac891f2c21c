//! Error types for RGPD Guard

use thiserror::Error;

/// Result type alias for Guard operations
pub type Result<T> = std::result::Result<T, GuardError>;

/// Guard error types
#[derive(Debug, Error)]
pub enum GuardError {
    /// Anonymization operator name or parameters are not valid
    #[error("Invalid policy: {0} (valid operators: mask, replace, redact)")]
    InvalidPolicy(String),

    /// Underlying recognizer failed, or no ruleset exists for the language
    #[error("Detection failed: {0}")]
    DetectionFailure(String),

    /// A span does not address a valid region of the text
    #[error("Invalid span {start}..{end} for text of {len} bytes")]
    InvalidSpan { start: usize, end: usize, len: usize },

    /// Unknown entity type label
    #[error("Unknown entity type: {0}")]
    UnknownEntity(String),

    /// A recognizer pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}
