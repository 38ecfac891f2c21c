//! Error types for the analysis pipeline

use crate::record::AnalysisStatus;
use rgpd_extract::ExtractError;
use rgpd_guard::GuardError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Analysis error types
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Text extraction failed
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Detection or anonymization failed
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// Upload rejected before analysis
    #[error("Upload rejected: {0}")]
    Intake(String),

    /// Record is not in a state that allows the operation
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        from: AnalysisStatus,
        to: AnalysisStatus,
    },

    /// Record store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Background task failed to complete
    #[error("Task error: {0}")]
    Task(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for AnalysisError {
    fn from(err: toml::de::Error) -> Self {
        AnalysisError::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AnalysisError {
    fn from(err: tokio::task::JoinError) -> Self {
        AnalysisError::Task(err.to_string())
    }
}

/// Stable error tag reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// File type is not supported
    UnsupportedFormat,
    /// No readable text in the document
    EmptyContent,
    /// Text encoding could not be resolved
    DecodingFailure,
    /// Anonymization operator is unknown or misconfigured
    InvalidPolicy,
    /// A recognizer failed or the language has no ruleset
    DetectionFailure,
    /// The document could not be parsed or read
    ExtractionFailure,
    /// A span did not address the analyzed text
    InvalidSpan,
    /// The request itself was malformed or rejected at intake
    InvalidRequest,
    /// Storage, configuration or runtime failure
    Internal,
}

impl AnalysisError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Extract(err) => match err {
                ExtractError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
                ExtractError::EmptyContent => ErrorKind::EmptyContent,
                ExtractError::DecodingFailure { .. } => ErrorKind::DecodingFailure,
                ExtractError::Pdf(_)
                | ExtractError::Csv(_)
                | ExtractError::ContentTooLarge { .. }
                | ExtractError::Io(_) => ErrorKind::ExtractionFailure,
            },
            AnalysisError::Guard(err) => match err {
                GuardError::InvalidPolicy(_) => ErrorKind::InvalidPolicy,
                GuardError::DetectionFailure(_) | GuardError::Pattern(_) => {
                    ErrorKind::DetectionFailure
                }
                GuardError::InvalidSpan { .. } => ErrorKind::InvalidSpan,
                GuardError::UnknownEntity(_) => ErrorKind::InvalidRequest,
            },
            AnalysisError::Intake(_) => ErrorKind::InvalidRequest,
            AnalysisError::InvalidTransition { .. }
            | AnalysisError::Store(_)
            | AnalysisError::Config(_)
            | AnalysisError::Task(_)
            | AnalysisError::Io(_)
            | AnalysisError::Json(_) => ErrorKind::Internal,
        }
    }
}

/// Why an analysis failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    /// Error classification
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
}

impl From<&AnalysisError> for FailureReason {
    fn from(err: &AnalysisError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let cases = [
            (
                AnalysisError::from(ExtractError::UnsupportedFormat("docx".into())),
                ErrorKind::UnsupportedFormat,
            ),
            (AnalysisError::from(ExtractError::EmptyContent), ErrorKind::EmptyContent),
            (
                AnalysisError::from(ExtractError::Pdf("bad xref".into())),
                ErrorKind::ExtractionFailure,
            ),
            (
                AnalysisError::from(GuardError::InvalidPolicy("hash".into())),
                ErrorKind::InvalidPolicy,
            ),
            (
                AnalysisError::from(GuardError::DetectionFailure("de".into())),
                ErrorKind::DetectionFailure,
            ),
            (AnalysisError::Intake("too big".into()), ErrorKind::InvalidRequest),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "{err}");
        }
    }

    #[test]
    fn test_failure_reason_keeps_message() {
        let err = AnalysisError::from(ExtractError::EmptyContent);
        let reason = FailureReason::from(&err);
        assert_eq!(reason.kind, ErrorKind::EmptyContent);
        assert_eq!(reason.message, "Document contains no readable text");
        assert_eq!(
            serde_json::to_value(reason.kind).unwrap(),
            serde_json::json!("EMPTY_CONTENT")
        );
    }
}
