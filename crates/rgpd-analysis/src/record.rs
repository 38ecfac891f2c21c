//! Analysis records and their lifecycle
//!
//! ```text
//! Pending ──► Processing ──┬──► Completed(report)
//!                          └──► Failed(reason)
//! ```
//!
//! Derived fields only exist inside [`AnalysisState::Completed`], so a
//! completed record always carries its texts and statistics and a failed one
//! never does.

use crate::error::{AnalysisError, FailureReason, Result};
use chrono::{DateTime, Utc};
use rgpd_extract::FileType;
use rgpd_guard::{
    AnonymizationPolicy, AnonymizedItem, EntitySpan, EntityStatistic, EntityType, Language,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a stored analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Lifecycle status label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "pending",
            AnalysisStatus::Processing => "processing",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata of the submitted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Original file name
    pub file_name: String,
    /// Size of the upload in bytes
    pub file_size: usize,
    /// Declared file type
    pub file_type: FileType,
}

/// Everything derived by a successful analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Extracted text
    pub original_text: String,
    /// Text after anonymization
    pub anonymized_text: String,
    /// Detected spans, offsets into `original_text`
    pub entities: Vec<EntitySpan>,
    /// Rewritten regions, offsets into `anonymized_text`
    pub items: Vec<AnonymizedItem>,
    /// Per-type counts and percentages
    pub statistics: Vec<EntityStatistic>,
    /// Encoding detected for plain-text input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Pages read from a PDF
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    /// Data rows read from a CSV, header excluded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
}

impl AnalysisReport {
    /// Total number of sensitive spans
    pub fn sensitive_count(&self) -> usize {
        self.statistics.iter().map(|s| s.count).sum()
    }
}

/// Lifecycle state, carrying what each stage produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisState {
    Pending,
    Processing,
    Completed(AnalysisReport),
    Failed(FailureReason),
}

/// One analysis of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Record identifier
    pub id: RecordId,
    /// Submitted document
    pub document: DocumentInfo,
    /// Anonymization policy requested
    pub policy: AnonymizationPolicy,
    /// Detection language
    pub language: Language,
    /// Entity allow-list used for detection
    pub entities_requested: Vec<EntityType>,
    /// When the document was received
    pub upload_date: DateTime<Utc>,
    /// When the analysis reached a final state
    pub analysis_date: Option<DateTime<Utc>>,
    /// Lifecycle state, changed only through the transition methods
    state: AnalysisState,
}

impl AnalysisResult {
    /// New pending record
    pub fn new(
        document: DocumentInfo,
        policy: AnonymizationPolicy,
        language: Language,
        entities_requested: Vec<EntityType>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            document,
            policy,
            language,
            entities_requested,
            upload_date: Utc::now(),
            analysis_date: None,
            state: AnalysisState::Pending,
        }
    }

    /// Lifecycle state
    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    /// Status label derived from the state
    pub fn status(&self) -> AnalysisStatus {
        match self.state {
            AnalysisState::Pending => AnalysisStatus::Pending,
            AnalysisState::Processing => AnalysisStatus::Processing,
            AnalysisState::Completed(_) => AnalysisStatus::Completed,
            AnalysisState::Failed(_) => AnalysisStatus::Failed,
        }
    }

    /// Whether the record reached `Completed` or `Failed`
    pub fn is_final(&self) -> bool {
        matches!(
            self.state,
            AnalysisState::Completed(_) | AnalysisState::Failed(_)
        )
    }

    /// The report of a completed analysis
    pub fn report(&self) -> Option<&AnalysisReport> {
        match &self.state {
            AnalysisState::Completed(report) => Some(report),
            _ => None,
        }
    }

    /// The failure of a failed analysis
    pub fn failure(&self) -> Option<&FailureReason> {
        match &self.state {
            AnalysisState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Pending → Processing
    pub fn start(&mut self) -> Result<()> {
        self.transition(AnalysisStatus::Processing, |state| {
            matches!(state, AnalysisState::Pending).then_some(AnalysisState::Processing)
        })
    }

    /// Processing → Completed
    pub fn complete(&mut self, report: AnalysisReport) -> Result<()> {
        self.transition(AnalysisStatus::Completed, |state| {
            matches!(state, AnalysisState::Processing).then_some(AnalysisState::Completed(report))
        })?;
        self.analysis_date = Some(Utc::now());
        Ok(())
    }

    /// Pending or Processing → Failed
    pub fn fail(&mut self, reason: FailureReason) -> Result<()> {
        self.transition(AnalysisStatus::Failed, |state| {
            matches!(state, AnalysisState::Pending | AnalysisState::Processing)
                .then_some(AnalysisState::Failed(reason))
        })?;
        self.analysis_date = Some(Utc::now());
        Ok(())
    }

    fn transition(
        &mut self,
        to: AnalysisStatus,
        next: impl FnOnce(&AnalysisState) -> Option<AnalysisState>,
    ) -> Result<()> {
        match next(&self.state) {
            Some(state) => {
                self.state = state;
                Ok(())
            }
            None => Err(AnalysisError::InvalidTransition {
                from: self.status(),
                to,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn record() -> AnalysisResult {
        AnalysisResult::new(
            DocumentInfo {
                file_name: "a.txt".into(),
                file_size: 3,
                file_type: FileType::PlainText,
            },
            AnonymizationPolicy::Redact,
            Language::French,
            EntityType::DEFAULT_SET.to_vec(),
        )
    }

    fn report() -> AnalysisReport {
        AnalysisReport {
            original_text: "abc".into(),
            anonymized_text: "abc".into(),
            entities: vec![],
            items: vec![],
            statistics: vec![],
            encoding: None,
            page_count: None,
            row_count: None,
        }
    }

    #[test]
    fn test_happy_path() {
        let mut r = record();
        assert_eq!(r.status(), AnalysisStatus::Pending);
        assert!(r.analysis_date.is_none());
        r.start().unwrap();
        assert_eq!(r.status(), AnalysisStatus::Processing);
        r.complete(report()).unwrap();
        assert_eq!(r.status(), AnalysisStatus::Completed);
        assert!(r.is_final());
        assert!(r.analysis_date.is_some());
        assert!(r.report().is_some());
        assert!(r.failure().is_none());
    }

    #[test]
    fn test_cannot_complete_without_processing() {
        let mut r = record();
        let err = r.complete(report()).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidTransition {
                from: AnalysisStatus::Pending,
                to: AnalysisStatus::Completed
            }
        ));
        assert_eq!(r.status(), AnalysisStatus::Pending);
    }

    #[test]
    fn test_final_states_are_terminal() {
        let mut r = record();
        r.start().unwrap();
        r.fail(FailureReason {
            kind: ErrorKind::EmptyContent,
            message: "empty".into(),
        })
        .unwrap();
        assert!(r.start().is_err());
        assert!(r.complete(report()).is_err());
        assert_eq!(r.failure().map(|f| f.kind), Some(ErrorKind::EmptyContent));
    }

    #[test]
    fn test_state_serializes_with_status_tag() {
        let mut r = record();
        r.start().unwrap();
        r.complete(report()).unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["state"]["status"], "completed");
        assert_eq!(json["state"]["anonymized_text"], "abc");
        assert_eq!(json["document"]["file_type"], "txt");

        let back: AnalysisResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }
}
