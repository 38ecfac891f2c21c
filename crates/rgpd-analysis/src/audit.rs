//! Audit trail of analyses

use crate::config::AuditConfig;
use crate::error::ErrorKind;
use crate::record::{AnalysisResult, AnalysisStatus, RecordId};
use chrono::{DateTime, Utc};
use rgpd_extract::FileType;
use rgpd_guard::PolicyKind;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use tracing::{info, warn};

/// Longest content excerpt written when content logging is on
const MAX_LOGGED_CONTENT: usize = 500;

/// One audit line per finished analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the entry was written
    pub timestamp: DateTime<Utc>,
    /// Analysis record
    pub analysis_id: RecordId,
    /// Uploaded file name
    pub file_name: String,
    /// Declared file type
    pub file_type: FileType,
    /// SHA-256 of the raw upload
    pub content_hash: String,
    /// Final status
    pub status: AnalysisStatus,
    /// Sensitive spans found
    pub entity_count: usize,
    /// Anonymization operator
    pub operator: PolicyKind,
    /// Failure classification, for failed analyses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Wall-clock duration of the run
    pub processing_time_ms: u64,
    /// Excerpt of the extracted text, only with `log_content`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Audit logger
#[derive(Debug, Clone)]
pub struct AuditLogger {
    config: AuditConfig,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Record a finished analysis
    ///
    /// `raw` is the uploaded file; only its hash is kept.
    pub fn log(&self, record: &AnalysisResult, raw: &[u8], duration_ms: u64) -> Option<AuditEntry> {
        if !self.config.enabled {
            return None;
        }

        let content = if self.config.log_content {
            record
                .report()
                .map(|r| truncate(&r.original_text, MAX_LOGGED_CONTENT))
        } else {
            None
        };

        let entry = AuditEntry {
            timestamp: Utc::now(),
            analysis_id: record.id,
            file_name: record.document.file_name.clone(),
            file_type: record.document.file_type,
            content_hash: hash_content(raw),
            status: record.status(),
            entity_count: record.report().map_or(0, |r| r.sensitive_count()),
            operator: record.policy.kind(),
            error_kind: record.failure().map(|f| f.kind),
            processing_time_ms: duration_ms,
            content,
        };

        self.emit(&entry);
        Some(entry)
    }

    fn emit(&self, entry: &AuditEntry) {
        info!(
            analysis_id = %entry.analysis_id,
            file_name = %entry.file_name,
            file_type = %entry.file_type,
            content_hash = %entry.content_hash,
            status = %entry.status,
            entity_count = entry.entity_count,
            operator = %entry.operator,
            error_kind = ?entry.error_kind,
            processing_time_ms = entry.processing_time_ms,
            "Analysis audit"
        );

        if let Some(ref path) = self.config.log_file {
            let written = serde_json::to_string(entry)
                .map_err(std::io::Error::from)
                .and_then(|json| {
                    let mut file = std::fs::OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(path)?;
                    writeln!(file, "{json}")
                });
            if let Err(e) = written {
                warn!(path = %path.display(), error = %e, "Failed to write audit entry");
            }
        }
    }
}

/// Hex SHA-256 of the content
fn hash_content(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Truncate to at most `max_len` bytes on a character boundary
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DocumentInfo;
    use rgpd_guard::{AnonymizationPolicy, EntityType, Language};

    fn record() -> AnalysisResult {
        AnalysisResult::new(
            DocumentInfo {
                file_name: "notes.txt".into(),
                file_size: 4,
                file_type: FileType::PlainText,
            },
            AnonymizationPolicy::Redact,
            Language::French,
            EntityType::DEFAULT_SET.to_vec(),
        )
    }

    #[test]
    fn test_hash_content() {
        assert_eq!(
            hash_content(b"test"),
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
        assert_ne!(hash_content(b"test"), hash_content(b"different"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a longer string", 10), "this is a ...");
        assert_eq!(truncate("ééé", 3), "é...");
    }

    #[test]
    fn test_audit_disabled() {
        let logger = AuditLogger::new(AuditConfig {
            enabled: false,
            ..Default::default()
        });
        assert!(logger.log(&record(), b"test", 0).is_none());
    }

    #[test]
    fn test_entry_for_pending_record() {
        let logger = AuditLogger::new(AuditConfig::default());
        let entry = logger.log(&record(), b"test", 7).unwrap();
        assert_eq!(entry.status, AnalysisStatus::Pending);
        assert_eq!(entry.operator, PolicyKind::Redact);
        assert_eq!(entry.entity_count, 0);
        assert_eq!(entry.processing_time_ms, 7);
        assert!(entry.content.is_none());
    }
}
