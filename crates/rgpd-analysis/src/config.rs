//! Configuration for document analysis

use crate::error::Result;
use rgpd_extract::ExtractorConfig;
use rgpd_guard::{AnonymizerConfig, DetectorConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "RGPD_CONFIG";

/// Main configuration for the analysis pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Text extraction
    pub extractor: ExtractorConfig,
    /// Entity detection
    pub detector: DetectorConfig,
    /// Anonymization
    pub anonymizer: AnonymizerConfig,
    /// Audit trail
    pub audit: AuditConfig,
    /// Upload checks
    pub intake: IntakeConfig,
}

impl AnalysisConfig {
    /// Parse a TOML document; missing sections keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Enable audit logging
    pub enabled: bool,
    /// Log extracted text (vs. just hashes)
    pub log_content: bool,
    /// Append JSON lines to this file
    pub log_file: Option<PathBuf>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_content: false,
            log_file: None,
        }
    }
}

/// Upload constraints checked before analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Largest accepted upload in bytes
    pub max_bytes: usize,
    /// Accepted file extensions, without the dot
    pub allowed_extensions: Vec<String>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            allowed_extensions: vec!["pdf".into(), "csv".into(), "txt".into()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use rgpd_guard::{EntityType, Language, PolicyKind};

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(config.detector.language, Language::French);
        assert_eq!(config.detector.entities, EntityType::DEFAULT_SET.to_vec());
        assert_eq!(config.anonymizer.default_operator, PolicyKind::Mask);
        assert_eq!(config.intake.max_bytes, 10 * 1024 * 1024);
        assert!(config.audit.enabled);
    }

    #[test]
    fn test_partial_sections() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            [extractor]
            csv_delimiter = ";"

            [detector]
            min_score = 0.5

            [audit]
            log_file = "/var/log/rgpd/audit.jsonl"

            [intake]
            max_bytes = 1024
            "#,
        )
        .unwrap();
        assert_eq!(config.extractor.csv_delimiter, ';');
        assert_eq!(config.extractor.max_length, 10_000_000);
        assert_eq!(config.detector.min_score, 0.5);
        assert_eq!(
            config.audit.log_file.as_deref(),
            Some(Path::new("/var/log/rgpd/audit.jsonl"))
        );
        assert_eq!(config.intake.max_bytes, 1024);
        assert_eq!(config.intake.allowed_extensions.len(), 3);
    }

    #[test]
    fn test_invalid_toml() {
        let err = AnalysisConfig::from_toml_str("[detector]\nlanguage = \"klingon\"").unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }
}
