//! Analysis pipeline: extract, detect, anonymize, aggregate

use crate::audit::AuditLogger;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, FailureReason, Result};
use crate::record::{AnalysisReport, AnalysisResult, DocumentInfo};
use rgpd_extract::{Document, FileType, TextExtractor};
use rgpd_guard::{
    aggregate, AnonymizationPolicy, AnonymizerConfig, EntityDetector, EntityType, Language,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A validated request to analyze one document
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Document to analyze
    pub document: Document,
    /// Anonymization policy
    pub policy: AnonymizationPolicy,
    /// Detection language
    pub language: Language,
    /// Entity allow-list
    pub entities: Vec<EntityType>,
}

impl AnalysisRequest {
    /// Request with the default language and entity allow-list
    pub fn new(document: Document, policy: AnonymizationPolicy) -> Self {
        Self {
            document,
            policy,
            language: Language::default(),
            entities: EntityType::DEFAULT_SET.to_vec(),
        }
    }

    /// Set the detection language
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Set the entity allow-list
    pub fn with_entities(mut self, entities: Vec<EntityType>) -> Self {
        self.entities = entities;
        self
    }

    /// Build a request from transport-level values
    ///
    /// Runs the intake checks, then resolves the file type tag, policy name
    /// and language tag. The tag must agree with the file name's extension.
    /// Without a policy name the configured default operator is used; without
    /// a language tag the configured language.
    pub fn from_upload(
        file_name: &str,
        bytes: Vec<u8>,
        file_type_tag: &str,
        policy_name: Option<&str>,
        language_tag: Option<&str>,
        config: &AnalysisConfig,
    ) -> Result<Self> {
        let by_extension = config.intake.validate(file_name, bytes.len())?;
        let file_type: FileType = file_type_tag.parse()?;
        if file_type != by_extension {
            return Err(AnalysisError::Intake(format!(
                "declared file type {} does not match '{}'",
                file_type, file_name
            )));
        }

        let policy = match policy_name {
            Some(name) => config.anonymizer.policy_from_name(name)?,
            None => config.anonymizer.default_policy()?,
        };
        let language = match language_tag {
            Some(tag) => tag.parse()?,
            None => config.detector.language,
        };

        Ok(Self {
            document: Document::new(file_name, file_type, bytes),
            policy,
            language,
            entities: config.detector.entities.clone(),
        })
    }
}

/// Document analysis pipeline
///
/// Built once and shared; cloning is cheap and every clone uses the same
/// compiled recognizers.
#[derive(Clone)]
pub struct Pipeline {
    extractor: Arc<TextExtractor>,
    detector: Arc<EntityDetector>,
    anonymizer: AnonymizerConfig,
    audit_logger: AuditLogger,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("detector", &self.detector)
            .field("anonymizer", &self.anonymizer)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Create a pipeline from configuration
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        PipelineBuilder::new().config(config).build()
    }

    /// Create a builder for Pipeline
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// The shared detector
    pub fn detector(&self) -> &Arc<EntityDetector> {
        &self.detector
    }

    /// Analyze a document with the detector's configured allow-list
    pub fn run(
        &self,
        document: &Document,
        policy: &AnonymizationPolicy,
        language: Language,
    ) -> AnalysisResult {
        let entities = self.detector.config().entities.clone();
        self.run_with_entities(document, policy, language, &entities)
    }

    /// Analyze a document
    ///
    /// Never returns an error: any stage failure is captured in a `Failed`
    /// record and no partial output is kept.
    pub fn run_with_entities(
        &self,
        document: &Document,
        policy: &AnonymizationPolicy,
        language: Language,
        entities: &[EntityType],
    ) -> AnalysisResult {
        let start = Instant::now();
        let mut record = AnalysisResult::new(
            DocumentInfo {
                file_name: document.file_name.clone(),
                file_size: document.size(),
                file_type: document.file_type,
            },
            policy.clone(),
            language,
            entities.to_vec(),
        );

        let outcome = record
            .start()
            .and_then(|()| self.process(document, policy, language, entities));

        let finished = match outcome {
            Ok(report) => {
                info!(
                    analysis_id = %record.id,
                    file_name = %document.file_name,
                    entities = report.sensitive_count(),
                    operator = %policy.kind(),
                    "Analysis completed"
                );
                record.complete(report)
            }
            Err(err) => {
                warn!(
                    analysis_id = %record.id,
                    file_name = %document.file_name,
                    kind = ?err.kind(),
                    error = %err,
                    "Analysis failed"
                );
                record.fail(FailureReason::from(&err))
            }
        };
        if let Err(err) = finished {
            warn!(analysis_id = %record.id, error = %err, "Analysis record not finalized");
        }

        self.audit_logger
            .log(&record, &document.bytes, start.elapsed().as_millis() as u64);
        record
    }

    /// Analyze a request on the blocking thread pool
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult> {
        let pipeline = self.clone();
        let record = tokio::task::spawn_blocking(move || {
            pipeline.run_with_entities(
                &request.document,
                &request.policy,
                request.language,
                &request.entities,
            )
        })
        .await?;
        Ok(record)
    }

    fn process(
        &self,
        document: &Document,
        policy: &AnonymizationPolicy,
        language: Language,
        entities: &[EntityType],
    ) -> Result<AnalysisReport> {
        let extracted = self.extractor.extract(document)?;
        debug!(
            file_name = %document.file_name,
            text_length = extracted.text.len(),
            "Extraction stage done"
        );

        let spans = self.detector.detect(&extracted.text, language, entities)?;
        debug!(spans = spans.len(), "Detection stage done");

        let anonymized = self
            .anonymizer
            .anonymizer(policy.clone())?
            .anonymize(&extracted.text, &spans)?;
        debug!(items = anonymized.items.len(), "Anonymization stage done");

        let statistics = aggregate(&spans);

        Ok(AnalysisReport {
            original_text: extracted.text,
            anonymized_text: anonymized.text,
            entities: spans,
            items: anonymized.items,
            statistics,
            encoding: extracted.encoding,
            page_count: extracted.page_count,
            row_count: extracted.row_count,
        })
    }
}

/// Builder for Pipeline
pub struct PipelineBuilder {
    config: AnalysisConfig,
    detector: Option<Arc<EntityDetector>>,
}

impl PipelineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
            detector: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default detection language
    pub fn language(mut self, language: Language) -> Self {
        self.config.detector.language = language;
        self
    }

    /// Set the default entity allow-list
    pub fn entities(mut self, entities: Vec<EntityType>) -> Self {
        self.config.detector.entities = entities;
        self
    }

    /// Drop spans scoring below `min_score`
    pub fn min_score(mut self, min_score: f32) -> Self {
        self.config.detector.min_score = min_score;
        self
    }

    /// Use a policy for one entity type regardless of the request
    pub fn policy_override(mut self, entity: EntityType, policy: AnonymizationPolicy) -> Self {
        self.config.anonymizer.overrides.insert(entity, policy);
        self
    }

    /// Enable or disable audit logging
    pub fn audit(mut self, enabled: bool) -> Self {
        self.config.audit.enabled = enabled;
        self
    }

    /// Share an existing detector instead of building one
    pub fn detector(mut self, detector: Arc<EntityDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Result<Pipeline> {
        for policy in self.config.anonymizer.overrides.values() {
            policy.validate()?;
        }
        let detector = match self.detector {
            Some(detector) => detector,
            None => Arc::new(EntityDetector::new(self.config.detector)?),
        };
        Ok(Pipeline {
            extractor: Arc::new(TextExtractor::new(self.config.extractor)),
            detector,
            anonymizer: self.config.anonymizer,
            audit_logger: AuditLogger::new(self.config.audit),
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
