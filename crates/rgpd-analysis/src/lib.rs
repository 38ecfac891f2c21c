//! # RGPD Analysis
//!
//! Document PII analysis: extract the text of an uploaded PDF, CSV or
//! plain-text file, detect the sensitive entities it contains, anonymize
//! them and report per-type statistics.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rgpd_analysis::{AnalysisConfig, AnalysisRequest, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalysisConfig::default();
//!     let pipeline = Pipeline::new(config.clone())?;
//!
//!     let bytes = std::fs::read("clients.csv")?;
//!     let request =
//!         AnalysisRequest::from_upload("clients.csv", bytes, "csv", Some("mask"), None, &config)?;
//!     let record = pipeline.analyze(request).await?;
//!
//!     if let Some(report) = record.report() {
//!         println!("{}", report.anonymized_text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! ┌──────────┐    ┌───────────┐    ┌──────────┐    ┌───────────┐    ┌───────────┐
//! │  Intake  │ ─► │  Extract  │ ─► │  Detect  │ ─► │ Anonymize │ ─► │ Aggregate │
//! └──────────┘    └───────────┘    └──────────┘    └───────────┘    └───────────┘
//!                       │               │                │                │
//!                       └───────────────┴── AnalysisResult ───────────────┘
//!                                   (Completed | Failed) ──► AuditLogger
//!                                                       └──► AnalysisStore
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod intake;
pub mod pipeline;
pub mod record;
pub mod store;

pub use audit::{AuditEntry, AuditLogger};
pub use config::{AnalysisConfig, AuditConfig, IntakeConfig, CONFIG_ENV};
pub use error::{AnalysisError, ErrorKind, FailureReason, Result};
pub use pipeline::{AnalysisRequest, Pipeline, PipelineBuilder};
pub use record::{
    AnalysisReport, AnalysisResult, AnalysisState, AnalysisStatus, DocumentInfo, RecordId,
};
pub use store::{AnalysisStore, DashboardStats, EntityTypeSummary, MemoryStore};

pub use rgpd_extract::{Document, FileType};
pub use rgpd_guard::{AnonymizationPolicy, EntityType, Language, PolicyKind};
