//! # RGPD Guard
//!
//! Sensitive entity detection and anonymization for document text.
//!
//! RGPD Guard finds personal data in plain text and rewrites it under a
//! chosen policy:
//!
//! - **Detection**: payment cards, email addresses, phone numbers, person
//!   names, locations, IP addresses, IBANs and US social security numbers,
//!   with English and French rulesets
//! - **Anonymization**: mask, replace or redact every detected span
//! - **Statistics**: per-type counts and percentages for one document
//!
//! ## Quick Start
//!
//! ```rust
//! use rgpd_guard::{
//!     anonymize, AnonymizationPolicy, DetectorConfig, EntityDetector, EntityType, Language,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let detector = EntityDetector::new(DetectorConfig::default())?;
//!
//!     let text = "John Doe, john@example.com, +33612345678";
//!     let spans = detector.detect(text, Language::French, &EntityType::DEFAULT_SET)?;
//!     let result = anonymize(text, &spans, &AnonymizationPolicy::replace("<SENSITIVE_DATA>"))?;
//!
//!     assert_eq!(result.text, "<SENSITIVE_DATA>, <SENSITIVE_DATA>, <SENSITIVE_DATA>");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!  text ──► ┌────────────────┐ spans ┌────────────┐ ──► anonymized text
//!           │ EntityDetector │ ────► │ Anonymizer │
//!           │ ┌────────────┐ │   │   └────────────┘
//!           │ │ Pattern    │ │   │   ┌────────────┐
//!           │ │ Recognizers│ │   └─► │ aggregate  │ ──► statistics
//!           │ └────────────┘ │       └────────────┘
//!           │ ┌────────────┐ │
//!           │ │ Gazetteers │ │
//!           │ └────────────┘ │
//!           └────────────────┘
//! ```

pub mod anonymizer;
pub mod config;
pub mod detector;
pub mod error;
pub mod gazetteer;
pub mod recognizer;
pub mod stats;
pub mod types;

pub use anonymizer::{
    anonymize, AnonymizationPolicy, AnonymizedItem, AnonymizedText, Anonymizer, PolicyKind,
};
pub use config::{AnonymizerConfig, DetectorConfig, GuardConfig};
pub use detector::{resolve_overlaps, EntityDetector};
pub use error::{GuardError, Result};
pub use recognizer::Recognizer;
pub use stats::{aggregate, EntityStatistic};
pub use types::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::anonymizer::{AnonymizationPolicy, Anonymizer, PolicyKind};
    pub use crate::config::GuardConfig;
    pub use crate::detector::EntityDetector;
    pub use crate::error::{GuardError, Result};
    pub use crate::recognizer::Recognizer;
    pub use crate::types::*;
}
