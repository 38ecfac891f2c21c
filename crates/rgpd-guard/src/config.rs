//! Configuration for RGPD Guard

use crate::anonymizer::{AnonymizationPolicy, Anonymizer, PolicyKind};
use crate::error::Result;
use crate::types::{EntityType, Language};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main configuration for Guard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// Entity detection configuration
    pub detector: DetectorConfig,
    /// Anonymization configuration
    pub anonymizer: AnonymizerConfig,
}

/// Entity detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Default language ruleset
    pub language: Language,
    /// Default entity allow-list
    pub entities: Vec<EntityType>,
    /// Spans scoring below this are dropped
    pub min_score: f32,
    /// Bytes before a span searched for context words
    pub context_window: usize,
    /// Confidence added when a context word is found
    pub context_boost: f32,
    /// Minimum confidence of a span with supporting context
    pub context_floor: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            language: Language::French,
            entities: EntityType::DEFAULT_SET.to_vec(),
            min_score: 0.0,
            context_window: 40,
            context_boost: 0.35,
            context_floor: 0.4,
        }
    }
}

/// Anonymization configuration
///
/// Holds the parameters used when a policy is selected by name, plus
/// optional per-entity-type overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnonymizerConfig {
    /// Operator used when the caller does not name one
    pub default_operator: PolicyKind,
    /// Character used by the mask operator
    pub masking_char: char,
    /// Number of characters the mask operator hides
    pub chars_to_mask: usize,
    /// Mask from the end of the span instead of the start
    pub from_end: bool,
    /// Literal used by the replace operator
    pub replace_value: String,
    /// Policies applied to specific entity types instead of the request's
    pub overrides: BTreeMap<EntityType, AnonymizationPolicy>,
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            default_operator: PolicyKind::Mask,
            masking_char: '*',
            chars_to_mask: 4,
            from_end: false,
            replace_value: "<SENSITIVE_DATA>".to_string(),
            overrides: BTreeMap::new(),
        }
    }
}

impl AnonymizerConfig {
    /// Build the concrete policy for an operator kind
    pub fn policy(&self, kind: PolicyKind) -> Result<AnonymizationPolicy> {
        match kind {
            PolicyKind::Mask => {
                AnonymizationPolicy::mask(self.masking_char, self.chars_to_mask, self.from_end)
            }
            PolicyKind::Replace => Ok(AnonymizationPolicy::replace(self.replace_value.clone())),
            PolicyKind::Redact => Ok(AnonymizationPolicy::Redact),
        }
    }

    /// Build the concrete policy for an operator name such as `"mask"`
    pub fn policy_from_name(&self, name: &str) -> Result<AnonymizationPolicy> {
        self.policy(name.parse()?)
    }

    /// The policy used when the caller does not name one
    pub fn default_policy(&self) -> Result<AnonymizationPolicy> {
        self.policy(self.default_operator)
    }

    /// Build an anonymizer for `policy` with the configured overrides
    pub fn anonymizer(&self, policy: AnonymizationPolicy) -> Result<Anonymizer> {
        let mut anonymizer = Anonymizer::new(policy)?;
        for (entity, policy) in &self.overrides {
            anonymizer = anonymizer.with_override(*entity, policy.clone())?;
        }
        Ok(anonymizer)
    }
}
