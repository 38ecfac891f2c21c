//! Anonymization policies and text rewriting

use crate::detector::resolve_overlaps;
use crate::error::{GuardError, Result};
use crate::types::{EntitySpan, EntityType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Anonymization operator name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Mask,
    Replace,
    Redact,
}

impl PolicyKind {
    /// Operator name as used by callers
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Mask => "mask",
            PolicyKind::Replace => "replace",
            PolicyKind::Redact => "redact",
        }
    }
}

impl FromStr for PolicyKind {
    type Err = GuardError;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mask" => Ok(PolicyKind::Mask),
            "replace" => Ok(PolicyKind::Replace),
            "redact" | "remove" => Ok(PolicyKind::Redact),
            _ => Err(GuardError::InvalidPolicy(name.to_string())),
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a sensitive span is rewritten
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnonymizationPolicy {
    /// Hide `chars_to_mask` characters of the span with `masking_char`,
    /// counted from the start, or from the end when `from_end` is set
    Mask {
        masking_char: char,
        chars_to_mask: usize,
        from_end: bool,
    },
    /// Substitute the whole span with a fixed literal
    Replace { new_value: String },
    /// Remove the span, leaving surrounding whitespace untouched
    Redact,
}

impl AnonymizationPolicy {
    /// Mask policy; `chars_to_mask` must be positive
    pub fn mask(masking_char: char, chars_to_mask: usize, from_end: bool) -> Result<Self> {
        let policy = AnonymizationPolicy::Mask {
            masking_char,
            chars_to_mask,
            from_end,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Replace policy
    pub fn replace(new_value: impl Into<String>) -> Self {
        AnonymizationPolicy::Replace {
            new_value: new_value.into(),
        }
    }

    /// The operator kind
    pub fn kind(&self) -> PolicyKind {
        match self {
            AnonymizationPolicy::Mask { .. } => PolicyKind::Mask,
            AnonymizationPolicy::Replace { .. } => PolicyKind::Replace,
            AnonymizationPolicy::Redact => PolicyKind::Redact,
        }
    }

    /// Check parameters that the type system cannot rule out
    pub fn validate(&self) -> Result<()> {
        match self {
            AnonymizationPolicy::Mask { chars_to_mask: 0, .. } => Err(GuardError::InvalidPolicy(
                "mask requires chars_to_mask > 0".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Rewrite one sensitive value
    pub fn apply(&self, original: &str) -> String {
        match self {
            AnonymizationPolicy::Mask {
                masking_char,
                chars_to_mask,
                from_end,
            } => {
                let len = original.chars().count();
                let masked = (*chars_to_mask).min(len);
                let (keep_head, keep_tail) = if *from_end {
                    (len - masked, 0)
                } else {
                    (0, len - masked)
                };
                let mut out = String::with_capacity(original.len());
                out.extend(original.chars().take(keep_head));
                out.extend(std::iter::repeat(*masking_char).take(masked));
                out.extend(original.chars().skip(len - keep_tail));
                out
            }
            AnonymizationPolicy::Replace { new_value } => new_value.clone(),
            AnonymizationPolicy::Redact => String::new(),
        }
    }
}

/// One rewritten region of the output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizedItem {
    /// Entity type of the rewritten span
    pub entity_type: EntityType,
    /// Start byte offset in the anonymized text
    pub start: usize,
    /// End byte offset in the anonymized text
    pub end: usize,
    /// Operator applied
    pub operator: PolicyKind,
}

/// Anonymized text together with what was rewritten
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizedText {
    /// The rewritten text
    pub text: String,
    /// Rewritten regions, in text order
    pub items: Vec<AnonymizedItem>,
}

impl AnonymizedText {
    /// The rewritten text
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Applies a policy, with optional per-type overrides, to detected spans
#[derive(Debug, Clone)]
pub struct Anonymizer {
    policy: AnonymizationPolicy,
    overrides: BTreeMap<EntityType, AnonymizationPolicy>,
}

impl Anonymizer {
    /// Create an anonymizer applying `policy` to every span
    pub fn new(policy: AnonymizationPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            policy,
            overrides: BTreeMap::new(),
        })
    }

    /// Use `policy` for spans of `entity` instead of the default
    pub fn with_override(
        mut self,
        entity: EntityType,
        policy: AnonymizationPolicy,
    ) -> Result<Self> {
        policy.validate()?;
        self.overrides.insert(entity, policy);
        Ok(self)
    }

    /// The default policy
    pub fn policy(&self) -> &AnonymizationPolicy {
        &self.policy
    }

    /// The policy applied to spans of `entity`
    pub fn policy_for(&self, entity: EntityType) -> &AnonymizationPolicy {
        self.overrides.get(&entity).unwrap_or(&self.policy)
    }

    /// Rewrite every span of `text`
    ///
    /// Spans are validated, merged where they overlap, then applied in
    /// ascending start order while copying the untouched regions verbatim.
    pub fn anonymize(&self, text: &str, spans: &[EntitySpan]) -> Result<AnonymizedText> {
        for span in spans {
            span.validate(text)?;
        }

        let mut out = String::with_capacity(text.len());
        let mut items = Vec::new();
        let mut last_end = 0;

        for span in resolve_overlaps(spans.to_vec()) {
            out.push_str(&text[last_end..span.start]);

            let policy = self.policy_for(span.entity_type);
            let start = out.len();
            out.push_str(&policy.apply(&text[span.start..span.end]));
            items.push(AnonymizedItem {
                entity_type: span.entity_type,
                start,
                end: out.len(),
                operator: policy.kind(),
            });

            last_end = span.end;
        }
        out.push_str(&text[last_end..]);

        Ok(AnonymizedText { text: out, items })
    }
}

/// Rewrite `text` under a single policy
pub fn anonymize(
    text: &str,
    spans: &[EntitySpan],
    policy: &AnonymizationPolicy,
) -> Result<AnonymizedText> {
    Anonymizer::new(policy.clone())?.anonymize(text, spans)
}
