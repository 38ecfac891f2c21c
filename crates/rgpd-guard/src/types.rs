//! Core types for RGPD Guard

use crate::error::{GuardError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Categories of sensitive data the detector knows about
///
/// Variants are declared in tie-break order: when two overlapping spans are
/// otherwise equal, the earlier variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    /// Payment card number (Luhn-valid)
    CreditCard,
    /// Email address
    #[serde(alias = "EMAIL_ADDRESS")]
    Email,
    /// Phone number
    PhoneNumber,
    /// Person name
    Person,
    /// City, region or country
    Location,
    /// IPv4 or IPv6 address
    IpAddress,
    /// International bank account number
    IbanCode,
    /// US social security number
    UsSsn,
}

impl EntityType {
    /// Every entity type, in taxonomy order
    pub const ALL: [EntityType; 8] = [
        EntityType::CreditCard,
        EntityType::Email,
        EntityType::PhoneNumber,
        EntityType::Person,
        EntityType::Location,
        EntityType::IpAddress,
        EntityType::IbanCode,
        EntityType::UsSsn,
    ];

    /// Default allow-list for document analysis
    pub const DEFAULT_SET: [EntityType; 5] = [
        EntityType::CreditCard,
        EntityType::Email,
        EntityType::PhoneNumber,
        EntityType::Person,
        EntityType::Location,
    ];

    /// Canonical label, e.g. `PHONE_NUMBER`
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::CreditCard => "CREDIT_CARD",
            EntityType::Email => "EMAIL",
            EntityType::PhoneNumber => "PHONE_NUMBER",
            EntityType::Person => "PERSON",
            EntityType::Location => "LOCATION",
            EntityType::IpAddress => "IP_ADDRESS",
            EntityType::IbanCode => "IBAN_CODE",
            EntityType::UsSsn => "US_SSN",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = GuardError;

    fn from_str(label: &str) -> Result<Self> {
        let upper = label.trim().to_ascii_uppercase();
        if upper == "EMAIL_ADDRESS" {
            return Ok(EntityType::Email);
        }
        EntityType::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| GuardError::UnknownEntity(label.to_string()))
    }
}

/// Language ruleset used by the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    English,
    French,
}

impl Language {
    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::French
    }
}

impl FromStr for Language {
    type Err = GuardError;

    /// Parse a language tag; region subtags (`fr-FR`, `en_US`) are ignored
    fn from_str(tag: &str) -> Result<Self> {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Ok(Language::English),
            "fr" => Ok(Language::French),
            _ => Err(GuardError::DetectionFailure(format!(
                "no recognizers available for language '{}'",
                tag
            ))),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = GuardError;

    fn try_from(tag: String) -> Result<Self> {
        tag.parse()
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.code().to_string()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A detected sensitive span
///
/// Offsets are byte offsets into the analyzed UTF-8 text and always fall on
/// character boundaries, with `start < end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Entity category
    pub entity_type: EntityType,
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Detector confidence in `[0.0, 1.0]`
    pub confidence: f32,
    /// Name of the recognizer that produced the span
    pub recognizer: String,
}

impl EntitySpan {
    /// Create a new span
    pub fn new(
        entity_type: EntityType,
        start: usize,
        end: usize,
        confidence: f32,
        recognizer: impl Into<String>,
    ) -> Self {
        Self {
            entity_type,
            start,
            end,
            confidence: confidence.clamp(0.0, 1.0),
            recognizer: recognizer.into(),
        }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether two spans share at least one byte
    pub fn overlaps(&self, other: &EntitySpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The spanned slice of `text`
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }

    /// Check that the span addresses a non-empty region of `text` on
    /// character boundaries
    pub fn validate(&self, text: &str) -> Result<()> {
        if self.is_empty() || self.slice(text).is_none() {
            return Err(GuardError::InvalidSpan {
                start: self.start,
                end: self.end,
                len: text.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_labels_round_trip() {
        for entity in EntityType::ALL {
            assert_eq!(entity.as_str().parse::<EntityType>().unwrap(), entity);
        }
        assert_eq!("email_address".parse::<EntityType>().unwrap(), EntityType::Email);
        assert!("PASSPORT".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_entity_serde_label() {
        let json = serde_json::to_string(&EntityType::PhoneNumber).unwrap();
        assert_eq!(json, "\"PHONE_NUMBER\"");
    }

    #[test]
    fn test_language_tags() {
        assert_eq!("fr-FR".parse::<Language>().unwrap(), Language::French);
        assert_eq!("EN_us".parse::<Language>().unwrap(), Language::English);
        assert!(matches!(
            "de".parse::<Language>(),
            Err(GuardError::DetectionFailure(_))
        ));
        let json = serde_json::to_string(&Language::French).unwrap();
        assert_eq!(json, "\"fr\"");
        let parsed: Language = serde_json::from_str("\"en-GB\"").unwrap();
        assert_eq!(parsed, Language::English);
    }

    #[test]
    fn test_span_validation() {
        let text = "héllo";
        assert!(EntitySpan::new(EntityType::Person, 0, 3, 1.0, "t").validate(text).is_ok());
        // Splits the two-byte 'é'
        assert!(EntitySpan::new(EntityType::Person, 0, 2, 1.0, "t").validate(text).is_err());
        assert!(EntitySpan::new(EntityType::Person, 2, 2, 1.0, "t").validate(text).is_err());
        assert!(EntitySpan::new(EntityType::Person, 3, 9, 1.0, "t").validate(text).is_err());
    }
}
