//! Entity recognizers
//!
//! A recognizer finds candidate spans of a single entity type. Pattern
//! recognizers pair regular expressions with an optional checksum or sanity
//! validator; gazetteer recognizers live in [`crate::gazetteer`].

use crate::error::Result;
use crate::types::{EntitySpan, EntityType, Language};
use regex::Regex;

/// Common trait for all recognizers
///
/// Recognizers are built once and shared read-only across requests.
pub trait Recognizer: Send + Sync {
    /// Recognizer name, recorded on every span it produces
    fn name(&self) -> &str;

    /// The entity type this recognizer reports
    fn entity_type(&self) -> EntityType;

    /// Whether this recognizer has rules for `language`
    fn supports(&self, _language: Language) -> bool {
        true
    }

    /// Words that, found shortly before a span, raise its confidence
    fn context_words(&self, _language: Language) -> &[&'static str] {
        &[]
    }

    /// Find candidate spans in `text`
    fn analyze(&self, text: &str, language: Language) -> Result<Vec<EntitySpan>>;
}

/// Outcome of validating a pattern match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Not an entity; drop the match
    Reject,
    /// Keep the pattern's base score
    Accept,
    /// Checksum passed; the match is certain
    Certain,
}

/// Validation hook run on every regex match
pub type Validator = fn(&str) -> Verdict;

/// A regex with its base confidence
pub struct Pattern {
    name: &'static str,
    regex: Regex,
    score: f32,
}

impl Pattern {
    /// Compile a pattern
    pub fn new(name: &'static str, regex: &str, score: f32) -> Result<Self> {
        Ok(Self {
            name,
            regex: Regex::new(regex)?,
            score,
        })
    }
}

/// Context words for one language
#[derive(Debug, Clone, Copy)]
pub struct ContextWords {
    pub english: &'static [&'static str],
    pub french: &'static [&'static str],
}

impl ContextWords {
    pub const NONE: ContextWords = ContextWords {
        english: &[],
        french: &[],
    };

    fn for_language(&self, language: Language) -> &'static [&'static str] {
        match language {
            Language::English => self.english,
            Language::French => self.french,
        }
    }
}

/// Regex-based recognizer with optional validation
pub struct PatternRecognizer {
    name: String,
    entity_type: EntityType,
    patterns: Vec<Pattern>,
    validator: Option<Validator>,
    retry_prefixes: bool,
    context: ContextWords,
}

impl PatternRecognizer {
    /// Create a recognizer from compiled patterns
    pub fn new(name: impl Into<String>, entity_type: EntityType, patterns: Vec<Pattern>) -> Self {
        Self {
            name: name.into(),
            entity_type,
            patterns,
            validator: None,
            retry_prefixes: false,
            context: ContextWords::NONE,
        }
    }

    /// Run `validator` on every match
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// On a rejected match, fall back to the longest prefix ending at a
    /// separator that the validator accepts
    ///
    /// Greedy digit patterns can run into a neighbouring number or word; the
    /// real entity is then a prefix of the match.
    pub fn with_prefix_retry(mut self) -> Self {
        self.retry_prefixes = true;
        self
    }

    /// Validate a match, returning the accepted length and verdict
    fn validate(&self, candidate: &str) -> Option<(usize, Verdict)> {
        let Some(validate) = self.validator else {
            return Some((candidate.len(), Verdict::Accept));
        };
        match validate(candidate) {
            Verdict::Reject if self.retry_prefixes => candidate
                .match_indices([' ', '-'])
                .rev()
                .find_map(|(end, _)| match validate(&candidate[..end]) {
                    Verdict::Reject => None,
                    verdict => Some((end, verdict)),
                }),
            Verdict::Reject => None,
            verdict => Some((candidate.len(), verdict)),
        }
    }

    /// Set the context words
    pub fn with_context(mut self, context: ContextWords) -> Self {
        self.context = context;
        self
    }
}

impl Recognizer for PatternRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    fn context_words(&self, language: Language) -> &[&'static str] {
        self.context.for_language(language)
    }

    fn analyze(&self, text: &str, _language: Language) -> Result<Vec<EntitySpan>> {
        let mut spans = Vec::new();
        for pattern in &self.patterns {
            for m in pattern.regex.find_iter(text) {
                let Some((len, verdict)) = self.validate(m.as_str()) else {
                    continue;
                };
                let score = match verdict {
                    Verdict::Certain => 1.0,
                    _ => pattern.score,
                };
                spans.push(EntitySpan::new(
                    self.entity_type,
                    m.start(),
                    m.start() + len,
                    score,
                    format!("{}:{}", self.name, pattern.name),
                ));
            }
        }
        Ok(spans)
    }
}

/// Built-in pattern recognizers (everything except names and places)
pub fn pattern_recognizers() -> Result<Vec<PatternRecognizer>> {
    Ok(vec![
        PatternRecognizer::new(
            "email",
            EntityType::Email,
            vec![Pattern::new(
                "address",
                r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
                0.5,
            )?],
        )
        .with_validator(validate_email)
        .with_context(ContextWords {
            english: &["email", "e-mail", "mail", "contact"],
            french: &["courriel", "email", "e-mail", "mail", "adresse électronique"],
        }),
        PatternRecognizer::new(
            "credit_card",
            EntityType::CreditCard,
            vec![Pattern::new("digits", r"\b(?:\d[ -]?){12,18}\d\b", 0.3)?],
        )
        .with_validator(validate_credit_card)
        .with_prefix_retry()
        .with_context(ContextWords {
            english: &["credit", "card", "visa", "mastercard", "amex", "payment"],
            french: &["carte", "bancaire", "crédit", "visa", "mastercard", "paiement"],
        }),
        PatternRecognizer::new(
            "phone",
            EntityType::PhoneNumber,
            vec![
                Pattern::new("international", r"\+[1-9](?:[ .\-]?\d){7,14}\b", 0.7)?,
                Pattern::new("fr_national", r"\b0[1-9](?:[ .\-]?\d{2}){4}\b", 0.6)?,
                Pattern::new(
                    "nanp",
                    r"(?:\(\d{3}\)[ ]?|\b\d{3}[.\-])\d{3}[.\-]\d{4}\b",
                    0.5,
                )?,
            ],
        )
        .with_validator(validate_phone)
        .with_context(ContextWords {
            english: &["phone", "telephone", "mobile", "cell", "call", "tel", "fax"],
            french: &[
                "téléphone",
                "telephone",
                "portable",
                "mobile",
                "tél",
                "tel",
                "fixe",
                "appeler",
            ],
        }),
        PatternRecognizer::new(
            "ip",
            EntityType::IpAddress,
            vec![
                Pattern::new(
                    "v4",
                    r"\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b",
                    0.6,
                )?,
                Pattern::new("v6", r"\b(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}\b", 0.6)?,
            ],
        )
        .with_validator(validate_ip)
        .with_context(ContextWords {
            english: &["ip", "address", "server", "host"],
            french: &["ip", "adresse", "serveur", "hôte"],
        }),
        PatternRecognizer::new(
            "iban",
            EntityType::IbanCode,
            vec![Pattern::new(
                "code",
                r"\b[A-Z]{2}\d{2}(?:[ ]?[A-Z0-9]){11,30}\b",
                0.5,
            )?],
        )
        .with_validator(validate_iban)
        .with_prefix_retry()
        .with_context(ContextWords {
            english: &["iban", "bank", "account", "transfer"],
            french: &["iban", "rib", "compte", "bancaire", "virement"],
        }),
        PatternRecognizer::new(
            "us_ssn",
            EntityType::UsSsn,
            vec![Pattern::new("dashed", r"\b\d{3}-\d{2}-\d{4}\b", 0.5)?],
        )
        .with_validator(validate_us_ssn)
        .with_context(ContextWords {
            english: &["ssn", "social security"],
            french: &["ssn", "sécurité sociale"],
        }),
    ])
}

fn validate_email(value: &str) -> Verdict {
    let Some((local, domain)) = value.rsplit_once('@') else {
        return Verdict::Reject;
    };
    let labels_ok = domain.split('.').all(|label| !label.is_empty());
    let tld_ok = domain
        .rsplit('.')
        .next()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));
    if !local.is_empty() && labels_ok && tld_ok {
        Verdict::Certain
    } else {
        Verdict::Reject
    }
}

fn validate_credit_card(value: &str) -> Verdict {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if luhn_check(&digits) {
        Verdict::Certain
    } else {
        Verdict::Reject
    }
}

fn validate_phone(value: &str) -> Verdict {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if (8..=15).contains(&digits) {
        Verdict::Accept
    } else {
        Verdict::Reject
    }
}

fn validate_ip(value: &str) -> Verdict {
    match value.parse::<std::net::IpAddr>() {
        Ok(_) => Verdict::Accept,
        Err(_) => Verdict::Reject,
    }
}

fn validate_iban(value: &str) -> Verdict {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if (15..=34).contains(&compact.len()) && iban_checksum(&compact) {
        Verdict::Certain
    } else {
        Verdict::Reject
    }
}

fn validate_us_ssn(value: &str) -> Verdict {
    let mut parts = value.split('-');
    let (Some(area), Some(group), Some(serial)) = (parts.next(), parts.next(), parts.next()) else {
        return Verdict::Reject;
    };
    let invalid_area = area == "000" || area == "666" || area.starts_with('9');
    if invalid_area || group == "00" || serial == "0000" {
        Verdict::Reject
    } else {
        Verdict::Accept
    }
}

/// Luhn algorithm for card number validation
pub fn luhn_check(number: &str) -> bool {
    let digits: Vec<u32> = number.chars().filter_map(|c| c.to_digit(10)).collect();

    if !(13..=19).contains(&digits.len()) {
        return false;
    }

    let mut sum = 0;
    let mut double = false;

    for &digit in digits.iter().rev() {
        let mut d = digit;
        if double {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
        double = !double;
    }

    sum % 10 == 0
}

/// ISO 7064 mod-97 check used by IBANs
pub fn iban_checksum(iban: &str) -> bool {
    if iban.len() < 5 || !iban.is_ascii() {
        return false;
    }
    let (head, tail) = iban.split_at(4);
    let mut remainder: u32 = 0;
    for c in tail.chars().chain(head.chars()) {
        let value = match c {
            '0'..='9' => c as u32 - '0' as u32,
            'A'..='Z' => c as u32 - 'A' as u32 + 10,
            _ => return false,
        };
        remainder = if value >= 10 {
            (remainder * 100 + value) % 97
        } else {
            (remainder * 10 + value) % 97
        };
    }
    remainder == 1
}
