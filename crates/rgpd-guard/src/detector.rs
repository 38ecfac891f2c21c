//! Entity detection
//!
//! The detector runs every registered recognizer whose entity type is in the
//! requested allow-list, raises the confidence of spans preceded by a context
//! word, drops spans below the configured minimum score and finally merges
//! overlapping spans so that no byte is reported twice.

use crate::config::DetectorConfig;
use crate::error::{GuardError, Result};
use crate::gazetteer::{LocationRecognizer, PersonRecognizer};
use crate::recognizer::{pattern_recognizers, Recognizer};
use crate::types::{EntitySpan, EntityType, Language};
use std::cmp::Ordering;
use tracing::debug;

/// Sensitive entity detector
pub struct EntityDetector {
    config: DetectorConfig,
    recognizers: Vec<Box<dyn Recognizer>>,
}

impl std::fmt::Debug for EntityDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityDetector")
            .field("config", &self.config)
            .field(
                "recognizers",
                &self.recognizers.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl EntityDetector {
    /// Create a detector with the built-in recognizers
    pub fn new(config: DetectorConfig) -> Result<Self> {
        let mut recognizers: Vec<Box<dyn Recognizer>> = Vec::new();
        for recognizer in pattern_recognizers()? {
            recognizers.push(Box::new(recognizer));
        }
        recognizers.push(Box::new(PersonRecognizer::new()?));
        recognizers.push(Box::new(LocationRecognizer::new()?));
        Ok(Self::with_recognizers(config, recognizers))
    }

    /// Create a detector with an explicit recognizer set
    pub fn with_recognizers(config: DetectorConfig, recognizers: Vec<Box<dyn Recognizer>>) -> Self {
        Self {
            config,
            recognizers,
        }
    }

    /// Register an additional recognizer
    pub fn add_recognizer(&mut self, recognizer: Box<dyn Recognizer>) {
        self.recognizers.push(recognizer);
    }

    /// Detector configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect with the configured language and allow-list
    pub fn detect_default(&self, text: &str) -> Result<Vec<EntitySpan>> {
        self.detect(text, self.config.language, &self.config.entities)
    }

    /// Find sensitive spans in `text`
    ///
    /// Returned spans are sorted by start offset and never overlap. Only
    /// types listed in `entities` are reported.
    pub fn detect(
        &self,
        text: &str,
        language: Language,
        entities: &[EntityType],
    ) -> Result<Vec<EntitySpan>> {
        let mut spans = Vec::new();

        for recognizer in &self.recognizers {
            if !entities.contains(&recognizer.entity_type()) || !recognizer.supports(language) {
                continue;
            }

            let found = recognizer
                .analyze(text, language)
                .map_err(|e| {
                    GuardError::DetectionFailure(format!("{}: {}", recognizer.name(), e))
                })?;

            let context = recognizer.context_words(language);
            for mut span in found {
                if !entities.contains(&span.entity_type) {
                    debug!(
                        recognizer = recognizer.name(),
                        entity_type = %span.entity_type,
                        "Discarding span outside the allow-list"
                    );
                    continue;
                }
                // Recognizers outside this crate may report anything
                if span.validate(text).is_err() {
                    debug!(
                        recognizer = recognizer.name(),
                        start = span.start,
                        end = span.end,
                        "Discarding invalid span"
                    );
                    continue;
                }
                if !context.is_empty() && self.has_context(text, span.start, context) {
                    span.confidence = (span.confidence + self.config.context_boost)
                        .min(1.0)
                        .max(self.config.context_floor);
                }
                if span.confidence >= self.config.min_score {
                    spans.push(span);
                }
            }
        }

        let spans = resolve_overlaps(spans);
        debug!(
            language = %language,
            entities = spans.len(),
            text_length = text.len(),
            "Entity detection complete"
        );
        Ok(spans)
    }

    /// Whether a context word occurs in the window preceding `start`
    fn has_context(&self, text: &str, start: usize, words: &[&str]) -> bool {
        let mut from = start.saturating_sub(self.config.context_window);
        while !text.is_char_boundary(from) {
            from += 1;
        }
        let window = text[from..start].to_lowercase();
        words
            .iter()
            .any(|word| contains_word(&window, &word.to_lowercase()))
    }
}

/// Whether `word` occurs in `haystack` with no letter or digit on either side
fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(i, w)| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + w.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Whether `a` beats `b` when the two overlap
///
/// Higher confidence first, then the longer span, then the earlier start,
/// then taxonomy order.
fn outranks(a: &EntitySpan, b: &EntitySpan) -> bool {
    let order = a
        .confidence
        .total_cmp(&b.confidence)
        .then_with(|| a.len().cmp(&b.len()))
        .then_with(|| b.start.cmp(&a.start))
        .then_with(|| b.entity_type.cmp(&a.entity_type));
    order == Ordering::Greater
}

/// Merge overlapping spans
///
/// Every group of transitively overlapping spans becomes a single span
/// covering their union, labelled with the best-ranked member. Spans that
/// merely touch (`a.end == b.start`) are kept apart. The result is sorted by
/// start offset.
pub fn resolve_overlaps(mut spans: Vec<EntitySpan>) -> Vec<EntitySpan> {
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    // (cluster start, cluster end, best member)
    let mut clusters: Vec<(usize, usize, EntitySpan)> = Vec::with_capacity(spans.len());

    for span in spans {
        match clusters.last_mut() {
            Some((_, end, best)) if span.start < *end => {
                *end = (*end).max(span.end);
                if outranks(&span, best) {
                    *best = span;
                }
            }
            _ => clusters.push((span.start, span.end, span)),
        }
    }

    clusters
        .into_iter()
        .map(|(start, end, mut best)| {
            best.start = start;
            best.end = end;
            best
        })
        .collect()
}
