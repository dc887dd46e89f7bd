//! Masking engine.
//!
//! Masks PII in two passes. The recognizer pass runs the entity recognizer on
//! the original text and substitutes every span whose tag maps to a label.
//! The pattern pass then applies each pattern rule, in table order, to the
//! text the previous step left behind. Every substitution writes the
//! `[label]` placeholder and appends an [`EntityRecord`].
//!
//! Positions are character offsets into the text as it stood when the entity
//! was substituted: earlier substitutions of the same pass (or rule) are
//! already reflected, later ones are not.

use super::pii::{PatternMatcher, looks_like_placeholder};
use super::rewrite::{CharIndex, Replacement, apply, char_delta, shift};
use super::tags::map_tag;
use crate::models::{DetectionSource, EntityRecord, PiiLabel};
use crate::recognizer::EntityRecognizer;
use crate::{Error, Result};
use std::sync::Arc;

/// Result of masking a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskOutcome {
    /// The text with every detected entity replaced by its placeholder.
    pub masked_text: String,
    /// Detected entities, in detection order.
    pub entities: Vec<EntityRecord>,
}

impl MaskOutcome {
    /// Returns true if anything was masked.
    #[must_use]
    pub fn was_masked(&self) -> bool {
        !self.entities.is_empty()
    }

    /// Number of entities contributed by `source`.
    #[must_use]
    pub fn count_from(&self, source: DetectionSource) -> usize {
        self.entities.iter().filter(|e| e.source == source).count()
    }
}

/// Two-pass PII masker.
///
/// Holds only read-only collaborators and can be shared across threads.
#[derive(Clone)]
pub struct PiiMasker {
    recognizer: Arc<dyn EntityRecognizer>,
    matcher: PatternMatcher,
}

impl PiiMasker {
    /// Creates a masker over `recognizer` and the full pattern rule table.
    #[must_use]
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self {
            recognizer,
            matcher: PatternMatcher::new(),
        }
    }

    /// Name of the underlying recognizer.
    #[must_use]
    pub fn recognizer_name(&self) -> &'static str {
        self.recognizer.name()
    }

    /// Masks `text`.
    ///
    /// Text without detectable PII comes back unchanged with no entities.
    ///
    /// # Errors
    ///
    /// Returns the recognizer's error if recognition fails, and
    /// [`Error::MalformedSpan`] if it reports spans that are out of bounds,
    /// reversed, or out of order.
    pub fn mask(&self, text: &str) -> Result<MaskOutcome> {
        let mut entities = Vec::new();

        let masked = self.recognizer_pass(text, &mut entities)?;
        let recognized = entities.len();
        let masked_text = self.pattern_pass(masked, &mut entities);

        tracing::debug!(
            recognizer = self.recognizer.name(),
            recognized = recognized,
            matched = entities.len() - recognized,
            "Masked text"
        );

        Ok(MaskOutcome {
            masked_text,
            entities,
        })
    }

    fn recognizer_pass(&self, text: &str, entities: &mut Vec<EntityRecord>) -> Result<String> {
        let recognized = self.recognizer.recognize(text)?;
        if recognized.is_empty() {
            return Ok(text.to_string());
        }

        let index = CharIndex::new(text);
        let len = index.char_len();
        let mut replacements = Vec::new();
        let mut offset: isize = 0;
        let mut accepted_end = 0;

        for entity in recognized {
            let Some(label) = map_tag(&entity.entity_group) else {
                tracing::debug!(tag = %entity.entity_group, "Dropping unmapped recognizer tag");
                continue;
            };
            if entity.start == entity.end {
                continue;
            }

            let malformed = Error::MalformedSpan {
                start: entity.start,
                end: entity.end,
                len,
            };
            if entity.start > entity.end || entity.start < accepted_end {
                return Err(malformed);
            }
            let (Some(byte_start), Some(byte_end)) =
                (index.byte_offset(entity.start), index.byte_offset(entity.end))
            else {
                return Err(malformed);
            };

            let original = &text[byte_start..byte_end];
            if looks_like_placeholder(original) {
                tracing::debug!(
                    label = %label,
                    start = entity.start,
                    "Skipping placeholder-shaped recognizer span"
                );
                continue;
            }

            let placeholder = label.placeholder();
            entities.push(EntityRecord::new(
                shift(entity.start, offset),
                shift(entity.end, offset),
                label,
                original,
                DetectionSource::Recognizer,
            ));
            offset += char_delta(&placeholder, entity.end - entity.start);
            accepted_end = entity.end;
            record_masked(label, DetectionSource::Recognizer);

            replacements.push(Replacement {
                start: byte_start,
                end: byte_end,
                text: placeholder,
            });
        }

        Ok(apply(text, &replacements))
    }

    fn pattern_pass(&self, mut masked: String, entities: &mut Vec<EntityRecord>) -> String {
        for rule in self.matcher.rules() {
            let matches = rule.find(&masked);
            if matches.is_empty() {
                continue;
            }

            let index = CharIndex::new(&masked);
            let mut offset: isize = 0;
            let mut replacements = Vec::with_capacity(matches.len());

            for found in matches {
                let start = index.char_offset(found.start);
                let end = index.char_offset(found.end);
                let placeholder = found.label.placeholder();

                entities.push(EntityRecord::new(
                    shift(start, offset),
                    shift(end, offset),
                    found.label,
                    found.matched_text,
                    DetectionSource::Pattern,
                ));
                offset += char_delta(&placeholder, end - start);
                record_masked(found.label, DetectionSource::Pattern);

                replacements.push(Replacement {
                    start: found.start,
                    end: found.end,
                    text: placeholder,
                });
            }

            masked = apply(&masked, &replacements);
        }

        masked
    }
}

impl std::fmt::Debug for PiiMasker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiiMasker")
            .field("recognizer", &self.recognizer.name())
            .field("rules", &self.matcher.rules().len())
            .finish()
    }
}

fn record_masked(label: PiiLabel, source: DetectionSource) {
    metrics::counter!(
        "pii_entities_masked_total",
        "label" => label.as_str(),
        "source" => source.as_str()
    )
    .increment(1);
}
