//! Property-based tests for the masking engine and classifier helpers.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Text without digits or `@` passes through untouched
//! - Masking is idempotent on its own output
//! - Entity positions are well-formed spans matching the entity length
//! - Replaying records in order against the evolving text reproduces the
//!   masked output, with every recorded span reading exactly its entity
//! - Argmax picks the first maximum
//! - Word truncation keeps a prefix with the requested word count

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use email_triage::PiiMasker;
use email_triage::classifier::{argmax, truncate_to_tokens};
use email_triage::models::{DetectionSource, EntityRecord, PiiLabel};
use email_triage::recognizer::{EntityRecognizer, NoopRecognizer, RecognizedEntity};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::sync::Arc;

fn masker() -> PiiMasker {
    PiiMasker::new(Arc::new(NoopRecognizer::new()))
}

/// Recognizer that reports a fixed span list.
struct Spans(Vec<RecognizedEntity>);

impl EntityRecognizer for Spans {
    fn name(&self) -> &'static str {
        "spans"
    }

    fn recognize(&self, _text: &str) -> email_triage::Result<Vec<RecognizedEntity>> {
        Ok(self.0.clone())
    }
}

/// One space-separated piece of a generated email.
#[derive(Debug, Clone)]
enum Segment {
    /// Text the recognizer reports under a tag.
    Recognized(&'static str, String),
    /// Text only the pattern rules may pick up.
    Plain(String),
}

fn segment() -> impl Strategy<Value = Segment> {
    prop_oneof![
        (
            prop::sample::select(vec!["PER", "DATE", "ORG"]),
            "(Asha|Ravi|Zoë|Rituraj|Ångström)",
        )
            .prop_map(|(tag, text)| Segment::Recognized(tag, text)),
        "[a-z]{1,6}@[a-z]{1,6}\\.com".prop_map(Segment::Plain),
        "9[0-9]{9}".prop_map(Segment::Plain),
        "(0[1-9]|1[0-2])/[0-9]{2}".prop_map(Segment::Plain),
        "[a-z]{1,8}".prop_map(Segment::Plain),
    ]
}

/// Joins segments with spaces and reports recognizer spans in characters.
fn assemble(segments: &[Segment]) -> (String, Vec<RecognizedEntity>) {
    let mut text = String::new();
    let mut spans = Vec::new();

    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        let start = text.chars().count();
        match segment {
            Segment::Recognized(tag, word) => {
                text.push_str(word);
                spans.push(RecognizedEntity::new(*tag, start, start + word.chars().count()));
            },
            Segment::Plain(word) => text.push_str(word),
        }
    }

    (text, spans)
}

/// Applies each record to the text state it was reported against.
fn replay(input: &str, entities: &[EntityRecord]) -> Result<String, TestCaseError> {
    let mut state: Vec<char> = input.chars().collect();

    for entity in entities {
        let [start, end] = entity.position;
        prop_assert!(start < end && end <= state.len(), "{entity:?} in {} chars", state.len());

        let current: String = state[start..end].iter().collect();
        prop_assert_eq!(&current, &entity.entity);

        state.splice(start..end, entity.classification.placeholder().chars());
    }

    Ok(state.into_iter().collect())
}

// ============================================================================
// Masking Engine Properties
// ============================================================================

proptest! {
    /// Property: text with no digits and no `@` has nothing to mask.
    #[test]
    fn prop_plain_text_passes_through(text in "[a-zA-Z ,.!?']{0,200}") {
        let outcome = masker().mask(&text).unwrap();
        prop_assert_eq!(&outcome.masked_text, &text);
        prop_assert!(outcome.entities.is_empty());
    }

    /// Property: an embedded address becomes a single email placeholder.
    #[test]
    fn prop_email_is_masked(
        local in "[a-z]{1,12}",
        domain in "[a-z]{1,12}",
        tld in "(com|org|in)",
    ) {
        let email = format!("{local}@{domain}.{tld}");
        let text = format!("Contact {email} today");

        let outcome = masker().mask(&text).unwrap();

        prop_assert_eq!(outcome.masked_text, "Contact [email] today");
        prop_assert_eq!(outcome.entities.len(), 1);
        let entity = &outcome.entities[0];
        prop_assert_eq!(entity.classification, PiiLabel::Email);
        prop_assert_eq!(&entity.entity, &email);
        prop_assert_eq!(entity.position, [8, 8 + email.chars().count()]);
    }

    /// Property: masking already-masked text changes nothing.
    #[test]
    fn prop_masking_is_idempotent(text in "[a-z0-9@. +/-]{0,80}") {
        let first = masker().mask(&text).unwrap();
        let second = masker().mask(&first.masked_text).unwrap();

        prop_assert_eq!(&second.masked_text, &first.masked_text);
        prop_assert!(second.entities.is_empty());
    }

    /// Property: every entity is a forward span read from the text it masked.
    #[test]
    fn prop_positions_are_well_formed(text in "[a-zA-Zé0-9@. +/-]{0,80}") {
        let outcome = masker().mask(&text).unwrap();

        for entity in &outcome.entities {
            prop_assert!(entity.start() < entity.end());
            prop_assert_eq!(entity.end() - entity.start(), entity.entity.chars().count());
            prop_assert!(!entity.entity.ends_with('.'));
        }
        prop_assert_eq!(replay(&text, &outcome.entities)?, outcome.masked_text);
    }

    /// Property: every record reads its entity from the text it was taken
    /// from, across the recognizer pass and every pattern rule.
    #[test]
    fn prop_records_replay_to_masked_text(segments in prop::collection::vec(segment(), 0..12)) {
        let (text, spans) = assemble(&segments);
        let mapped = spans.iter().filter(|span| span.entity_group != "ORG").count();

        let outcome = PiiMasker::new(Arc::new(Spans(spans))).mask(&text).unwrap();

        prop_assert_eq!(outcome.count_from(DetectionSource::Recognizer), mapped);
        let replayed = replay(&text, &outcome.entities)?;
        prop_assert_eq!(replayed, outcome.masked_text);
    }
}

// ============================================================================
// Classifier Helper Properties
// ============================================================================

proptest! {
    /// Property: argmax returns the first index holding the maximum.
    #[test]
    fn prop_argmax_first_maximum(scores in prop::collection::vec(-100.0f32..100.0, 1..32)) {
        let index = argmax(&scores).unwrap();
        let top = scores[index];

        prop_assert!(scores.iter().all(|&score| score <= top));
        prop_assert!(scores[..index].iter().all(|&score| score < top));
    }

    /// Property: equal scores resolve to index zero.
    #[test]
    fn prop_argmax_ties_pick_lowest(value in -10.0f32..10.0, len in 1usize..16) {
        prop_assert_eq!(argmax(&vec![value; len]), Some(0));
    }

    /// Property: truncation keeps a prefix with at most the requested words.
    #[test]
    fn prop_truncation_keeps_prefix(
        words in prop::collection::vec("[a-z]{1,8}", 0..40),
        max_tokens in 1usize..50,
    ) {
        let text = words.join(" ");
        let truncated = truncate_to_tokens(&text, max_tokens);

        prop_assert!(text.starts_with(truncated));
        prop_assert_eq!(
            truncated.split_whitespace().count(),
            words.len().min(max_tokens)
        );
    }

    /// Property: zero disables truncation.
    #[test]
    fn prop_zero_tokens_keeps_text(text in "[a-z ]{0,80}") {
        prop_assert_eq!(truncate_to_tokens(&text, 0), text.as_str());
    }
}
