//! Entity recognition.
//!
//! The learned entity recognizer is an external model boundary. The masking
//! engine consumes it only through [`EntityRecognizer`]; implementations call
//! a remote token-classification endpoint or, in pattern-only mode, detect
//! nothing.

mod noop;
mod remote;

pub use noop::NoopRecognizer;
pub use remote::RemoteRecognizer;

use crate::Result;
use serde::{Deserialize, Serialize};

/// A single entity reported by a recognizer.
///
/// Offsets are character offsets into the text given to
/// [`EntityRecognizer::recognize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedEntity {
    /// Recognizer-native type tag (for example `PER`).
    pub entity_group: String,
    /// Start offset, inclusive.
    pub start: usize,
    /// End offset, exclusive.
    pub end: usize,
    /// Model confidence. Unused by masking.
    #[serde(default)]
    pub score: Option<f32>,
}

impl RecognizedEntity {
    /// Creates a new recognized entity without a score.
    #[must_use]
    pub fn new(entity_group: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            entity_group: entity_group.into(),
            start,
            end,
            score: None,
        }
    }
}

/// Trait for entity recognizers.
pub trait EntityRecognizer: Send + Sync {
    /// The recognizer name, for logs and metrics.
    fn name(&self) -> &'static str;

    /// Detects entities in `text`.
    ///
    /// Results are expected left to right by start offset and
    /// non-overlapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying model is unavailable or its output
    /// cannot be decoded.
    fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>>;
}
