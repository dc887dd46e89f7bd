//! No-op recognizer (pattern-only mode).

use super::{EntityRecognizer, RecognizedEntity};
use crate::Result;

/// Recognizer that never detects anything.
///
/// Used when no recognition endpoint is configured, leaving masking to the
/// pattern rules alone.
pub struct NoopRecognizer;

impl NoopRecognizer {
    /// Creates a new no-op recognizer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for NoopRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRecognizer for NoopRecognizer {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn recognize(&self, _text: &str) -> Result<Vec<RecognizedEntity>> {
        Ok(Vec::new())
    }
}
