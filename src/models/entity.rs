//! Entity records produced by the masking engine.

use super::PiiLabel;
use serde::Serialize;

/// Which detector produced an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionSource {
    /// The learned entity recognizer.
    Recognizer,
    /// A pattern rule.
    Pattern,
}

impl DetectionSource {
    /// Returns the source as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recognizer => "recognizer",
            Self::Pattern => "pattern",
        }
    }
}

/// One detected-and-masked span.
///
/// `position` is `[start, end)` in characters, relative to the masked text as
/// it stood when the span was detected. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRecord {
    /// Character span, start inclusive, end exclusive.
    pub position: [usize; 2],
    /// Label of the span.
    pub classification: PiiLabel,
    /// Original text of the span.
    pub entity: String,
    /// Detector that produced the record (not serialized).
    #[serde(skip)]
    pub source: DetectionSource,
}

impl EntityRecord {
    /// Creates a new entity record.
    #[must_use]
    pub fn new(
        start: usize,
        end: usize,
        classification: PiiLabel,
        entity: impl Into<String>,
        source: DetectionSource,
    ) -> Self {
        Self {
            position: [start, end],
            classification,
            entity: entity.into(),
            source,
        }
    }

    /// Start offset (characters).
    #[must_use]
    pub const fn start(&self) -> usize {
        self.position[0]
    }

    /// End offset (characters, exclusive).
    #[must_use]
    pub const fn end(&self) -> usize {
        self.position[1]
    }
}
