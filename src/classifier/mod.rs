//! Category classification.
//!
//! The sequence-classification model is an external boundary reached through
//! [`ScoreModel`]. [`CategoryClassifier`] truncates the masked text, asks the
//! model for per-class scores, picks the arg-max and resolves it through the
//! [`LabelTable`].

mod labels;
mod remote;

pub use labels::LabelTable;
pub use remote::RemoteScoreModel;

use crate::{Error, Result};
use std::sync::Arc;

/// Default maximum token length fed to the model.
pub const DEFAULT_MAX_TOKENS: usize = 128;

/// Trait for sequence-classification models.
pub trait ScoreModel: Send + Sync {
    /// The model name, for logs and metrics.
    fn name(&self) -> &'static str;

    /// Returns one score per class for `text`, indexed by class id.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unavailable or its output cannot be
    /// decoded.
    fn scores(&self, text: &str, max_tokens: usize) -> Result<Vec<f32>>;
}

/// Resolves masked text to a category label.
#[derive(Clone)]
pub struct CategoryClassifier {
    model: Arc<dyn ScoreModel>,
    labels: Arc<LabelTable>,
    max_tokens: usize,
}

impl CategoryClassifier {
    /// Creates a classifier.
    #[must_use]
    pub fn new(model: Arc<dyn ScoreModel>, labels: Arc<LabelTable>) -> Self {
        Self {
            model,
            labels,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Sets the maximum token length.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Returns the label table.
    #[must_use]
    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Classifies `text`, which is never modified.
    ///
    /// # Errors
    ///
    /// Returns an error if the model fails, returns no scores, or picks a
    /// class the label table does not know.
    pub fn classify(&self, text: &str) -> Result<String> {
        let input = truncate_to_tokens(text, self.max_tokens);
        let scores = self.model.scores(input, self.max_tokens)?;

        let index = argmax(&scores).ok_or_else(|| Error::OperationFailed {
            operation: "classify".to_string(),
            cause: format!("model '{}' returned no scores", self.model.name()),
        })?;

        let label = self.labels.get(index).ok_or_else(|| Error::OperationFailed {
            operation: "classify".to_string(),
            cause: format!(
                "class index {index} outside label table of {} entries",
                self.labels.len()
            ),
        })?;

        tracing::debug!(
            model = self.model.name(),
            class_index = index,
            category = label,
            "Classified text"
        );
        Ok(label.to_string())
    }
}

impl std::fmt::Debug for CategoryClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryClassifier")
            .field("model", &self.model.name())
            .field("labels", &self.labels.len())
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Index of the highest score.
///
/// Ties go to the lowest index. NaN never wins unless every score is NaN, in
/// which case index 0 is returned. Returns `None` for an empty slice.
#[must_use]
pub fn argmax(scores: &[f32]) -> Option<usize> {
    if scores.is_empty() {
        return None;
    }

    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {},
            _ => best = Some((index, score)),
        }
    }

    Some(best.map_or(0, |(index, _)| index))
}

/// Keeps the first `max_tokens` whitespace-delimited words of `text`.
///
/// Only words with at least one visible character count, since the model's
/// tokenizer drops control and zero-width format characters. The returned
/// slice borrows from `text` and preserves its inner spacing.
#[must_use]
pub fn truncate_to_tokens(text: &str, max_tokens: usize) -> &str {
    if max_tokens == 0 {
        return text;
    }

    let mut words = 0;
    let mut in_word = false;
    for (byte, ch) in text.char_indices() {
        if ch.is_whitespace() {
            in_word = false;
        } else if !in_word && !is_invisible(ch) {
            if words == max_tokens {
                return text[..byte].trim_end();
            }
            words += 1;
            in_word = true;
        }
    }

    text
}

/// Characters a BERT-style tokenizer strips before splitting.
fn is_invisible(ch: char) -> bool {
    ch.is_control()
        || matches!(
            ch,
            '\u{00AD}'
                | '\u{200B}'..='\u{200F}'
                | '\u{202A}'..='\u{202E}'
                | '\u{2060}'..='\u{2064}'
                | '\u{FEFF}'
                | '\u{FFFD}'
        )
}
