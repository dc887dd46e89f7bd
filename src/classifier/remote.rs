//! Remote sequence-classification model.

use super::ScoreModel;
use crate::http_client::{Endpoint, InferenceHttpConfig};
use crate::{Error, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Score model backed by a hosted text-classification endpoint.
#[derive(Debug)]
pub struct RemoteScoreModel {
    endpoint: Endpoint,
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
    parameters: ClassifyParameters,
}

#[derive(Serialize)]
struct ClassifyParameters {
    truncation: bool,
    max_length: usize,
    /// Serialized as `null` so every class score is returned.
    top_k: Option<usize>,
}

/// One entry of the text-classification list form.
#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

/// Accepted response shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScoreResponse {
    Logits { logits: Vec<f32> },
    Scores { scores: Vec<f32> },
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ScoreResponse {
    fn into_scores(self) -> Result<Vec<f32>> {
        match self {
            Self::Logits { logits } => Ok(logits),
            Self::Scores { scores } => Ok(scores),
            Self::Nested(batches) => batches
                .into_iter()
                .next()
                .map_or_else(|| Ok(Vec::new()), dense_scores),
            Self::Flat(entries) => dense_scores(entries),
        }
    }
}

/// Highest class count accepted from a label-list response.
const MAX_CLASSES: usize = 1024;

/// Places each `LABEL_<i>` score at index `i`.
///
/// Classes missing from the response score negative infinity. Indices at or
/// above [`MAX_CLASSES`] are rejected.
fn dense_scores(entries: Vec<LabelScore>) -> Result<Vec<f32>> {
    let mut indexed = Vec::with_capacity(entries.len());
    for entry in entries {
        let index = class_index(&entry.label).ok_or_else(|| Error::OperationFailed {
            operation: "classifier_response".to_string(),
            cause: format!("unrecognized class label '{}'", entry.label),
        })?;
        if index >= MAX_CLASSES {
            return Err(Error::OperationFailed {
                operation: "classifier_response".to_string(),
                cause: format!("class index {index} exceeds limit of {MAX_CLASSES} classes"),
            });
        }
        indexed.push((index, entry.score));
    }

    let width = indexed.iter().map(|(index, _)| index + 1).max().unwrap_or(0);
    let mut scores = vec![f32::NEG_INFINITY; width];
    for (index, score) in indexed {
        scores[index] = score;
    }
    Ok(scores)
}

fn class_index(label: &str) -> Option<usize> {
    label.strip_prefix("LABEL_").unwrap_or(label).parse().ok()
}

impl RemoteScoreModel {
    /// Creates a model client for the endpoint at `url`.
    #[must_use]
    pub fn new(url: impl Into<String>, config: InferenceHttpConfig) -> Self {
        Self {
            endpoint: Endpoint::new("classifier", url, config),
        }
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: Option<SecretString>) -> Self {
        self.endpoint = self.endpoint.with_token(token);
        self
    }
}

impl ScoreModel for RemoteScoreModel {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn scores(&self, text: &str, max_tokens: usize) -> Result<Vec<f32>> {
        let request = ClassifyRequest {
            inputs: text,
            parameters: ClassifyParameters {
                truncation: true,
                max_length: max_tokens,
                top_k: None,
            },
        };
        let response: ScoreResponse = self.endpoint.post_json(&request)?;
        response.into_scores()
    }
}
