//! Remote token-classification recognizer.

use super::{EntityRecognizer, RecognizedEntity};
use crate::Result;
use crate::http_client::{Endpoint, InferenceHttpConfig};
use secrecy::SecretString;
use serde::Serialize;

/// Recognizer backed by a hosted token-classification endpoint.
///
/// Requests use simple aggregation so each entity arrives as one grouped span
/// with a single `entity_group` tag and character offsets into the input.
#[derive(Debug)]
pub struct RemoteRecognizer {
    endpoint: Endpoint,
}

#[derive(Serialize)]
struct RecognizeRequest<'a> {
    inputs: &'a str,
    parameters: RecognizeParameters,
}

#[derive(Serialize)]
struct RecognizeParameters {
    aggregation_strategy: &'static str,
}

impl RemoteRecognizer {
    /// Creates a recognizer for the endpoint at `url`.
    #[must_use]
    pub fn new(url: impl Into<String>, config: InferenceHttpConfig) -> Self {
        Self {
            endpoint: Endpoint::new("recognizer", url, config),
        }
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: Option<SecretString>) -> Self {
        self.endpoint = self.endpoint.with_token(token);
        self
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        self.endpoint.url()
    }
}

impl EntityRecognizer for RemoteRecognizer {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let request = RecognizeRequest {
            inputs: text,
            parameters: RecognizeParameters {
                aggregation_strategy: "simple",
            },
        };
        let entities: Vec<RecognizedEntity> = self.endpoint.post_json(&request)?;

        tracing::debug!(
            endpoint = %self.endpoint.url(),
            entity_count = entities.len(),
            "Recognizer returned entities"
        );
        Ok(entities)
    }
}
