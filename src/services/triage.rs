//! Email triage service.

use crate::classifier::CategoryClassifier;
use crate::models::{ClassificationRecord, ClassifyRequest};
use crate::security::{MaskOutcome, PiiMasker};
use crate::Result;
use serde_json::Value;
use std::time::Instant;

/// Masks an email body and classifies the masked text.
///
/// Holds only read-only collaborators, so one instance serves concurrent
/// requests.
#[derive(Debug, Clone)]
pub struct TriageService {
    masker: PiiMasker,
    classifier: CategoryClassifier,
}

impl TriageService {
    /// Creates a new triage service.
    #[must_use]
    pub const fn new(masker: PiiMasker, classifier: CategoryClassifier) -> Self {
        Self { masker, classifier }
    }

    /// Masks `body` without classifying it.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity recognizer fails.
    pub fn mask(&self, body: &str) -> Result<MaskOutcome> {
        self.masker.mask(body)
    }

    /// Masks and classifies `body`.
    ///
    /// Nothing partial is returned: a recognizer or classifier failure fails
    /// the whole call.
    ///
    /// # Errors
    ///
    /// Returns an error if either model boundary fails.
    pub fn triage(&self, body: &str) -> Result<ClassificationRecord> {
        let start = Instant::now();
        let result = self.run(body);

        let status = match &result {
            Ok(_) => "ok",
            Err(_) => "error",
        };
        record_request(status, start);

        match &result {
            Ok(record) => tracing::info!(
                entities = record.list_of_masked_entities.len(),
                category = %record.category_of_the_email,
                duration_ms = start.elapsed().as_millis(),
                "Triaged email"
            ),
            Err(e) => tracing::error!(error = %e, "Triage failed"),
        }

        result
    }

    /// Validates a raw request payload, then triages its body.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MissingField`] if `input_email_body` is absent,
    /// [`crate::Error::InvalidInput`] if it is not a string, and any error from
    /// [`TriageService::triage`].
    pub fn handle_payload(&self, payload: &Value) -> Result<ClassificationRecord> {
        let request = ClassifyRequest::from_value(payload).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected classify request");
            metrics::counter!("triage_requests_total", "status" => "invalid").increment(1);
        })?;

        self.triage(&request.input_email_body)
    }

    fn run(&self, body: &str) -> Result<ClassificationRecord> {
        let outcome = self.masker.mask(body)?;
        let category = self.classifier.classify(&outcome.masked_text)?;

        Ok(ClassificationRecord {
            input_email_body: body.to_string(),
            list_of_masked_entities: outcome.entities,
            masked_email: outcome.masked_text,
            category_of_the_email: category,
        })
    }
}

fn record_request(status: &'static str, start: Instant) {
    metrics::counter!("triage_requests_total", "status" => status).increment(1);
    metrics::histogram!("triage_duration_ms", "status" => status)
        .record(start.elapsed().as_secs_f64() * 1000.0);
}
