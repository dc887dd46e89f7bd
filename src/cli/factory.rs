//! Model client factory functions for CLI commands.
//!
//! Provides builders for creating the masking and classification pipeline
//! from configuration.

use crate::classifier::{CategoryClassifier, LabelTable, RemoteScoreModel};
use crate::config::{RecognizerProvider, TriageConfig};
use crate::recognizer::{EntityRecognizer, NoopRecognizer, RemoteRecognizer};
use crate::security::PiiMasker;
use crate::services::TriageService;
use crate::{Error, Result};
use std::sync::Arc;

/// Builds the entity recognizer selected by configuration.
#[must_use]
pub fn build_recognizer(config: &TriageConfig) -> Arc<dyn EntityRecognizer> {
    match config.recognizer.provider {
        RecognizerProvider::Remote => Arc::new(
            RemoteRecognizer::new(&config.recognizer.endpoint, config.recognizer.http)
                .with_token(config.api_token.clone()),
        ),
        RecognizerProvider::None => Arc::new(NoopRecognizer::new()),
    }
}

/// Builds the masker.
#[must_use]
pub fn build_masker(config: &TriageConfig) -> PiiMasker {
    let masker = PiiMasker::new(build_recognizer(config));
    tracing::debug!(recognizer = masker.recognizer_name(), "Built masker");
    masker
}

/// Builds the category classifier and loads its label table.
///
/// # Errors
///
/// Returns an error if no classifier endpoint is configured or the label
/// table cannot be loaded.
pub fn build_classifier(config: &TriageConfig) -> Result<CategoryClassifier> {
    let settings = &config.classifier;
    let endpoint = settings.endpoint.as_deref().ok_or_else(|| {
        Error::InvalidInput(
            "classifier endpoint is not configured (set [classifier] endpoint or EMAIL_TRIAGE_CLASSIFIER_URL)"
                .to_string(),
        )
    })?;

    let labels = LabelTable::load_from_file(&settings.labels_path)?;
    let model =
        RemoteScoreModel::new(endpoint, settings.http).with_token(config.api_token.clone());

    Ok(CategoryClassifier::new(Arc::new(model), Arc::new(labels))
        .with_max_tokens(settings.max_tokens))
}

/// Builds the full triage service.
///
/// # Errors
///
/// Returns an error if the classifier cannot be built.
pub fn build_triage_service(config: &TriageConfig) -> Result<TriageService> {
    Ok(TriageService::new(
        build_masker(config),
        build_classifier(config)?,
    ))
}
