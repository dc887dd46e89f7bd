//! # Email Triage
//!
//! PII masking and category classification for inbound support emails.
//!
//! An email body is first redacted: a learned entity recognizer runs over the
//! raw text, then a fixed set of pattern rules runs over what the recognizer
//! left behind. Every detected span is replaced by a `[label]` placeholder and
//! reported as an entity record with its character position. The masked text
//! is then handed to a sequence classifier that resolves a business category.
//!
//! ## Features
//!
//! - Two-pass masking with recognizer precedence and no double-masking
//! - Character-accurate entity positions, independent of UTF-8 byte layout
//! - Pluggable model boundaries (remote inference endpoints or test doubles)
//! - HTTP service with a stable, ordered JSON wire format
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use email_triage::recognizer::NoopRecognizer;
//! use email_triage::security::PiiMasker;
//!
//! let masker = PiiMasker::new(Arc::new(NoopRecognizer::new()));
//! let outcome = masker.mask("Reach me at ritu@akaike.com").unwrap();
//! assert_eq!(outcome.masked_text, "Reach me at [email]");
//! assert_eq!(outcome.entities.len(), 1);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod classifier;
pub mod cli;
pub mod config;
pub mod http_client;
pub mod models;
pub mod observability;
pub mod recognizer;
pub mod security;
#[cfg(feature = "http")]
pub mod server;
pub mod services;

// Re-exports for convenience
pub use classifier::{CategoryClassifier, LabelTable, ScoreModel};
pub use config::TriageConfig;
pub use models::{ClassificationRecord, EntityRecord, PiiLabel};
pub use recognizer::{EntityRecognizer, RecognizedEntity};
pub use security::{MaskOutcome, PiiMasker};
pub use services::TriageService;

/// Error type for triage operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Request fields have the wrong type, config values are malformed |
/// | `MissingField` | A required request field is absent |
/// | `OperationFailed` | I/O errors, inference endpoint failures, undecodable model output |
/// | `MalformedSpan` | The entity recognizer returned spans outside its contract |
/// | `FeatureNotEnabled` | Using features requiring compile-time flags |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - `input_email_body` is present but not a string
    /// - A configuration value cannot be parsed
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required request field is absent.
    ///
    /// The display form is part of the HTTP contract and must not change.
    #[error("Missing '{0}'")]
    MissingField(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Configuration or label-table files cannot be read or parsed
    /// - An inference endpoint is unreachable or returns an error status
    /// - Model output cannot be decoded or resolved to a label
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// The entity recognizer returned a span that breaks its contract.
    ///
    /// Spans must lie inside the text, run forwards, and not overlap a span
    /// accepted earlier in the same pass.
    #[error("malformed recognizer span {start}..{end} for text of {len} characters")]
    MalformedSpan {
        /// Reported start offset (characters).
        start: usize,
        /// Reported end offset (characters).
        end: usize,
        /// Length of the text the span was reported against (characters).
        len: usize,
    },

    /// Feature not enabled (requires feature flag).
    #[error("feature not enabled: {0} (compile with --features {0})")]
    FeatureNotEnabled(String),
}

/// Result type alias for triage operations.
pub type Result<T> = std::result::Result<T, Error>;
