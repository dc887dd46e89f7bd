//! Business logic services.
//!
//! [`TriageService`] runs one request through masking and classification.

mod triage;

pub use triage::TriageService;
