//! Data models for email triage.
//!
//! This module contains the label vocabulary, the entity records produced by
//! masking, and the request/response shapes of the classification endpoint.

mod classification;
mod entity;
mod label;

pub use classification::{ClassificationRecord, ClassifyRequest, INPUT_FIELD};
pub use entity::{DetectionSource, EntityRecord};
pub use label::PiiLabel;
