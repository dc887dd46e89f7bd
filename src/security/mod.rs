//! PII masking.
//!
//! Pattern rules, recognizer tag mapping, and the two-pass masking engine.

mod pii;
mod redactor;
mod rewrite;
mod tags;

pub use pii::{PatternMatch, PatternMatcher, PatternRule, looks_like_placeholder};
pub use redactor::{MaskOutcome, PiiMasker};
pub use rewrite::CharIndex;
pub use tags::map_tag;
