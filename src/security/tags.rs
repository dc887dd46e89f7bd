//! Recognizer tag mapping.

use crate::models::PiiLabel;

/// Maps a recognizer-native entity tag to an output label.
///
/// Only person names, emails and dates are masked from recognizer output.
/// Every other tag (organizations, locations, miscellany) has no mapping and
/// the entity is dropped.
#[must_use]
pub fn map_tag(tag: &str) -> Option<PiiLabel> {
    match tag {
        "PER" => Some(PiiLabel::FullName),
        "EMAIL" => Some(PiiLabel::Email),
        "DATE" => Some(PiiLabel::Dob),
        _ => None,
    }
}
