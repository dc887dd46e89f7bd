//! PII label vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification labels for masked spans.
///
/// Closed vocabulary: the recognizer-mapped labels plus the pattern rule
/// names. The string forms are part of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiLabel {
    /// A person's full name.
    FullName,
    /// An email address.
    Email,
    /// A date of birth (or any D/M/Y-style date).
    Dob,
    /// A phone number, optionally with country code.
    PhoneNumber,
    /// An Aadhaar number (three groups of four digits).
    AadharNum,
    /// A credit or debit card number.
    CreditDebitNo,
    /// A card verification value.
    CvvNo,
    /// A card expiry date.
    ExpiryNo,
}

impl PiiLabel {
    /// Returns all label variants.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::FullName,
            Self::Email,
            Self::Dob,
            Self::PhoneNumber,
            Self::AadharNum,
            Self::CreditDebitNo,
            Self::CvvNo,
            Self::ExpiryNo,
        ]
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::Email => "email",
            Self::Dob => "dob",
            Self::PhoneNumber => "phone_number",
            Self::AadharNum => "aadhar_num",
            Self::CreditDebitNo => "credit_debit_no",
            Self::CvvNo => "cvv_no",
            Self::ExpiryNo => "expiry_no",
        }
    }

    /// Returns the placeholder substituted for spans with this label.
    #[must_use]
    pub fn placeholder(&self) -> String {
        format!("[{}]", self.as_str())
    }

    /// Parses a label from its wire string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|label| label.as_str() == s)
    }
}

impl fmt::Display for PiiLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
