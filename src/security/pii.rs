//! PII pattern rules.
// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]
//!
//! Ordered regular-expression rules for the pattern pass of the masking
//! engine. Table order is significant: earlier rules mask first, so later
//! rules only see what earlier rules left behind.

use crate::models::PiiLabel;
use regex::Regex;
use std::sync::LazyLock;

/// A single pattern match.
///
/// Offsets are byte offsets into the scanned text. `end` excludes any
/// trailing periods the raw match carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Label of the rule that matched.
    pub label: PiiLabel,
    /// Start position in content (bytes).
    pub start: usize,
    /// End position in content (bytes), after trailing-dot stripping.
    pub end: usize,
    /// The matched text, after trailing-dot stripping.
    pub matched_text: String,
}

/// A named pattern rule.
#[derive(Debug)]
pub struct PatternRule {
    label: PiiLabel,
    regex: &'static LazyLock<Regex>,
}

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[.*?\]").expect("static regex: placeholder pattern"));

/// Optional country code followed by two to four grouped digit blocks.
static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,3}[-\s]?)?(?:\d{1,4}[-\s]?){2,4}\d{1,4}")
        .expect("static regex: phone pattern")
});

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+")
        .expect("static regex: email pattern")
});

/// Indian Aadhaar Number: 12 digits, often formatted as XXXX XXXX XXXX
static AADHAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}\b").expect("static regex: Aadhaar pattern")
});

static CARD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d[ -]*?){13,16}\b").expect("static regex: card number pattern")
});

static CVV_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{3}\b").expect("static regex: CVV pattern"));

/// MM/YY or MM/YYYY.
static EXPIRY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:0[1-9]|1[0-2])/\d{2,4}\b").expect("static regex: expiry pattern")
});

static DOB_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4}\b").expect("static regex: date of birth pattern")
});

static PATTERN_RULES: [PatternRule; 7] = [
    PatternRule {
        label: PiiLabel::PhoneNumber,
        regex: &PHONE_REGEX,
    },
    PatternRule {
        label: PiiLabel::Email,
        regex: &EMAIL_REGEX,
    },
    PatternRule {
        label: PiiLabel::AadharNum,
        regex: &AADHAR_REGEX,
    },
    PatternRule {
        label: PiiLabel::CreditDebitNo,
        regex: &CARD_REGEX,
    },
    PatternRule {
        label: PiiLabel::CvvNo,
        regex: &CVV_REGEX,
    },
    PatternRule {
        label: PiiLabel::ExpiryNo,
        regex: &EXPIRY_REGEX,
    },
    PatternRule {
        label: PiiLabel::Dob,
        regex: &DOB_REGEX,
    },
];

/// Returns true if `text` already reads like a `[label]` placeholder.
///
/// Mirrors an anchored lazy bracket test: the text starts with `[` and a `]`
/// follows before the first line break.
#[must_use]
pub fn looks_like_placeholder(text: &str) -> bool {
    PLACEHOLDER_REGEX.is_match(text)
}

impl PatternRule {
    /// Label recorded for matches of this rule.
    #[must_use]
    pub const fn label(&self) -> PiiLabel {
        self.label
    }

    /// Finds all accepted matches of this rule in `content`, left to right.
    ///
    /// Matches are non-overlapping and taken from `content` as given. Trailing
    /// periods are stripped, and matches that already look like placeholders
    /// are dropped.
    #[must_use]
    pub fn find(&self, content: &str) -> Vec<PatternMatch> {
        self.regex
            .find_iter(content)
            .filter_map(|m| self.process_match(&m))
            .collect()
    }

    /// Processes a raw match and returns a `PatternMatch` if it should be kept.
    fn process_match(&self, m: &regex::Match<'_>) -> Option<PatternMatch> {
        let stripped = m.as_str().trim_end_matches('.');

        if stripped.is_empty() || looks_like_placeholder(stripped) {
            tracing::debug!(
                label = %self.label,
                start = m.start(),
                "Skipping placeholder-shaped match"
            );
            return None;
        }

        Some(PatternMatch {
            label: self.label,
            start: m.start(),
            end: m.start() + stripped.len(),
            matched_text: stripped.to_string(),
        })
    }
}

/// Ordered set of pattern rules.
#[derive(Debug, Clone, Copy)]
pub struct PatternMatcher {
    rules: &'static [PatternRule],
}

impl PatternMatcher {
    /// Creates a matcher over the full rule table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: &PATTERN_RULES,
        }
    }

    /// Returns the rules in table order.
    #[must_use]
    pub const fn rules(&self) -> &'static [PatternRule] {
        self.rules
    }

    /// Returns the rule for a label, if the table has one.
    #[must_use]
    pub fn rule(&self, label: PiiLabel) -> Option<&'static PatternRule> {
        self.rules.iter().find(|rule| rule.label == label)
    }

    /// Finds matches of the rule for `label` in `content`.
    ///
    /// Returns an empty list for labels that have no rule.
    #[must_use]
    pub fn find(&self, label: PiiLabel, content: &str) -> Vec<PatternMatch> {
        self.rule(label)
            .map(|rule| rule.find(content))
            .unwrap_or_default()
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_rule_table_order() {
        let labels: Vec<PiiLabel> = PatternMatcher::new()
            .rules()
            .iter()
            .map(PatternRule::label)
            .collect();
        assert_eq!(
            labels,
            vec![
                PiiLabel::PhoneNumber,
                PiiLabel::Email,
                PiiLabel::AadharNum,
                PiiLabel::CreditDebitNo,
                PiiLabel::CvvNo,
                PiiLabel::ExpiryNo,
                PiiLabel::Dob,
            ]
        );
    }

    #[test_case(PiiLabel::PhoneNumber, "Call +91 98765 43210 now", "+91 98765 43210" ; "phone with country code")]
    #[test_case(PiiLabel::PhoneNumber, "Call 9876543210", "9876543210" ; "phone plain")]
    #[test_case(PiiLabel::Email, "Mail ritu@akaike.com today", "ritu@akaike.com" ; "email")]
    #[test_case(PiiLabel::AadharNum, "Aadhaar 2345 6789 0123", "2345 6789 0123" ; "aadhar spaced")]
    #[test_case(PiiLabel::AadharNum, "Aadhaar 2345-6789-0123", "2345-6789-0123" ; "aadhar dashed")]
    #[test_case(PiiLabel::CreditDebitNo, "Card 4111 1111 1111 1111", "4111 1111 1111 1111" ; "card spaced")]
    #[test_case(PiiLabel::CreditDebitNo, "Card 4111111111111111", "4111111111111111" ; "card plain")]
    #[test_case(PiiLabel::CvvNo, "CVV 123", "123" ; "cvv")]
    #[test_case(PiiLabel::ExpiryNo, "Expires 12/25", "12/25" ; "expiry short year")]
    #[test_case(PiiLabel::ExpiryNo, "Expires 09/2027", "09/2027" ; "expiry long year")]
    #[test_case(PiiLabel::Dob, "Born 5/8/90", "5/8/90" ; "dob slashes")]
    #[test_case(PiiLabel::Dob, "Born 15-08-1990", "15-08-1990" ; "dob dashes")]
    fn test_rule_matches(label: PiiLabel, content: &str, expected: &str) {
        let matches = PatternMatcher::new().find(label, content);
        assert_eq!(matches.len(), 1, "{matches:?}");
        assert_eq!(matches[0].matched_text, expected);
        assert_eq!(&content[matches[0].start..matches[0].end], expected);
    }

    #[test]
    fn test_trailing_dots_stripped() {
        let content = "Write to ritu@akaike.com.";
        let matches = PatternMatcher::new().find(PiiLabel::Email, content);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched_text, "ritu@akaike.com");
        assert_eq!(matches[0].start, 9);
        assert_eq!(matches[0].end, 24);
    }

    #[test]
    fn test_multiple_matches_left_to_right() {
        let content = "a@b.io and c@d.io";
        let matches = PatternMatcher::new().find(PiiLabel::Email, content);

        let texts: Vec<&str> = matches.iter().map(|m| m.matched_text.as_str()).collect();
        assert_eq!(texts, vec!["a@b.io", "c@d.io"]);
        assert!(matches[0].end <= matches[1].start);
    }

    #[test]
    fn test_no_match() {
        let matcher = PatternMatcher::new();
        for rule in matcher.rules() {
            assert!(rule.find("Please confirm the meeting time.").is_empty());
        }
    }

    #[test]
    fn test_placeholders_do_not_match_rules() {
        let matcher = PatternMatcher::new();
        let content = "[full_name] [email] [phone_number] [dob]";
        for rule in matcher.rules() {
            assert!(rule.find(content).is_empty(), "{:?}", rule.label());
        }
    }

    #[test]
    fn test_looks_like_placeholder() {
        assert!(looks_like_placeholder("[email]"));
        assert!(looks_like_placeholder("[full_name] and more"));
        assert!(looks_like_placeholder("[]"));
        assert!(!looks_like_placeholder("email]"));
        assert!(!looks_like_placeholder(" [email]"));
        assert!(!looks_like_placeholder("[email"));
        assert!(!looks_like_placeholder("[em\nail]"));
    }

    #[test]
    fn test_unicode_offsets_are_bytes() {
        let content = "Grüße an ritu@akaike.com";
        let matches = PatternMatcher::new().find(PiiLabel::Email, content);

        assert_eq!(matches.len(), 1);
        assert_eq!(&content[matches[0].start..matches[0].end], "ritu@akaike.com");
    }
}
