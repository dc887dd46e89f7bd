//! Span bookkeeping for in-place masking.
//!
//! Masking reports positions in characters but slices strings by bytes. A
//! [`CharIndex`] translates between the two for one text snapshot, and a list
//! of [`Replacement`]s is materialized into the next snapshot in one pass.

/// A pending substitution over a text snapshot (byte offsets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// Start byte offset, inclusive.
    pub start: usize,
    /// End byte offset, exclusive.
    pub end: usize,
    /// Text written in place of `start..end`.
    pub text: String,
}

/// Character/byte offset translation for a single text snapshot.
#[derive(Debug, Clone)]
pub struct CharIndex {
    /// Byte offset of every character boundary, including the end of text.
    boundaries: Vec<usize>,
}

impl CharIndex {
    /// Builds the index for `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(byte, _)| byte).collect();
        boundaries.push(text.len());
        Self { boundaries }
    }

    /// Number of characters in the indexed text.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Byte offset of the character at `char_offset`.
    ///
    /// `char_offset == char_len()` maps to the end of text. Returns `None`
    /// past the end.
    #[must_use]
    pub fn byte_offset(&self, char_offset: usize) -> Option<usize> {
        self.boundaries.get(char_offset).copied()
    }

    /// Character offset of the boundary at `byte_offset`.
    ///
    /// Offsets that fall inside a multi-byte character round down to that
    /// character's start.
    #[must_use]
    pub fn char_offset(&self, byte_offset: usize) -> usize {
        match self.boundaries.binary_search(&byte_offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        }
    }
}

/// Applies sorted, non-overlapping replacements to `source` in one pass.
///
/// Replacements must be ordered by `start` and must not overlap; callers
/// guarantee this by construction.
#[must_use]
pub fn apply(source: &str, replacements: &[Replacement]) -> String {
    if replacements.is_empty() {
        return source.to_string();
    }

    let added: usize = replacements.iter().map(|r| r.text.len()).sum();
    let mut result = String::with_capacity(source.len() + added);
    let mut cursor = 0;

    for replacement in replacements {
        debug_assert!(replacement.start >= cursor, "replacements must not overlap");
        result.push_str(&source[cursor..replacement.start]);
        result.push_str(&replacement.text);
        cursor = replacement.end;
    }
    result.push_str(&source[cursor..]);

    result
}

/// Signed character-length change introduced by replacing `span_chars`
/// characters with `replacement`.
#[must_use]
pub fn char_delta(replacement: &str, span_chars: usize) -> isize {
    to_isize(replacement.chars().count()) - to_isize(span_chars)
}

/// Shifts `offset` by `delta`, clamping at zero.
#[must_use]
pub const fn shift(offset: usize, delta: isize) -> usize {
    offset.saturating_add_signed(delta)
}

#[allow(clippy::cast_possible_wrap)]
const fn to_isize(value: usize) -> isize {
    value as isize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_index_ascii() {
        let index = CharIndex::new("hello");
        assert_eq!(index.char_len(), 5);
        assert_eq!(index.byte_offset(0), Some(0));
        assert_eq!(index.byte_offset(5), Some(5));
        assert_eq!(index.byte_offset(6), None);
        assert_eq!(index.char_offset(3), 3);
    }

    #[test]
    fn test_char_index_multibyte() {
        // 'ü' and 'ß' are two bytes each.
        let text = "Grüße x";
        let index = CharIndex::new(text);

        assert_eq!(index.char_len(), 7);
        assert_eq!(index.byte_offset(3), Some(4));
        assert_eq!(index.byte_offset(6), Some(8));
        assert_eq!(index.char_offset(8), 6);
        assert_eq!(index.char_offset(3), 2);
    }

    #[test]
    fn test_char_index_empty() {
        let index = CharIndex::new("");
        assert_eq!(index.char_len(), 0);
        assert_eq!(index.byte_offset(0), Some(0));
    }

    #[test]
    fn test_apply_replacements() {
        let source = "call Bob at 555";
        let replacements = vec![
            Replacement {
                start: 5,
                end: 8,
                text: "[full_name]".to_string(),
            },
            Replacement {
                start: 12,
                end: 15,
                text: "[phone_number]".to_string(),
            },
        ];

        assert_eq!(
            apply(source, &replacements),
            "call [full_name] at [phone_number]"
        );
    }

    #[test]
    fn test_apply_nothing() {
        assert_eq!(apply("unchanged", &[]), "unchanged");
    }

    #[test]
    fn test_char_delta() {
        assert_eq!(char_delta("[email]", 15), -8);
        assert_eq!(char_delta("[full_name]", 7), 4);
        assert_eq!(shift(10, -8), 2);
        assert_eq!(shift(10, 4), 14);
    }
}
