use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

/// The fundamental edit primitive: byte-span replacement with verification.
///
/// Every rewrite operation compiles down to a set of these, applied to an
/// in-memory source buffer. Intelligence lives in span acquisition, not in
/// application.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Edit does nothing until applied"]
pub struct Edit {
    /// Starting byte offset (inclusive)
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
    /// New text to insert at [byte_start, byte_end)
    pub new_text: String,
    /// Verification of what we expect to find before applying
    pub expected_before: EditVerification,
}

/// Verification strategy for edit safety.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditVerification {
    /// Exact text match required
    ExactMatch(String),
    /// xxh3 hash of expected text (faster for large spans)
    Hash(u64),
}

impl EditVerification {
    /// Check if the provided text matches the verification criteria.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            EditVerification::ExactMatch(expected) => text == expected,
            EditVerification::Hash(expected_hash) => xxh3_64(text.as_bytes()) == *expected_hash,
        }
    }

    /// Create verification from text, using hash for text over 1KB.
    pub fn from_text(text: &str) -> Self {
        if text.len() > 1024 {
            EditVerification::Hash(xxh3_64(text.as_bytes()))
        } else {
            EditVerification::ExactMatch(text.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("before-text verification failed at bytes {byte_start}..{byte_end}")]
    BeforeTextMismatch {
        byte_start: usize,
        byte_end: usize,
        expected: String,
        found: String,
    },

    #[error("invalid byte range [{byte_start}, {byte_end}) in text of length {len}")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        len: usize,
    },

    #[error("byte offset {offset} is not on a UTF-8 character boundary")]
    NotCharBoundary { offset: usize },

    #[error("edits overlap: [{first_start}, {first_end}) and [{second_start}, {second_end})")]
    Overlap {
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },
}

impl Edit {
    /// Create a new edit with automatic verification generation.
    pub fn new(
        byte_start: usize,
        byte_end: usize,
        new_text: impl Into<String>,
        expected_before: impl AsRef<str>,
    ) -> Self {
        Self {
            byte_start,
            byte_end,
            new_text: new_text.into(),
            expected_before: EditVerification::from_text(expected_before.as_ref()),
        }
    }

    /// Create a zero-width insertion at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(offset, offset, text, "")
    }

    /// Create a deletion of `[byte_start, byte_end)` verified against `source`.
    ///
    /// The caller guarantees the range is valid for `source`.
    pub fn delete(source: &str, byte_start: usize, byte_end: usize) -> Self {
        Self::new(byte_start, byte_end, "", &source[byte_start..byte_end])
    }

    #[cfg(test)]
    fn with_verification(
        byte_start: usize,
        byte_end: usize,
        new_text: impl Into<String>,
        verification: EditVerification,
    ) -> Self {
        Self {
            byte_start,
            byte_end,
            new_text: new_text.into(),
            expected_before: verification,
        }
    }

    /// Validate the edit against the current contents.
    fn validate(&self, content: &str) -> Result<(), EditError> {
        if self.byte_start > self.byte_end || self.byte_end > content.len() {
            return Err(EditError::InvalidByteRange {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                len: content.len(),
            });
        }

        for offset in [self.byte_start, self.byte_end] {
            if !content.is_char_boundary(offset) {
                return Err(EditError::NotCharBoundary { offset });
            }
        }

        let current_text = &content[self.byte_start..self.byte_end];
        if !self.expected_before.matches(current_text) {
            return Err(EditError::BeforeTextMismatch {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                expected: format!("{:?}", self.expected_before),
                found: current_text.to_string(),
            });
        }

        Ok(())
    }

    #[cfg(test)]
    fn apply_to(&self, content: &str) -> Result<String, EditError> {
        apply_edits(content, vec![self.clone()])
    }
}

/// Apply a set of edits to one buffer in a single pass.
///
/// Every edit is validated against the original content first, so either
/// all edits apply or none do. Edits are sorted by byte_start descending and
/// spliced bottom-to-top to avoid offset invalidation. Overlapping spans are
/// rejected; zero-width insertions may touch a neighbouring span.
pub fn apply_edits(content: &str, mut edits: Vec<Edit>) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(content.to_string());
    }

    for edit in &edits {
        edit.validate(content)?;
    }

    // Stable sort keeps caller order for edits starting at the same offset
    edits.sort_by(|a, b| b.byte_start.cmp(&a.byte_start));

    for window in edits.windows(2) {
        let (later, earlier) = (&window[0], &window[1]);
        if earlier.byte_end > later.byte_start {
            return Err(EditError::Overlap {
                first_start: earlier.byte_start,
                first_end: earlier.byte_end,
                second_start: later.byte_start,
                second_end: later.byte_end,
            });
        }
    }

    let mut new_content = content.to_string();
    for edit in &edits {
        new_content.replace_range(edit.byte_start..edit.byte_end, &edit.new_text);
    }

    Ok(new_content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_verification_exact_match() {
        let verify = EditVerification::ExactMatch("hello world".to_string());
        assert!(verify.matches("hello world"));
        assert!(!verify.matches("hello"));
    }

    #[test]
    fn test_edit_verification_hash() {
        let text = "hello world";
        let verify = EditVerification::Hash(xxh3_64(text.as_bytes()));
        assert!(verify.matches(text));
        assert!(!verify.matches("goodbye world"));
    }

    #[test]
    fn test_edit_verification_from_text_large() {
        let text = "x".repeat(2000);
        assert!(matches!(
            EditVerification::from_text(&text),
            EditVerification::Hash(_)
        ));
        assert!(matches!(
            EditVerification::from_text("small"),
            EditVerification::ExactMatch(_)
        ));
    }

    #[test]
    fn test_edit_validation_invalid_range() {
        let edit = Edit::new(5, 20, "replacement", "");
        let result = edit.apply_to("hello world");
        assert!(matches!(result, Err(EditError::InvalidByteRange { .. })));
    }

    #[test]
    fn test_edit_validation_inverted_range() {
        let edit = Edit::new(10, 5, "replacement", "");
        let result = edit.apply_to("hello world");
        assert!(matches!(result, Err(EditError::InvalidByteRange { .. })));
    }

    #[test]
    fn test_edit_rejects_stale_span() {
        let edit = Edit::new(0, 5, "HELLO", "howdy");
        let result = edit.apply_to("hello world");
        assert!(matches!(result, Err(EditError::BeforeTextMismatch { .. })));
    }

    #[test]
    fn test_edit_rejects_split_character() {
        // "é" is two bytes; offset 1 falls inside it
        let edit = Edit::with_verification(1, 2, "x", EditVerification::Hash(0));
        let result = edit.apply_to("é!");
        assert!(matches!(result, Err(EditError::NotCharBoundary { offset: 1 })));
    }

    #[test]
    fn test_batch_edits_apply_bottom_up() {
        let content = "line1\nline2\nline3\n";
        let edits = vec![
            Edit::new(0, 5, "LINE1", "line1"),
            Edit::new(6, 11, "LINE2", "line2"),
            Edit::new(12, 17, "LINE3", "line3"),
        ];

        let result = apply_edits(content, edits).unwrap();
        assert_eq!(result, "LINE1\nLINE2\nLINE3\n");
    }

    #[test]
    fn test_batch_insert_and_delete() {
        let content = "a b c";
        let edits = vec![Edit::insert(0, ">> "), Edit::delete(content, 1, 3)];

        let result = apply_edits(content, edits).unwrap();
        assert_eq!(result, ">> a c");
    }

    #[test]
    fn test_batch_overlap_rejected() {
        let content = "abcdef";
        let edits = vec![Edit::new(0, 4, "X", "abcd"), Edit::new(2, 6, "Y", "cdef")];

        let result = apply_edits(content, edits);
        assert!(matches!(result, Err(EditError::Overlap { .. })));
    }

    #[test]
    fn test_batch_failure_changes_nothing() {
        let content = "abc";
        let edits = vec![Edit::new(0, 1, "A", "a"), Edit::new(2, 3, "C", "z")];

        assert!(apply_edits(content, edits).is_err());
    }
}
