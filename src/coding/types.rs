//! Core types for the span-annotation engine
//!
//! All offsets are zero-based character offsets into a text's immutable
//! content. Content is UTF-8, so slicing goes through the char-offset
//! helpers here rather than byte indexing.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the coding engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodingError {
    #[error("Selection not found in the loaded text")]
    SelectionNotFound,

    #[error("Invalid span: {0}")]
    InvalidSpan(String),

    #[error("No text loaded")]
    NoTextLoaded,

    #[error("No active selection")]
    NoActiveSelection,
}

/// An offset-addressed selection over a loaded text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Start character offset (inclusive)
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
    /// The selected text, kept as an integrity check against offset drift
    pub text: String,
}

/// A maximal run of characters sharing one set of covering codes
///
/// Produced by the overlap renderer; concatenating fragment texts in order
/// reconstructs the source content exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    /// Ids of every code covering this fragment; empty for plain text.
    /// Kept as a set so overlapping codes are never collapsed to one.
    #[serde(rename = "codeIds")]
    pub code_ids: BTreeSet<String>,
}

impl Fragment {
    /// Whether any code covers this fragment
    pub fn is_coded(&self) -> bool {
        !self.code_ids.is_empty()
    }
}

/// Number of characters in `content`
pub fn char_len(content: &str) -> usize {
    content.chars().count()
}

/// Slice `content` by character offsets
///
/// Returns `None` when the range is inverted or past the end of the content.
pub fn slice_by_chars(content: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let byte_start = byte_offset(content, start)?;
    let byte_end = byte_offset(content, end)?;
    Some(&content[byte_start..byte_end])
}

/// Byte position of the char at `char_offset`; `content.len()` for the
/// one-past-the-end offset.
fn byte_offset(content: &str, char_offset: usize) -> Option<usize> {
    content
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(content.len()))
        .nth(char_offset)
}

/// Validate the span invariants against the text it addresses
///
/// A span is valid when its offsets are ordered and in bounds, its selected
/// text is non-empty, and the stored text matches the content slice.
pub fn validate_span(
    content: &str,
    start: usize,
    end: usize,
    selected_text: &str,
) -> std::result::Result<(), CodingError> {
    if selected_text.is_empty() {
        return Err(CodingError::InvalidSpan(
            "selected text must not be empty".to_string(),
        ));
    }
    if start > end {
        return Err(CodingError::InvalidSpan(format!(
            "start {} is past end {}",
            start, end
        )));
    }
    let len = char_len(content);
    if end > len {
        return Err(CodingError::InvalidSpan(format!(
            "end {} is past the text length {}",
            end, len
        )));
    }
    match slice_by_chars(content, start, end) {
        Some(slice) if slice == selected_text => Ok(()),
        _ => Err(CodingError::InvalidSpan(format!(
            "selected text does not match the content at {}..{}",
            start, end
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_by_chars_ascii() {
        assert_eq!(slice_by_chars("The quick fox", 4, 9), Some("quick"));
        assert_eq!(slice_by_chars("abc", 0, 3), Some("abc"));
        assert_eq!(slice_by_chars("abc", 3, 3), Some(""));
    }

    #[test]
    fn test_slice_by_chars_multibyte() {
        // "día" is 3 chars but 4 bytes
        assert_eq!(slice_by_chars("buen día", 5, 8), Some("día"));
        assert_eq!(char_len("buen día"), 8);
    }

    #[test]
    fn test_slice_by_chars_out_of_range() {
        assert_eq!(slice_by_chars("abc", 2, 1), None);
        assert_eq!(slice_by_chars("abc", 0, 4), None);
        assert_eq!(slice_by_chars("abc", 5, 6), None);
    }

    #[test]
    fn test_validate_span_accepts_valid() {
        assert!(validate_span("The quick fox", 4, 9, "quick").is_ok());
        assert!(validate_span("The quick fox", 0, 13, "The quick fox").is_ok());
    }

    #[test]
    fn test_validate_span_rejects_inverted_offsets() {
        let err = validate_span("The quick fox", 9, 4, "quick").unwrap_err();
        assert!(matches!(err, CodingError::InvalidSpan(_)));
    }

    #[test]
    fn test_validate_span_rejects_out_of_bounds_end() {
        let err = validate_span("abc", 0, 4, "abcd").unwrap_err();
        assert!(matches!(err, CodingError::InvalidSpan(_)));
    }

    #[test]
    fn test_validate_span_rejects_mismatched_text() {
        let err = validate_span("The quick fox", 4, 9, "brown").unwrap_err();
        assert!(matches!(err, CodingError::InvalidSpan(_)));
    }

    #[test]
    fn test_validate_span_rejects_empty_text() {
        let err = validate_span("The quick fox", 4, 4, "").unwrap_err();
        assert!(matches!(err, CodingError::InvalidSpan(_)));
    }

    #[test]
    fn test_validate_span_multibyte_content() {
        assert!(validate_span("buen día", 5, 8, "día").is_ok());
        let err = validate_span("buen día", 5, 9, "día").unwrap_err();
        assert!(matches!(err, CodingError::InvalidSpan(_)));
    }
}
