//! Offset resolution for text selections
//!
//! Translates a selection, as surfaced by a browser's selection API, into
//! stable character offsets against the immutable source text. Two paths:
//!
//! - [`resolve_range`] accepts exact offsets from a hosting UI that tracks
//!   its own cursor range. Preferred when available.
//! - [`resolve`] re-searches the raw selected string and takes the first
//!   occurrence. This is a fallback with a documented accuracy limit: when
//!   the same string appears more than once, the lowest start index wins.

use super::types::{char_len, slice_by_chars, CodingError, Selection};

/// Resolve a raw selection string to character offsets
///
/// Finds the first occurrence of `raw_selection` in `content`. Fails with
/// [`CodingError::SelectionNotFound`] when the selection is empty or does
/// not occur as a contiguous substring (e.g. the selection crossed non-text
/// decorations, or was normalized differently than the source).
pub fn resolve(content: &str, raw_selection: &str) -> Result<Selection, CodingError> {
    if raw_selection.is_empty() {
        return Err(CodingError::SelectionNotFound);
    }

    let byte_pos = content
        .find(raw_selection)
        .ok_or(CodingError::SelectionNotFound)?;

    let start = content[..byte_pos].chars().count();
    let end = start + char_len(raw_selection);

    Ok(Selection {
        start,
        end,
        text: raw_selection.to_string(),
    })
}

/// Resolve an exact character range reported by the hosting UI
///
/// Validates the range against the content and reads the selected text out
/// of it, so the resulting selection carries the same integrity data as the
/// substring-search path.
pub fn resolve_range(content: &str, start: usize, end: usize) -> Result<Selection, CodingError> {
    if start >= end {
        return Err(CodingError::InvalidSpan(
            "selection must not be empty".to_string(),
        ));
    }
    let len = char_len(content);
    if end > len {
        return Err(CodingError::InvalidSpan(format!(
            "end {} is past the text length {}",
            end, len
        )));
    }

    let text = slice_by_chars(content, start, end)
        .ok_or_else(|| CodingError::InvalidSpan(format!("invalid range {}..{}", start, end)))?
        .to_string();

    Ok(Selection { start, end, text })
}
