//! Overlap-aware fragment rendering
//!
//! Derives display fragments from a text and its coded segments. Overlapping
//! and nested segments are first-class: every fragment carries the full set
//! of covering code ids, and the presentation layer decides how to stack
//! them. This replaces markup injection into the source text; the source is
//! never rewritten.

use std::collections::BTreeSet;

use crate::db::Segment;

use super::types::{char_len, slice_by_chars, Fragment};

/// Render a text and its segments into an ordered fragment sequence
///
/// Splits the content at every distinct segment boundary and emits one
/// fragment per adjacent boundary pair. A segment covers a fragment when it
/// spans the whole pair. Concatenating the fragment texts in order yields
/// the content exactly.
pub fn render(content: &str, segments: &[Segment]) -> Vec<Fragment> {
    let total = char_len(content);

    let mut boundaries = BTreeSet::new();
    boundaries.insert(0);
    boundaries.insert(total);
    for segment in segments {
        boundaries.insert((segment.start_offset as usize).min(total));
        boundaries.insert((segment.end_offset as usize).min(total));
    }

    let boundaries: Vec<usize> = boundaries.into_iter().collect();

    let mut fragments = Vec::with_capacity(boundaries.len().saturating_sub(1));
    for pair in boundaries.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);

        let code_ids: BTreeSet<String> = segments
            .iter()
            .filter(|s| s.start_offset as usize <= lo && s.end_offset as usize >= hi)
            .map(|s| s.code_id.clone())
            .collect();

        let text = slice_by_chars(content, lo, hi)
            .map(str::to_string)
            .unwrap_or_default();

        fragments.push(Fragment { text, code_ids });
    }

    fragments
}
