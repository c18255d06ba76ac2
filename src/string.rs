//! UTF-8 codepoint helpers

use std::ops::Range;

/// Number of codepoints in `s`
pub fn char_length(s: &str) -> usize {
    s.chars().count()
}

/// Byte range covering `count` codepoints starting at codepoint `start`.
///
/// Returns `None` when `start` is past the end; a `count` running past the
/// end is clamped.
pub fn slice(s: &str, start: usize, count: usize) -> Option<Range<usize>> {
    let mut indices = s.char_indices().map(|(i, _)| i).chain(std::iter::once(s.len()));
    let begin = indices.nth(start)?;
    if begin == s.len() && count > 0 {
        return None;
    }
    let end = if count == 0 {
        begin
    } else {
        indices.nth(count - 1).unwrap_or(s.len())
    };
    Some(begin..end)
}

/// The single codepoint at `index`
pub fn char_at(s: &str, index: usize) -> Option<&str> {
    let range = slice(s, index, 1)?;
    s.get(range)
}
