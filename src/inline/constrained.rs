//! Constrained delimiter rules.
//!
//! A style delimiter only counts at a word boundary. The boundary set is:
//! the edge of the resolved range, and every character that is neither
//! alphanumeric nor `_`. Whitespace and punctuation (including quotes) are
//! therefore boundaries, letters and digits of any script are not.
//!
//! A delimiter may open when a boundary precedes it and a word character
//! follows it; it may close in the mirrored situation. Another delimiter
//! character on the inner side counts as a word character, so that spans
//! nest directly: `*`code`*`. For `*` and `` ` `` an `_` on the outer side
//! counts as a boundary, so they nest inside emphasis too: `_`code`_`.

use crate::span::SourceSpan;

/// Whether `c` (or the edge of the range, `None`) is a word boundary.
#[must_use]
pub(crate) fn is_boundary(c: Option<char>) -> bool {
    c.is_none_or(|c| !(c.is_alphanumeric() || c == '_'))
}

fn is_inner(c: Option<char>) -> bool {
    !is_boundary(c) || matches!(c, Some('*' | '`'))
}

fn is_outer(mark: Option<char>, c: Option<char>) -> bool {
    is_boundary(c) || (c == Some('_') && mark != Some('_'))
}

/// `(can_open, can_close)` for the one-character delimiter at `mark`.
///
/// Neighbours outside `bounds` count as the edge of the range.
#[must_use]
pub(crate) fn flanking(source: &str, mark: SourceSpan, bounds: SourceSpan) -> (bool, bool) {
    let before = source
        .get(bounds.start..mark.start)
        .and_then(|s| s.chars().next_back());
    let after = source
        .get(mark.end..bounds.end)
        .and_then(|s| s.chars().next());
    let delimiter = source.get(mark.start..mark.end).and_then(|s| s.chars().next());
    (
        is_outer(delimiter, before) && is_inner(after),
        is_inner(before) && is_outer(delimiter, after),
    )
}
