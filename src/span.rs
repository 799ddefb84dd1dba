//! Source location tracking for the pipeline.
//!
//! [`SourceSpan`] is a lightweight, `Copy` span that stores byte offsets into
//! the source text. Tokens, instructions and text runs all refer back to the
//! source through it instead of copying text.
//!
//! [`SourceIndex`] pre-computes line-start byte offsets so that a
//! [`SourceSpan`] can be cheaply converted into 1-based [`Position`]s, e.g.
//! when reporting a [`ParseDiagnostic`](crate::diagnostic::ParseDiagnostic).

use std::fmt;
use std::ops::Range;

use serde::Serialize;

// ---------------------------------------------------------------------------
// SourceSpan
// ---------------------------------------------------------------------------

/// A half-open byte-offset span into the source text.
///
/// Both offsets always fall on `char` boundaries, so slicing the source with
/// [`slice`](Self::slice) never panics for spans produced by this crate.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SourceSpan {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl SourceSpan {
    /// Create a span from its two offsets.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty span positioned at `offset`.
    #[must_use]
    pub const fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` when the span covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The source text covered by this span.
    ///
    /// Out-of-range spans yield an empty string instead of panicking.
    #[must_use]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or_default()
    }
}

impl fmt::Debug for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<Range<usize>> for SourceSpan {
    fn from(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

impl From<SourceSpan> for Range<usize> {
    fn from(span: SourceSpan) -> Self {
        span.start..span.end
    }
}

// ---------------------------------------------------------------------------
// SourceIndex
// ---------------------------------------------------------------------------

/// A 1-based source position (line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number, counted in characters.
    pub col: usize,
}

/// A source location as an inclusive `[start, end]` pair of positions.
pub type Location = [Position; 2];

/// Pre-computed line-start index for converting byte offsets to 1-based
/// line/column positions.
#[derive(Debug, Clone)]
pub struct SourceIndex {
    /// Byte offset of the first character on each line.
    /// `line_starts[0]` is always `0`.
    line_starts: Vec<usize>,
    /// 0-based character column for each byte offset.
    ///
    /// Multi-byte characters map all their bytes to the same column.
    /// Length is `source.len() + 1` (extra slot for end-of-input).
    byte_to_col: Vec<usize>,
}

impl SourceIndex {
    /// Build a line-start index from the source text.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        let mut byte_to_col = vec![0; source.len() + 1];
        let mut col: usize = 0;

        for (i, ch) in source.char_indices() {
            for slot in byte_to_col.iter_mut().skip(i).take(ch.len_utf8()) {
                *slot = col;
            }
            if ch == '\n' {
                line_starts.push(i + 1);
                col = 0;
            } else {
                col += 1;
            }
        }
        byte_to_col[source.len()] = col;

        Self {
            line_starts,
            byte_to_col,
        }
    }

    /// Convert a byte offset to a 1-based [`Position`].
    ///
    /// Offsets past the end of the source clamp to the end-of-input position.
    #[must_use]
    pub fn position(&self, byte_offset: usize) -> Position {
        let byte_offset = byte_offset.min(self.byte_to_col.len() - 1);
        let line = self
            .line_starts
            .partition_point(|&start| start <= byte_offset)
            - 1;
        let col = self.byte_to_col[byte_offset];
        Position {
            line: line + 1,
            col: col + 1,
        }
    }

    /// Convert a [`SourceSpan`] to a [`Location`].
    ///
    /// The end position is **inclusive** (points to the last byte of the span).
    #[must_use]
    pub fn location(&self, span: &SourceSpan) -> Location {
        let end = if span.end > span.start {
            span.end - 1
        } else {
            span.start
        };
        [self.position(span.start), self.position(end)]
    }
}
