//! The instruction arena produced by the [`Parser`](crate::parser::Parser).
//!
//! A parsed document is a flat `Vec<Instruction>`. Structure is expressed by
//! START/END pairs that nest like parentheses; every START record stores the
//! index of its matching END so that a consumer can skip a whole subtree in
//! constant time. Content records point back into the token sequence
//! ([`Instruction::TokenRange`]) or straight into the source
//! ([`Instruction::Verbatim`]); no text is copied.

use serde::Serialize;

use crate::span::SourceSpan;
use crate::token::ListMarker;

/// The style of a delimited or literal block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockStyle {
    /// `----` block with no source style.
    Listing,
    /// `[source,lang]` or `[,lang]` listing block.
    Source {
        /// The language entry, if one was given.
        language: Option<SourceSpan>,
    },
    /// Indented literal paragraph.
    Literal,
}

/// How an inline macro is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MacroKind {
    /// `name:target[attributes]`.
    Named,
    /// The name is a URL scheme; the macro is a link to `name:target`.
    Url,
}

/// One record of the instruction arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Instruction {
    // --- Structure ---
    /// Opens the document. Always the first record.
    DocumentStart {
        /// Index of the matching [`Instruction::DocumentEnd`].
        end: usize,
    },
    /// Closes the document. Always the last record.
    DocumentEnd,
    /// Opens the preamble: content before the first section.
    PreambleStart {
        /// Index of the matching END.
        end: usize,
    },
    /// Closes the preamble.
    PreambleEnd,
    /// Opens a heading (document title or section title).
    HeadingStart {
        /// Number of `=` in the marker.
        level: u8,
        /// Index of the matching END.
        end: usize,
    },
    /// Closes a heading.
    HeadingEnd {
        /// Number of `=` in the marker.
        level: u8,
    },
    /// Opens a section.
    SectionStart {
        /// Section level: one less than the heading's `=` count.
        level: u8,
        /// Style from a preceding block attribute list.
        style: Option<SourceSpan>,
        /// Index of the matching END.
        end: usize,
    },
    /// Closes a section.
    SectionEnd {
        /// Section level.
        level: u8,
    },
    /// Opens a paragraph.
    ParagraphStart {
        /// Index of the matching END.
        end: usize,
    },
    /// Closes a paragraph.
    ParagraphEnd,
    /// Opens an unordered list.
    ListStart {
        /// Marker character shared by the list's items.
        marker: ListMarker,
        /// Marker depth.
        depth: u8,
        /// Index of the matching END.
        end: usize,
    },
    /// Closes a list.
    ListEnd,
    /// Opens a list item.
    ItemStart {
        /// Index of the matching END.
        end: usize,
    },
    /// Closes a list item.
    ItemEnd,
    /// Opens a listing, source or literal block.
    BlockStart {
        /// Block style.
        style: BlockStyle,
        /// Index of the matching END.
        end: usize,
    },
    /// Closes a block.
    BlockEnd,

    // --- Content ---
    /// Inline content: the half-open token index range `first..last`.
    TokenRange {
        /// First token index.
        first: usize,
        /// One past the last token index.
        last: usize,
    },
    /// Literal source text, not interpreted.
    Verbatim(SourceSpan),

    // --- Macros ---
    /// An inline macro. Followed by one [`Instruction::MacroTarget`] and then
    /// exactly `attributes` attribute records.
    InlineMacro {
        /// The macro name (without the colon).
        name: SourceSpan,
        /// Named macro or URL link.
        kind: MacroKind,
        /// Number of attribute records that follow the target.
        attributes: usize,
    },
    /// The macro target.
    MacroTarget(SourceSpan),
    /// A positional macro attribute whose value is a token range.
    PositionalAttr {
        /// 1-based position in the attribute list.
        index: usize,
        /// First token of the value.
        first: usize,
        /// One past the last token of the value.
        last: usize,
    },
    /// A named macro attribute whose value is a token range.
    NamedAttr {
        /// The attribute name (without the `=`).
        name: SourceSpan,
        /// First token of the value.
        first: usize,
        /// One past the last token of the value.
        last: usize,
    },
}

impl Instruction {
    /// For START records, the index of the matching END.
    #[must_use]
    pub const fn end(&self) -> Option<usize> {
        match *self {
            Self::DocumentStart { end }
            | Self::PreambleStart { end }
            | Self::HeadingStart { end, .. }
            | Self::SectionStart { end, .. }
            | Self::ParagraphStart { end }
            | Self::ListStart { end, .. }
            | Self::ItemStart { end }
            | Self::BlockStart { end, .. } => Some(end),
            _ => None,
        }
    }

    /// Returns `true` for START records.
    #[must_use]
    pub const fn is_start(&self) -> bool {
        self.end().is_some()
    }

    /// Returns `true` for END records.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        matches!(
            self,
            Self::DocumentEnd
                | Self::PreambleEnd
                | Self::HeadingEnd { .. }
                | Self::SectionEnd { .. }
                | Self::ParagraphEnd
                | Self::ListEnd
                | Self::ItemEnd
                | Self::BlockEnd
        )
    }

    /// Point a START record at its END.
    pub(crate) fn set_end(&mut self, index: usize) {
        match self {
            Self::DocumentStart { end }
            | Self::PreambleStart { end }
            | Self::HeadingStart { end, .. }
            | Self::SectionStart { end, .. }
            | Self::ParagraphStart { end }
            | Self::ListStart { end, .. }
            | Self::ItemStart { end }
            | Self::BlockStart { end, .. } => *end = index,
            _ => {}
        }
    }
}
