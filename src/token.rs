//! Lexical tokens produced by the [`Lexer`](crate::lexer::Lexer).
//!
//! Tokens carry no text of their own: each one is a kind plus the
//! [`SourceSpan`] it was recognized from. Because every span covers the exact
//! source characters that produced the token, any token a later pass does not
//! interpret can still be rendered literally.

use std::ops::Index;

use serde::Serialize;

use crate::span::SourceSpan;

/// Inline delimiter characters recorded as candidate style markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Mark {
    /// `*`
    Strong,
    /// `_`
    Emphasis,
    /// `` ` ``
    Monospace,
}

impl Mark {
    /// The delimiter character for this mark.
    #[must_use]
    pub const fn delimiter(self) -> char {
        match self {
            Self::Strong => '*',
            Self::Emphasis => '_',
            Self::Monospace => '`',
        }
    }

    pub(crate) const fn from_char(c: char) -> Option<Self> {
        match c {
            '*' => Some(Self::Strong),
            '_' => Some(Self::Emphasis),
            '`' => Some(Self::Monospace),
            _ => None,
        }
    }
}

/// The character introducing an unordered list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ListMarker {
    /// `* item`, `** item`, ...
    Asterisk,
    /// `- item`
    Hyphen,
}

/// A lexical token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // --- Text & structure ---
    /// A run of literal text.
    Text,

    /// A line terminator (`\n` or `\r\n`).
    LineFeed,

    /// End of input. Always the last token, with an empty span.
    Eof,

    // --- Line-start markers ---
    /// `=` run followed by blanks at the start of a line. The span covers the
    /// marker and the blanks.
    Heading {
        /// Number of `=` characters (1–6).
        level: u8,
    },

    /// A document attribute entry (`:name: value`). The span covers the
    /// `:name:` prefix and the blanks after it; the value, when present,
    /// follows as a single [`TokenKind::Text`].
    DocAttr {
        /// Span of the attribute name.
        name: SourceSpan,
        /// `:!name:` or `:name!:` form.
        unset: bool,
    },

    /// An unordered list item marker, including indentation and the blanks
    /// following the marker.
    ListItem {
        /// Marker character.
        marker: ListMarker,
        /// Nesting depth (`*` count, `1` for `-`).
        depth: u8,
    },

    /// A listing block delimiter line (`----`).
    ListingDelimiter {
        /// Number of `-` characters.
        dashes: u16,
    },

    /// Leading indentation of a non-blank line.
    Indent,

    // --- Attribute lists ---
    /// `[`
    AttrListStart,

    /// `]`
    AttrListEnd,

    /// `name=` in a named attribute entry (the `=` is included in the span).
    AttrName,

    /// Start of an attribute value. The span covers the whole value text
    /// (quotes excluded); the value's own tokens follow.
    AttrValueStart,

    /// End of an attribute value. Empty span.
    AttrValueEnd,

    /// `,` between two attribute entries, with surrounding blanks.
    Separator,

    // --- Inline ---
    /// `name:` of an inline macro (the colon is included in the span). The
    /// target follows as a [`TokenKind::Text`], then optionally an
    /// attribute list.
    InlineMacro,

    /// A candidate style delimiter. Whether it opens, closes or stays literal
    /// is decided by the inline resolver.
    Mark(Mark),

    /// An apostrophe between two word characters.
    Apostrophe,
}

/// A token: kind plus source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Source bytes the token was recognized from.
    pub span: SourceSpan,
}

impl Token {
    /// Create a token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }

    /// Returns `true` for [`TokenKind::LineFeed`].
    #[must_use]
    pub const fn is_line_feed(&self) -> bool {
        matches!(self.kind, TokenKind::LineFeed)
    }
}

/// A read-only view over a token sequence and the source it was lexed from.
///
/// This is what the later passes consume: they only ever need random access
/// to the tokens plus the ability to slice the source.
#[derive(Debug, Clone, Copy)]
pub struct Tokens<'a> {
    source: &'a str,
    tokens: &'a [Token],
}

impl<'a> Tokens<'a> {
    /// Pair a token slice with its source.
    #[must_use]
    pub const fn new(source: &'a str, tokens: &'a [Token]) -> Self {
        Self { source, tokens }
    }

    /// The source text.
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.source
    }

    /// The tokens.
    #[must_use]
    pub const fn as_slice(&self) -> &'a [Token] {
        self.tokens
    }

    /// Number of tokens (the trailing EOF included).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` when there are no tokens at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The token at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a Token> {
        self.tokens.get(index)
    }

    /// The kind of the token at `index`, or [`TokenKind::Eof`] past the end.
    #[must_use]
    pub fn kind(&self, index: usize) -> TokenKind {
        self.tokens.get(index).map_or(TokenKind::Eof, |t| t.kind)
    }

    /// The source text of the token at `index`.
    #[must_use]
    pub fn text(&self, index: usize) -> &'a str {
        self.tokens
            .get(index)
            .map_or("", |t| t.span.slice(self.source))
    }

    /// Slice the source with a span.
    #[must_use]
    pub fn slice(&self, span: SourceSpan) -> &'a str {
        span.slice(self.source)
    }
}

impl Index<usize> for Tokens<'_> {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}
