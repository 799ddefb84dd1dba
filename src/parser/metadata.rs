//! Attribute lists: block attribute lines and inline macro attributes.

use smallvec::SmallVec;

use super::{Parser, line_end, next_line};
use crate::instruction::BlockStyle;
use crate::span::SourceSpan;
use crate::token::{TokenKind, Tokens};

/// One non-empty entry of an attribute list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct AttrEntry {
    /// 1-based slot in the list. Empty slots count.
    pub index: usize,
    /// Name of a `name=value` entry, without the `=`.
    pub name: Option<SourceSpan>,
    /// The value text.
    pub value: SourceSpan,
    /// Token range of the value.
    pub first: usize,
    pub last: usize,
}

pub(super) type AttrEntries = SmallVec<[AttrEntry; 4]>;

/// Read the entries of the attribute list opened at `open`. Returns them
/// with the index of the closing `AttrListEnd`.
pub(super) fn attr_entries(tokens: Tokens<'_>, open: usize) -> (AttrEntries, usize) {
    let mut entries = AttrEntries::new();
    let mut index = 1;
    let mut name = None;
    let mut i = open + 1;
    loop {
        match tokens.kind(i) {
            TokenKind::AttrListEnd | TokenKind::LineFeed | TokenKind::Eof => break,
            TokenKind::Separator => {
                index += 1;
                name = None;
            }
            TokenKind::AttrName => {
                let span = tokens[i].span;
                name = Some(SourceSpan::new(span.start, span.end - 1));
            }
            TokenKind::AttrValueStart => {
                let value = tokens[i].span;
                let mut close = i + 1;
                while !matches!(
                    tokens.kind(close),
                    TokenKind::AttrValueEnd | TokenKind::AttrListEnd | TokenKind::Eof
                ) {
                    close += 1;
                }
                entries.push(AttrEntry {
                    index,
                    name: name.take(),
                    value,
                    first: i + 1,
                    last: close,
                });
                i = if matches!(tokens.kind(close), TokenKind::AttrValueEnd) {
                    close
                } else {
                    close - 1
                };
            }
            _ => {}
        }
        i += 1;
    }
    (entries, i)
}

/// A block attribute line (`[source,rust]`) waiting for its block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct BlockAttrs {
    pub span: SourceSpan,
    entries: AttrEntries,
}

impl BlockAttrs {
    fn positional(&self, index: usize) -> Option<&AttrEntry> {
        self.entries
            .iter()
            .find(|e| e.name.is_none() && e.index == index)
    }

    fn named(&self, tokens: Tokens<'_>, name: &str) -> Option<&AttrEntry> {
        self.entries
            .iter()
            .find(|e| e.name.is_some_and(|n| tokens.slice(n) == name))
    }

    /// The block style: the first positional entry or `style=`.
    pub fn style(&self, tokens: Tokens<'_>) -> Option<SourceSpan> {
        self.positional(1)
            .or_else(|| self.named(tokens, "style"))
            .map(|e| e.value)
    }

    /// Style of a listing block carrying these attributes.
    pub fn listing_style(&self, tokens: Tokens<'_>) -> BlockStyle {
        let style = self.style(tokens).map(|s| tokens.slice(s));
        let language = self
            .positional(2)
            .or_else(|| self.named(tokens, "language"))
            .map(|e| e.value);
        match style {
            Some("source") => BlockStyle::Source { language },
            None if language.is_some() => BlockStyle::Source { language },
            _ => BlockStyle::Listing,
        }
    }
}

impl Parser {
    /// A block attribute line. Held until the next block consumes it.
    pub(super) fn block_attributes(&mut self, tokens: Tokens<'_>, pos: usize) -> usize {
        let (entries, close) = attr_entries(tokens, pos);
        let end = tokens.get(close).map_or(tokens[pos].span.end, |t| t.span.end);
        let span = SourceSpan::new(tokens[pos].span.start, end);
        let attrs = BlockAttrs { span, entries };
        if let Some(previous) = self.pending.replace(attrs) {
            self.warn(previous.span, "block attribute list does not precede a block");
        }
        next_line(tokens, line_end(tokens, close))
    }
}
