//! Attribute-list grammar: `[positional, name=value, "quoted, value"]`.
//!
//! The grammar only locates entries; token emission (and the inline scan of
//! each value) is done by the caller so that offsets can be made absolute.

use chumsky::{extra, prelude::*};

/// One entry of an attribute list. Spans are relative to the list start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RawEntry {
    /// `name=` including the `=`.
    pub name: Option<SimpleSpan>,
    /// Value text. Quotes are excluded; bare values are not yet trimmed.
    pub value: SimpleSpan,
    pub quoted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RawAttrList {
    pub entries: Vec<RawEntry>,
    /// Bytes consumed, closing `]` included.
    pub len: usize,
}

fn blank<'src>() -> impl Parser<'src, &'src str, char, extra::Default> + Clone {
    one_of(" \t")
}

fn attr_list<'src>() -> impl Parser<'src, &'src str, RawAttrList, extra::Default> {
    let name = any()
        .filter(|c: &char| c.is_alphanumeric() || matches!(c, '_' | '-'))
        .repeated()
        .at_least(1)
        .then_ignore(just('='))
        .map_with(|(), e| e.span());

    // A quoted value only counts when the entry ends right after the quote;
    // `"a" b` is read as a bare value instead.
    let quoted = just('"')
        .ignore_then(none_of("\"\n").repeated().map_with(|(), e| e.span()))
        .then_ignore(just('"'))
        .then_ignore(blank().repeated().then(one_of(",]")).rewind())
        .map(|span: SimpleSpan| (span, true));

    let bare = none_of(",]\n")
        .repeated()
        .map_with(|(), e| e.span())
        .map(|span: SimpleSpan| (span, false));

    let entry = blank()
        .repeated()
        .ignore_then(name.or_not())
        .then_ignore(blank().repeated())
        .then(choice((quoted, bare)))
        .then_ignore(blank().repeated())
        .map(|(name, (value, quoted))| RawEntry {
            name,
            value,
            quoted,
        });

    just('[')
        .ignore_then(entry.separated_by(just(',')).collect::<Vec<_>>())
        .then_ignore(just(']'))
        .map_with(|entries, e| {
            let span: SimpleSpan = e.span();
            RawAttrList {
                entries,
                len: span.end,
            }
        })
}

/// Parse an attribute list at the start of `input`, ignoring what follows
/// the closing bracket.
pub(super) fn parse_inline(input: &str) -> Option<RawAttrList> {
    attr_list()
        .then_ignore(any().repeated())
        .parse(input)
        .into_output()
}

/// Parse a line that consists of an attribute list only.
pub(super) fn parse_line(line: &str) -> Option<RawAttrList> {
    attr_list()
        .then_ignore(blank().repeated())
        .then_ignore(end())
        .parse(line)
        .into_output()
}
