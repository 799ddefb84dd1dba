//! Line-start recognition.
//!
//! Every line is first matched against a small chumsky grammar that decides
//! what the line *starts* with: a listing delimiter, a heading marker, a
//! document attribute entry, a list marker or plain indentation. Whatever
//! follows the recognized prefix is handed to the inline scanner.

use chumsky::{extra, prelude::*};

use crate::token::ListMarker;

/// What a line starts with. Lengths are byte counts from the line start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LineStart {
    /// Empty or blank-only line.
    Blank,
    ListingDelimiter {
        dashes: u16,
    },
    Heading {
        level: u8,
        len: usize,
    },
    DocAttr {
        name: SimpleSpan,
        unset: bool,
        len: usize,
        spaced: bool,
    },
    ListItem {
        marker: ListMarker,
        depth: u8,
        len: usize,
    },
    Indent {
        len: usize,
    },
}

fn blank<'src>() -> impl Parser<'src, &'src str, char, extra::Default> + Clone {
    one_of(" \t")
}

fn saturate_u8(n: usize) -> u8 {
    u8::try_from(n).unwrap_or(u8::MAX)
}

/// Build the line-start grammar.
fn line_start<'src>() -> impl Parser<'src, &'src str, LineStart, extra::Default> {
    let delimiter = just('-')
        .repeated()
        .at_least(4)
        .count()
        .then_ignore(blank().repeated())
        .then_ignore(end())
        .map(|dashes| LineStart::ListingDelimiter {
            dashes: u16::try_from(dashes).unwrap_or(u16::MAX),
        });

    // Seven or more `=` fail on the blank requirement and fall through.
    let heading = just('=')
        .repeated()
        .at_least(1)
        .at_most(6)
        .count()
        .then(blank().repeated().at_least(1).count())
        .map(|(level, blanks)| LineStart::Heading {
            level: saturate_u8(level),
            len: level + blanks,
        });

    let name = any()
        .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
        .then(
            any()
                .filter(|c: &char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
                .repeated(),
        )
        .map_with(|_, e| e.span());

    let doc_attr = just(':')
        .ignore_then(just('!').or_not())
        .then(name)
        .then(just('!').or_not())
        .then_ignore(just(':'))
        .then(blank().repeated().count())
        .map_with(|(((leading, name), trailing), blanks), e| {
            let span: SimpleSpan = e.span();
            LineStart::DocAttr {
                name,
                unset: leading.is_some() || trailing.is_some(),
                len: span.end,
                spaced: blanks > 0,
            }
        });

    let list_item = blank()
        .repeated()
        .ignore_then(choice((
            just('*')
                .repeated()
                .at_least(1)
                .count()
                .map(|depth| (ListMarker::Asterisk, depth)),
            just('-').to((ListMarker::Hyphen, 1)),
        )))
        .then_ignore(blank().repeated().at_least(1))
        .map_with(|(marker, depth), e| {
            let span: SimpleSpan = e.span();
            LineStart::ListItem {
                marker,
                depth: saturate_u8(depth),
                len: span.end,
            }
        });

    let indent = blank()
        .repeated()
        .at_least(1)
        .count()
        .map(|len| LineStart::Indent { len });

    choice((delimiter, heading, doc_attr, list_item, indent))
}

/// Classify a line (terminator excluded). `None` means plain content.
pub(super) fn classify(line: &str) -> Option<LineStart> {
    if line.chars().all(|c| c == ' ' || c == '\t') {
        return Some(LineStart::Blank);
    }

    let start = line_start()
        .or_not()
        .then_ignore(any().repeated())
        .parse(line)
        .into_output()
        .flatten()?;

    match start {
        // A marker with nothing after it is content.
        LineStart::Heading { len, .. } | LineStart::ListItem { len, .. } if len >= line.len() => {
            indentation(line)
        }
        LineStart::DocAttr {
            len, spaced: false, ..
        } if len < line.len() => None,
        other => Some(other),
    }
}

/// Plain indentation of a line, if any.
fn indentation(line: &str) -> Option<LineStart> {
    let len = line.len() - line.trim_start_matches([' ', '\t']).len();
    (len > 0).then_some(LineStart::Indent { len })
}
