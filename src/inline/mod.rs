//! Inline resolver: token range → styled text runs.
//!
//! The lexer records every `*`, `_` and `` ` `` as a candidate mark. The
//! resolver re-scans one token range (a paragraph, a heading title, a macro
//! attribute value) and decides which candidates actually delimit a span:
//!
//! 1. Each candidate is classified with the constrained rules from
//!    [`constrained`]: it may open, close, or neither.
//! 2. Candidates are paired with a stack. A closer matches the nearest open
//!    candidate of the same style; unmatched openers above it are dropped.
//! 3. Pairs nested inside a monospace pair are dropped: monospace content is
//!    literal.
//!
//! Every candidate that ends up unpaired is emitted as plain text, so the
//! style markers in the output always balance.
//!
//! Tokens are rendered from their source spans. Source bytes between two
//! consecutive tokens of the range (the quotes around an attribute value,
//! trimmed blanks) are rendered too, so an uninterpreted range reads exactly
//! like its source.

mod constrained;

pub(crate) use constrained::flanking;

use serde::Serialize;

use crate::span::SourceSpan;
use crate::token::{Mark, TokenKind, Tokens};

/// One element of a resolved inline range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TextRun {
    /// Literal source text.
    Plain(SourceSpan),
    /// A typographic apostrophe (`’`).
    CurvedApostrophe,
    /// `*` opening strong text.
    BoldStart,
    /// `*` closing strong text.
    BoldEnd,
    /// `_` opening emphasis.
    ItalicStart,
    /// `_` closing emphasis.
    ItalicEnd,
    /// `` ` `` opening monospace.
    MonospaceStart,
    /// `` ` `` closing monospace.
    MonospaceEnd,
}

impl TextRun {
    /// The source text of a [`TextRun::Plain`] run; empty for markers.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        match self {
            Self::Plain(span) => span.slice(source),
            _ => "",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Piece {
    Text(SourceSpan),
    Apostrophe(SourceSpan),
    Mark {
        mark: Mark,
        span: SourceSpan,
        opens: bool,
        closes: bool,
        /// Index of the matching piece once paired.
        partner: Option<usize>,
    },
}

/// A reusable inline resolver.
///
/// [`resolve`](Self::resolve) clears the internal buffers on every call, so
/// resolving the same range twice gives the same runs.
#[derive(Debug, Clone)]
pub struct InlineResolver {
    typographic_quotes: bool,
    pieces: Vec<Piece>,
    stack: Vec<usize>,
    runs: Vec<TextRun>,
}

impl Default for InlineResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl InlineResolver {
    /// A resolver that renders typographic apostrophes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_typographic_quotes(true)
    }

    /// A resolver with typographic apostrophes on or off. When off,
    /// apostrophes stay plain text.
    #[must_use]
    pub fn with_typographic_quotes(typographic_quotes: bool) -> Self {
        Self {
            typographic_quotes,
            pieces: Vec::new(),
            stack: Vec::new(),
            runs: Vec::new(),
        }
    }

    /// Clear the buffers, keeping their capacity.
    pub fn reset(&mut self) {
        self.pieces.clear();
        self.stack.clear();
        self.runs.clear();
    }

    /// Resolve the token range `first..last`.
    ///
    /// Out-of-range indices are clamped; an empty range yields no runs.
    pub fn resolve(&mut self, tokens: Tokens<'_>, first: usize, last: usize) -> &[TextRun] {
        self.reset();
        let last = last.min(tokens.len());
        let first = first.min(last);
        if first < last {
            self.collect(tokens, first, last);
            self.pair();
            self.emit();
        }
        tracing::trace!(first, last, runs = self.runs.len(), "resolved");
        &self.runs
    }

    /// The runs of the last [`resolve`](Self::resolve) call.
    #[must_use]
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    fn collect(&mut self, tokens: Tokens<'_>, first: usize, last: usize) {
        let source = tokens.source();
        let bounds = SourceSpan::new(tokens[first].span.start, tokens[last - 1].span.end);
        let mut cursor = bounds.start;
        for token in &tokens.as_slice()[first..last] {
            let span = token.span;
            match token.kind {
                TokenKind::AttrValueStart | TokenKind::AttrValueEnd | TokenKind::Eof => continue,
                _ => {}
            }
            if span.start > cursor {
                self.pieces
                    .push(Piece::Text(SourceSpan::new(cursor, span.start)));
            }
            cursor = cursor.max(span.end);
            self.pieces.push(match token.kind {
                TokenKind::Mark(mark) => {
                    let (opens, closes) = flanking(source, span, bounds);
                    Piece::Mark {
                        mark,
                        span,
                        opens,
                        closes,
                        partner: None,
                    }
                }
                TokenKind::Apostrophe => Piece::Apostrophe(span),
                _ => Piece::Text(span),
            });
        }
    }

    fn pair(&mut self) {
        for i in 0..self.pieces.len() {
            let Piece::Mark {
                mark, opens, closes, ..
            } = self.pieces[i]
            else {
                continue;
            };

            // A pair needs something between its delimiters.
            if closes
                && let Some(depth) = self
                    .stack
                    .iter()
                    .rposition(|&j| mark_of(&self.pieces[j]) == Some(mark))
                && self.stack[depth] + 1 < i
            {
                let opener = self.stack[depth];
                self.stack.truncate(depth);
                set_partner(&mut self.pieces[opener], i);
                set_partner(&mut self.pieces[i], opener);
            } else if opens {
                self.stack.push(i);
            }
        }
        self.stack.clear();
    }

    fn emit(&mut self) {
        // Index of the closing piece of the monospace pair we are inside.
        let mut monospace_until: Option<usize> = None;
        for i in 0..self.pieces.len() {
            let run = match self.pieces[i] {
                Piece::Text(span) => TextRun::Plain(span),
                Piece::Apostrophe(span) => {
                    if self.typographic_quotes {
                        TextRun::CurvedApostrophe
                    } else {
                        TextRun::Plain(span)
                    }
                }
                Piece::Mark {
                    mark,
                    span,
                    partner: Some(partner),
                    ..
                } => match monospace_until {
                    Some(until) if i == until => {
                        monospace_until = None;
                        TextRun::MonospaceEnd
                    }
                    Some(_) => TextRun::Plain(span),
                    None => {
                        let opening = partner > i;
                        if opening && mark == Mark::Monospace {
                            monospace_until = Some(partner);
                        }
                        marker(mark, opening)
                    }
                },
                Piece::Mark { span, .. } => TextRun::Plain(span),
            };
            self.push(run);
        }
    }

    fn push(&mut self, run: TextRun) {
        if let TextRun::Plain(span) = run
            && let Some(TextRun::Plain(previous)) = self.runs.last_mut()
            && previous.end == span.start
        {
            previous.end = span.end;
            return;
        }
        self.runs.push(run);
    }
}

/// Resolve `first..last` with a fresh [`InlineResolver`].
#[must_use]
pub fn resolve(tokens: Tokens<'_>, first: usize, last: usize) -> Vec<TextRun> {
    let mut resolver = InlineResolver::new();
    resolver.resolve(tokens, first, last).to_vec()
}

fn mark_of(piece: &Piece) -> Option<Mark> {
    match piece {
        Piece::Mark { mark, .. } => Some(*mark),
        _ => None,
    }
}

fn set_partner(piece: &mut Piece, index: usize) {
    if let Piece::Mark { partner, .. } = piece {
        *partner = Some(index);
    }
}

fn marker(mark: Mark, opening: bool) -> TextRun {
    match (mark, opening) {
        (Mark::Strong, true) => TextRun::BoldStart,
        (Mark::Strong, false) => TextRun::BoldEnd,
        (Mark::Emphasis, true) => TextRun::ItalicStart,
        (Mark::Emphasis, false) => TextRun::ItalicEnd,
        (Mark::Monospace, true) => TextRun::MonospaceStart,
        (Mark::Monospace, false) => TextRun::MonospaceEnd,
    }
}
