//! Paragraphs and indented literal paragraphs.

use smallvec::SmallVec;

use super::{Parser, continues_text, line_end, next_line};
use crate::instruction::{BlockStyle, Instruction};
use crate::span::SourceSpan;
use crate::token::{TokenKind, Tokens};

impl Parser {
    /// Consecutive non-blank lines up to a blank line or a structural line.
    pub(super) fn paragraph(&mut self, tokens: Tokens<'_>, pos: usize) -> usize {
        self.content();
        self.pending = None;

        let mut end = line_end(tokens, pos);
        let mut next = next_line(tokens, end);
        while continues_text(tokens.kind(next)) {
            end = line_end(tokens, next);
            next = next_line(tokens, end);
        }

        self.start(Instruction::ParagraphStart { end: 0 });
        self.inline(tokens, pos, end);
        self.finish(Instruction::ParagraphEnd);
        next
    }

    /// A paragraph whose first line is indented. Runs to the next blank
    /// line; each line becomes one verbatim record with the common
    /// indentation removed.
    pub(super) fn literal(&mut self, tokens: Tokens<'_>, pos: usize) -> usize {
        self.content();
        self.pending = None;

        let mut lines = SmallVec::<[SourceSpan; 8]>::new();
        let mut next = pos;
        while !matches!(
            tokens.kind(next),
            TokenKind::LineFeed | TokenKind::Eof | TokenKind::ListingDelimiter { .. }
        ) {
            let end = line_end(tokens, next);
            lines.push(SourceSpan::new(tokens[next].span.start, tokens[end].span.start));
            next = next_line(tokens, end);
        }

        let indent = lines
            .iter()
            .map(|line| {
                let text = tokens.slice(*line);
                text.len() - text.trim_start_matches([' ', '\t']).len()
            })
            .min()
            .unwrap_or(0);

        self.start(Instruction::BlockStart {
            style: BlockStyle::Literal,
            end: 0,
        });
        for line in lines {
            self.instructions.push(Instruction::Verbatim(SourceSpan::new(
                line.start + indent,
                line.end,
            )));
        }
        self.finish(Instruction::BlockEnd);
        next
    }
}
