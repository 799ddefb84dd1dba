//! Delimited listing and source blocks.

use super::{Parser, line_end, next_line};
use crate::instruction::{BlockStyle, Instruction};
use crate::span::SourceSpan;
use crate::token::{TokenKind, Tokens};

impl Parser {
    /// A `----` block. Its content is a single verbatim record running from
    /// the line after the opening delimiter to the line before the closing
    /// one; the closing delimiter must repeat the opening dash count.
    pub(super) fn listing(&mut self, tokens: Tokens<'_>, pos: usize, dashes: u16) -> usize {
        self.content();
        let style = self
            .pending
            .take()
            .map_or(BlockStyle::Listing, |attrs| attrs.listing_style(tokens));

        let open = line_end(tokens, pos);
        let content_start = tokens[open].span.end;

        let mut close = next_line(tokens, open);
        while !matches!(tokens.kind(close), TokenKind::Eof)
            && tokens.kind(close) != (TokenKind::ListingDelimiter { dashes })
        {
            close += 1;
        }

        // The content ends before the line terminator preceding `close`.
        let content_end = match tokens.kind(close - 1) {
            TokenKind::LineFeed if close - 1 > open => tokens[close - 1].span.start,
            _ => tokens[close].span.start,
        }
        .max(content_start);

        let next = if matches!(tokens.kind(close), TokenKind::Eof) {
            self.warn(tokens[pos].span, "unterminated listing block");
            close
        } else {
            next_line(tokens, line_end(tokens, close))
        };

        self.start(Instruction::BlockStart { style, end: 0 });
        if content_start < content_end {
            self.instructions
                .push(Instruction::Verbatim(SourceSpan::new(content_start, content_end)));
        }
        self.finish(Instruction::BlockEnd);
        next
    }
}
