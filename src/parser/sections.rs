//! Document header and section headings.

use super::{Parser, line_end, next_line};
use crate::instruction::Instruction;
use crate::token::{TokenKind, Tokens};

impl Parser {
    /// The document header: a level-1 title as the very first block,
    /// followed directly by document attribute entries.
    pub(super) fn header(&mut self, tokens: Tokens<'_>, pos: usize) -> usize {
        if tokens.kind(pos) != (TokenKind::Heading { level: 1 }) {
            return pos;
        }
        let mut pos = self.heading(tokens, pos, 1);
        while let TokenKind::DocAttr { name, unset } = tokens.kind(pos) {
            pos = self.doc_attr(tokens, pos, name, unset);
        }
        pos
    }

    /// A heading in the body opens a section one level below its marker,
    /// after closing every open section at that level or deeper.
    pub(super) fn section(&mut self, tokens: Tokens<'_>, pos: usize, marker: u8) -> usize {
        let level = marker.saturating_sub(1);
        self.close_preamble();
        while let Some(&open) = self.sections.last()
            && open >= level
        {
            self.sections.pop();
            self.finish(Instruction::SectionEnd { level: open });
            tracing::trace!(level = open, "section closed");
        }

        let style = self.pending.take().and_then(|attrs| attrs.style(tokens));
        self.start(Instruction::SectionStart {
            level,
            style,
            end: 0,
        });
        self.sections.push(level);
        tracing::trace!(level, "section opened");

        self.heading(tokens, pos, marker)
    }

    fn heading(&mut self, tokens: Tokens<'_>, pos: usize, level: u8) -> usize {
        let end = line_end(tokens, pos);
        self.start(Instruction::HeadingStart { level, end: 0 });
        self.inline(tokens, pos + 1, end);
        self.finish(Instruction::HeadingEnd { level });
        next_line(tokens, end)
    }
}
