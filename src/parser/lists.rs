//! Unordered lists.
//!
//! Lists are driven by the marker of each item line: the same marker as the
//! innermost open list adds a sibling item, the marker of an enclosing list
//! closes back to that list, and any other marker nests a new list inside
//! the current item. Item text continues lazily over following non-blank
//! lines. After a blank line only a marker already in use keeps the list
//! open.

use super::{Parser, continues_text, line_end, next_line, skip_blank_lines};
use crate::instruction::Instruction;
use crate::token::{TokenKind, Tokens};

impl Parser {
    pub(super) fn list(&mut self, tokens: Tokens<'_>, mut pos: usize) -> usize {
        self.content();
        self.pending = None;
        let base = self.lists.len();

        while let TokenKind::ListItem { marker, depth } = tokens.kind(pos) {
            match self.lists[base..]
                .iter()
                .rposition(|&open| open == (marker, depth))
            {
                Some(k) => {
                    while self.lists.len() > base + k + 1 {
                        self.close_list();
                    }
                    self.finish(Instruction::ItemEnd);
                }
                None => {
                    self.start(Instruction::ListStart {
                        marker,
                        depth,
                        end: 0,
                    });
                    self.lists.push((marker, depth));
                    tracing::trace!(?marker, depth, "list opened");
                }
            }

            self.start(Instruction::ItemStart { end: 0 });
            let first = pos + 1;
            let mut end = line_end(tokens, pos);
            let mut next = next_line(tokens, end);
            while continues_text(tokens.kind(next)) {
                end = line_end(tokens, next);
                next = next_line(tokens, end);
            }
            self.inline(tokens, first, end);
            pos = next;

            let after_blank = skip_blank_lines(tokens, pos);
            match tokens.kind(after_blank) {
                TokenKind::ListItem { marker, depth }
                    if after_blank == pos || self.lists[base..].contains(&(marker, depth)) =>
                {
                    pos = after_blank;
                }
                _ => break,
            }
        }

        while self.lists.len() > base {
            self.close_list();
        }
        pos
    }

    /// Close the innermost list together with its open item.
    fn close_list(&mut self) {
        self.finish(Instruction::ItemEnd);
        self.finish(Instruction::ListEnd);
        if let Some((marker, depth)) = self.lists.pop() {
            tracing::trace!(?marker, depth, "list closed");
        }
    }
}
