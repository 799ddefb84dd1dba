//! Inline content: token ranges split around inline macros.

use smallvec::SmallVec;

use super::Parser;
use super::metadata::attr_entries;
use crate::inline::flanking;
use crate::instruction::{Instruction, MacroKind};
use crate::span::SourceSpan;
use crate::token::{Mark, TokenKind, Tokens};

impl Parser {
    /// Emit the inline content `first..last` (a heading title, paragraph or
    /// list item text). Macros become macro records; the text around them
    /// stays addressable as token ranges.
    ///
    /// Each range is resolved on its own, so style marks never pair across
    /// a macro: in `*see https://x.org[x] now*` both `*` stay literal text.
    pub(super) fn inline(&mut self, tokens: Tokens<'_>, first: usize, last: usize) {
        if first >= last {
            return;
        }
        let bounds = SourceSpan::new(tokens[first].span.start, tokens[last - 1].span.end);
        let mut text_start = first;
        let mut in_monospace = false;
        let mut i = first;
        while i < last {
            match tokens.kind(i) {
                TokenKind::Mark(Mark::Monospace) => {
                    let (opens, closes) = flanking(tokens.source(), tokens[i].span, bounds);
                    if in_monospace && closes {
                        in_monospace = false;
                    } else if !in_monospace && opens {
                        in_monospace = true;
                    }
                }
                TokenKind::InlineMacro => {
                    let next =
                        self.inline_macro(tokens, i, last, text_start, in_monospace, bounds);
                    if let Some(next) = next {
                        text_start = next;
                        i = next;
                        continue;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        self.range(text_start, last);
    }

    /// Emit the macro whose name token is at `at`, preceded by the pending
    /// text `text_start..at`. Returns the index after the macro, or `None`
    /// when the tokens are left as text.
    fn inline_macro(
        &mut self,
        tokens: Tokens<'_>,
        at: usize,
        last: usize,
        text_start: usize,
        in_monospace: bool,
        bounds: SourceSpan,
    ) -> Option<usize> {
        if at + 1 >= last || tokens.kind(at + 1) != TokenKind::Text {
            return None;
        }
        let span = tokens[at].span;
        let name = SourceSpan::new(span.start, span.end - 1);
        let target = tokens[at + 1].span;
        let kind = if self.is_url_scheme(tokens.slice(name)) {
            MacroKind::Url
        } else {
            MacroKind::Named
        };

        let list = at + 2;
        let (entries, after) = if list < last && tokens.kind(list) == TokenKind::AttrListStart {
            let (entries, close) = attr_entries(tokens, list);
            (Some((entries, close)), close + 1)
        } else {
            (None, list)
        };

        // A bare `name:target` is only a macro for URL schemes.
        if entries.is_none() && kind == MacroKind::Named {
            return None;
        }
        // Inside a monospace span the macro is literal text.
        if in_monospace && closes_monospace(tokens, after, last, bounds) {
            return None;
        }

        self.range(text_start, at);
        let mut attributes = SmallVec::<[Instruction; 4]>::new();
        match (kind, entries) {
            (MacroKind::Url, Some((_, close))) if close > list + 1 => {
                // Link text: the whole bracket content, commas included.
                attributes.push(Instruction::PositionalAttr {
                    index: 1,
                    first: list + 1,
                    last: close,
                });
            }
            (MacroKind::Named, Some((entries, _))) => {
                attributes.extend(entries.iter().map(|e| match e.name {
                    Some(name) => Instruction::NamedAttr {
                        name,
                        first: e.first,
                        last: e.last,
                    },
                    None => Instruction::PositionalAttr {
                        index: e.index,
                        first: e.first,
                        last: e.last,
                    },
                }));
            }
            _ => {}
        }

        tracing::trace!(
            name = tokens.slice(name),
            ?kind,
            attributes = attributes.len(),
            "inline macro"
        );
        self.instructions.push(Instruction::InlineMacro {
            name,
            kind,
            attributes: attributes.len(),
        });
        self.instructions.push(Instruction::MacroTarget(target));
        self.instructions.extend(attributes);
        Some(after)
    }
}

/// Whether a closing backtick follows in `from..last`.
fn closes_monospace(tokens: Tokens<'_>, from: usize, last: usize, bounds: SourceSpan) -> bool {
    (from..last).any(|i| {
        tokens.kind(i) == TokenKind::Mark(Mark::Monospace)
            && flanking(tokens.source(), tokens[i].span, bounds).1
    })
}
