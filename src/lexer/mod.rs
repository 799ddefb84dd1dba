//! Lexer for `AsciiDoc` source text.
//!
//! Produces a flat sequence of [`Token`]s, each carrying the [`SourceSpan`]
//! it was recognized from. The scan is line oriented: the start of every line
//! is matched by a small chumsky grammar (see [`line`]), the remainder is
//! scanned for inline candidates (style marks, typographic apostrophes and
//! inline macros). Whether a mark actually opens or closes a span is decided
//! later by the [`InlineResolver`](crate::inline::InlineResolver).
//!
//! Lines between two listing delimiters are not interpreted at all: each one
//! becomes a single [`TokenKind::Text`].
//!
//! The lexer is total: every input produces a token stream that ends with
//! exactly one [`TokenKind::Eof`].

mod attrlist;
mod line;

use crate::span::SourceSpan;
use crate::token::{Mark, Token, TokenKind, Tokens};

use self::attrlist::RawAttrList;
use self::line::LineStart;

/// Characters that end a bare URL target when they trail it. Style marks
/// trail it too, so a URL wrapped in `*` or `` ` `` leaves its closing mark.
const URL_TRAILING: [char; 10] = ['.', ',', ';', ':', '!', '?', ')', '*', '_', '`'];

/// A reusable lexer.
///
/// The token buffer is kept between calls; [`lex`](Self::lex) clears it
/// before scanning, so repeated use does not reallocate once the buffer has
/// grown to fit the largest document seen.
#[derive(Debug, Default)]
pub struct Lexer {
    tokens: Vec<Token>,
}

impl Lexer {
    /// Create a lexer with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a lexer whose buffer can hold `capacity` tokens up front.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(capacity),
        }
    }

    /// Lex `source`, replacing the previous contents of the buffer.
    pub fn lex<'a>(&'a mut self, source: &'a str) -> Tokens<'a> {
        self.reset();
        Scanner {
            source,
            tokens: &mut self.tokens,
            fence: None,
        }
        .run();
        tracing::debug!(bytes = source.len(), tokens = self.tokens.len(), "lexed");
        Tokens::new(source, &self.tokens)
    }

    /// Clear the token buffer, keeping its capacity.
    pub fn reset(&mut self) {
        self.tokens.clear();
    }

    /// Capacity of the token buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.tokens.capacity()
    }
}

/// Lex an `AsciiDoc` source string into a sequence of tokens.
///
/// The lexer is infallible; the returned vector always ends with
/// [`TokenKind::Eof`].
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new();
    let _ = lexer.lex(source);
    lexer.tokens
}

struct Scanner<'a> {
    source: &'a str,
    tokens: &'a mut Vec<Token>,
    /// Dash count of the open listing block, if any.
    fence: Option<u16>,
}

impl Scanner<'_> {
    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token::new(kind, SourceSpan::new(start, end)));
    }

    fn text(&mut self, start: usize, end: usize) {
        if start < end {
            self.push(TokenKind::Text, start, end);
        }
    }

    fn run(&mut self) {
        let source = self.source;
        let mut pos = 0;
        while pos < source.len() {
            match source[pos..].find('\n') {
                Some(offset) => {
                    let newline = pos + offset;
                    let end = if source[pos..newline].ends_with('\r') {
                        newline - 1
                    } else {
                        newline
                    };
                    self.line(pos, end);
                    self.push(TokenKind::LineFeed, end, newline + 1);
                    pos = newline + 1;
                }
                None => {
                    self.line(pos, source.len());
                    pos = source.len();
                }
            }
        }
        self.push(TokenKind::Eof, source.len(), source.len());
    }

    fn line(&mut self, start: usize, end: usize) {
        let source = self.source;
        let line = &source[start..end];
        let kind = line::classify(line);

        if let Some(open) = self.fence {
            match kind {
                Some(LineStart::ListingDelimiter { dashes }) if dashes == open => {
                    self.fence = None;
                    self.push(TokenKind::ListingDelimiter { dashes }, start, end);
                }
                _ => self.text(start, end),
            }
            return;
        }

        match kind {
            Some(LineStart::Blank) => {}
            Some(LineStart::ListingDelimiter { dashes }) => {
                self.fence = Some(dashes);
                self.push(TokenKind::ListingDelimiter { dashes }, start, end);
            }
            Some(LineStart::Heading { level, len }) => {
                self.push(TokenKind::Heading { level }, start, start + len);
                self.inline(start + len, end, true);
            }
            Some(LineStart::DocAttr {
                name, unset, len, ..
            }) => {
                let name = SourceSpan::new(start + name.start, start + name.end);
                self.push(TokenKind::DocAttr { name, unset }, start, start + len);
                let value = line[len..].trim_end();
                self.text(start + len, start + len + value.len());
            }
            Some(LineStart::ListItem { marker, depth, len }) => {
                self.push(TokenKind::ListItem { marker, depth }, start, start + len);
                self.inline(start + len, end, true);
            }
            Some(LineStart::Indent { len }) => {
                self.push(TokenKind::Indent, start, start + len);
                self.inline(start + len, end, true);
            }
            None => match line.starts_with('[').then(|| attrlist::parse_line(line)) {
                Some(Some(list)) => self.attr_list(start, &list),
                _ => self.inline(start, end, true),
            },
        }
    }

    /// Emit the tokens of an attribute list found at `base`.
    fn attr_list(&mut self, base: usize, list: &RawAttrList) {
        let source = self.source;
        self.push(TokenKind::AttrListStart, base, base + 1);
        let mut previous_end = None;
        for entry in &list.entries {
            let value_start = base + entry.value.start;
            let raw = &source[value_start..base + entry.value.end];
            let value_end = if entry.quoted {
                value_start + raw.len()
            } else {
                value_start + raw.trim_end().len()
            };
            let quote = usize::from(entry.quoted);
            let entry_start = entry
                .name
                .map_or(value_start - quote, |name| base + name.start);

            if let Some(previous_end) = previous_end {
                self.push(TokenKind::Separator, previous_end, entry_start);
            }
            previous_end = Some(value_end + quote);

            if let Some(name) = entry.name {
                self.push(TokenKind::AttrName, base + name.start, base + name.end);
            } else if value_start == value_end && !entry.quoted {
                // Empty positional entry: the separators alone carry it.
                continue;
            }
            self.push(TokenKind::AttrValueStart, value_start, value_end);
            self.inline(value_start, value_end, false);
            self.push(TokenKind::AttrValueEnd, value_end, value_end);
        }
        let end = base + list.len;
        self.push(TokenKind::AttrListEnd, end - 1, end);
    }

    /// Scan `from..to` for inline candidates.
    fn inline(&mut self, from: usize, to: usize, macros: bool) {
        let source = self.source;
        let mut text_start = from;
        let mut pos = from;
        while let Some(c) = source[pos..to].chars().next() {
            let next = pos + c.len_utf8();
            if let Some(mark) = Mark::from_char(c) {
                self.text(text_start, pos);
                self.push(TokenKind::Mark(mark), pos, next);
                text_start = next;
            } else if c == '\'' && is_word_apostrophe(&source[from..to], pos - from) {
                self.text(text_start, pos);
                self.push(TokenKind::Apostrophe, pos, next);
                text_start = next;
            } else if c == ':'
                && macros
                && let Some(resume) = self.inline_macro(text_start, pos, to)
            {
                text_start = resume;
                pos = resume;
                continue;
            }
            pos = next;
        }
        self.text(text_start, to);
    }

    /// Try to read `name:target[...]` or `scheme://target` around the colon
    /// at `colon`. On success the macro tokens are emitted and the offset
    /// where scanning resumes is returned.
    fn inline_macro(&mut self, text_start: usize, colon: usize, to: usize) -> Option<usize> {
        let source = self.source;
        let name_start = source[text_start..colon]
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_alphanumeric() || *c == '-')
            .last()
            .map(|(i, _)| text_start + i)?;

        let target_start = colon + 1;
        let rest = &source[target_start..to];
        let target_len = rest
            .find(|c: char| matches!(c, '[' | ' ' | '\t'))
            .unwrap_or(rest.len());
        if target_len == 0 {
            return None;
        }
        let target_end = target_start + target_len;

        if source[target_end..to].starts_with('[') {
            let list = attrlist::parse_inline(&source[target_end..to])?;
            self.text(text_start, name_start);
            self.push(TokenKind::InlineMacro, name_start, target_start);
            self.text(target_start, target_end);
            self.attr_list(target_end, &list);
            return Some(target_end + list.len);
        }

        let target = &source[target_start..target_end];
        if !target.starts_with("//") {
            return None;
        }
        let target = target.trim_end_matches(URL_TRAILING);
        if target.len() <= 2 {
            return None;
        }
        self.text(text_start, name_start);
        self.push(TokenKind::InlineMacro, name_start, target_start);
        self.text(target_start, target_start + target.len());
        Some(target_start + target.len())
    }
}

/// `'` at `at` has a letter or digit on both sides.
fn is_word_apostrophe(text: &str, at: usize) -> bool {
    let before = text[..at].chars().next_back();
    let after = text[at + 1..].chars().next();
    matches!((before, after), (Some(b), Some(a)) if b.is_alphanumeric() && a.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::ListMarker;

    /// Helper: kinds paired with their source text.
    fn tokens(input: &str) -> Vec<(TokenKind, &str)> {
        lex(input)
            .into_iter()
            .map(|t| (t.kind, t.span.slice(input)))
            .collect()
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokens(""), vec![(TokenKind::Eof, "")]);
    }

    #[test]
    fn single_word() {
        assert_eq!(
            tokens("hello"),
            vec![(TokenKind::Text, "hello"), (TokenKind::Eof, "")]
        );
    }

    #[test]
    fn crlf_is_one_line_feed() {
        assert_eq!(
            tokens("a\r\nb"),
            vec![
                (TokenKind::Text, "a"),
                (TokenKind::LineFeed, "\r\n"),
                (TokenKind::Text, "b"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn heading_and_paragraph() {
        assert_eq!(
            tokens("= doc\n\npream\n"),
            vec![
                (TokenKind::Heading { level: 1 }, "= "),
                (TokenKind::Text, "doc"),
                (TokenKind::LineFeed, "\n"),
                (TokenKind::LineFeed, "\n"),
                (TokenKind::Text, "pream"),
                (TokenKind::LineFeed, "\n"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn document_attribute_value_is_one_text() {
        let toks = tokens(":b: c d  \n");
        assert!(matches!(toks[0].0, TokenKind::DocAttr { unset: false, .. }));
        assert_eq!(toks[0].1, ":b: ");
        assert_eq!(toks[1], (TokenKind::Text, "c d"));
        assert_eq!(toks[2].0, TokenKind::LineFeed);
    }

    #[test]
    fn marks_are_candidates_everywhere() {
        assert_eq!(
            kinds("a*b_c`"),
            vec![
                TokenKind::Text,
                TokenKind::Mark(Mark::Strong),
                TokenKind::Text,
                TokenKind::Mark(Mark::Emphasis),
                TokenKind::Text,
                TokenKind::Mark(Mark::Monospace),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn apostrophe_between_word_characters() {
        assert_eq!(
            tokens("it's 'a'"),
            vec![
                (TokenKind::Text, "it"),
                (TokenKind::Apostrophe, "'"),
                (TokenKind::Text, "s 'a'"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn inline_macro_with_attributes() {
        assert_eq!(
            tokens("x i:b[c `d` e] y"),
            vec![
                (TokenKind::Text, "x "),
                (TokenKind::InlineMacro, "i:"),
                (TokenKind::Text, "b"),
                (TokenKind::AttrListStart, "["),
                (TokenKind::AttrValueStart, "c `d` e"),
                (TokenKind::Text, "c "),
                (TokenKind::Mark(Mark::Monospace), "`"),
                (TokenKind::Text, "d"),
                (TokenKind::Mark(Mark::Monospace), "`"),
                (TokenKind::Text, " e"),
                (TokenKind::AttrValueEnd, ""),
                (TokenKind::AttrListEnd, "]"),
                (TokenKind::Text, " y"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn named_and_empty_entries() {
        assert_eq!(
            tokens("[,java,x=y]"),
            vec![
                (TokenKind::AttrListStart, "["),
                (TokenKind::Separator, ","),
                (TokenKind::AttrValueStart, "java"),
                (TokenKind::Text, "java"),
                (TokenKind::AttrValueEnd, ""),
                (TokenKind::Separator, ","),
                (TokenKind::AttrName, "x="),
                (TokenKind::AttrValueStart, "y"),
                (TokenKind::Text, "y"),
                (TokenKind::AttrValueEnd, ""),
                (TokenKind::AttrListEnd, "]"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn macro_with_blank_in_target_is_text() {
        assert_eq!(
            tokens("i:b c[d]"),
            vec![(TokenKind::Text, "i:b c[d]"), (TokenKind::Eof, "")]
        );
    }

    #[test]
    fn unclosed_macro_list_is_rescanned_as_text() {
        assert_eq!(
            kinds("i:b[c *d*"),
            vec![
                TokenKind::Text,
                TokenKind::Mark(Mark::Strong),
                TokenKind::Text,
                TokenKind::Mark(Mark::Strong),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn bare_url_leaves_trailing_punctuation() {
        assert_eq!(
            tokens("see https://example.com."),
            vec![
                (TokenKind::Text, "see "),
                (TokenKind::InlineMacro, "https:"),
                (TokenKind::Text, "//example.com"),
                (TokenKind::Text, "."),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn bare_url_leaves_closing_mark() {
        assert_eq!(
            tokens("`https://x.org`"),
            vec![
                (TokenKind::Mark(Mark::Monospace), "`"),
                (TokenKind::InlineMacro, "https:"),
                (TokenKind::Text, "//x.org"),
                (TokenKind::Mark(Mark::Monospace), "`"),
                (TokenKind::Eof, ""),
            ]
        );
        assert_eq!(
            tokens("*https://x.org*."),
            vec![
                (TokenKind::Mark(Mark::Strong), "*"),
                (TokenKind::InlineMacro, "https:"),
                (TokenKind::Text, "//x.org"),
                (TokenKind::Mark(Mark::Strong), "*"),
                (TokenKind::Text, "."),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn listing_block_content_is_opaque() {
        assert_eq!(
            tokens("----\nfoo]\n= x\n----\n"),
            vec![
                (TokenKind::ListingDelimiter { dashes: 4 }, "----"),
                (TokenKind::LineFeed, "\n"),
                (TokenKind::Text, "foo]"),
                (TokenKind::LineFeed, "\n"),
                (TokenKind::Text, "= x"),
                (TokenKind::LineFeed, "\n"),
                (TokenKind::ListingDelimiter { dashes: 4 }, "----"),
                (TokenKind::LineFeed, "\n"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn listing_close_needs_same_dash_count() {
        let toks = kinds("-----\n----\n-----\n");
        assert_eq!(toks[0], TokenKind::ListingDelimiter { dashes: 5 });
        assert_eq!(toks[2], TokenKind::Text);
        assert_eq!(toks[4], TokenKind::ListingDelimiter { dashes: 5 });
    }

    #[test]
    fn list_item_and_indent() {
        assert_eq!(
            tokens("** a\n  b"),
            vec![
                (
                    TokenKind::ListItem {
                        marker: ListMarker::Asterisk,
                        depth: 2
                    },
                    "** "
                ),
                (TokenKind::Text, "a"),
                (TokenKind::LineFeed, "\n"),
                (TokenKind::Indent, "  "),
                (TokenKind::Text, "b"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn bracket_line_with_trailing_text_is_text() {
        assert_eq!(kinds("[a] b"), vec![TokenKind::Text, TokenKind::Eof]);
    }

    #[test]
    fn reuse_keeps_capacity() {
        let mut lexer = Lexer::with_capacity(4);
        let first = lexer.lex("a *b* c").len();
        let capacity = lexer.capacity();
        let second = lexer.lex("a *b* c").len();
        assert_eq!(first, second);
        assert_eq!(lexer.capacity(), capacity);
    }
}
