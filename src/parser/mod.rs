//! Structural parser: token sequence → instruction arena.
//!
//! The parser walks the token sequence line by line and appends
//! [`Instruction`]s to a flat arena. Nesting is tracked with explicit stacks
//! (open START records, open section levels, open lists) instead of
//! recursion, and every START record is back-patched with the index of its
//! END when it closes.
//!
//! Document attribute entries are consumed into the [`DocumentAttributes`]
//! store and never appear in the arena.
//!
//! The parser never fails. Anything that does not match a structural rule is
//! folded into a paragraph, and the few recoverable oddities (an
//! unterminated listing block, a block attribute list that precedes nothing)
//! are recorded as [`ParseDiagnostic`]s.

mod delimited;
mod lists;
mod macros;
mod metadata;
mod paragraphs;
mod sections;

use smallvec::SmallVec;

use crate::attributes::DocumentAttributes;
use crate::diagnostic::ParseDiagnostic;
use crate::instruction::Instruction;
use crate::options::Options;
use crate::span::SourceSpan;
use crate::token::{ListMarker, TokenKind, Tokens};

use self::metadata::BlockAttrs;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// The output of one [`Parser::parse`] call, borrowed from the parser.
#[derive(Debug, Clone, Copy)]
pub struct Parsed<'a> {
    instructions: &'a [Instruction],
    attributes: &'a DocumentAttributes,
    diagnostics: &'a [ParseDiagnostic],
}

impl<'a> Parsed<'a> {
    /// The instruction arena.
    #[must_use]
    pub const fn instructions(&self) -> &'a [Instruction] {
        self.instructions
    }

    /// Document attributes after the whole document has been read.
    #[must_use]
    pub const fn attributes(&self) -> &'a DocumentAttributes {
        self.attributes
    }

    /// Diagnostics recorded while parsing.
    #[must_use]
    pub const fn diagnostics(&self) -> &'a [ParseDiagnostic] {
        self.diagnostics
    }
}

/// Parse a token sequence into an instruction arena and the document
/// attributes, with default [`Options`].
#[must_use]
pub fn parse(tokens: Tokens<'_>) -> (Vec<Instruction>, DocumentAttributes) {
    let mut parser = Parser::new();
    parser.run(tokens);
    (parser.instructions, parser.attributes)
}

/// A reusable structural parser.
///
/// All buffers (the arena, the attribute store, the diagnostics and the
/// internal stacks) are cleared at the start of every
/// [`parse`](Self::parse) call and keep their capacity.
#[derive(Debug)]
pub struct Parser {
    url_schemes: Vec<String>,
    seed: Vec<(String, String)>,

    instructions: Vec<Instruction>,
    attributes: DocumentAttributes,
    diagnostics: Vec<ParseDiagnostic>,

    /// Arena indices of the START records still waiting for their END.
    open: Vec<usize>,
    /// Levels of the open sections, outermost first.
    sections: SmallVec<[u8; 8]>,
    /// Open lists, outermost first.
    lists: SmallVec<[(ListMarker, u8); 8]>,
    preamble: Preamble,
    /// Block attribute list waiting for the block it applies to.
    pending: Option<BlockAttrs>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Preamble {
    /// No section and no content yet.
    Pending,
    Open,
    /// A section has started; no preamble from here on.
    Done,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// A parser with default [`Options`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(&Options::default())
    }

    /// A parser configured from `options`.
    #[must_use]
    pub fn with_options(options: &Options) -> Self {
        Self {
            url_schemes: options.url_schemes.clone(),
            seed: options
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            instructions: Vec::new(),
            attributes: DocumentAttributes::new(),
            diagnostics: Vec::new(),
            open: Vec::new(),
            sections: SmallVec::new(),
            lists: SmallVec::new(),
            preamble: Preamble::Pending,
            pending: None,
        }
    }

    /// Parse `tokens`, replacing the output of the previous call.
    pub fn parse(&mut self, tokens: Tokens<'_>) -> Parsed<'_> {
        self.run(tokens);
        tracing::debug!(
            instructions = self.instructions.len(),
            attributes = self.attributes.len(),
            diagnostics = self.diagnostics.len(),
            "parsed"
        );
        Parsed {
            instructions: &self.instructions,
            attributes: &self.attributes,
            diagnostics: &self.diagnostics,
        }
    }

    /// Clear every buffer, keeping capacity.
    pub fn reset(&mut self) {
        self.instructions.clear();
        self.attributes.clear();
        self.diagnostics.clear();
        self.open.clear();
        self.sections.clear();
        self.lists.clear();
        self.preamble = Preamble::Pending;
        self.pending = None;
    }

    fn run(&mut self, tokens: Tokens<'_>) {
        self.reset();
        for (key, value) in &self.seed {
            self.attributes.insert(key.as_str(), value.as_str());
        }

        self.start(Instruction::DocumentStart { end: 0 });
        let mut pos = self.header(tokens, skip_blank_lines(tokens, 0));
        loop {
            pos = skip_blank_lines(tokens, pos);
            if matches!(tokens.kind(pos), TokenKind::Eof) {
                break;
            }
            pos = self.block(tokens, pos);
        }
        self.finish_document();
    }

    /// Parse the block starting at line start `pos`; returns the start of
    /// the line after it.
    fn block(&mut self, tokens: Tokens<'_>, pos: usize) -> usize {
        match tokens.kind(pos) {
            TokenKind::DocAttr { name, unset } => self.doc_attr(tokens, pos, name, unset),
            TokenKind::AttrListStart => self.block_attributes(tokens, pos),
            TokenKind::Heading { level } => self.section(tokens, pos, level),
            TokenKind::ListingDelimiter { dashes } => self.listing(tokens, pos, dashes),
            TokenKind::ListItem { .. } => self.list(tokens, pos),
            TokenKind::Indent => self.literal(tokens, pos),
            _ => self.paragraph(tokens, pos),
        }
    }

    fn doc_attr(&mut self, tokens: Tokens<'_>, pos: usize, name: SourceSpan, unset: bool) -> usize {
        let end = line_end(tokens, pos);
        let key = tokens.slice(name);
        if unset {
            self.attributes.remove(key);
        } else {
            let value = if pos + 1 < end { tokens.text(pos + 1) } else { "" };
            self.attributes.insert(key, value);
        }
        tracing::trace!(key, unset, "document attribute");
        next_line(tokens, end)
    }

    fn finish_document(&mut self) {
        self.close_preamble();
        while let Some(level) = self.sections.pop() {
            self.finish(Instruction::SectionEnd { level });
        }
        if let Some(attrs) = self.pending.take() {
            self.warn(attrs.span, "block attribute list does not precede a block");
        }
        self.finish(Instruction::DocumentEnd);
    }

    // -----------------------------------------------------------------------
    // Arena helpers (shared with sub-modules)
    // -----------------------------------------------------------------------

    fn start(&mut self, instruction: Instruction) {
        self.open.push(self.instructions.len());
        self.instructions.push(instruction);
    }

    fn finish(&mut self, instruction: Instruction) {
        let end = self.instructions.len();
        if let Some(start) = self.open.pop() {
            self.instructions[start].set_end(end);
        }
        self.instructions.push(instruction);
    }

    fn range(&mut self, first: usize, last: usize) {
        if first < last {
            self.instructions
                .push(Instruction::TokenRange { first, last });
        }
    }

    /// Called before any block that produces content: opens the preamble
    /// when no section has started yet.
    fn content(&mut self) {
        if self.preamble == Preamble::Pending {
            self.start(Instruction::PreambleStart { end: 0 });
            self.preamble = Preamble::Open;
        }
    }

    fn close_preamble(&mut self) {
        if self.preamble == Preamble::Open {
            self.finish(Instruction::PreambleEnd);
        }
        self.preamble = Preamble::Done;
    }

    fn warn(&mut self, span: SourceSpan, message: &str) {
        tracing::warn!(%span, "{message}");
        self.diagnostics.push(ParseDiagnostic::warning(span, message));
    }

    fn is_url_scheme(&self, name: &str) -> bool {
        self.url_schemes.iter().any(|s| s == name)
    }
}

// ---------------------------------------------------------------------------
// Line helpers (shared with sub-modules)
// ---------------------------------------------------------------------------

/// Index of the `LineFeed` or `Eof` that ends the line containing `pos`.
fn line_end(tokens: Tokens<'_>, pos: usize) -> usize {
    let mut i = pos;
    while i < tokens.len() && !matches!(tokens.kind(i), TokenKind::LineFeed | TokenKind::Eof) {
        i += 1;
    }
    i
}

/// Start of the line after the terminator at `end`.
fn next_line(tokens: Tokens<'_>, end: usize) -> usize {
    if matches!(tokens.kind(end), TokenKind::LineFeed) {
        end + 1
    } else {
        end
    }
}

fn skip_blank_lines(tokens: Tokens<'_>, mut pos: usize) -> usize {
    while matches!(tokens.kind(pos), TokenKind::LineFeed) {
        pos += 1;
    }
    pos
}

/// Whether a line starting with `kind` continues a paragraph or list item.
fn continues_text(kind: TokenKind) -> bool {
    !matches!(
        kind,
        TokenKind::LineFeed
            | TokenKind::Eof
            | TokenKind::Heading { .. }
            | TokenKind::ListItem { .. }
            | TokenKind::ListingDelimiter { .. }
            | TokenKind::AttrListStart
    )
}

#[cfg(test)]
mod tests;
