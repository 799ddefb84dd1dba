#![doc = include_str!("../README.md")]
#![deny(missing_docs, unsafe_code)]

pub mod attributes;
pub mod diagnostic;
pub mod document;
pub mod inline;
pub mod instruction;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod processor;
pub mod span;
pub mod token;

use std::cell::RefCell;

pub use attributes::DocumentAttributes;
pub use diagnostic::{ParseDiagnostic, Severity};
pub use document::{Document, Node};
pub use inline::{InlineResolver, TextRun, resolve};
pub use instruction::Instruction;
pub use lexer::{Lexer, lex};
pub use options::Options;
pub use parser::{Parsed, Parser, parse};
pub use processor::EventProcessor;
pub use span::{SourceIndex, SourceSpan};
pub use token::{Token, TokenKind, Tokens};

/// A reusable pipeline: lexer, parser and inline resolver.
///
/// ```
/// use asciipass::{AsciiDoc, Node};
///
/// let mut asciidoc = AsciiDoc::new();
/// let document = asciidoc.open_document("= Title\n:lang: en\n\nbody\n");
/// assert_eq!(document.attributes().get("lang"), Some("en"));
/// assert!(matches!(document.into_iter().next(), Some(Node::Heading(_))));
/// ```
#[derive(Debug)]
pub struct AsciiDoc {
    options: Options,
    lexer: Lexer,
    parser: Parser,
    resolver: RefCell<InlineResolver>,
}

impl Default for AsciiDoc {
    fn default() -> Self {
        Self::new()
    }
}

impl AsciiDoc {
    /// A pipeline with default [`Options`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// A pipeline configured from `options`.
    #[must_use]
    pub fn with_options(options: Options) -> Self {
        Self {
            lexer: Lexer::with_capacity(options.initial_capacity),
            parser: Parser::with_options(&options),
            resolver: RefCell::new(InlineResolver::with_typographic_quotes(
                options.typographic_quotes,
            )),
            options,
        }
    }

    /// The options this pipeline was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Lex and parse `source`. Inline content is resolved lazily while the
    /// returned document is walked.
    pub fn open_document<'a>(&'a mut self, source: &'a str) -> Document<'a> {
        self.resolver.get_mut().reset();
        let tokens = self.lexer.lex(source);
        let parsed = self.parser.parse(tokens);
        Document::new(tokens, parsed, &self.resolver, self.options.typographic_quotes)
    }

    /// Walk `source` and push every event to `processor`.
    pub fn process<P: EventProcessor + ?Sized>(&mut self, source: &str, processor: &mut P) {
        processor::walk(self.open_document(source), processor);
    }

    /// Clear every stage's buffers, keeping their capacity.
    pub fn reset(&mut self) {
        self.lexer.reset();
        self.parser.reset();
        self.resolver.get_mut().reset();
    }
}

/// Process `source` with a fresh pipeline and default [`Options`].
pub fn process<P: EventProcessor + ?Sized>(source: &str, processor: &mut P) {
    AsciiDoc::new().process(source, processor);
}
