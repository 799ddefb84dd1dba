//! The pull API: a lazy, forward-only walk over the instruction arena.
//!
//! [`Document`] iterates over the top-level [`Node`]s. Composite nodes hand
//! out a [`Children`] iterator over their own children; text nodes resolve
//! their inline runs only when asked. Nothing is materialized up front: a
//! node is a few indices into the arena, and skipping a subtree is a jump to
//! the START record's `end`.

use std::cell::RefCell;

use crate::attributes::DocumentAttributes;
use crate::diagnostic::ParseDiagnostic;
use crate::inline::{InlineResolver, TextRun};
use crate::instruction::{BlockStyle, Instruction, MacroKind};
use crate::parser::Parsed;
use crate::span::SourceSpan;
use crate::token::{ListMarker, Tokens};

/// Shared, read-only view of one parsed document.
#[derive(Clone, Copy)]
struct Context<'a> {
    tokens: Tokens<'a>,
    instructions: &'a [Instruction],
    attributes: &'a DocumentAttributes,
    resolver: &'a RefCell<InlineResolver>,
    typographic_quotes: bool,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("tokens", &self.tokens.len())
            .field("instructions", &self.instructions.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A parsed document, iterated as its top-level nodes: the title
/// [`Node::Heading`], the [`Node::Preamble`] and the [`Node::Section`]s.
#[derive(Debug)]
pub struct Document<'a> {
    cx: Context<'a>,
    diagnostics: &'a [ParseDiagnostic],
    children: Children<'a>,
}

impl<'a> Document<'a> {
    pub(crate) fn new(
        tokens: Tokens<'a>,
        parsed: Parsed<'a>,
        resolver: &'a RefCell<InlineResolver>,
        typographic_quotes: bool,
    ) -> Self {
        let instructions = parsed.instructions();
        let cx = Context {
            tokens,
            instructions,
            attributes: parsed.attributes(),
            resolver,
            typographic_quotes,
        };
        // Children of the DocumentStart record.
        let end = instructions
            .first()
            .and_then(Instruction::end)
            .unwrap_or(0);
        Self {
            cx,
            diagnostics: parsed.diagnostics(),
            children: Children {
                cx,
                pos: 1.min(end),
                end,
            },
        }
    }

    /// The document attributes.
    #[must_use]
    pub fn attributes(&self) -> &'a DocumentAttributes {
        self.cx.attributes
    }

    /// Diagnostics recorded while parsing.
    #[must_use]
    pub fn diagnostics(&self) -> &'a [ParseDiagnostic] {
        self.diagnostics
    }

    /// The source text.
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.cx.tokens.source()
    }

    /// The underlying instruction arena.
    #[must_use]
    pub fn instructions(&self) -> &'a [Instruction] {
        self.cx.instructions
    }
}

impl<'a> Iterator for Document<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Node<'a>> {
        self.children.next()
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// One node of the document.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// Document title or section title.
    Heading(Heading<'a>),
    /// Content before the first section.
    Preamble(Container<'a>),
    /// A section: its heading followed by its blocks and subsections.
    Section(Section<'a>),
    /// A paragraph.
    Paragraph(Container<'a>),
    /// An unordered list; its children are [`Node::ListItem`]s.
    List(List<'a>),
    /// A list item: text, inline macros and nested lists.
    ListItem(Container<'a>),
    /// A listing, source or literal block; its children are
    /// [`Node::Verbatim`]s.
    Block(Block<'a>),
    /// Inline text, resolved on demand.
    Text(Text<'a>),
    /// An inline macro.
    Macro(Macro<'a>),
    /// A URL link.
    Link(Link<'a>),
    /// Literal text.
    Verbatim(&'a str),
}

/// A node with children.
#[derive(Debug, Clone, Copy)]
pub struct Container<'a> {
    cx: Context<'a>,
    /// First child index.
    first: usize,
    /// Index of the END record.
    end: usize,
}

impl<'a> Container<'a> {
    /// Iterate over the children.
    #[must_use]
    pub fn nodes(&self) -> Children<'a> {
        Children {
            cx: self.cx,
            pos: self.first,
            end: self.end,
        }
    }
}

/// A heading.
#[derive(Debug, Clone, Copy)]
pub struct Heading<'a> {
    /// Number of `=` in the marker.
    pub level: u8,
    content: Container<'a>,
}

impl<'a> Heading<'a> {
    /// The title content.
    #[must_use]
    pub fn nodes(&self) -> Children<'a> {
        self.content.nodes()
    }
}

/// A section.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    /// Section level (`==` is level 1).
    pub level: u8,
    /// Style from the attribute list above the heading.
    pub style: Option<&'a str>,
    content: Container<'a>,
}

impl<'a> Section<'a> {
    /// The heading and the section body.
    #[must_use]
    pub fn nodes(&self) -> Children<'a> {
        self.content.nodes()
    }
}

/// An unordered list.
#[derive(Debug, Clone, Copy)]
pub struct List<'a> {
    /// Marker character of the items.
    pub marker: ListMarker,
    /// Marker depth.
    pub depth: u8,
    content: Container<'a>,
}

impl<'a> List<'a> {
    /// The list items.
    #[must_use]
    pub fn nodes(&self) -> Children<'a> {
        self.content.nodes()
    }
}

/// What kind of block a [`Block`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind<'a> {
    /// A listing block.
    Listing,
    /// A source block. The language comes from the block's attribute list
    /// or, failing that, the `source-language` document attribute.
    Source {
        /// The language, if known.
        language: Option<&'a str>,
    },
    /// A literal paragraph.
    Literal,
}

/// A listing, source or literal block.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    /// Block kind.
    pub kind: BlockKind<'a>,
    content: Container<'a>,
}

impl<'a> Block<'a> {
    /// The verbatim lines.
    #[must_use]
    pub fn nodes(&self) -> Children<'a> {
        self.content.nodes()
    }
}

/// A range of inline tokens.
#[derive(Debug, Clone, Copy)]
pub struct Text<'a> {
    cx: Context<'a>,
    first: usize,
    last: usize,
}

impl<'a> Text<'a> {
    /// The raw source covered by the range.
    #[must_use]
    pub fn source(&self) -> &'a str {
        let tokens = self.cx.tokens;
        match (tokens.get(self.first), self.last.checked_sub(1).and_then(|i| tokens.get(i))) {
            (Some(first), Some(last)) if self.first < self.last => {
                tokens.slice(SourceSpan::new(first.span.start, last.span.end))
            }
            _ => "",
        }
    }

    /// Resolve the range and pass the runs to `f`, together with the source
    /// the runs point into.
    ///
    /// Uses the document's resolver; when that one is busy (a nested call
    /// from inside `f`), a temporary resolver is used instead.
    pub fn with_runs<R>(&self, f: impl FnOnce(&[TextRun], &'a str) -> R) -> R {
        let source = self.cx.tokens.source();
        if let Ok(mut resolver) = self.cx.resolver.try_borrow_mut() {
            let runs = resolver.resolve(self.cx.tokens, self.first, self.last);
            f(runs, source)
        } else {
            let mut resolver = InlineResolver::with_typographic_quotes(self.cx.typographic_quotes);
            let runs = resolver.resolve(self.cx.tokens, self.first, self.last);
            f(runs, source)
        }
    }

    /// The resolved runs.
    #[must_use]
    pub fn runs(&self) -> Vec<TextRun> {
        self.with_runs(|runs, _| runs.to_vec())
    }
}

/// An inline macro: `name:target[attributes]`.
#[derive(Debug, Clone, Copy)]
pub struct Macro<'a> {
    /// The macro name.
    pub name: &'a str,
    /// The macro target.
    pub target: &'a str,
    /// The attribute list.
    pub attributes: MacroAttributes<'a>,
}

/// A URL link: `https://host[text]` or bare `https://host`.
#[derive(Debug, Clone, Copy)]
pub struct Link<'a> {
    /// The full URL, scheme included.
    pub href: &'a str,
    /// The link text; empty for bare URLs.
    pub text: LinkText<'a>,
}

/// The text of a [`Link`].
#[derive(Debug, Clone, Copy)]
pub struct LinkText<'a> {
    text: Option<Text<'a>>,
}

impl<'a> LinkText<'a> {
    /// Returns `true` when the link has no text of its own.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
    }

    /// The text, if any.
    #[must_use]
    pub fn text(&self) -> Option<Text<'a>> {
        self.text
    }
}

/// The attributes of an inline [`Macro`].
#[derive(Debug, Clone, Copy)]
pub struct MacroAttributes<'a> {
    cx: Context<'a>,
    /// Index of the first attribute record.
    first: usize,
    count: usize,
}

/// One macro attribute.
#[derive(Debug, Clone, Copy)]
pub struct MacroAttribute<'a> {
    /// `None` for positional attributes.
    pub name: Option<&'a str>,
    /// 1-based position for positional attributes, `0` for named ones.
    pub index: usize,
    /// The value.
    pub value: Text<'a>,
}

impl<'a> MacroAttributes<'a> {
    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` when the attribute list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterate over the attributes in source order.
    pub fn iter(&self) -> impl Iterator<Item = MacroAttribute<'a>> + use<'a> {
        let cx = self.cx;
        let records = cx
            .instructions
            .get(self.first..self.first + self.count)
            .unwrap_or_default();
        records.iter().filter_map(move |record| match *record {
            Instruction::PositionalAttr { index, first, last } => Some(MacroAttribute {
                name: None,
                index,
                value: Text { cx, first, last },
            }),
            Instruction::NamedAttr { name, first, last } => Some(MacroAttribute {
                name: Some(cx.tokens.slice(name)),
                index: 0,
                value: Text { cx, first, last },
            }),
            _ => None,
        })
    }

    /// Look an attribute up: `"1"`, `"2"`, ... select positional
    /// attributes, anything else a named one.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Text<'a>> {
        let found = match key.parse::<usize>() {
            Ok(index) => self
                .iter()
                .find(|a| a.name.is_none() && a.index == index),
            Err(_) => self.iter().find(|a| a.name == Some(key)),
        };
        found.map(|a| a.value)
    }
}

// ---------------------------------------------------------------------------
// Children
// ---------------------------------------------------------------------------

/// Forward-only iterator over the children of a node.
#[derive(Debug)]
pub struct Children<'a> {
    cx: Context<'a>,
    pos: usize,
    end: usize,
}

impl<'a> Iterator for Children<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Node<'a>> {
        while self.pos < self.end {
            let at = self.pos;
            let record = *self.cx.instructions.get(at)?;
            if let Some(end) = record.end() {
                self.pos = end + 1;
                let content = Container {
                    cx: self.cx,
                    first: at + 1,
                    end,
                };
                if let Some(node) = self.composite(record, content) {
                    return Some(node);
                }
                continue;
            }
            self.pos += 1;
            match record {
                Instruction::TokenRange { first, last } => {
                    return Some(Node::Text(Text {
                        cx: self.cx,
                        first,
                        last,
                    }));
                }
                Instruction::Verbatim(span) => {
                    return Some(Node::Verbatim(self.cx.tokens.slice(span)));
                }
                Instruction::InlineMacro {
                    name,
                    kind,
                    attributes,
                } => {
                    self.pos += 1 + attributes;
                    return Some(self.inline_macro(at, name, kind, attributes));
                }
                // Stray records are skipped.
                _ => {}
            }
        }
        None
    }
}

impl<'a> Children<'a> {
    fn composite(&self, record: Instruction, content: Container<'a>) -> Option<Node<'a>> {
        let node = match record {
            Instruction::HeadingStart { level, .. } => Node::Heading(Heading { level, content }),
            Instruction::PreambleStart { .. } => Node::Preamble(content),
            Instruction::SectionStart { level, style, .. } => Node::Section(Section {
                level,
                style: style.map(|s| self.cx.tokens.slice(s)),
                content,
            }),
            Instruction::ParagraphStart { .. } => Node::Paragraph(content),
            Instruction::ListStart { marker, depth, .. } => Node::List(List {
                marker,
                depth,
                content,
            }),
            Instruction::ItemStart { .. } => Node::ListItem(content),
            Instruction::BlockStart { style, .. } => Node::Block(Block {
                kind: self.block_kind(style),
                content,
            }),
            _ => return None,
        };
        Some(node)
    }

    fn block_kind(&self, style: BlockStyle) -> BlockKind<'a> {
        match style {
            BlockStyle::Listing => BlockKind::Listing,
            BlockStyle::Source { language } => BlockKind::Source {
                language: language
                    .map(|l| self.cx.tokens.slice(l))
                    .or_else(|| self.cx.attributes.get("source-language")),
            },
            BlockStyle::Literal => BlockKind::Literal,
        }
    }

    fn inline_macro(&self, at: usize, name: SourceSpan, kind: MacroKind, count: usize) -> Node<'a> {
        let cx = self.cx;
        let target = match cx.instructions.get(at + 1) {
            Some(Instruction::MacroTarget(span)) => *span,
            _ => SourceSpan::empty(name.end),
        };
        let attributes = MacroAttributes {
            cx,
            first: at + 2,
            count,
        };
        match kind {
            MacroKind::Named => Node::Macro(Macro {
                name: cx.tokens.slice(name),
                target: cx.tokens.slice(target),
                attributes,
            }),
            MacroKind::Url => Node::Link(Link {
                // The scheme, the colon and the target are contiguous.
                href: cx.tokens.slice(SourceSpan::new(name.start, target.end)),
                text: LinkText {
                    text: attributes.get("1"),
                },
            }),
        }
    }
}
