//! The push API: an [`EventProcessor`] receives one call per boundary while
//! the pull API is walked to exhaustion.

use crate::attributes::DocumentAttributes;
use crate::document::{BlockKind, Document, LinkText, MacroAttributes, Node, Text};
use crate::inline::TextRun;

/// Callbacks for a document walk. Every method defaults to doing nothing,
/// except [`link`](Self::link).
#[allow(unused_variables)]
pub trait EventProcessor {
    /// Before anything else, with the attributes of the whole document.
    fn document_start(&mut self, attributes: &DocumentAttributes) {}
    /// After everything else.
    fn document_end(&mut self) {}

    /// Content before the first section.
    fn preamble_start(&mut self) {}
    /// End of the preamble.
    fn preamble_end(&mut self) {}

    /// A document or section title; `level` is the number of `=`.
    fn heading_start(&mut self, level: u8) {}
    /// End of a title.
    fn heading_end(&mut self, level: u8) {}

    /// A section. `style` comes from the attribute list above its heading.
    fn section_start(&mut self, level: u8, style: Option<&str>) {}
    /// End of a section.
    fn section_end(&mut self, level: u8) {}

    /// A paragraph.
    fn paragraph_start(&mut self) {}
    /// End of a paragraph.
    fn paragraph_end(&mut self) {}

    /// Literal text. Never contains a line break.
    fn text(&mut self, text: &str) {}
    /// A line break inside a paragraph or a block.
    fn line_feed(&mut self) {}

    /// Strong text.
    fn bold_start(&mut self) {}
    /// End of strong text.
    fn bold_end(&mut self) {}
    /// Emphasized text.
    fn italic_start(&mut self) {}
    /// End of emphasized text.
    fn italic_end(&mut self) {}
    /// Monospace text.
    fn monospace_start(&mut self) {}
    /// End of monospace text.
    fn monospace_end(&mut self) {}

    /// A URL link. The default renders the link text, or the URL itself
    /// when there is no text.
    fn link(&mut self, href: &str, text: LinkText<'_>) {
        match text.text() {
            Some(text) => text.render(self),
            None => self.text(href),
        }
    }

    /// A named inline macro: `name:target[attributes]`.
    fn inline_macro(&mut self, name: &str, target: &str, attributes: MacroAttributes<'_>) {}

    /// A listing block, or a source block without a language.
    fn listing_block_start(&mut self) {}
    /// End of a listing block.
    fn listing_block_end(&mut self) {}
    /// A source block.
    fn source_code_block_start(&mut self, language: &str) {}
    /// End of a source block.
    fn source_code_block_end(&mut self) {}
    /// An indented literal paragraph.
    fn literal_block_start(&mut self) {}
    /// End of a literal paragraph.
    fn literal_block_end(&mut self) {}

    /// An unordered list.
    fn unordered_list_start(&mut self) {}
    /// End of an unordered list.
    fn unordered_list_end(&mut self) {}
    /// A list item.
    fn list_item_start(&mut self) {}
    /// End of a list item.
    fn list_item_end(&mut self) {}
}

impl Text<'_> {
    /// Resolve the text and push it to `processor`.
    pub fn render<P: EventProcessor + ?Sized>(&self, processor: &mut P) {
        self.with_runs(|runs, source| {
            for run in runs {
                match *run {
                    TextRun::Plain(span) => lines(span.slice(source), processor),
                    TextRun::CurvedApostrophe => processor.text("\u{2019}"),
                    TextRun::BoldStart => processor.bold_start(),
                    TextRun::BoldEnd => processor.bold_end(),
                    TextRun::ItalicStart => processor.italic_start(),
                    TextRun::ItalicEnd => processor.italic_end(),
                    TextRun::MonospaceStart => processor.monospace_start(),
                    TextRun::MonospaceEnd => processor.monospace_end(),
                }
            }
        });
    }
}

/// Push `text` as text events separated by `line_feed`s.
fn lines<P: EventProcessor + ?Sized>(text: &str, processor: &mut P) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            processor.line_feed();
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        if !line.is_empty() {
            processor.text(line);
        }
    }
}

/// Walk `document` and push every boundary to `processor`.
pub fn walk<P: EventProcessor + ?Sized>(document: Document<'_>, processor: &mut P) {
    processor.document_start(document.attributes());
    nodes(document, processor);
    processor.document_end();
}

fn nodes<'a, P: EventProcessor + ?Sized>(
    children: impl Iterator<Item = Node<'a>>,
    processor: &mut P,
) {
    let mut after_verbatim = false;
    for child in children {
        if let Node::Verbatim(text) = child {
            if after_verbatim {
                processor.line_feed();
            }
            lines(text, processor);
            after_verbatim = true;
            continue;
        }
        after_verbatim = false;
        node(child, processor);
    }
}

fn node<P: EventProcessor + ?Sized>(node: Node<'_>, processor: &mut P) {
    match node {
        Node::Heading(heading) => {
            processor.heading_start(heading.level);
            nodes(heading.nodes(), processor);
            processor.heading_end(heading.level);
        }
        Node::Preamble(preamble) => {
            processor.preamble_start();
            nodes(preamble.nodes(), processor);
            processor.preamble_end();
        }
        Node::Section(section) => {
            processor.section_start(section.level, section.style);
            nodes(section.nodes(), processor);
            processor.section_end(section.level);
        }
        Node::Paragraph(paragraph) => {
            processor.paragraph_start();
            nodes(paragraph.nodes(), processor);
            processor.paragraph_end();
        }
        Node::List(list) => {
            processor.unordered_list_start();
            nodes(list.nodes(), processor);
            processor.unordered_list_end();
        }
        Node::ListItem(item) => {
            processor.list_item_start();
            nodes(item.nodes(), processor);
            processor.list_item_end();
        }
        Node::Block(block) => match block.kind {
            BlockKind::Source {
                language: Some(language),
            } => {
                processor.source_code_block_start(language);
                nodes(block.nodes(), processor);
                processor.source_code_block_end();
            }
            BlockKind::Listing | BlockKind::Source { language: None } => {
                processor.listing_block_start();
                nodes(block.nodes(), processor);
                processor.listing_block_end();
            }
            BlockKind::Literal => {
                processor.literal_block_start();
                nodes(block.nodes(), processor);
                processor.literal_block_end();
            }
        },
        Node::Text(text) => text.render(processor),
        Node::Macro(m) => processor.inline_macro(m.name, m.target, m.attributes),
        Node::Link(link) => processor.link(link.href, link.text),
        Node::Verbatim(text) => lines(text, processor),
    }
}
