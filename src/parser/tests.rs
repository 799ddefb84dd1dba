use super::*;
use crate::diagnostic::Severity;
use crate::instruction::{BlockStyle, MacroKind};
use crate::lexer::Lexer;

/// Parse `source` and render the arena as one short string per record.
fn outline(source: &str) -> Vec<String> {
    let mut lexer = Lexer::new();
    let mut parser = Parser::new();
    let tokens = lexer.lex(source);
    let parsed = parser.parse(tokens);
    assert_balanced(parsed.instructions());

    let text = |first: usize, last: usize| {
        tokens.slice(SourceSpan::new(tokens[first].span.start, tokens[last - 1].span.end))
    };
    parsed
        .instructions()
        .iter()
        .map(|instruction| match *instruction {
            Instruction::DocumentStart { .. } => "doc".to_owned(),
            Instruction::DocumentEnd => "/doc".to_owned(),
            Instruction::PreambleStart { .. } => "preamble".to_owned(),
            Instruction::PreambleEnd => "/preamble".to_owned(),
            Instruction::HeadingStart { level, .. } => format!("h{level}"),
            Instruction::HeadingEnd { .. } => "/h".to_owned(),
            Instruction::SectionStart { level, style, .. } => match style {
                Some(style) => format!("sect{level}:{}", tokens.slice(style)),
                None => format!("sect{level}"),
            },
            Instruction::SectionEnd { level } => format!("/sect{level}"),
            Instruction::ParagraphStart { .. } => "p".to_owned(),
            Instruction::ParagraphEnd => "/p".to_owned(),
            Instruction::ListStart { marker, depth, .. } => format!("{marker:?}{depth}"),
            Instruction::ListEnd => "/list".to_owned(),
            Instruction::ItemStart { .. } => "li".to_owned(),
            Instruction::ItemEnd => "/li".to_owned(),
            Instruction::BlockStart { style, .. } => match style {
                BlockStyle::Listing => "listing".to_owned(),
                BlockStyle::Literal => "literal".to_owned(),
                BlockStyle::Source { language } => {
                    format!("source:{}", language.map_or("", |l| tokens.slice(l)))
                }
            },
            Instruction::BlockEnd => "/block".to_owned(),
            Instruction::TokenRange { first, last } => format!("{:?}", text(first, last)),
            Instruction::Verbatim(span) => format!("v{:?}", tokens.slice(span)),
            Instruction::InlineMacro { name, kind, .. } => match kind {
                MacroKind::Named => format!("macro:{}", tokens.slice(name)),
                MacroKind::Url => format!("url:{}", tokens.slice(name)),
            },
            Instruction::MacroTarget(span) => format!("target:{}", tokens.slice(span)),
            Instruction::PositionalAttr { index, first, last } => {
                format!("{index}={}", text(first, last))
            }
            Instruction::NamedAttr { name, first, last } => {
                format!("{}={}", tokens.slice(name), text(first, last))
            }
        })
        .collect()
}

/// Every START record points at the END that closes it.
fn assert_balanced(instructions: &[Instruction]) {
    let mut open = Vec::new();
    for (i, instruction) in instructions.iter().enumerate() {
        if instruction.is_start() {
            open.push(i);
        } else if instruction.is_end() {
            let start = open.pop().expect("END without START");
            assert_eq!(instructions[start].end(), Some(i), "START at {start}");
        }
    }
    assert!(open.is_empty(), "unclosed START records: {open:?}");
}

fn diagnostics(source: &str) -> Vec<(SourceSpan, String)> {
    let mut lexer = Lexer::new();
    let mut parser = Parser::new();
    let parsed = parser.parse(lexer.lex(source));
    parsed
        .diagnostics()
        .iter()
        .inspect(|d| assert_eq!(d.severity, Severity::Warning))
        .map(|d| (d.span, d.message.clone()))
        .collect()
}

#[test]
fn empty_document() {
    assert_eq!(outline(""), ["doc", "/doc"]);
    assert_eq!(outline("\n\n  \n"), ["doc", "/doc"]);
}

#[test]
fn section_levels_reduce() {
    let source = "== A\n\nb\n\n=== C\n\nd\n\n==== E\n\nf\n\n== G\n\nh\n";
    assert_eq!(
        outline(source),
        [
            "doc", "sect1", "h2", "\"A\"", "/h", "p", "\"b\"", "/p", //
            "sect2", "h3", "\"C\"", "/h", "p", "\"d\"", "/p", //
            "sect3", "h4", "\"E\"", "/h", "p", "\"f\"", "/p", //
            "/sect3", "/sect2", "/sect1", //
            "sect1", "h2", "\"G\"", "/h", "p", "\"h\"", "/p", "/sect1", "/doc",
        ]
    );
}

#[test]
fn header_attributes_are_not_instructions() {
    let source = "= a\n:b: c\n:d: e\n\nf\n";
    let mut lexer = Lexer::new();
    let mut parser = Parser::new();
    let parsed = parser.parse(lexer.lex(source));
    let attributes: Vec<(&str, &str)> = parsed.attributes().iter().collect();
    assert_eq!(attributes, [("b", "c"), ("d", "e")]);
    assert_eq!(
        outline(source),
        ["doc", "h1", "\"a\"", "/h", "preamble", "p", "\"f\"", "/p", "/preamble", "/doc"]
    );
}

#[test]
fn attribute_entries_in_body_update_the_store() {
    let (_, attributes) = {
        let source = ":a: 1\n\ntext\n\n:a: 2\n:b!:\n";
        let tokens = crate::lexer::lex(source);
        parse(Tokens::new(source, &tokens))
    };
    assert_eq!(attributes.get("a"), Some("2"));
    assert!(!attributes.contains("b"));
}

#[test]
fn preamble_before_first_section() {
    assert_eq!(
        outline("= T\n\nintro\n\n== S\n\nbody\n"),
        [
            "doc", "h1", "\"T\"", "/h", //
            "preamble", "p", "\"intro\"", "/p", "/preamble", //
            "sect1", "h2", "\"S\"", "/h", "p", "\"body\"", "/p", "/sect1", "/doc",
        ]
    );
}

#[test]
fn no_preamble_without_content() {
    assert_eq!(
        outline("= T\n\n== S\n"),
        ["doc", "h1", "\"T\"", "/h", "sect1", "h2", "\"S\"", "/h", "/sect1", "/doc"]
    );
}

#[test]
fn paragraph_spans_lines() {
    assert_eq!(
        outline("a\nb\n\nc\n"),
        ["doc", "preamble", "p", "\"a\\nb\"", "/p", "p", "\"c\"", "/p", "/preamble", "/doc"]
    );
}

#[test]
fn nested_lists() {
    assert_eq!(
        outline("* a\n** b\n* c\n"),
        [
            "doc", "preamble", //
            "Asterisk1", "li", "\"a\"", //
            "Asterisk2", "li", "\"b\"", "/li", "/list", "/li", //
            "li", "\"c\"", "/li", "/list", //
            "/preamble", "/doc",
        ]
    );
}

#[test]
fn blank_line_only_continues_a_known_marker() {
    assert_eq!(
        outline("* a\n\n* b\n\n- c\n"),
        [
            "doc", "preamble", //
            "Asterisk1", "li", "\"a\"", "/li", "li", "\"b\"", "/li", "/list", //
            "Hyphen1", "li", "\"c\"", "/li", "/list", //
            "/preamble", "/doc",
        ]
    );
}

#[test]
fn list_item_text_continues_lazily() {
    assert_eq!(
        outline("* a\nb\n"),
        ["doc", "preamble", "Asterisk1", "li", "\"a\\nb\"", "/li", "/list", "/preamble", "/doc"]
    );
}

#[test]
fn listing_block_is_opaque() {
    assert_eq!(
        outline("----\nfoo]\n----\n"),
        ["doc", "preamble", "listing", "v\"foo]\"", "/block", "/preamble", "/doc"]
    );
    assert_eq!(
        outline("----\n* a\n== b\n----\n"),
        ["doc", "preamble", "listing", "v\"* a\\n== b\"", "/block", "/preamble", "/doc"]
    );
}

#[test]
fn source_block_takes_attribute_list() {
    assert_eq!(
        outline("[source,rust]\n----\nfn main() {}\n----\n"),
        ["doc", "preamble", "source:rust", "v\"fn main() {}\"", "/block", "/preamble", "/doc"]
    );
}

#[test]
fn literal_block_strips_common_indent() {
    assert_eq!(
        outline("  a\n   b\n\nc\n"),
        [
            "doc", "preamble", "literal", "v\"a\"", "v\" b\"", "/block", //
            "p", "\"c\"", "/p", "/preamble", "/doc",
        ]
    );
}

#[test]
fn named_macro_with_attributes() {
    assert_eq!(
        outline("i:b[c, k=v]\n"),
        ["doc", "preamble", "p", "macro:i", "target:b", "1=c", "k=v", "/p", "/preamble", "/doc"]
    );
}

#[test]
fn url_link_text_is_the_whole_list() {
    assert_eq!(
        outline("see https://x.org[a, b] now\n"),
        [
            "doc", "preamble", "p", "\"see \"", //
            "url:https", "target://x.org", "1=a, b", "\" now\"", //
            "/p", "/preamble", "/doc",
        ]
    );
}

#[test]
fn bare_url_is_a_link() {
    assert_eq!(
        outline("at https://x.org.\n"),
        [
            "doc", "preamble", "p", "\"at \"", //
            "url:https", "target://x.org", "\".\"", //
            "/p", "/preamble", "/doc",
        ]
    );
}

#[test]
fn bare_named_macro_is_text() {
    assert_eq!(
        outline("see note:x here\n"),
        ["doc", "preamble", "p", "\"see note:x here\"", "/p", "/preamble", "/doc"]
    );
}

#[test]
fn macro_inside_monospace_is_text() {
    assert_eq!(
        outline("`a https://y.z b` c\n"),
        ["doc", "preamble", "p", "\"`a https://y.z b` c\"", "/p", "/preamble", "/doc"]
    );
}

#[test]
fn bare_url_inside_monospace_is_text() {
    assert_eq!(
        outline("`https://x.org`\n"),
        ["doc", "preamble", "p", "\"`https://x.org`\"", "/p", "/preamble", "/doc"]
    );
}

#[test]
fn bare_url_leaves_closing_strong_mark() {
    assert_eq!(
        outline("*https://x.org*\n"),
        [
            "doc", "preamble", "p", "\"*\"", //
            "url:https", "target://x.org", "\"*\"", //
            "/p", "/preamble", "/doc",
        ]
    );
}

#[test]
fn style_marks_do_not_pair_across_a_macro() {
    assert_eq!(
        outline("*see https://x.org[x] now*\n"),
        [
            "doc", "preamble", "p", "\"*see \"", //
            "url:https", "target://x.org", "1=x", "\" now*\"", //
            "/p", "/preamble", "/doc",
        ]
    );
}

#[test]
fn section_style_from_attribute_list() {
    assert_eq!(
        outline("[appendix]\n== A\n"),
        ["doc", "sect1:appendix", "h2", "\"A\"", "/h", "/sect1", "/doc"]
    );
}

#[test]
fn dangling_attribute_list_warns() {
    assert_eq!(outline("[foo]\n"), ["doc", "/doc"]);
    let found = diagnostics("[foo]\n");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].0, SourceSpan::new(0, 5));
}

#[test]
fn replaced_attribute_list_warns() {
    let source = "[a]\n[b]\n\n== S\n";
    assert_eq!(
        outline(source),
        ["doc", "sect1:b", "h2", "\"S\"", "/h", "/sect1", "/doc"]
    );
    let found = diagnostics(source);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].0, SourceSpan::new(0, 3));
}

#[test]
fn parser_reuse_gives_identical_output() {
    let source = "= T\n:x: y\n\n* a\n\n== S\n\n----\nz\n----\n";
    let mut lexer = Lexer::new();
    let mut parser = Parser::new();
    let tokens = lexer.lex(source).as_slice().to_vec();
    let view = Tokens::new(source, &tokens);
    let first = parser.parse(view).instructions().to_vec();
    parser.parse(Tokens::new("other\n", &crate::lexer::lex("other\n")));
    parser.reset();
    let second = parser.parse(view);
    assert_eq!(first, second.instructions());
    assert_eq!(second.attributes().get("x"), Some("y"));
}

#[test]
fn options_configure_url_schemes() {
    let options = Options {
        url_schemes: vec!["doc".to_owned()],
        ..Options::default()
    };
    let source = "doc://x https://y\n";
    let tokens = crate::lexer::lex(source);
    let mut parser = Parser::with_options(&options);
    let parsed = parser.parse(Tokens::new(source, &tokens));
    let kinds: Vec<MacroKind> = parsed
        .instructions()
        .iter()
        .filter_map(|i| match i {
            Instruction::InlineMacro { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, [MacroKind::Url]);
}
