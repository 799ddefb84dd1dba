//! End-to-end tests: documents rendered to a small HTML dialect through the
//! push API.

use asciipass::document::{LinkText, MacroAttributes};
use asciipass::{AsciiDoc, DocumentAttributes, EventProcessor, Options};

/// Renders events to HTML and keeps a copy of the document attributes.
#[derive(Default)]
struct Html {
    out: String,
    attributes: Vec<(String, String)>,
}

impl EventProcessor for Html {
    fn document_start(&mut self, attributes: &DocumentAttributes) {
        self.attributes = attributes
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
    }

    fn preamble_start(&mut self) {
        self.out.push_str("<div id=\"preamble\">\n");
    }

    fn preamble_end(&mut self) {
        self.out.push_str("</div>\n");
    }

    fn heading_start(&mut self, level: u8) {
        self.out.push_str(&format!("<h{level}>"));
    }

    fn heading_end(&mut self, level: u8) {
        self.out.push_str(&format!("</h{level}>\n"));
    }

    fn section_start(&mut self, level: u8, style: Option<&str>) {
        match style {
            Some(style) => self
                .out
                .push_str(&format!("<div class=\"sect{level} {style}\">\n")),
            None => self.out.push_str(&format!("<div class=\"sect{level}\">\n")),
        }
    }

    fn section_end(&mut self, _level: u8) {
        self.out.push_str("</div>\n");
    }

    fn paragraph_start(&mut self) {
        self.out.push_str("<p>");
    }

    fn paragraph_end(&mut self) {
        self.out.push_str("</p>\n");
    }

    fn text(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '&' => self.out.push_str("&amp;"),
                '<' => self.out.push_str("&lt;"),
                '>' => self.out.push_str("&gt;"),
                c => self.out.push(c),
            }
        }
    }

    fn line_feed(&mut self) {
        self.out.push('\n');
    }

    fn bold_start(&mut self) {
        self.out.push_str("<strong>");
    }

    fn bold_end(&mut self) {
        self.out.push_str("</strong>");
    }

    fn italic_start(&mut self) {
        self.out.push_str("<em>");
    }

    fn italic_end(&mut self) {
        self.out.push_str("</em>");
    }

    fn monospace_start(&mut self) {
        self.out.push_str("<code>");
    }

    fn monospace_end(&mut self) {
        self.out.push_str("</code>");
    }

    fn link(&mut self, href: &str, text: LinkText<'_>) {
        self.out.push_str(&format!("<a href=\"{href}\">"));
        match text.text() {
            Some(text) => text.render(self),
            None => self.text(href),
        }
        self.out.push_str("</a>");
    }

    fn inline_macro(&mut self, name: &str, target: &str, attributes: MacroAttributes<'_>) {
        match name {
            "i" => {
                self.out.push_str(&format!("<a href=\"{target}\">"));
                if let Some(text) = attributes.get("1") {
                    text.render(self);
                }
                self.out.push_str("</a>");
            }
            _ => self
                .out
                .push_str(&format!("<span class=\"{name}\">{target}</span>")),
        }
    }

    fn listing_block_start(&mut self) {
        self.out.push_str("<pre>");
    }

    fn listing_block_end(&mut self) {
        self.out.push_str("</pre>\n");
    }

    fn source_code_block_start(&mut self, language: &str) {
        self.out.push_str(&format!(
            "<pre class=\"highlight\"><code class=\"language-{language}\">"
        ));
    }

    fn source_code_block_end(&mut self) {
        self.out.push_str("</code></pre>\n");
    }

    fn literal_block_start(&mut self) {
        self.out.push_str("<pre class=\"literal\">");
    }

    fn literal_block_end(&mut self) {
        self.out.push_str("</pre>\n");
    }

    fn unordered_list_start(&mut self) {
        self.out.push_str("<ul>\n");
    }

    fn unordered_list_end(&mut self) {
        self.out.push_str("</ul>\n");
    }

    fn list_item_start(&mut self) {
        self.out.push_str("<li>");
    }

    fn list_item_end(&mut self) {
        self.out.push_str("</li>\n");
    }
}

fn html(source: &str) -> String {
    let mut html = Html::default();
    asciipass::process(source, &mut html);
    html.out
}

fn preamble(inner: &str) -> String {
    format!("<div id=\"preamble\">\n{inner}</div>\n")
}

#[test]
fn section_levels_reduce() {
    let source = "== A\n\nb\n\n=== C\n\nd\n\n==== E\n\nf\n\n== G\n\nh\n";
    assert_eq!(
        html(source),
        concat!(
            "<div class=\"sect1\">\n<h2>A</h2>\n<p>b</p>\n",
            "<div class=\"sect2\">\n<h3>C</h3>\n<p>d</p>\n",
            "<div class=\"sect3\">\n<h4>E</h4>\n<p>f</p>\n",
            "</div>\n</div>\n</div>\n",
            "<div class=\"sect1\">\n<h2>G</h2>\n<p>h</p>\n</div>\n",
        )
    );
}

#[test]
fn document_attributes() {
    let mut html = Html::default();
    asciipass::process("= a\n:b: c\n:d: e\n\nf\n", &mut html);
    assert_eq!(
        html.attributes,
        [("b".to_owned(), "c".to_owned()), ("d".to_owned(), "e".to_owned())]
    );
    assert_eq!(html.out, format!("<h1>a</h1>\n{}", preamble("<p>f</p>\n")));
}

#[test]
fn constrained_emphasis() {
    assert_eq!(html("a '_' b"), preamble("<p>a '_' b</p>\n"));
    assert_eq!(
        html("*a* *b*, *c*"),
        preamble("<p><strong>a</strong> <strong>b</strong>, <strong>c</strong></p>\n")
    );
    assert_eq!(
        html("_a *b* c_ and `d`"),
        preamble("<p><em>a <strong>b</strong> c</em> and <code>d</code></p>\n")
    );
}

#[test]
fn styles_nest_inside_emphasis() {
    assert_eq!(
        html("_`a`_ _*b*_"),
        preamble("<p><em><code>a</code></em> <em><strong>b</strong></em></p>\n")
    );
}

#[test]
fn bare_url_inside_monospace_is_code() {
    assert_eq!(html("`https://x.org`\n"), preamble("<p><code>https://x.org</code></p>\n"));
    assert_eq!(
        html("*https://x.org*\n"),
        preamble("<p>*<a href=\"https://x.org\">https://x.org</a>*</p>\n")
    );
}

#[test]
fn macro_with_embedded_monospace() {
    assert_eq!(
        html("i:b[c `d` e]"),
        preamble("<p><a href=\"b\">c <code>d</code> e</a></p>\n")
    );
}

#[test]
fn listing_block_opacity() {
    assert_eq!(html("----\nfoo]\n----\n"), preamble("<pre>foo]</pre>\n"));
    assert_eq!(html("----\n*a* <b>\n----\n"), preamble("<pre>*a* &lt;b&gt;</pre>\n"));
}

#[test]
fn source_block_language() {
    assert_eq!(
        html("[source,rust]\n----\nfn f() {}\n----\n"),
        preamble("<pre class=\"highlight\"><code class=\"language-rust\">fn f() {}</code></pre>\n")
    );
    assert_eq!(
        html(":source-language: java\n\n[source]\n----\nclass A {}\n----\n"),
        preamble("<pre class=\"highlight\"><code class=\"language-java\">class A {}</code></pre>\n")
    );
    assert_eq!(html("[source]\n----\nx\n----\n"), preamble("<pre>x</pre>\n"));
}

#[test]
fn nested_lists() {
    assert_eq!(
        html("* a\n** b\n* c\n"),
        preamble("<ul>\n<li>a<ul>\n<li>b</li>\n</ul>\n</li>\n<li>c</li>\n</ul>\n")
    );
}

#[test]
fn links() {
    assert_eq!(
        html("see https://x.org[X] or https://y.org.\n"),
        preamble(concat!(
            "<p>see <a href=\"https://x.org\">X</a> or ",
            "<a href=\"https://y.org\">https://y.org</a>.</p>\n",
        ))
    );
}

#[test]
fn typographic_apostrophe() {
    assert_eq!(html("it's\n"), preamble("<p>it\u{2019}s</p>\n"));

    let options = Options {
        typographic_quotes: false,
        ..Options::default()
    };
    let mut html = Html::default();
    AsciiDoc::with_options(options).process("it's\n", &mut html);
    assert_eq!(html.out, preamble("<p>it's</p>\n"));
}

#[test]
fn section_style() {
    assert_eq!(
        html("[appendix]\n== A\n\nb\n"),
        "<div class=\"sect1 appendix\">\n<h2>A</h2>\n<p>b</p>\n</div>\n"
    );
}

#[test]
fn literal_paragraph() {
    assert_eq!(html("  a\n   b\n"), preamble("<pre class=\"literal\">a\n b</pre>\n"));
}

#[test]
fn full_document() {
    let source = "\
= Guide
:source-language: rust

Read https://docs.rs[the docs].

== Install

* run `cargo add`
* done

[source]
----
fn main() {}
----
";
    assert_eq!(
        html(source),
        concat!(
            "<h1>Guide</h1>\n",
            "<div id=\"preamble\">\n",
            "<p>Read <a href=\"https://docs.rs\">the docs</a>.</p>\n",
            "</div>\n",
            "<div class=\"sect1\">\n<h2>Install</h2>\n",
            "<ul>\n<li>run <code>cargo add</code></li>\n<li>done</li>\n</ul>\n",
            "<pre class=\"highlight\"><code class=\"language-rust\">fn main() {}</code></pre>\n",
            "</div>\n",
        )
    );
}
