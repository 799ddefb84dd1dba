//! Pipeline configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Options for an [`AsciiDoc`](crate::AsciiDoc) pipeline.
///
/// Every field has a default, so a partial configuration deserializes:
///
/// ```
/// let options: asciipass::Options =
///     serde_json::from_str(r#"{ "typographic-quotes": false }"#).unwrap();
/// assert!(!options.typographic_quotes);
/// assert!(options.url_schemes.iter().any(|s| s == "https"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Options {
    /// Macro names that are URL schemes: `https://host[text]` becomes a link
    /// to `https://host`, and bare `https://host` is recognized too.
    pub url_schemes: Vec<String>,
    /// Attributes seeded into every document. Entries in the document
    /// override them.
    pub attributes: BTreeMap<String, String>,
    /// Render an apostrophe between two word characters as `’`.
    pub typographic_quotes: bool,
    /// Initial token buffer capacity.
    pub initial_capacity: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            url_schemes: ["http", "https", "ftp", "irc", "mailto", "file"]
                .into_iter()
                .map(String::from)
                .collect(),
            attributes: BTreeMap::new(),
            typographic_quotes: true,
            initial_capacity: 256,
        }
    }
}
