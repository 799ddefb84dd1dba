//! Diagnostics produced while building the instruction stream.
//!
//! The engine is total: nothing aborts a parse. When the parser has to
//! recover (an unterminated listing block, an attribute list that precedes
//! nothing) it records a [`ParseDiagnostic`] and carries on. Consumers decide
//! whether and how to report them; [`ParseDiagnostic::location`] turns the
//! span into line/column positions.

use serde::Serialize;

use crate::span::{Location, SourceIndex, SourceSpan};

/// Severity level for a parse diagnostic.
///
/// Every recovery the parser performs is a warning; there is no fatal
/// level because no input aborts a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub enum Severity {
    /// The parser recovered but the output may not match intent.
    Warning,
}

/// A diagnostic emitted during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic {
    /// The source span where the issue was detected.
    pub span: SourceSpan,
    /// Human-readable description of the issue.
    pub message: String,
    /// Severity level.
    pub severity: Severity,
}

impl ParseDiagnostic {
    /// A [`Severity::Warning`] diagnostic.
    #[must_use]
    pub fn warning(span: SourceSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    /// Resolve the diagnostic span against a [`SourceIndex`].
    #[must_use]
    pub fn location(&self, index: &SourceIndex) -> Location {
        index.location(&self.span)
    }
}
