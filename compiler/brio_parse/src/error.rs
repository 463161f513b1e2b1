//! Parser error type.
//!
//! Every parser failure is `InvalidSyntax`, anchored at the offending
//! token with an "expected ..." message.

use std::fmt;

use brio_diagnostic::{Diagnostic, DiagnosticKind};
use brio_ir::{Span, TokenKind};

/// A syntax error at one exact token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub details: String,
    pub span: Span,
}

impl ParseError {
    /// Build an "expected X, found Y" error.
    ///
    /// `what` is either a single description (`"'='"`) or a joined list
    /// (`"one of ')' or ','"`).
    pub fn expected(what: &str, found: &TokenKind, span: Span) -> Self {
        ParseError {
            details: format!("expected {what}, found {}", found.describe()),
            span,
        }
    }

    /// Convert to a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::InvalidSyntax, self.details.clone(), self.span)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid Syntax: {}", self.details)
    }
}

impl std::error::Error for ParseError {}
