//! Lexer error type.

use std::fmt;

use brio_diagnostic::{Diagnostic, DiagnosticKind};
use brio_ir::Span;

/// Kind of lexer failure.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LexErrorKind {
    /// A byte no rule recognizes.
    IllegalCharacter,
    /// A specific character was required and absent (`!` without `=`,
    /// unterminated string).
    ExpectedCharacter,
}

/// A lexer error with its exact source span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub details: String,
    pub span: Span,
}

impl LexError {
    pub fn illegal_character(ch: char, span: Span) -> Self {
        LexError {
            kind: LexErrorKind::IllegalCharacter,
            details: format!("'{ch}'"),
            span,
        }
    }

    pub fn expected_character(details: impl Into<String>, span: Span) -> Self {
        LexError {
            kind: LexErrorKind::ExpectedCharacter,
            details: details.into(),
            span,
        }
    }

    /// Convert to a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let kind = match self.kind {
            LexErrorKind::IllegalCharacter => DiagnosticKind::IllegalCharacter,
            LexErrorKind::ExpectedCharacter => DiagnosticKind::ExpectedCharacter,
        };
        Diagnostic::new(kind, self.details.clone(), self.span)
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            LexErrorKind::IllegalCharacter => "Illegal Character",
            LexErrorKind::ExpectedCharacter => "Expected Character",
        };
        write!(f, "{kind}: {}", self.details)
    }
}

impl std::error::Error for LexError {}
