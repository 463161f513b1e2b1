//! Diagnostic values and text rendering.

use std::fmt;
use std::fmt::Write as _;

use brio_ir::Span;

use crate::SourceFile;

/// The closed error taxonomy.
///
/// Lexer errors are `IllegalCharacter`/`ExpectedCharacter`, parser errors
/// are `InvalidSyntax`, and evaluator/value errors are `RuntimeError`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DiagnosticKind {
    IllegalCharacter,
    ExpectedCharacter,
    InvalidSyntax,
    RuntimeError,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DiagnosticKind::IllegalCharacter => "Illegal Character",
            DiagnosticKind::ExpectedCharacter => "Expected Character",
            DiagnosticKind::InvalidSyntax => "Invalid Syntax",
            DiagnosticKind::RuntimeError => "Runtime Error",
        };
        write!(f, "{text}")
    }
}

/// One traceback line.
///
/// `span` locates the line number shown for this frame: the call site in
/// the parent frame for outer frames, the error site for the innermost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceFrame {
    pub display_name: String,
    pub span: Span,
}

/// A renderable diagnostic.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub details: String,
    pub span: Span,
    /// Call frames, outermost first. Empty for lex/parse errors.
    pub trace: Vec<TraceFrame>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, details: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            kind,
            details: details.into(),
            span,
            trace: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_trace(mut self, trace: Vec<TraceFrame>) -> Self {
        self.trace = trace;
        self
    }

    /// Render the diagnostic as plain text against its source file.
    ///
    /// Format (fixed contract, covered by tests):
    ///
    /// ```text
    /// <kind>: <details>
    /// File <name>, line <1-based line>
    ///
    /// <source line>
    /// <caret underline>
    /// ```
    ///
    /// with a `Traceback (most recent call last):` header block prepended
    /// when call frames are present.
    pub fn render(&self, file: &SourceFile) -> String {
        let mut out = String::new();

        if !self.trace.is_empty() {
            out.push_str("Traceback (most recent call last):\n");
            for frame in &self.trace {
                let line = file.line_index(frame.span.start) + 1;
                let _ = writeln!(
                    out,
                    "  File {}, line {}, in {}",
                    file.name(),
                    line,
                    frame.display_name
                );
            }
        }

        let (line, col, len) = file.underline(self.span);
        let _ = writeln!(out, "{}: {}", self.kind, self.details);
        let _ = writeln!(out, "File {}, line {}", file.name(), line + 1);
        out.push('\n');
        let _ = writeln!(out, "{}", file.line_text(line));
        out.push_str(&" ".repeat(col));
        out.push_str(&"^".repeat(len));
        out
    }
}
