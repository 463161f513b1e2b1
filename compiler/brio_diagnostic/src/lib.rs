//! Brio Diagnostic - error reporting for the Brio interpreter.
//!
//! The error surface is a closed taxonomy ([`DiagnosticKind`]) rendered
//! as plain text against a [`SourceFile`]:
//!
//! ```text
//! <kind>: <details>
//! File <name>, line <1-based line>
//!
//! <source line>
//! <caret underline>
//! ```
//!
//! Runtime errors additionally prepend a traceback built from the call
//! frames recorded by the evaluator, most-recent-call-last.

mod diagnostic;
mod source_file;

pub use diagnostic::{Diagnostic, DiagnosticKind, TraceFrame};
pub use source_file::SourceFile;
