//! Runtime error types and centralized message constructors.
//!
//! Message text is fixed by the diagnostic contract and covered by tests;
//! keeping every constructor here means no message is ever formatted at a
//! use site.

use std::fmt;

use brio_diagnostic::{Diagnostic, DiagnosticKind, TraceFrame};
use brio_ir::Span;

use crate::Signal;

/// The result of evaluating an expression.
pub type EvalResult = Result<Signal, RuntimeError>;

/// A spanless value-level error, produced where no span is in reach
/// (operator application, builtins). The interpreter attaches the span
/// and call-stack snapshot, turning it into a [`RuntimeError`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueError {
    pub message: String,
}

impl ValueError {
    pub fn new(message: impl Into<String>) -> Self {
        ValueError {
            message: message.into(),
        }
    }
}

/// A runtime error with its source location and call stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeError {
    pub message: String,
    pub span: Span,
    /// Traceback frames, outermost first. Never empty: the top-level
    /// frame is always present.
    pub trace: Vec<TraceFrame>,
}

impl RuntimeError {
    /// Convert to a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::RuntimeError, self.message.clone(), self.span)
            .with_trace(self.trace.clone())
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime Error: {}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

// Variable errors

pub fn undefined_variable(name: &str) -> ValueError {
    ValueError::new(format!("'{name}' is not defined"))
}

// Arithmetic errors

pub fn division_by_zero() -> ValueError {
    ValueError::new("Division by zero")
}

/// Catch-all for an operator applied to operands it has no meaning for.
pub fn illegal_operation() -> ValueError {
    ValueError::new("Illegal operation")
}

// Call errors

pub fn too_many_args(excess: usize, name: &str) -> ValueError {
    ValueError::new(format!("{excess} too many args passed into '{name}'"))
}

pub fn too_few_args(missing: usize, name: &str) -> ValueError {
    ValueError::new(format!("{missing} too few args passed into '{name}'"))
}

pub fn not_callable(type_name: &str) -> ValueError {
    ValueError::new(format!("{type_name} is not callable"))
}

// Index errors

pub fn index_out_of_bounds(index: i64, len: usize) -> ValueError {
    ValueError::new(format!(
        "Index {index} out of bounds for length {len}"
    ))
}
