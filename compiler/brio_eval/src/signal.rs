//! Evaluation signals.

use crate::Value;

/// The outcome of evaluating one expression.
///
/// Non-local control flow (`return`, `break`, `continue`) unwinds as a
/// signal through ordinary `Ok` results until a construct handles it:
/// loops absorb `Break`/`Continue`, calls absorb `Return`. Anything that
/// escapes to the top level is normalized there.
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    /// Plain value; evaluation continues.
    Value(Value),
    /// `return` unwinding to the nearest enclosing call.
    Return(Value),
    /// `break` unwinding to the nearest enclosing loop.
    Break,
    /// `continue` unwinding to the nearest enclosing loop.
    Continue,
}

impl Signal {
    /// The unit-value signal.
    pub fn unit() -> Self {
        Signal::Value(Value::Unit)
    }

    /// Top-level normalization: a `return` escaping the program yields
    /// its value; stray `break`/`continue` yield unit.
    pub fn into_value(self) -> Value {
        match self {
            Signal::Value(value) | Signal::Return(value) => value,
            Signal::Break | Signal::Continue => Value::Unit,
        }
    }
}
