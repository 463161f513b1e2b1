//! Brio Eval - tree-walking evaluator for Brio.
//!
//! Evaluation is a recursive walk over the arena AST. Every expression
//! produces a [`Signal`]: either a plain value, or non-local control flow
//! (`return`/`break`/`continue`) unwinding toward the construct that
//! handles it. Runtime errors carry a span and a call-stack snapshot so
//! the driver can render a traceback.
//!
//! Strings and lists are reference-counted copy-on-write ([`Heap`]), so
//! binding a list to a second variable is cheap and mutation through one
//! binding is never visible through the other.

mod environment;
pub mod errors;
mod heap;
mod interpreter;
mod operators;
mod print_handler;
mod signal;
mod value;


pub use environment::{LocalScope, Scope};
pub use errors::{EvalResult, RuntimeError, ValueError};
pub use heap::Heap;
pub use interpreter::Interpreter;
pub use operators::{evaluate_binary, evaluate_unary};
pub use print_handler::{BufferPrintHandler, PrintHandler, SharedPrintHandler, StdoutPrintHandler};
pub use signal::Signal;
pub use value::{BuiltinFn, BuiltinValue, FunctionValue, Value};
