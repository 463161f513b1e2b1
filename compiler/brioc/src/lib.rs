//! Brio driver: wires the lexer, parser, and evaluator into one `run`
//! call, installs the default global environment, and renders failures
//! as plain-text diagnostics.

pub mod builtins;
pub mod pipeline;

pub use pipeline::{run, run_path, run_with, RunError};
