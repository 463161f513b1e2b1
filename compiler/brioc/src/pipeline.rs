//! The run pipeline: source text in, value or rendered diagnostic out.
//!
//! One interner is created per top-level run and shared with every
//! script pulled in through `import`, so interned names stay valid
//! across program boundaries.

use std::rc::Rc;

use thiserror::Error;

use brio_diagnostic::SourceFile;
use brio_eval::{Interpreter, LocalScope, Scope, SharedPrintHandler, Signal, Value};
use brio_ir::{SharedArena, StringInterner};
use brio_lexer::tokenize;
use brio_parse::parse;

use crate::builtins;

/// Driver-level failure.
#[derive(Debug, Error)]
pub enum RunError {
    /// The script file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// A lex, parse, or runtime failure, already rendered against the
    /// source with its caret line (and traceback, for runtime errors).
    #[error("{0}")]
    Diagnostic(String),
}

/// Run a script from source text.
pub fn run(
    file_name: &str,
    source: &str,
    handler: &SharedPrintHandler,
) -> Result<Value, RunError> {
    run_with(file_name, source, handler, Rc::new(StringInterner::new()))
}

/// Read and run a script from disk. Used by the CLI and by `import`.
pub fn run_path(
    path: &str,
    handler: &SharedPrintHandler,
    interner: Rc<StringInterner>,
) -> Result<Value, RunError> {
    let source = std::fs::read_to_string(path).map_err(|source| RunError::Io {
        path: path.to_owned(),
        source,
    })?;
    run_with(path, &source, handler, interner)
}

/// Run a script against an existing interner.
pub fn run_with(
    file_name: &str,
    source: &str,
    handler: &SharedPrintHandler,
    interner: Rc<StringInterner>,
) -> Result<Value, RunError> {
    tracing::debug!(file = file_name, bytes = source.len(), "run");
    let file = SourceFile::new(file_name, source);

    let tokens = tokenize(source, &interner)
        .map_err(|e| RunError::Diagnostic(e.to_diagnostic().render(&file)))?;
    let parsed = parse(&tokens, &interner)
        .map_err(|e| RunError::Diagnostic(e.to_diagnostic().render(&file)))?;
    let arena: SharedArena = Rc::new(parsed.arena);

    let globals = LocalScope::new(Scope::new());
    builtins::install(&interner, &globals, handler);

    let mut interpreter = Interpreter::new(arena, Rc::clone(&interner));
    interpreter
        .eval(parsed.root, &globals)
        .map(Signal::into_value)
        .map_err(|e| RunError::Diagnostic(e.to_diagnostic().render(&file)))
}
