//! Brio Lexer - source text to token stream.
//!
//! A hand-rolled single-pass scanner with one byte of lookahead. Rules in
//! priority order: whitespace skipped, `#` line comments, `\n`/`;` as
//! interchangeable statement separators, numbers (at most one `.`),
//! identifiers/keywords, quoted strings with backslash escapes, and one-
//! or two-character operators. The output always ends with [`TokenKind::Eof`].
//!
//! Failures are terminal: an unrecognized byte is an `IllegalCharacter`
//! error with a one-character span, and a lone `!` is `ExpectedCharacter`.

mod cursor;
mod lex_error;
mod scanner;

pub use lex_error::{LexError, LexErrorKind};
pub use scanner::tokenize;

// Re-exported for callers that only need the tokens.
pub use brio_ir::{Token, TokenKind};
