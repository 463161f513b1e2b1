//! Brio Parse - recursive-descent parser for Brio.
//!
//! The parser walks the token stream with a [`cursor::Cursor`], building
//! the AST into an arena. All binary precedence levels share one generic
//! left-fold; `^` is right-associative by recursing back into the unary
//! level. Statement lists use speculative parsing: a snapshot of the
//! cursor is taken before each trailing statement and restored if the
//! statement fails, ending the list cleanly. The failed attempt that
//! consumed the most tokens is the error surfaced if the stream is not
//! fully consumed.

mod cursor;
mod error;
mod parser;
mod snapshot;

#[cfg(test)]
mod tests;

pub use error::ParseError;
pub use parser::{parse, Parsed};
