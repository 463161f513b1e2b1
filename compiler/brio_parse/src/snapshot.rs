//! Parser snapshots for speculative parsing.
//!
//! The statement-list grammar is ambiguous at its end: the only way to
//! know a list is over is to attempt another statement and fail. The
//! parser takes a [`ParserSnapshot`] before each such attempt and
//! restores it on failure, so a failed speculation consumes nothing.
//!
//! Snapshots capture only the cursor position. Arena state is NOT
//! captured: nodes allocated during a failed speculation stay in the
//! arena but are unreachable from the root, which is harmless.

/// A lightweight snapshot of parser state for speculative parsing.
#[derive(Clone, Copy, Debug)]
pub struct ParserSnapshot {
    pub(crate) cursor_pos: usize,
}

impl ParserSnapshot {
    #[inline]
    pub(crate) fn new(cursor_pos: usize) -> Self {
        Self { cursor_pos }
    }
}
