//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, one-token lookahead, and consumption.
//! The stream invariant (guaranteed by the lexer) is that the last token
//! is always `Eof`, so `current()` never runs off the end.

use brio_ir::{Span, Token, TokenKind};

/// Cursor for navigating tokens.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of the token stream.
    pub fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(
            matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)),
            "token stream must end with Eof"
        );
        Cursor { tokens, pos: 0 }
    }

    /// Current position in the token stream.
    ///
    /// Compared before and after parsing to measure progress, and stored
    /// in snapshots for speculative parsing.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the cursor position directly.
    ///
    /// Used by snapshot restore after speculative parsing.
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(pos <= self.tokens.len(), "cursor position out of bounds");
        self.pos = pos;
    }

    /// Get the current token.
    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Get the current token's kind.
    #[inline]
    pub fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    /// Get the current token's span.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Get the kind of the token after the current one.
    #[inline]
    pub fn peek_kind(&self) -> &TokenKind {
        let idx = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    /// Get the previous token's span.
    #[inline]
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    /// Advance past the current token (saturating at Eof).
    #[inline]
    pub fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Check if at end of token stream.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind.
    ///
    /// Only meaningful for payload-free kinds (keywords, operators,
    /// punctuation, newline, Eof).
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Consume the current token if it matches, returning whether it did.
    #[inline]
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }
}
