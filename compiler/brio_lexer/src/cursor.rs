//! Byte cursor over source text.
//!
//! The scanner works byte-at-a-time with one byte of lookahead. Multi-byte
//! UTF-8 sequences only matter in two places (string contents and the
//! illegal-character error path), where the cursor decodes a full `char`.

use brio_ir::Span;

/// Cursor over the source bytes.
pub struct Cursor<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Cursor {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    /// Current byte offset.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Current byte, or `None` at end of input.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Byte after the current one.
    #[inline]
    pub fn peek2(&self) -> Option<u8> {
        self.bytes.get(self.pos + 1).copied()
    }

    /// Advance one byte.
    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    /// Decode the full `char` at the current position and advance past it.
    ///
    /// Returns `None` at end of input.
    pub fn advance_char(&mut self) -> Option<char> {
        let ch = self.src[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Source text between `start` and the current position.
    #[inline]
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.src[start..self.pos]
    }

    /// Span from `start` to the current position.
    #[inline]
    pub fn span_from(&self, start: usize) -> Span {
        Span::from_range(start..self.pos)
    }

    /// One-byte span at the current position.
    #[inline]
    pub fn here(&self) -> Span {
        Span::from_range(self.pos..(self.pos + 1).min(self.bytes.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn peeks_and_advances() {
        let mut c = Cursor::new("ab");
        assert_eq!(c.peek(), Some(b'a'));
        assert_eq!(c.peek2(), Some(b'b'));
        c.advance();
        assert_eq!(c.peek(), Some(b'b'));
        assert_eq!(c.peek2(), None);
        c.advance();
        assert!(c.is_at_end());
        assert_eq!(c.peek(), None);
    }

    #[test]
    fn advance_char_handles_multibyte() {
        let mut c = Cursor::new("é!");
        assert_eq!(c.advance_char(), Some('é'));
        assert_eq!(c.peek(), Some(b'!'));
    }
}
