//! Source file with a precomputed line table.

use brio_ir::Span;

/// A named source text with line-offset lookup.
///
/// Line numbers are 0-based internally and 1-based in rendered output.
pub struct SourceFile {
    name: String,
    text: String,
    /// Byte offset of the start of each line. Always begins with 0.
    line_starts: Vec<u32>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0u32];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        SourceFile {
            name: name.into(),
            text,
            line_starts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 0-based line index containing the byte offset.
    pub fn line_index(&self, offset: u32) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    /// The text of a 0-based line, without its trailing newline.
    pub fn line_text(&self, line: usize) -> &str {
        let start = self.line_starts.get(line).copied().unwrap_or(0) as usize;
        let end = self
            .line_starts
            .get(line + 1)
            .map_or(self.text.len(), |&s| s as usize);
        self.text[start..end].trim_end_matches('\n')
    }

    /// 0-based column (in bytes) of an offset within its line.
    pub fn column(&self, offset: u32) -> usize {
        let line = self.line_index(offset);
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        (offset.saturating_sub(line_start)) as usize
    }

    /// Clamp a span's underline to its first line: returns
    /// `(line_index, start_col, underline_len)` with `underline_len >= 1`.
    pub fn underline(&self, span: Span) -> (usize, usize, usize) {
        let line = self.line_index(span.start);
        let col = self.column(span.start);
        let line_len = self.line_text(line).len();
        let end_col = if self.line_index(span.end.max(span.start)) == line {
            self.column(span.end.max(span.start)).min(line_len.max(1))
        } else {
            line_len
        };
        let len = end_col.saturating_sub(col).max(1);
        (line, col, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn line_lookup() {
        let file = SourceFile::new("t.brio", "abc\ndef\nghi");
        assert_eq!(file.line_index(0), 0);
        assert_eq!(file.line_index(3), 0);
        assert_eq!(file.line_index(4), 1);
        assert_eq!(file.line_index(10), 2);
        assert_eq!(file.line_text(1), "def");
        assert_eq!(file.column(5), 1);
    }

    #[test]
    fn underline_clamps_to_first_line() {
        let file = SourceFile::new("t.brio", "abcdef\nxyz");
        let (line, col, len) = file.underline(Span::new(2, 4));
        assert_eq!((line, col, len), (0, 2, 2));

        // Span crossing a newline underlines to end of first line.
        let (line, col, len) = file.underline(Span::new(2, 9));
        assert_eq!((line, col, len), (0, 2, 4));
    }

    #[test]
    fn empty_span_still_gets_one_caret() {
        let file = SourceFile::new("t.brio", "abc");
        let (_, _, len) = file.underline(Span::new(1, 1));
        assert_eq!(len, 1);
    }
}
