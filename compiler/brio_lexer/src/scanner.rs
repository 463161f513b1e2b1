//! The scanner: one left-to-right pass producing the token stream.

use brio_ir::{Span, StringInterner, Token, TokenKind};

use crate::cursor::Cursor;
use crate::LexError;

/// Tokenize a source text.
///
/// On success the returned stream always ends with [`TokenKind::Eof`].
/// The first unrecognized byte fails the whole tokenization; there is no
/// error recovery.
pub fn tokenize(source: &str, interner: &StringInterner) -> Result<Vec<Token>, LexError> {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();

    while let Some(b) = cursor.peek() {
        match b {
            b' ' | b'\t' | b'\r' => cursor.advance(),
            b'#' => skip_comment(&mut cursor),
            b'\n' | b';' => {
                let start = cursor.pos();
                cursor.advance();
                tokens.push(Token::new(TokenKind::Newline, cursor.span_from(start)));
            }
            b'0'..=b'9' => tokens.push(scan_number(&mut cursor)),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => tokens.push(scan_ident(&mut cursor, interner)),
            b'\'' | b'"' => tokens.push(scan_string(&mut cursor, interner)?),
            _ => tokens.push(scan_operator(&mut cursor)?),
        }
    }

    let end = cursor.span_from(cursor.pos());
    tokens.push(Token::new(TokenKind::Eof, end));
    Ok(tokens)
}

/// Skip a `#` comment up to (not including) the newline.
fn skip_comment(cursor: &mut Cursor<'_>) {
    while let Some(b) = cursor.peek() {
        if b == b'\n' {
            break;
        }
        cursor.advance();
    }
}

/// Scan digits with at most one `.`. A second `.` ends the token.
fn scan_number(cursor: &mut Cursor<'_>) -> Token {
    let start = cursor.pos();
    let mut seen_dot = false;
    while let Some(b) = cursor.peek() {
        match b {
            b'0'..=b'9' => cursor.advance(),
            b'.' if !seen_dot => {
                seen_dot = true;
                cursor.advance();
            }
            _ => break,
        }
    }
    let text = cursor.slice_from(start);
    let span = cursor.span_from(start);
    let kind = if seen_dot {
        TokenKind::Float(text.parse::<f64>().unwrap_or(f64::NAN).to_bits())
    } else {
        match text.parse::<i64>() {
            Ok(i) => TokenKind::Int(i),
            // Out of i64 range: fall back to a float literal.
            Err(_) => TokenKind::Float(text.parse::<f64>().unwrap_or(f64::NAN).to_bits()),
        }
    };
    Token::new(kind, span)
}

/// Scan an identifier or keyword.
fn scan_ident(cursor: &mut Cursor<'_>, interner: &StringInterner) -> Token {
    let start = cursor.pos();
    while let Some(b) = cursor.peek() {
        if b.is_ascii_alphanumeric() || b == b'_' {
            cursor.advance();
        } else {
            break;
        }
    }
    let text = cursor.slice_from(start);
    let span = cursor.span_from(start);
    let kind = TokenKind::keyword(text).unwrap_or_else(|| TokenKind::Ident(interner.intern(text)));
    Token::new(kind, span)
}

/// Scan a quoted string with backslash escapes.
///
/// `\n` and `\t` map to newline/tab; any other escaped character stands
/// for itself. An unterminated string is an `ExpectedCharacter` error for
/// the closing quote.
fn scan_string(cursor: &mut Cursor<'_>, interner: &StringInterner) -> Result<Token, LexError> {
    let start = cursor.pos();
    let quote = cursor.peek().unwrap_or(b'\'');
    cursor.advance();

    let mut content = String::new();
    loop {
        match cursor.peek() {
            None => {
                return Err(LexError::expected_character(
                    format!("'{}'", quote as char),
                    cursor.here(),
                ));
            }
            Some(b) if b == quote => {
                cursor.advance();
                break;
            }
            Some(b'\\') => {
                cursor.advance();
                match cursor.peek() {
                    None => {
                        return Err(LexError::expected_character(
                            format!("'{}'", quote as char),
                            cursor.here(),
                        ));
                    }
                    Some(b'n') => {
                        content.push('\n');
                        cursor.advance();
                    }
                    Some(b't') => {
                        content.push('\t');
                        cursor.advance();
                    }
                    Some(_) => {
                        if let Some(ch) = cursor.advance_char() {
                            content.push(ch);
                        }
                    }
                }
            }
            Some(_) => {
                if let Some(ch) = cursor.advance_char() {
                    content.push(ch);
                }
            }
        }
    }

    Ok(Token::new(
        TokenKind::Str(interner.intern(&content)),
        cursor.span_from(start),
    ))
}

/// Scan a one- or two-character operator or punctuation token.
fn scan_operator(cursor: &mut Cursor<'_>) -> Result<Token, LexError> {
    let start = cursor.pos();
    let b = cursor.peek().unwrap_or(0);

    let kind = match b {
        b'+' => one(cursor, TokenKind::Plus),
        b'-' => {
            if cursor.peek2() == Some(b'>') {
                two(cursor, TokenKind::Arrow)
            } else {
                one(cursor, TokenKind::Minus)
            }
        }
        b'*' => one(cursor, TokenKind::Star),
        b'/' => one(cursor, TokenKind::Slash),
        b'^' => one(cursor, TokenKind::Caret),
        b'(' => one(cursor, TokenKind::LParen),
        b')' => one(cursor, TokenKind::RParen),
        b'[' => one(cursor, TokenKind::LBracket),
        b']' => one(cursor, TokenKind::RBracket),
        b'{' => one(cursor, TokenKind::LBrace),
        b'}' => one(cursor, TokenKind::RBrace),
        b',' => one(cursor, TokenKind::Comma),
        b'=' => {
            if cursor.peek2() == Some(b'=') {
                two(cursor, TokenKind::EqEq)
            } else {
                one(cursor, TokenKind::Assign)
            }
        }
        b'<' => {
            if cursor.peek2() == Some(b'=') {
                two(cursor, TokenKind::LtEq)
            } else {
                one(cursor, TokenKind::Lt)
            }
        }
        b'>' => {
            if cursor.peek2() == Some(b'=') {
                two(cursor, TokenKind::GtEq)
            } else {
                one(cursor, TokenKind::Gt)
            }
        }
        b'!' => {
            if cursor.peek2() == Some(b'=') {
                two(cursor, TokenKind::NotEq)
            } else {
                let span = cursor.here();
                return Err(LexError::expected_character("'=' (after '!')", span));
            }
        }
        _ => {
            let span_start = cursor.pos();
            let ch = cursor.advance_char().unwrap_or('\u{FFFD}');
            return Err(LexError::illegal_character(
                ch,
                Span::from_range(span_start..cursor.pos()),
            ));
        }
    };

    Ok(Token::new(kind, cursor.span_from(start)))
}

fn one(cursor: &mut Cursor<'_>, kind: TokenKind) -> TokenKind {
    cursor.advance();
    kind
}

fn two(cursor: &mut Cursor<'_>, kind: TokenKind) -> TokenKind {
    cursor.advance();
    cursor.advance();
    kind
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LexErrorKind;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let interner = StringInterner::new();
        tokenize(source, &interner)
            .expect("tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn numbers_and_operators() {
        assert_eq!(
            kinds("1 + 2.5 * 3"),
            vec![
                TokenKind::Int(1),
                TokenKind::Plus,
                TokenKind::Float(2.5f64.to_bits()),
                TokenKind::Star,
                TokenKind::Int(3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn second_dot_ends_number() {
        // The number token stops at the second dot; `.` alone matches no rule.
        let interner = StringInterner::new();
        let err = tokenize("1.2.3", &interner).expect_err("second dot");
        assert_eq!(err.kind, LexErrorKind::IllegalCharacter);
        assert_eq!(err.details, "'.'");
        assert_eq!(err.span, Span::new(3, 4));
    }

    #[test]
    fn keywords_vs_identifiers() {
        let interner = StringInterner::new();
        let toks = tokenize("var foo = 1", &interner).expect("tokenize");
        assert_eq!(toks[0].kind, TokenKind::Var);
        assert!(matches!(toks[1].kind, TokenKind::Ident(name) if interner.lookup(name) == "foo"));
        assert_eq!(toks[2].kind, TokenKind::Assign);
    }

    #[test]
    fn two_char_operators_disambiguate() {
        assert_eq!(
            kinds("== != <= >= -> = < > -"),
            vec![
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::Arrow,
                TokenKind::Assign,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Minus,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn newline_and_semicolon_both_separate() {
        assert_eq!(
            kinds("1\n2;3"),
            vec![
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Int(2),
                TokenKind::Newline,
                TokenKind::Int(3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_run_to_end_of_line() {
        assert_eq!(
            kinds("1 # ignored ^&*\n2"),
            vec![
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Int(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_escapes() {
        let interner = StringInterner::new();
        let toks = tokenize(r#""a\nb\tc\\d\"e""#, &interner).expect("tokenize");
        let TokenKind::Str(name) = toks[0].kind else {
            panic!("expected string token, got {:?}", toks[0].kind);
        };
        assert_eq!(interner.lookup(name), "a\nb\tc\\d\"e");
    }

    #[test]
    fn single_and_double_quotes() {
        let interner = StringInterner::new();
        let toks = tokenize("'hi' \"there\"", &interner).expect("tokenize");
        assert!(matches!(toks[0].kind, TokenKind::Str(n) if interner.lookup(n) == "hi"));
        assert!(matches!(toks[1].kind, TokenKind::Str(n) if interner.lookup(n) == "there"));
    }

    #[test]
    fn unterminated_string_expects_closing_quote() {
        let interner = StringInterner::new();
        let err = tokenize("'oops", &interner).expect_err("unterminated");
        assert_eq!(err.kind, LexErrorKind::ExpectedCharacter);
        assert_eq!(err.details, "'''");
    }

    #[test]
    fn bang_without_equals() {
        let interner = StringInterner::new();
        let err = tokenize("1 ! 2", &interner).expect_err("lone bang");
        assert_eq!(err.kind, LexErrorKind::ExpectedCharacter);
        assert_eq!(err.details, "'=' (after '!')");
        assert_eq!(err.span, Span::new(2, 3));
    }

    #[test]
    fn illegal_character_has_one_char_span() {
        let interner = StringInterner::new();
        let err = tokenize("1 @ 2", &interner).expect_err("illegal char");
        assert_eq!(err.kind, LexErrorKind::IllegalCharacter);
        assert_eq!(err.details, "'@'");
        assert_eq!(err.span, Span::new(2, 3));
    }

    #[test]
    fn stream_always_ends_with_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("   \t "), vec![TokenKind::Eof]);
    }

    proptest! {
        /// Tokenizing never panics, and every Ok stream ends with Eof.
        #[test]
        fn tokenize_total(source in "\\PC*") {
            let interner = StringInterner::new();
            if let Ok(tokens) = tokenize(&source, &interner) {
                prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
            }
        }

        /// Integer literals round-trip through the lexer.
        #[test]
        fn int_literals_round_trip(n in 0i64..=i64::MAX) {
            let interner = StringInterner::new();
            let tokens = tokenize(&n.to_string(), &interner).expect("tokenize int");
            prop_assert_eq!(tokens[0].kind, TokenKind::Int(n));
        }
    }
}
