//! Token types for the Brio lexer.

use std::fmt;

use crate::{Name, Span};

/// A token with its span in the source.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Token kinds for Brio.
///
/// Float literals store bits as u64 for Eq/Hash compatibility.
/// String/Ident payloads use interned [`Name`]s.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    /// Integer literal: 42
    Int(i64),
    /// Float literal: 3.14 (stored as bits for Eq/Hash)
    Float(u64),
    /// String literal (interned, escapes already processed): 'hello'
    Str(Name),
    /// Identifier (interned)
    Ident(Name),

    // Keywords
    Var,
    And,
    Or,
    Not,
    If,
    Elif,
    Else,
    For,
    To,
    Step,
    While,
    Fnc,
    Return,
    Break,
    Continue,
    Pass,

    // Operators
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Caret,   // ^
    Assign,  // =
    EqEq,    // ==
    NotEq,   // !=
    Lt,      // <
    Gt,      // >
    LtEq,    // <=
    GtEq,    // >=
    Arrow,   // ->

    // Punctuation
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    LBrace,   // {
    RBrace,   // }
    Comma,    // ,

    /// Statement separator: `\n` or `;`.
    Newline,
    /// End of input. Always the final token.
    Eof,
}

impl TokenKind {
    /// Keyword lookup for an identifier's text.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        Some(match text {
            "var" => TokenKind::Var,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "if" => TokenKind::If,
            "elif" => TokenKind::Elif,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "to" => TokenKind::To,
            "step" => TokenKind::Step,
            "while" => TokenKind::While,
            "fnc" => TokenKind::Fnc,
            "return" => TokenKind::Return,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "pass" => TokenKind::Pass,
            _ => return None,
        })
    }

    /// Short human-readable description, used in "expected one of" messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Int(_) => "int",
            TokenKind::Float(_) => "float",
            TokenKind::Str(_) => "string",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Var => "'var'",
            TokenKind::And => "'and'",
            TokenKind::Or => "'or'",
            TokenKind::Not => "'not'",
            TokenKind::If => "'if'",
            TokenKind::Elif => "'elif'",
            TokenKind::Else => "'else'",
            TokenKind::For => "'for'",
            TokenKind::To => "'to'",
            TokenKind::Step => "'step'",
            TokenKind::While => "'while'",
            TokenKind::Fnc => "'fnc'",
            TokenKind::Return => "'return'",
            TokenKind::Break => "'break'",
            TokenKind::Continue => "'continue'",
            TokenKind::Pass => "'pass'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Caret => "'^'",
            TokenKind::Assign => "'='",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::LtEq => "'<='",
            TokenKind::GtEq => "'>='",
            TokenKind::Arrow => "'->'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Newline => "newline",
            TokenKind::Eof => "end of input",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_round_trips() {
        assert_eq!(TokenKind::keyword("var"), Some(TokenKind::Var));
        assert_eq!(TokenKind::keyword("fnc"), Some(TokenKind::Fnc));
        assert_eq!(TokenKind::keyword("elif"), Some(TokenKind::Elif));
        assert_eq!(TokenKind::keyword("variable"), None);
    }
}
