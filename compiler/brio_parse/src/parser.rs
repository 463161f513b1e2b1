//! Grammar productions for Brio.
//!
//! Descending precedence:
//!
//! ```text
//! statements := NEWLINE* statement (NEWLINE+ statement)*
//! statement  := 'return' expr? | 'continue' | 'break' | 'pass' | expr
//! expr       := 'var' IDENT '=' expr | IDENT '=' expr
//!             | comp (('and'|'or') comp)*
//! comp       := 'not' comp | arith ((==|!=|<|>|<=|>=) arith)*
//! arith      := term ((+|-) term)*
//! term       := factor ((*|/) factor)*
//! factor     := (+|-) factor | power
//! power      := call ('^' factor)*          right-assoc via factor
//! call       := atom ('(' (expr (',' expr)*)? ')')?
//! atom       := INT | FLOAT | STRING | IDENT | '(' expr ')' | list
//!             | ifExpr | forExpr | whileExpr | funcDef
//! ```
//!
//! `if`/`for`/`while` bodies are either a single inline statement
//! (value-producing) or a `{ NEWLINE statements }` block (unit-valued).

use brio_ir::{
    BinaryOp, Expr, ExprArena, ExprId, ExprKind, IfArm, Name, Span, StringInterner, Token,
    TokenKind, UnaryOp,
};
use brio_stack::ensure_sufficient_stack;

use crate::cursor::Cursor;
use crate::snapshot::ParserSnapshot;
use crate::ParseError;

/// A successfully parsed compilation unit.
///
/// `root` is always a `Block` node holding the top-level statements.
pub struct Parsed {
    pub arena: ExprArena,
    pub root: ExprId,
}

/// Parse a token stream into an AST.
///
/// Either the whole stream is consumed (through `Eof`) or the parse
/// fails deterministically at one exact token.
pub fn parse(tokens: &[Token], interner: &StringInterner) -> Result<Parsed, ParseError> {
    tracing::debug!(tokens = tokens.len(), "parse start");
    let mut parser = Parser::new(tokens, interner);
    let root = parser.parse_statements(false)?;
    if !parser.cursor.is_at_end() {
        return Err(parser.best_error(parser.expected(
            "one of newline, '+', '-', '*', '/', '^', a comparison, 'and' or 'or'",
        )));
    }
    tracing::debug!(exprs = parser.arena.len(), "parse done");
    Ok(Parsed {
        arena: parser.arena,
        root,
    })
}

struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: ExprArena,
    interner: &'a StringInterner,
    /// The failed speculative parse that consumed the most tokens,
    /// with the cursor position at its failure point.
    furthest: Option<(usize, ParseError)>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            arena: ExprArena::new(),
            interner,
            furthest: None,
        }
    }

    // Snapshot / speculation plumbing

    fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot::new(self.cursor.position())
    }

    fn restore(&mut self, snapshot: ParserSnapshot) {
        self.cursor.set_position(snapshot.cursor_pos);
    }

    /// Record a failed speculative parse, keeping the one that got furthest.
    fn record_failure(&mut self, error: ParseError) {
        let pos = self.cursor.position();
        match &self.furthest {
            Some((best, _)) if *best > pos => {}
            _ => self.furthest = Some((pos, error)),
        }
    }

    /// The error to surface: the furthest-progressed speculative failure
    /// if it reached at least the current token, else `fallback`.
    fn best_error(&self, fallback: ParseError) -> ParseError {
        match &self.furthest {
            Some((pos, err)) if *pos >= self.cursor.position() => err.clone(),
            _ => fallback,
        }
    }

    // Token helpers

    fn expected(&self, what: &str) -> ParseError {
        ParseError::expected(what, self.cursor.current_kind(), self.cursor.current_span())
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<(), ParseError> {
        if self.cursor.eat(kind) {
            Ok(())
        } else {
            Err(self.expected(what))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<Name, ParseError> {
        if let TokenKind::Ident(name) = *self.cursor.current_kind() {
            self.cursor.advance();
            Ok(name)
        } else {
            Err(self.expected(what))
        }
    }

    /// Skip newline tokens, returning how many were consumed.
    fn skip_newlines(&mut self) -> usize {
        let mut count = 0;
        while self.cursor.eat(&TokenKind::Newline) {
            count += 1;
        }
        count
    }

    fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc(Expr::new(kind, span))
    }

    // Statements

    /// Parse a newline-separated statement list into a `Block`.
    ///
    /// The first statement's failure propagates; each further statement
    /// is speculative - on failure the cursor is rewound and the list
    /// ends cleanly, with the failure recorded for `best_error`.
    fn parse_statements(&mut self, in_block: bool) -> Result<ExprId, ParseError> {
        let start_span = self.cursor.current_span();
        let mut stmts = Vec::new();

        self.skip_newlines();
        if !self.at_list_end(in_block) {
            stmts.push(self.parse_statement()?);
            loop {
                let newlines = self.skip_newlines();
                if newlines == 0 || self.at_list_end(in_block) {
                    break;
                }
                let snapshot = self.snapshot();
                match self.parse_statement() {
                    Ok(id) => stmts.push(id),
                    Err(err) => {
                        self.record_failure(err);
                        self.restore(snapshot);
                        break;
                    }
                }
            }
        }

        let span = start_span.merge(self.cursor.previous_span());
        let range = self.arena.alloc_expr_list(&stmts);
        Ok(self.alloc(ExprKind::Block(range), span))
    }

    fn at_list_end(&self, in_block: bool) -> bool {
        self.cursor.is_at_end() || (in_block && self.cursor.check(&TokenKind::RBrace))
    }

    fn parse_statement(&mut self) -> Result<ExprId, ParseError> {
        let span = self.cursor.current_span();
        match self.cursor.current_kind() {
            TokenKind::Return => {
                self.cursor.advance();
                if self.at_expr_start() {
                    let value = self.parse_expr()?;
                    let span = span.merge(self.arena.span(value));
                    Ok(self.alloc(ExprKind::Return(Some(value)), span))
                } else {
                    Ok(self.alloc(ExprKind::Return(None), span))
                }
            }
            TokenKind::Continue => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Continue, span))
            }
            TokenKind::Break => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Break, span))
            }
            TokenKind::Pass => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Pass, span))
            }
            _ => self.parse_expr(),
        }
    }

    /// Whether the current token can start an expression.
    fn at_expr_start(&self) -> bool {
        matches!(
            self.cursor.current_kind(),
            TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::Str(_)
                | TokenKind::Ident(_)
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Not
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::If
                | TokenKind::For
                | TokenKind::While
                | TokenKind::Fnc
                | TokenKind::Var
        )
    }

    // Expressions

    fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| {
            // var x = e
            if self.cursor.check(&TokenKind::Var) {
                let start = self.cursor.current_span();
                self.cursor.advance();
                let name = self.expect_ident("identifier (after 'var')")?;
                self.expect(&TokenKind::Assign, "'='")?;
                let value = self.parse_expr()?;
                let span = start.merge(self.arena.span(value));
                return Ok(self.alloc(
                    ExprKind::Assign {
                        name,
                        value,
                        declared: true,
                    },
                    span,
                ));
            }

            // Bare x = e, disambiguated from a comparison by one token of
            // lookahead for a single '='.
            if let TokenKind::Ident(name) = *self.cursor.current_kind() {
                if self.cursor.peek_kind() == &TokenKind::Assign {
                    let start = self.cursor.current_span();
                    self.cursor.advance();
                    self.cursor.advance();
                    let value = self.parse_expr()?;
                    let span = start.merge(self.arena.span(value));
                    return Ok(self.alloc(
                        ExprKind::Assign {
                            name,
                            value,
                            declared: false,
                        },
                        span,
                    ));
                }
            }

            self.parse_left_assoc(match_logic_op, Self::parse_comparison)
        })
    }

    fn parse_comparison(&mut self) -> Result<ExprId, ParseError> {
        if self.cursor.check(&TokenKind::Not) {
            let start = self.cursor.current_span();
            self.cursor.advance();
            let operand = self.parse_comparison()?;
            let span = start.merge(self.arena.span(operand));
            return Ok(self.alloc(
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    operand,
                },
                span,
            ));
        }
        self.parse_left_assoc(match_comparison_op, Self::parse_arith)
    }

    fn parse_arith(&mut self) -> Result<ExprId, ParseError> {
        self.parse_left_assoc(match_additive_op, Self::parse_term)
    }

    fn parse_term(&mut self) -> Result<ExprId, ParseError> {
        self.parse_left_assoc(match_multiplicative_op, Self::parse_factor)
    }

    /// Shared left-fold for all left-associative binary levels.
    fn parse_left_assoc(
        &mut self,
        match_op: fn(&TokenKind) -> Option<BinaryOp>,
        next: fn(&mut Self) -> Result<ExprId, ParseError>,
    ) -> Result<ExprId, ParseError> {
        let mut lhs = next(self)?;
        while let Some(op) = match_op(self.cursor.current_kind()) {
            self.cursor.advance();
            let rhs = next(self)?;
            let span = self.arena.span(lhs).merge(self.arena.span(rhs));
            lhs = self.alloc(ExprKind::Binary { op, lhs, rhs }, span);
        }
        Ok(lhs)
    }

    fn parse_factor(&mut self) -> Result<ExprId, ParseError> {
        let op = match self.cursor.current_kind() {
            TokenKind::Plus => Some(UnaryOp::Pos),
            TokenKind::Minus => Some(UnaryOp::Neg),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.cursor.current_span();
            self.cursor.advance();
            let operand = self.parse_factor()?;
            let span = start.merge(self.arena.span(operand));
            return Ok(self.alloc(ExprKind::Unary { op, operand }, span));
        }
        self.parse_power()
    }

    /// `^` is right-associative: the exponent recurses back into the
    /// unary level rather than folding left like the other operators.
    fn parse_power(&mut self) -> Result<ExprId, ParseError> {
        let base = self.parse_call()?;
        if self.cursor.check(&TokenKind::Caret) {
            self.cursor.advance();
            let exp = self.parse_factor()?;
            let span = self.arena.span(base).merge(self.arena.span(exp));
            return Ok(self.alloc(
                ExprKind::Binary {
                    op: BinaryOp::Pow,
                    lhs: base,
                    rhs: exp,
                },
                span,
            ));
        }
        Ok(base)
    }

    fn parse_call(&mut self) -> Result<ExprId, ParseError> {
        let callee = self.parse_atom()?;
        if !self.cursor.check(&TokenKind::LParen) {
            return Ok(callee);
        }
        self.cursor.advance();

        let mut args = Vec::new();
        if !self.cursor.check(&TokenKind::RParen) {
            args.push(self.parse_expr()?);
            while self.cursor.eat(&TokenKind::Comma) {
                args.push(self.parse_expr()?);
            }
        }
        let close = self.cursor.current_span();
        self.expect(&TokenKind::RParen, "one of ')' or ','")?;

        let span = self.arena.span(callee).merge(close);
        let args = self.arena.alloc_expr_list(&args);
        Ok(self.alloc(ExprKind::Call { callee, args }, span))
    }

    fn parse_atom(&mut self) -> Result<ExprId, ParseError> {
        let span = self.cursor.current_span();
        match *self.cursor.current_kind() {
            TokenKind::Int(value) => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Int(value), span))
            }
            TokenKind::Float(bits) => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Float(bits), span))
            }
            TokenKind::Str(name) => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Str(name), span))
            }
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Var(name), span))
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::LBracket => self.parse_list(),
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::Fnc => self.parse_func_def(),
            _ => Err(self.expected(
                "one of int, float, string, identifier, '+', '-', '(', '[', 'if', 'for', \
                 'while' or 'fnc'",
            )),
        }
    }

    fn parse_list(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();

        let mut elements = Vec::new();
        if !self.cursor.check(&TokenKind::RBracket) {
            elements.push(self.parse_expr()?);
            while self.cursor.eat(&TokenKind::Comma) {
                elements.push(self.parse_expr()?);
            }
        }
        let close = self.cursor.current_span();
        self.expect(&TokenKind::RBracket, "one of ']' or ','")?;

        let range = self.arena.alloc_expr_list(&elements);
        Ok(self.alloc(ExprKind::List(range), start.merge(close)))
    }

    // Control flow

    /// Parse a body: a `{ ... }` block (unit-valued) or a single inline
    /// statement (value-producing). Returns the body and whether it was
    /// a block.
    fn parse_body(&mut self) -> Result<(ExprId, bool), ParseError> {
        if self.cursor.check(&TokenKind::LBrace) {
            Ok((self.parse_block()?, true))
        } else {
            Ok((self.parse_statement()?, false))
        }
    }

    /// `'{' NEWLINE statements '}'`
    fn parse_block(&mut self) -> Result<ExprId, ParseError> {
        self.expect(&TokenKind::LBrace, "'{'")?;
        if !self.cursor.check(&TokenKind::Newline) {
            return Err(self.expected("newline (after '{')"));
        }
        let body = self.parse_statements(true)?;
        if !self.cursor.eat(&TokenKind::RBrace) {
            return Err(self.best_error(self.expected("'}'")));
        }
        Ok(body)
    }

    /// After a branch body, look for `elif`/`else` possibly across
    /// newlines. Speculative: the newlines are given back if neither
    /// keyword follows, since they may separate statements instead.
    fn at_else_continuation(&mut self) -> bool {
        let snapshot = self.snapshot();
        self.skip_newlines();
        if self.cursor.check(&TokenKind::Elif) || self.cursor.check(&TokenKind::Else) {
            true
        } else {
            self.restore(snapshot);
            false
        }
    }

    fn parse_if(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();

        let mut arms = Vec::new();
        let cond = self.parse_expr()?;
        let (body, _) = self.parse_body()?;
        arms.push(IfArm { cond, body });

        let mut else_body = None;
        while self.at_else_continuation() {
            if self.cursor.eat(&TokenKind::Elif) {
                let cond = self.parse_expr()?;
                let (body, _) = self.parse_body()?;
                arms.push(IfArm { cond, body });
            } else {
                self.cursor.advance(); // 'else'
                let (body, _) = self.parse_body()?;
                else_body = Some(body);
                break;
            }
        }

        let end = else_body.map_or_else(
            || arms.last().map_or(start, |arm| self.arena.span(arm.body)),
            |b| self.arena.span(b),
        );
        let arms = self.arena.alloc_arms(&arms);
        Ok(self.alloc(ExprKind::If { arms, else_body }, start.merge(end)))
    }

    fn parse_for(&mut self) -> Result<ExprId, ParseError> {
        let start_span = self.cursor.current_span();
        self.cursor.advance();

        let var = self.expect_ident("identifier (after 'for')")?;
        self.expect(&TokenKind::Assign, "'='")?;
        let start = self.parse_expr()?;
        self.expect(&TokenKind::To, "'to'")?;
        let end = self.parse_expr()?;
        let step = if self.cursor.eat(&TokenKind::Step) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let (body, is_block) = self.parse_body()?;

        let span = start_span.merge(self.arena.span(body));
        Ok(self.alloc(
            ExprKind::For {
                var,
                start,
                end,
                step,
                body,
                collect: !is_block,
            },
            span,
        ))
    }

    fn parse_while(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();

        let cond = self.parse_expr()?;
        let (body, is_block) = self.parse_body()?;

        let span = start.merge(self.arena.span(body));
        Ok(self.alloc(
            ExprKind::While {
                cond,
                body,
                collect: !is_block,
            },
            span,
        ))
    }

    /// `'fnc' IDENT? '(' params ')' ('->' expr | block)`
    ///
    /// The arrow form auto-returns its expression; the block form only
    /// returns through an explicit `return`.
    fn parse_func_def(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();

        let name = if let TokenKind::Ident(name) = *self.cursor.current_kind() {
            self.cursor.advance();
            Some(name)
        } else {
            None
        };

        self.expect(&TokenKind::LParen, "one of identifier or '('")?;
        let mut params = Vec::new();
        if !self.cursor.check(&TokenKind::RParen) {
            params.push(self.expect_ident("one of identifier or ')'")?);
            while self.cursor.eat(&TokenKind::Comma) {
                params.push(self.expect_ident("identifier (after ',')")?);
            }
        }
        self.expect(&TokenKind::RParen, "one of ')' or ','")?;

        let (body, auto_return) = if self.cursor.eat(&TokenKind::Arrow) {
            (self.parse_expr()?, true)
        } else {
            (self.parse_block()?, false)
        };

        if let Some(name) = name {
            tracing::trace!(name = self.interner.lookup(name), "parsed function");
        }

        let span = start.merge(self.arena.span(body));
        let params = self.arena.alloc_params(&params);
        Ok(self.alloc(
            ExprKind::FuncDef {
                name,
                params,
                body,
                auto_return,
            },
            span,
        ))
    }
}

// Operator matchers, one per precedence level.

fn match_logic_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::And => Some(BinaryOp::And),
        TokenKind::Or => Some(BinaryOp::Or),
        _ => None,
    }
}

fn match_comparison_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::EqEq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        _ => None,
    }
}

fn match_additive_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        _ => None,
    }
}

fn match_multiplicative_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        _ => None,
    }
}
