//! Arena-allocated AST for Brio.
//!
//! Expression nodes live in a contiguous [`ExprArena`] and reference each
//! other by [`ExprId`] index - no `Box<Expr>`. Variable-length children
//! (statement lists, call arguments, if-arms, parameter lists) are stored
//! in sidecar vectors addressed by small `{start, len}` ranges.
//!
//! Every node carries a [`Span`] so diagnostics can point at exact source.

use std::fmt;
use std::rc::Rc;

use crate::{Name, Span};

/// Index of an expression in its [`ExprArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Range into the arena's expression-id sidecar list.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExprRange {
    pub start: u32,
    pub len: u16,
}

impl ExprRange {
    pub const EMPTY: ExprRange = ExprRange { start: 0, len: 0 };

    #[inline]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// Range into the arena's if-arm sidecar list.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ArmRange {
    pub start: u32,
    pub len: u16,
}

/// Range into the arena's parameter-name sidecar list.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParamRange {
    pub start: u32,
    pub len: u16,
}

impl ParamRange {
    pub const EMPTY: ParamRange = ParamRange { start: 0, len: 0 };

    #[inline]
    pub const fn len(self) -> usize {
        self.len as usize
    }
}

/// One `if`/`elif` arm: condition plus body.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct IfArm {
    pub cond: ExprId,
    pub body: ExprId,
}

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        };
        write!(f, "{text}")
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Not => "not",
        };
        write!(f, "{text}")
    }
}

/// Expression node.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Expression variants.
///
/// All children are arena indices, not boxes. Statements are expressions;
/// a statement list is a `Block`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    /// Integer literal: 42
    Int(i64),
    /// Float literal: 3.14 (stored as bits for Eq/Hash)
    Float(u64),
    /// String literal (interned).
    Str(Name),
    /// List literal: `[a, b, c]`
    List(ExprRange),
    /// Variable read.
    Var(Name),
    /// Variable write: `var x = e` (`declared`) or bare `x = e`.
    ///
    /// Both forms bind in the current scope frame.
    Assign {
        name: Name,
        value: ExprId,
        declared: bool,
    },
    /// Binary operation.
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    /// Unary operation.
    Unary { op: UnaryOp, operand: ExprId },
    /// `if`/`elif` chain with optional `else`.
    If {
        arms: ArmRange,
        else_body: Option<ExprId>,
    },
    /// Counted loop: `for i = start to end (step s)? body`.
    ///
    /// `collect` is true for inline bodies: the loop evaluates to the
    /// list of per-iteration values. Block bodies evaluate to unit.
    For {
        var: Name,
        start: ExprId,
        end: ExprId,
        step: Option<ExprId>,
        body: ExprId,
        collect: bool,
    },
    /// Conditional loop. Same `collect` contract as `For`.
    While {
        cond: ExprId,
        body: ExprId,
        collect: bool,
    },
    /// Function definition. `auto_return` marks the `-> expr` form.
    FuncDef {
        name: Option<Name>,
        params: ParamRange,
        body: ExprId,
        auto_return: bool,
    },
    /// Call: `callee(args...)`.
    Call { callee: ExprId, args: ExprRange },
    /// `return expr?`
    Return(Option<ExprId>),
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// `pass` - no-op statement, evaluates to unit.
    Pass,
    /// Brace-delimited statement list. Evaluates to unit.
    Block(ExprRange),
}

/// Arena holding all expressions of one compilation unit.
#[derive(Debug, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    arms: Vec<IfArm>,
    params: Vec<Name>,
}

/// Shared handle to an arena.
///
/// Function values carry their defining arena so that functions returned
/// across `run()` boundaries (module import) stay callable.
pub type SharedArena = Rc<ExprArena>;

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, returning its id.
    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(u32::try_from(self.exprs.len()).unwrap_or(u32::MAX));
        self.exprs.push(expr);
        id
    }

    /// Get an expression by id.
    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Get an expression's kind.
    #[inline]
    pub fn kind(&self, id: ExprId) -> ExprKind {
        self.exprs[id.index()].kind
    }

    /// Get an expression's span.
    #[inline]
    pub fn span(&self, id: ExprId) -> Span {
        self.exprs[id.index()].span
    }

    /// Number of allocated expressions.
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Iterate over all expressions with their ids, in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (ExprId, &Expr)> {
        self.exprs
            .iter()
            .enumerate()
            .map(|(i, e)| (ExprId::new(u32::try_from(i).unwrap_or(u32::MAX)), e))
    }

    /// Store a contiguous list of expression ids, returning its range.
    ///
    /// # Panics
    ///
    /// Panics if the list is longer than a range can address.
    pub fn alloc_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        let start = u32::try_from(self.expr_lists.len()).unwrap_or(u32::MAX);
        let len = range_len(ids.len(), "expression list too long");
        self.expr_lists.extend_from_slice(ids);
        ExprRange { start, len }
    }

    /// Resolve an expression-id range to a slice.
    #[inline]
    pub fn expr_list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    /// Store a contiguous list of if-arms, returning its range.
    ///
    /// # Panics
    ///
    /// Panics if the list is longer than a range can address.
    pub fn alloc_arms(&mut self, arms: &[IfArm]) -> ArmRange {
        let start = u32::try_from(self.arms.len()).unwrap_or(u32::MAX);
        let len = range_len(arms.len(), "if-arm list too long");
        self.arms.extend_from_slice(arms);
        ArmRange { start, len }
    }

    /// Resolve an arm range to a slice.
    #[inline]
    pub fn arms(&self, range: ArmRange) -> &[IfArm] {
        let start = range.start as usize;
        &self.arms[start..start + range.len as usize]
    }

    /// Store a contiguous parameter-name list, returning its range.
    ///
    /// # Panics
    ///
    /// Panics if the list is longer than a range can address.
    pub fn alloc_params(&mut self, params: &[Name]) -> ParamRange {
        let start = u32::try_from(self.params.len()).unwrap_or(u32::MAX);
        let len = range_len(params.len(), "parameter list too long");
        self.params.extend_from_slice(params);
        ParamRange { start, len }
    }

    /// Resolve a parameter range to a slice.
    #[inline]
    pub fn params(&self, range: ParamRange) -> &[Name] {
        let start = range.start as usize;
        &self.params[start..start + range.len as usize]
    }
}

/// Convert a sidecar list length to its range width, refusing lists a
/// range cannot address rather than truncating them.
fn range_len(len: usize, msg: &str) -> u16 {
    match u16::try_from(len) {
        Ok(len) => len,
        Err(_) => panic!("{msg}: {len} elements"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn alloc_and_get() {
        let mut arena = ExprArena::new();
        let a = arena.alloc(Expr::new(ExprKind::Int(1), Span::new(0, 1)));
        let b = arena.alloc(Expr::new(ExprKind::Int(2), Span::new(2, 3)));
        assert_ne!(a, b);
        assert_eq!(arena.kind(a), ExprKind::Int(1));
        assert_eq!(arena.span(b), Span::new(2, 3));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn expr_lists_are_contiguous() {
        let mut arena = ExprArena::new();
        let ids: Vec<ExprId> = (0..4)
            .map(|i| arena.alloc(Expr::new(ExprKind::Int(i), Span::DUMMY)))
            .collect();
        let range = arena.alloc_expr_list(&ids);
        assert_eq!(arena.expr_list(range), ids.as_slice());
    }

    #[test]
    #[should_panic(expected = "expression list too long")]
    fn oversized_expr_lists_are_refused() {
        let mut arena = ExprArena::new();
        let id = arena.alloc(Expr::new(ExprKind::Int(0), Span::DUMMY));
        let ids = vec![id; usize::from(u16::MAX) + 1];
        arena.alloc_expr_list(&ids);
    }

    #[test]
    fn param_lists_round_trip() {
        let mut arena = ExprArena::new();
        let params = [Name::from_raw(1), Name::from_raw(2)];
        let range = arena.alloc_params(&params);
        assert_eq!(arena.params(range), params.as_slice());
    }
}
