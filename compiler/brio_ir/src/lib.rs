//! Brio IR - spans, tokens, and AST types for the Brio interpreter.
//!
//! This crate sits at the bottom of the workspace: it has no internal
//! dependencies and is shared by the lexer, parser, and evaluator.
//!
//! # Contents
//!
//! - [`Span`]: compact byte-offset source spans
//! - [`Name`] / [`StringInterner`]: interned identifiers and string literals
//! - [`Token`] / [`TokenKind`]: the lexer's output
//! - [`ExprArena`] and friends: the arena-allocated AST

mod ast;
mod interner;
mod name;
mod span;
mod token;

pub use ast::{
    ArmRange, BinaryOp, Expr, ExprArena, ExprId, ExprKind, ExprRange, IfArm, ParamRange,
    SharedArena, UnaryOp,
};
pub use interner::StringInterner;
pub use name::Name;
pub use span::Span;
pub use token::{Token, TokenKind};
