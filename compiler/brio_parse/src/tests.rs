use brio_ir::{BinaryOp, ExprArena, ExprId, ExprKind, Span, StringInterner, UnaryOp};
use brio_lexer::tokenize;
use pretty_assertions::assert_eq;

use crate::{parse, ParseError, Parsed};

fn parse_source(source: &str) -> (Parsed, StringInterner) {
    let interner = StringInterner::new();
    let tokens = tokenize(source, &interner).unwrap_or_else(|e| panic!("lex failed: {e}"));
    let parsed = parse(&tokens, &interner).unwrap_or_else(|e| panic!("parse failed: {e}"));
    (parsed, interner)
}

fn parse_err(source: &str) -> ParseError {
    let interner = StringInterner::new();
    let tokens = tokenize(source, &interner).unwrap_or_else(|e| panic!("lex failed: {e}"));
    match parse(&tokens, &interner) {
        Ok(_) => panic!("expected parse failure for {source:?}"),
        Err(e) => e,
    }
}

/// Unwrap a root block expected to hold exactly one statement.
fn single_stmt(parsed: &Parsed) -> ExprId {
    let ExprKind::Block(range) = parsed.arena.kind(parsed.root) else {
        panic!("root is not a block");
    };
    let stmts = parsed.arena.expr_list(range);
    assert_eq!(stmts.len(), 1, "expected one statement");
    stmts[0]
}

fn binary(arena: &ExprArena, id: ExprId) -> (BinaryOp, ExprId, ExprId) {
    match arena.kind(id) {
        ExprKind::Binary { op, lhs, rhs } => (op, lhs, rhs),
        other => panic!("expected binary, got {other:?}"),
    }
}

#[test]
fn literal_statement() {
    let (parsed, _) = parse_source("42");
    let stmt = single_stmt(&parsed);
    assert_eq!(parsed.arena.kind(stmt), ExprKind::Int(42));
    assert_eq!(parsed.arena.span(stmt), Span::new(0, 2));
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let (parsed, _) = parse_source("1 + 2 * 3");
    let stmt = single_stmt(&parsed);
    let (op, lhs, rhs) = binary(&parsed.arena, stmt);
    assert_eq!(op, BinaryOp::Add);
    assert_eq!(parsed.arena.kind(lhs), ExprKind::Int(1));
    let (inner_op, il, ir) = binary(&parsed.arena, rhs);
    assert_eq!(inner_op, BinaryOp::Mul);
    assert_eq!(parsed.arena.kind(il), ExprKind::Int(2));
    assert_eq!(parsed.arena.kind(ir), ExprKind::Int(3));
}

#[test]
fn addition_is_left_associative() {
    let (parsed, _) = parse_source("1 - 2 - 3");
    let stmt = single_stmt(&parsed);
    let (op, lhs, rhs) = binary(&parsed.arena, stmt);
    assert_eq!(op, BinaryOp::Sub);
    assert_eq!(parsed.arena.kind(rhs), ExprKind::Int(3));
    let (inner_op, il, _) = binary(&parsed.arena, lhs);
    assert_eq!(inner_op, BinaryOp::Sub);
    assert_eq!(parsed.arena.kind(il), ExprKind::Int(1));
}

#[test]
fn power_is_right_associative() {
    let (parsed, _) = parse_source("2 ^ 3 ^ 2");
    let stmt = single_stmt(&parsed);
    let (op, lhs, rhs) = binary(&parsed.arena, stmt);
    assert_eq!(op, BinaryOp::Pow);
    assert_eq!(parsed.arena.kind(lhs), ExprKind::Int(2));
    let (inner_op, il, ir) = binary(&parsed.arena, rhs);
    assert_eq!(inner_op, BinaryOp::Pow);
    assert_eq!(parsed.arena.kind(il), ExprKind::Int(3));
    assert_eq!(parsed.arena.kind(ir), ExprKind::Int(2));
}

#[test]
fn negation_binds_tighter_than_multiplication() {
    let (parsed, _) = parse_source("-2 * 3");
    let stmt = single_stmt(&parsed);
    let (op, lhs, _) = binary(&parsed.arena, stmt);
    assert_eq!(op, BinaryOp::Mul);
    assert!(matches!(
        parsed.arena.kind(lhs),
        ExprKind::Unary {
            op: UnaryOp::Neg,
            ..
        }
    ));
}

#[test]
fn power_base_binds_tighter_than_unary_minus() {
    // -2^2 parses as -(2^2), matching the factor/power split.
    let (parsed, _) = parse_source("-2 ^ 2");
    let stmt = single_stmt(&parsed);
    match parsed.arena.kind(stmt) {
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => {
            let (op, _, _) = binary(&parsed.arena, operand);
            assert_eq!(op, BinaryOp::Pow);
        }
        other => panic!("expected unary neg, got {other:?}"),
    }
}

#[test]
fn comparison_below_logic() {
    let (parsed, _) = parse_source("1 < 2 and 3 > 2");
    let stmt = single_stmt(&parsed);
    let (op, lhs, rhs) = binary(&parsed.arena, stmt);
    assert_eq!(op, BinaryOp::And);
    assert_eq!(binary(&parsed.arena, lhs).0, BinaryOp::Lt);
    assert_eq!(binary(&parsed.arena, rhs).0, BinaryOp::Gt);
}

#[test]
fn not_applies_to_whole_comparison() {
    let (parsed, _) = parse_source("not 1 == 2");
    let stmt = single_stmt(&parsed);
    match parsed.arena.kind(stmt) {
        ExprKind::Unary {
            op: UnaryOp::Not,
            operand,
        } => assert_eq!(binary(&parsed.arena, operand).0, BinaryOp::Eq),
        other => panic!("expected not, got {other:?}"),
    }
}

#[test]
fn var_declaration() {
    let (parsed, interner) = parse_source("var x = 5");
    let stmt = single_stmt(&parsed);
    match parsed.arena.kind(stmt) {
        ExprKind::Assign {
            name,
            value,
            declared,
        } => {
            assert_eq!(interner.lookup(name), "x");
            assert!(declared);
            assert_eq!(parsed.arena.kind(value), ExprKind::Int(5));
        }
        other => panic!("expected assign, got {other:?}"),
    }
}

#[test]
fn bare_assignment_versus_comparison() {
    let (parsed, _) = parse_source("x = 5");
    let stmt = single_stmt(&parsed);
    assert!(matches!(
        parsed.arena.kind(stmt),
        ExprKind::Assign {
            declared: false,
            ..
        }
    ));

    // == must stay a comparison, not an assignment.
    let (parsed, _) = parse_source("x == 5");
    let stmt = single_stmt(&parsed);
    assert_eq!(binary(&parsed.arena, stmt).0, BinaryOp::Eq);
}

#[test]
fn assignment_value_may_be_assignment() {
    let (parsed, _) = parse_source("var x = y = 5");
    let stmt = single_stmt(&parsed);
    match parsed.arena.kind(stmt) {
        ExprKind::Assign { value, .. } => {
            assert!(matches!(
                parsed.arena.kind(value),
                ExprKind::Assign {
                    declared: false,
                    ..
                }
            ));
        }
        other => panic!("expected assign, got {other:?}"),
    }
}

#[test]
fn call_with_arguments() {
    let (parsed, interner) = parse_source("f(1, 2 + 3)");
    let stmt = single_stmt(&parsed);
    match parsed.arena.kind(stmt) {
        ExprKind::Call { callee, args } => {
            assert_eq!(
                parsed.arena.kind(callee),
                ExprKind::Var(interner.intern("f"))
            );
            let args = parsed.arena.expr_list(args);
            assert_eq!(args.len(), 2);
            assert_eq!(parsed.arena.kind(args[0]), ExprKind::Int(1));
            assert_eq!(binary(&parsed.arena, args[1]).0, BinaryOp::Add);
        }
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn empty_list_and_nested_list() {
    let (parsed, _) = parse_source("[[], [1, 2]]");
    let stmt = single_stmt(&parsed);
    match parsed.arena.kind(stmt) {
        ExprKind::List(range) => {
            let elems = parsed.arena.expr_list(range);
            assert_eq!(elems.len(), 2);
            assert!(matches!(parsed.arena.kind(elems[0]), ExprKind::List(r) if r.is_empty()));
        }
        other => panic!("expected list, got {other:?}"),
    }
}

#[test]
fn if_elif_else_chain() {
    let (parsed, _) = parse_source("if 1 pass elif 2 pass else pass");
    let stmt = single_stmt(&parsed);
    match parsed.arena.kind(stmt) {
        ExprKind::If { arms, else_body } => {
            let arms = parsed.arena.arms(arms);
            assert_eq!(arms.len(), 2);
            assert!(else_body.is_some());
        }
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn elif_across_newlines() {
    let source = "if x {\n\tpass\n}\nelif y {\n\tpass\n}\nelse {\n\tpass\n}\n";
    let (parsed, _) = parse_source(source);
    let stmt = single_stmt(&parsed);
    match parsed.arena.kind(stmt) {
        ExprKind::If { arms, else_body } => {
            assert_eq!(parsed.arena.arms(arms).len(), 2);
            assert!(else_body.is_some());
        }
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn newline_after_if_without_else_is_a_separator() {
    // The newline look-ahead must be handed back when no elif/else follows.
    let (parsed, _) = parse_source("if x pass\ny");
    let ExprKind::Block(range) = parsed.arena.kind(parsed.root) else {
        panic!("root is not a block");
    };
    assert_eq!(parsed.arena.expr_list(range).len(), 2);
}

#[test]
fn inline_for_collects() {
    let (parsed, interner) = parse_source("for i = 1 to 5 step 2 i");
    let stmt = single_stmt(&parsed);
    match parsed.arena.kind(stmt) {
        ExprKind::For {
            var, step, collect, ..
        } => {
            assert_eq!(interner.lookup(var), "i");
            assert!(step.is_some());
            assert!(collect);
        }
        other => panic!("expected for, got {other:?}"),
    }
}

#[test]
fn block_for_does_not_collect() {
    let (parsed, _) = parse_source("for i = 1 to 5 {\n\ti\n}");
    let stmt = single_stmt(&parsed);
    match parsed.arena.kind(stmt) {
        ExprKind::For { step, collect, .. } => {
            assert!(step.is_none());
            assert!(!collect);
        }
        other => panic!("expected for, got {other:?}"),
    }
}

#[test]
fn while_with_block_body() {
    let (parsed, _) = parse_source("while x < 3 {\n\tx = x + 1\n}");
    let stmt = single_stmt(&parsed);
    match parsed.arena.kind(stmt) {
        ExprKind::While { collect, body, .. } => {
            assert!(!collect);
            assert!(matches!(parsed.arena.kind(body), ExprKind::Block(_)));
        }
        other => panic!("expected while, got {other:?}"),
    }
}

#[test]
fn arrow_function_auto_returns() {
    let (parsed, interner) = parse_source("fnc add(a, b) -> a + b");
    let stmt = single_stmt(&parsed);
    match parsed.arena.kind(stmt) {
        ExprKind::FuncDef {
            name,
            params,
            auto_return,
            ..
        } => {
            assert_eq!(name.map(|n| interner.lookup(n)), Some("add"));
            assert_eq!(parsed.arena.params(params).len(), 2);
            assert!(auto_return);
        }
        other => panic!("expected fnc, got {other:?}"),
    }
}

#[test]
fn anonymous_block_function() {
    let (parsed, _) = parse_source("fnc() {\n\treturn 1\n}");
    let stmt = single_stmt(&parsed);
    match parsed.arena.kind(stmt) {
        ExprKind::FuncDef {
            name,
            params,
            auto_return,
            ..
        } => {
            assert!(name.is_none());
            assert_eq!(params.len(), 0);
            assert!(!auto_return);
        }
        other => panic!("expected fnc, got {other:?}"),
    }
}

#[test]
fn bare_return_before_newline() {
    let (parsed, _) = parse_source("return\n1");
    let ExprKind::Block(range) = parsed.arena.kind(parsed.root) else {
        panic!("root is not a block");
    };
    let stmts = parsed.arena.expr_list(range);
    assert_eq!(stmts.len(), 2);
    assert_eq!(parsed.arena.kind(stmts[0]), ExprKind::Return(None));
}

#[test]
fn return_with_value() {
    let (parsed, _) = parse_source("return 1 + 2");
    let stmt = single_stmt(&parsed);
    match parsed.arena.kind(stmt) {
        ExprKind::Return(Some(value)) => {
            assert_eq!(binary(&parsed.arena, value).0, BinaryOp::Add);
        }
        other => panic!("expected return, got {other:?}"),
    }
}

#[test]
fn loop_control_statements() {
    let (parsed, _) = parse_source("break\ncontinue\npass");
    let ExprKind::Block(range) = parsed.arena.kind(parsed.root) else {
        panic!("root is not a block");
    };
    let stmts = parsed.arena.expr_list(range);
    assert_eq!(parsed.arena.kind(stmts[0]), ExprKind::Break);
    assert_eq!(parsed.arena.kind(stmts[1]), ExprKind::Continue);
    assert_eq!(parsed.arena.kind(stmts[2]), ExprKind::Pass);
}

#[test]
fn semicolons_separate_statements() {
    let (parsed, _) = parse_source("1; 2; 3");
    let ExprKind::Block(range) = parsed.arena.kind(parsed.root) else {
        panic!("root is not a block");
    };
    assert_eq!(parsed.arena.expr_list(range).len(), 3);
}

#[test]
fn leading_and_trailing_newlines_are_skipped() {
    let (parsed, _) = parse_source("\n\n1\n\n");
    single_stmt(&parsed);
}

#[test]
fn empty_source_is_an_empty_block() {
    let (parsed, _) = parse_source("");
    let ExprKind::Block(range) = parsed.arena.kind(parsed.root) else {
        panic!("root is not a block");
    };
    assert!(range.is_empty());
}

#[test]
fn missing_close_paren() {
    let err = parse_err("(1 + 2");
    assert_eq!(err.details, "expected ')', found end of input");
    assert_eq!(err.span, Span::new(6, 6));
}

#[test]
fn missing_call_close() {
    let err = parse_err("f(1, 2");
    assert_eq!(err.details, "expected one of ')' or ',', found end of input");
}

#[test]
fn var_without_identifier() {
    let err = parse_err("var = 5");
    assert_eq!(
        err.details,
        "expected identifier (after 'var'), found '='"
    );
    assert_eq!(err.span, Span::new(4, 5));
}

#[test]
fn for_without_to() {
    let err = parse_err("for i = 1 5");
    assert_eq!(err.details, "expected 'to', found int");
}

#[test]
fn dangling_operator_reports_missing_operand() {
    let err = parse_err("1 +");
    assert_eq!(
        err.details,
        "expected one of int, float, string, identifier, '+', '-', '(', '[', 'if', 'for', \
         'while' or 'fnc', found end of input"
    );
}

#[test]
fn block_requires_newline_after_brace() {
    let err = parse_err("while 1 { pass }");
    assert_eq!(err.details, "expected newline (after '{'), found 'pass'");
}

#[test]
fn unterminated_block_reports_brace() {
    let err = parse_err("while 1 {\n\tpass\n");
    assert_eq!(err.details, "expected '}', found end of input");
}

#[test]
fn failed_trailing_statement_surfaces_its_error() {
    // The second statement fails mid-way; since nothing after it parses
    // either, the speculative failure is the one reported.
    let err = parse_err("1\nvar = 2");
    assert_eq!(
        err.details,
        "expected identifier (after 'var'), found '='"
    );
}
