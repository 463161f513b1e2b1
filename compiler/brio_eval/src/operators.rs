//! Binary and unary operator semantics over [`Value`]s.
//!
//! Operators are span-free: they return [`ValueError`] and the
//! interpreter attaches the source location. Integer arithmetic wraps
//! rather than panicking; division and power promote to float when the
//! integer result would be inexact.
//!
//! Lists overload the arithmetic operators:
//!
//! - `list + x`  appends `x` as one element
//! - `list - i`  removes the element at index `i`
//! - `list * list` concatenates
//! - `list / i`  retrieves the element at index `i`
//!
//! Strings support `+` (concat), `*` int (repeat), `/` int (char at
//! index), and `-` int (remove the char at index). Negative indices
//! resolve from the end.

use brio_ir::{BinaryOp, UnaryOp};

use crate::errors::{division_by_zero, illegal_operation, index_out_of_bounds};
use crate::{Value, ValueError};

/// Apply a binary operator. `and`/`or` operands are already evaluated;
/// there is no short-circuiting.
pub fn evaluate_binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, ValueError> {
    match op {
        BinaryOp::Add => add(lhs, rhs),
        BinaryOp::Sub => sub(lhs, rhs),
        BinaryOp::Mul => mul(lhs, rhs),
        BinaryOp::Div => div(lhs, rhs),
        BinaryOp::Pow => pow(lhs, rhs),
        BinaryOp::Eq => Ok(bool_value(lhs == rhs)),
        BinaryOp::NotEq => Ok(bool_value(lhs != rhs)),
        BinaryOp::Lt => compare(lhs, rhs, |o| o == std::cmp::Ordering::Less),
        BinaryOp::Gt => compare(lhs, rhs, |o| o == std::cmp::Ordering::Greater),
        BinaryOp::LtEq => compare(lhs, rhs, |o| o != std::cmp::Ordering::Greater),
        BinaryOp::GtEq => compare(lhs, rhs, |o| o != std::cmp::Ordering::Less),
        BinaryOp::And => logic(lhs, rhs, |a, b| a && b),
        BinaryOp::Or => logic(lhs, rhs, |a, b| a || b),
    }
}

/// Apply a unary operator.
pub fn evaluate_unary(op: UnaryOp, operand: Value) -> Result<Value, ValueError> {
    match (op, operand) {
        (UnaryOp::Neg, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Pos, v @ (Value::Int(_) | Value::Float(_))) => Ok(v),
        (UnaryOp::Not, v @ (Value::Int(_) | Value::Float(_))) => Ok(bool_value(!v.is_truthy())),
        _ => Err(illegal_operation()),
    }
}

fn bool_value(b: bool) -> Value {
    Value::Int(i64::from(b))
}

fn add(lhs: Value, rhs: Value) -> Result<Value, ValueError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(b))),
        (a, b) if is_number(&a) && is_number(&b) => Ok(Value::Float(as_f64(&a) + as_f64(&b))),
        (Value::Str(a), Value::Str(b)) => {
            let mut a = a;
            a.make_mut().push_str(&b);
            Ok(Value::Str(a))
        }
        (Value::List(items), element) => {
            let mut items = items;
            items.make_mut().push(element);
            Ok(Value::List(items))
        }
        _ => Err(illegal_operation()),
    }
}

fn sub(lhs: Value, rhs: Value) -> Result<Value, ValueError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_sub(b))),
        (a, b) if is_number(&a) && is_number(&b) => Ok(Value::Float(as_f64(&a) - as_f64(&b))),
        (Value::List(items), Value::Int(index)) => {
            let at = resolve_index(index, items.len())?;
            let mut items = items;
            items.make_mut().remove(at);
            Ok(Value::List(items))
        }
        (Value::Str(s), Value::Int(index)) => {
            let at = resolve_index(index, s.chars().count())?;
            Ok(Value::str(
                &s.chars()
                    .enumerate()
                    .filter(|&(i, _)| i != at)
                    .map(|(_, c)| c)
                    .collect::<String>(),
            ))
        }
        _ => Err(illegal_operation()),
    }
}

fn mul(lhs: Value, rhs: Value) -> Result<Value, ValueError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_mul(b))),
        (a, b) if is_number(&a) && is_number(&b) => Ok(Value::Float(as_f64(&a) * as_f64(&b))),
        (Value::Str(s), Value::Int(count)) => {
            let count = usize::try_from(count).unwrap_or(0);
            Ok(Value::str(&s.repeat(count)))
        }
        (Value::List(a), Value::List(b)) => {
            let mut a = a;
            a.make_mut().extend(b.iter().cloned());
            Ok(Value::List(a))
        }
        _ => Err(illegal_operation()),
    }
}

fn div(lhs: Value, rhs: Value) -> Result<Value, ValueError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => {
            if b == 0 {
                return Err(division_by_zero());
            }
            // Exact quotients stay int; anything else promotes.
            if a.wrapping_rem(b) == 0 {
                Ok(Value::Int(a.wrapping_div(b)))
            } else {
                Ok(Value::Float(a as f64 / b as f64))
            }
        }
        (a, b) if is_number(&a) && is_number(&b) => {
            let divisor = as_f64(&b);
            if divisor == 0.0 {
                return Err(division_by_zero());
            }
            Ok(Value::Float(as_f64(&a) / divisor))
        }
        (Value::List(items), Value::Int(index)) => {
            let at = resolve_index(index, items.len())?;
            Ok(items[at].clone())
        }
        (Value::Str(s), Value::Int(index)) => {
            let at = resolve_index(index, s.chars().count())?;
            match s.chars().nth(at) {
                Some(c) => Ok(Value::str(&c.to_string())),
                None => Err(index_out_of_bounds(index, s.chars().count())),
            }
        }
        _ => Err(illegal_operation()),
    }
}

fn pow(lhs: Value, rhs: Value) -> Result<Value, ValueError> {
    match (lhs, rhs) {
        (Value::Int(base), Value::Int(exp)) => {
            // Small non-negative exponents stay int; negative or
            // overflowing ones promote to float.
            if let Some(result) = u32::try_from(exp).ok().and_then(|e| base.checked_pow(e)) {
                Ok(Value::Int(result))
            } else {
                Ok(Value::Float((base as f64).powf(exp as f64)))
            }
        }
        (a, b) if is_number(&a) && is_number(&b) => {
            Ok(Value::Float(as_f64(&a).powf(as_f64(&b))))
        }
        _ => Err(illegal_operation()),
    }
}

fn compare(
    lhs: Value,
    rhs: Value,
    accept: impl Fn(std::cmp::Ordering) -> bool,
) -> Result<Value, ValueError> {
    if !is_number(&lhs) || !is_number(&rhs) {
        return Err(illegal_operation());
    }
    match as_f64(&lhs).partial_cmp(&as_f64(&rhs)) {
        Some(ordering) => Ok(bool_value(accept(ordering))),
        // NaN comparisons are all false.
        None => Ok(bool_value(false)),
    }
}

fn logic(lhs: Value, rhs: Value, combine: impl Fn(bool, bool) -> bool) -> Result<Value, ValueError> {
    if !is_number(&lhs) || !is_number(&rhs) {
        return Err(illegal_operation());
    }
    Ok(bool_value(combine(lhs.is_truthy(), rhs.is_truthy())))
}

fn is_number(v: &Value) -> bool {
    matches!(v, Value::Int(_) | Value::Float(_))
}

fn as_f64(v: &Value) -> f64 {
    match v {
        Value::Int(n) => *n as f64,
        Value::Float(f) => *f,
        _ => 0.0,
    }
}

/// Resolve a possibly-negative index against `len`.
fn resolve_index(index: i64, len: usize) -> Result<usize, ValueError> {
    let adjusted = if index < 0 {
        index.wrapping_add(i64::try_from(len).unwrap_or(i64::MAX))
    } else {
        index
    };
    usize::try_from(adjusted)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| index_out_of_bounds(index, len))
}
