//! The tree-walking interpreter.
//!
//! One [`Interpreter`] evaluates one program. It holds the program's
//! arena and interner plus the live call stack; every runtime error
//! snapshots that stack into traceback frames at creation time.
//!
//! Calls into functions defined by another program (module imports)
//! temporarily swap in the callee's arena, so expression ids always
//! resolve against the arena they were allocated in.

use std::rc::Rc;

use brio_diagnostic::TraceFrame;
use brio_ir::{BinaryOp, ExprId, ExprKind, Name, SharedArena, Span, StringInterner};
use brio_stack::ensure_sufficient_stack;

use crate::errors::{
    illegal_operation, not_callable, too_few_args, too_many_args, undefined_variable,
};
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::{
    EvalResult, FunctionValue, LocalScope, RuntimeError, Scope, Signal, Value, ValueError,
};

/// Unwrap a value signal, propagating control-flow signals outward.
macro_rules! try_value {
    ($signal:expr) => {
        match $signal? {
            Signal::Value(value) => value,
            other => return Ok(other),
        }
    };
}

/// One live call, tracked for tracebacks.
struct Frame {
    display_name: &'static str,
    /// Span of the call expression in the caller's source.
    call_site: Span,
}

/// A numeric loop bound.
#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Float(f) => f,
        }
    }
}

pub struct Interpreter {
    arena: SharedArena,
    interner: Rc<StringInterner>,
    /// Call stack, outermost first. Index 0 is always the program frame.
    frames: Vec<Frame>,
}

impl Interpreter {
    pub fn new(arena: SharedArena, interner: Rc<StringInterner>) -> Self {
        Interpreter {
            arena,
            interner,
            frames: vec![Frame {
                display_name: "<program>",
                call_site: Span::DUMMY,
            }],
        }
    }

    /// Evaluate one expression in `env`.
    pub fn eval(&mut self, id: ExprId, env: &LocalScope<Scope>) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(id, env))
    }

    fn eval_inner(&mut self, id: ExprId, env: &LocalScope<Scope>) -> EvalResult {
        let span = self.arena.span(id);
        match self.arena.kind(id) {
            ExprKind::Int(n) => Ok(Signal::Value(Value::Int(n))),
            ExprKind::Float(bits) => Ok(Signal::Value(Value::Float(f64::from_bits(bits)))),
            ExprKind::Str(name) => Ok(Signal::Value(Value::str(self.interner.lookup(name)))),
            ExprKind::List(range) => {
                let ids = self.arena.expr_list(range).to_vec();
                let mut items = Vec::with_capacity(ids.len());
                for element in ids {
                    items.push(try_value!(self.eval(element, env)));
                }
                Ok(Signal::Value(Value::list(items)))
            }
            ExprKind::Var(name) => match env.borrow().lookup(name) {
                Some(value) => Ok(Signal::Value(value)),
                None => Err(self.error(undefined_variable(self.interner.lookup(name)), span)),
            },
            ExprKind::Assign { name, value, .. } => {
                let value = try_value!(self.eval(value, env));
                env.borrow_mut().define(name, value.clone());
                Ok(Signal::Value(value))
            }
            ExprKind::Binary { op, lhs, rhs } => {
                // Division failures (zero divisor, bad index) point at
                // the offending right operand, not the whole expression.
                let error_span = if op == BinaryOp::Div {
                    self.arena.span(rhs)
                } else {
                    span
                };
                let lhs = try_value!(self.eval(lhs, env));
                let rhs = try_value!(self.eval(rhs, env));
                evaluate_binary(op, lhs, rhs)
                    .map(Signal::Value)
                    .map_err(|e| self.error(e, error_span))
            }
            ExprKind::Unary { op, operand } => {
                let operand = try_value!(self.eval(operand, env));
                evaluate_unary(op, operand)
                    .map(Signal::Value)
                    .map_err(|e| self.error(e, span))
            }
            ExprKind::If { arms, else_body } => {
                let arms = self.arena.arms(arms).to_vec();
                for arm in arms {
                    let cond = try_value!(self.eval(arm.cond, env));
                    if cond.is_truthy() {
                        return self.eval(arm.body, env);
                    }
                }
                match else_body {
                    Some(body) => self.eval(body, env),
                    None => Ok(Signal::unit()),
                }
            }
            ExprKind::For {
                var,
                start,
                end,
                step,
                body,
                collect,
            } => self.eval_for(var, start, end, step, body, collect, env),
            ExprKind::While {
                cond,
                body,
                collect,
            } => self.eval_while(cond, body, collect, env),
            ExprKind::FuncDef {
                name,
                params,
                body,
                auto_return,
            } => {
                let function = FunctionValue {
                    display_name: name
                        .map_or("<anonymous>", |n| self.interner.lookup(n)),
                    params: self.arena.params(params).to_vec().into(),
                    body,
                    auto_return,
                    scope: env.clone(),
                    arena: Rc::clone(&self.arena),
                };
                let value = Value::Function(function);
                if let Some(name) = name {
                    env.borrow_mut().define(name, value.clone());
                }
                Ok(Signal::Value(value))
            }
            ExprKind::Call { callee, args } => {
                let callee = try_value!(self.eval(callee, env));
                let ids = self.arena.expr_list(args).to_vec();
                let mut values = Vec::with_capacity(ids.len());
                for arg in ids {
                    values.push(try_value!(self.eval(arg, env)));
                }
                self.call_value(callee, values, span)
            }
            ExprKind::Return(value) => {
                let value = match value {
                    Some(id) => try_value!(self.eval(id, env)),
                    None => Value::Unit,
                };
                Ok(Signal::Return(value))
            }
            ExprKind::Break => Ok(Signal::Break),
            ExprKind::Continue => Ok(Signal::Continue),
            ExprKind::Pass => Ok(Signal::unit()),
            ExprKind::Block(range) => {
                let stmts = self.arena.expr_list(range).to_vec();
                for stmt in stmts {
                    try_value!(self.eval(stmt, env));
                }
                Ok(Signal::unit())
            }
        }
    }

    /// Call a function or builtin value with already-evaluated arguments.
    pub fn call_value(&mut self, callee: Value, args: Vec<Value>, call_span: Span) -> EvalResult {
        match callee {
            Value::Function(func) => {
                self.check_arity(args.len(), func.params.len(), func.display_name, call_span)?;

                let frame_env = LocalScope::new(Scope::with_parent(func.scope.clone()));
                {
                    let mut frame = frame_env.borrow_mut();
                    for (&param, value) in func.params.iter().zip(args) {
                        frame.define(param, value);
                    }
                }

                self.frames.push(Frame {
                    display_name: func.display_name,
                    call_site: call_span,
                });
                let result = if Rc::ptr_eq(&self.arena, &func.arena) {
                    self.eval(func.body, &frame_env)
                } else {
                    // Cross-program call: resolve the body against its
                    // defining arena.
                    let saved = std::mem::replace(&mut self.arena, Rc::clone(&func.arena));
                    let result = self.eval(func.body, &frame_env);
                    self.arena = saved;
                    result
                };
                self.frames.pop();

                Ok(Signal::Value(match result? {
                    Signal::Return(value) => value,
                    Signal::Value(value) if func.auto_return => value,
                    // Block bodies and stray break/continue fall out as unit.
                    _ => Value::Unit,
                }))
            }
            Value::Builtin(builtin) => {
                self.check_arity(args.len(), builtin.params.len(), builtin.name, call_span)?;

                self.frames.push(Frame {
                    display_name: builtin.name,
                    call_site: call_span,
                });
                let result = (builtin.func)(&args).map_err(|e| self.error(e, call_span));
                self.frames.pop();
                Ok(Signal::Value(result?))
            }
            other => Err(self.error(not_callable(other.type_name()), call_span)),
        }
    }

    fn check_arity(
        &self,
        got: usize,
        want: usize,
        name: &str,
        call_span: Span,
    ) -> Result<(), RuntimeError> {
        if got > want {
            return Err(self.error(too_many_args(got - want, name), call_span));
        }
        if got < want {
            return Err(self.error(too_few_args(want - got, name), call_span));
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn eval_for(
        &mut self,
        var: Name,
        start: ExprId,
        end: ExprId,
        step: Option<ExprId>,
        body: ExprId,
        collect: bool,
        env: &LocalScope<Scope>,
    ) -> EvalResult {
        let start_num = {
            let v = try_value!(self.eval(start, env));
            self.expect_number(v, start)?
        };
        let end_num = {
            let v = try_value!(self.eval(end, env));
            self.expect_number(v, end)?
        };
        let step_num = match step {
            Some(step) => {
                let v = try_value!(self.eval(step, env));
                self.expect_number(v, step)?
            }
            None => Num::Int(1),
        };

        let mut collected = collect.then(Vec::new);

        // The candidate value is bound before the termination check, so
        // the first value that fails the bound stays bound afterwards.
        if let (Num::Int(mut i), Num::Int(end), Num::Int(step)) = (start_num, end_num, step_num) {
            loop {
                env.borrow_mut().define(var, Value::Int(i));
                let done = if step >= 0 { i >= end } else { i <= end };
                if done {
                    break;
                }
                match self.eval(body, env)? {
                    Signal::Value(value) => {
                        if let Some(out) = collected.as_mut() {
                            out.push(value);
                        }
                    }
                    Signal::Continue => {}
                    Signal::Break => break,
                    signal @ Signal::Return(_) => return Ok(signal),
                }
                i = i.wrapping_add(step);
            }
        } else {
            let (end, step) = (end_num.as_f64(), step_num.as_f64());
            let mut i = start_num.as_f64();
            loop {
                env.borrow_mut().define(var, Value::Float(i));
                let done = if step >= 0.0 { i >= end } else { i <= end };
                if done {
                    break;
                }
                match self.eval(body, env)? {
                    Signal::Value(value) => {
                        if let Some(out) = collected.as_mut() {
                            out.push(value);
                        }
                    }
                    Signal::Continue => {}
                    Signal::Break => break,
                    signal @ Signal::Return(_) => return Ok(signal),
                }
                i += step;
            }
        }

        Ok(Signal::Value(
            collected.map_or(Value::Unit, Value::list),
        ))
    }

    fn eval_while(
        &mut self,
        cond: ExprId,
        body: ExprId,
        collect: bool,
        env: &LocalScope<Scope>,
    ) -> EvalResult {
        let mut collected = collect.then(Vec::new);
        loop {
            let test = try_value!(self.eval(cond, env));
            if !test.is_truthy() {
                break;
            }
            match self.eval(body, env)? {
                Signal::Value(value) => {
                    if let Some(out) = collected.as_mut() {
                        out.push(value);
                    }
                }
                Signal::Continue => {}
                Signal::Break => break,
                signal @ Signal::Return(_) => return Ok(signal),
            }
        }
        Ok(Signal::Value(
            collected.map_or(Value::Unit, Value::list),
        ))
    }

    fn expect_number(&self, value: Value, at: ExprId) -> Result<Num, RuntimeError> {
        match value {
            Value::Int(n) => Ok(Num::Int(n)),
            Value::Float(f) => Ok(Num::Float(f)),
            _ => Err(self.error(illegal_operation(), self.arena.span(at))),
        }
    }

    /// Attach span and a call-stack snapshot to a value-level error.
    ///
    /// Frame `i`'s traceback line points at the call site recorded by
    /// frame `i + 1`; the innermost frame points at the error itself.
    pub fn error(&self, err: ValueError, span: Span) -> RuntimeError {
        let trace = self
            .frames
            .iter()
            .enumerate()
            .map(|(i, frame)| TraceFrame {
                display_name: frame.display_name.to_owned(),
                span: self.frames.get(i + 1).map_or(span, |next| next.call_site),
            })
            .collect();
        RuntimeError {
            message: err.message,
            span,
            trace,
        }
    }
}
