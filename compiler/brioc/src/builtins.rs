//! The default global environment.
//!
//! Root bindings: `true` (1), `false` (0), `null`, and the builtin
//! functions below. Values are copy-on-write, so the list builtins
//! (`append`, `pop`, `extend`) return new lists and never mutate the
//! caller's binding; `pop` returns the list without the element, not
//! the element itself.

use std::rc::Rc;

use brio_eval::errors::illegal_operation;
use brio_eval::{
    evaluate_binary, BuiltinValue, LocalScope, Scope, SharedPrintHandler, Value, ValueError,
};
use brio_ir::{BinaryOp, StringInterner};

use crate::pipeline;

/// Install the default globals into `globals`.
pub fn install(
    interner: &Rc<StringInterner>,
    globals: &LocalScope<Scope>,
    handler: &SharedPrintHandler,
) {
    {
        let mut scope = globals.borrow_mut();
        scope.define(interner.intern("true"), Value::Int(1));
        scope.define(interner.intern("false"), Value::Int(0));
        scope.define(interner.intern("null"), Value::Unit);
    }

    let mut define = |builtin: BuiltinValue| {
        globals
            .borrow_mut()
            .define(interner.intern(builtin.name), Value::Builtin(builtin));
    };

    {
        let handler = Rc::clone(handler);
        define(BuiltinValue::new("print", &["value"], move |args| {
            handler.print(&args[0].to_string());
            Ok(Value::Unit)
        }));
    }
    {
        let handler = Rc::clone(handler);
        define(BuiltinValue::new("println", &["value"], move |args| {
            handler.println(&args[0].to_string());
            Ok(Value::Unit)
        }));
    }

    define(BuiltinValue::new("input", &[], |_args| {
        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .map_err(|e| ValueError::new(format!("Failed to read input: {e}")))?;
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Value::str(&line))
    }));

    define(BuiltinValue::new("len", &["value"], |args| match &args[0] {
        Value::Str(s) => Ok(Value::Int(count_as_i64(s.chars().count()))),
        Value::List(items) => Ok(Value::Int(count_as_i64(items.len()))),
        _ => Err(illegal_operation()),
    }));

    define(BuiltinValue::new("str", &["value"], |args| {
        Ok(Value::str(&args[0].to_string()))
    }));

    define(BuiltinValue::new("num", &["value"], |args| match &args[0] {
        value @ (Value::Int(_) | Value::Float(_)) => Ok(value.clone()),
        Value::Str(s) => {
            let text = s.trim();
            if let Ok(n) = text.parse::<i64>() {
                Ok(Value::Int(n))
            } else if let Ok(f) = text.parse::<f64>() {
                Ok(Value::Float(f))
            } else {
                Err(ValueError::new(format!(
                    "Could not convert '{text}' to a number"
                )))
            }
        }
        _ => Err(illegal_operation()),
    }));

    define(type_check("is_number", |v| {
        matches!(v, Value::Int(_) | Value::Float(_))
    }));
    define(type_check("is_string", |v| matches!(v, Value::Str(_))));
    define(type_check("is_list", |v| matches!(v, Value::List(_))));
    define(type_check("is_function", |v| {
        matches!(v, Value::Function(_) | Value::Builtin(_))
    }));

    // The list builtins are spellings of the list operators:
    // append == `+`, pop == `-`, extend == `*`.
    define(BuiltinValue::new("append", &["list", "value"], |args| {
        ensure_list(&args[0])?;
        evaluate_binary(BinaryOp::Add, args[0].clone(), args[1].clone())
    }));
    define(BuiltinValue::new("pop", &["list", "index"], |args| {
        ensure_list(&args[0])?;
        evaluate_binary(BinaryOp::Sub, args[0].clone(), args[1].clone())
    }));
    define(BuiltinValue::new("extend", &["list", "other"], |args| {
        ensure_list(&args[0])?;
        ensure_list(&args[1])?;
        evaluate_binary(BinaryOp::Mul, args[0].clone(), args[1].clone())
    }));

    {
        let handler = Rc::clone(handler);
        let interner = Rc::clone(interner);
        define(BuiltinValue::new("import", &["path"], move |args| {
            let Value::Str(path) = &args[0] else {
                return Err(illegal_operation());
            };
            pipeline::run_path(path.as_str(), &handler, Rc::clone(&interner)).map_err(|err| {
                ValueError::new(format!(
                    "Failed to load script \"{}\"\n{err}",
                    path.as_str()
                ))
            })
        }));
    }
}

fn type_check(name: &'static str, check: fn(&Value) -> bool) -> BuiltinValue {
    BuiltinValue::new(name, &["value"], move |args| {
        Ok(Value::Int(i64::from(check(&args[0]))))
    })
}

fn ensure_list(value: &Value) -> Result<(), ValueError> {
    match value {
        Value::List(_) => Ok(()),
        _ => Err(illegal_operation()),
    }
}

fn count_as_i64(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
