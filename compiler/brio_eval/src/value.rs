//! Runtime values.

use std::fmt;
use std::rc::Rc;

use brio_ir::{ExprId, Name, SharedArena};

use crate::{Heap, LocalScope, Scope, ValueError};

/// A runtime value.
///
/// Scalars are inline; strings and lists are copy-on-write [`Heap`]
/// cells, so value semantics hold without eager copies.
#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(Heap<String>),
    List(Heap<Vec<Value>>),
    Function(FunctionValue),
    Builtin(BuiltinValue),
    /// The absence of a value: `null`, block results, bare `return`.
    Unit,
}

impl Value {
    /// Build a string value from borrowed text.
    pub fn str(text: &str) -> Self {
        Value::Str(Heap::new(text.to_owned()))
    }

    /// Build a list value.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    /// Truthiness: zero, empty, and unit are false; everything else true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(l) => !l.is_empty(),
            Value::Function(_) | Value::Builtin(_) => true,
            Value::Unit => false,
        }
    }

    /// Type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Function(_) => "function",
            Value::Builtin(_) => "built-in function",
            Value::Unit => "null",
        }
    }
}

impl PartialEq for Value {
    /// Structural equality. Ints and floats compare numerically across
    /// the type boundary; functions compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => {
                a.body == b.body && LocalScope::ptr_eq(&a.scope, &b.scope)
            }
            (Value::Builtin(a), Value::Builtin(b)) => Rc::ptr_eq(&a.func, &b.func),
            (Value::Unit, Value::Unit) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(v) => {
                // Keep floats visibly floats: whole values print as "3.0".
                if v.is_finite() && v.fract() == 0.0 {
                    write!(f, "{v:.1}")
                } else {
                    write!(f, "{v}")
                }
            }
            Value::Str(s) => write!(f, "{}", s.as_str()),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Function(func) => write!(f, "<function {}>", func.display_name),
            Value::Builtin(builtin) => write!(f, "<built-in function {}>", builtin.name),
            Value::Unit => write!(f, "null"),
        }
    }
}

/// A user-defined function.
///
/// Carries its defining scope (lexical capture) and its defining arena,
/// so functions handed across module boundaries stay callable.
#[derive(Clone)]
pub struct FunctionValue {
    /// Name shown in displays and tracebacks. `"<anonymous>"` when the
    /// definition had no name.
    pub display_name: &'static str,
    pub params: Rc<[Name]>,
    pub body: ExprId,
    /// The `-> expr` form returns its body value without `return`.
    pub auto_return: bool,
    pub scope: LocalScope<Scope>,
    pub arena: SharedArena,
}

impl fmt::Debug for FunctionValue {
    // Scopes can contain the function itself; don't walk them.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("display_name", &self.display_name)
            .field("params", &self.params.len())
            .field("body", &self.body)
            .field("auto_return", &self.auto_return)
            .finish_non_exhaustive()
    }
}

/// Signature of a builtin implementation.
///
/// Builtins see only their argument values; anything else they need
/// (output handler, module loader) is captured in the closure.
pub type BuiltinFn = Rc<dyn Fn(&[Value]) -> Result<Value, ValueError>>;

/// A builtin function installed in the root scope by the driver.
#[derive(Clone)]
pub struct BuiltinValue {
    pub name: &'static str,
    /// Parameter names, used for arity checking and messages.
    pub params: &'static [&'static str],
    pub func: BuiltinFn,
}

impl BuiltinValue {
    pub fn new(
        name: &'static str,
        params: &'static [&'static str],
        func: impl Fn(&[Value]) -> Result<Value, ValueError> + 'static,
    ) -> Self {
        BuiltinValue {
            name,
            params,
            func: Rc::new(func),
        }
    }
}

impl fmt::Debug for BuiltinValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinValue")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_formats() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::str("hi").to_string(), "hi");
        assert_eq!(Value::Unit.to_string(), "null");
        assert_eq!(
            Value::list(vec![Value::Int(1), Value::str("a")]).to_string(),
            "[1, a]"
        );
    }

    #[test]
    fn truthiness() {
        assert!(Value::Int(1).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(Value::str("x").is_truthy());
        assert!(!Value::str("").is_truthy());
        assert!(!Value::list(vec![]).is_truthy());
        assert!(!Value::Unit.is_truthy());
    }

    #[test]
    fn cross_type_numeric_equality() {
        assert_eq!(Value::Int(3), Value::Float(3.0));
        assert_ne!(Value::Int(3), Value::Float(3.5));
        assert_ne!(Value::Int(0), Value::Unit);
    }
}
