//! Lexically scoped variable environments.
//!
//! A [`Scope`] is one frame of bindings plus an optional parent. Frames
//! are shared, not cloned: closures keep their defining frame alive
//! through the reference-counted [`LocalScope`] handle, so writes made
//! after capture stay visible to the closure.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use brio_ir::Name;

use crate::Value;

/// Single-threaded shared-mutable cell for scope frames.
///
/// Wraps `Rc<RefCell<T>>` so that all frame allocations go through one
/// factory. Not thread-safe; the evaluator runs single-threaded and `Rc`
/// avoids atomic overhead on this hot path.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    /// Whether two handles refer to the same frame.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// One frame of variable bindings.
///
/// Assignment always writes the current frame; there is no assign-through
/// to the parent. A function-body `x = 1` therefore shadows an outer `x`
/// rather than mutating it.
#[derive(Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<Name, Value>,
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    /// A root frame with no parent.
    pub fn new() -> Self {
        Scope::default()
    }

    /// A child frame. Lookups fall through to `parent`.
    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Bind a name in this frame, shadowing any outer binding.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Look a name up, walking the parent chain.
    pub fn lookup(&self, name: Name) -> Option<Value> {
        if let Some(value) = self.bindings.get(&name) {
            return Some(value.clone());
        }
        self.parent.as_ref()?.borrow().lookup(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn name(raw: u32) -> Name {
        Name::from_raw(raw)
    }

    #[test]
    fn lookup_walks_parent_chain() {
        let root = LocalScope::new(Scope::new());
        root.borrow_mut().define(name(1), Value::Int(10));
        let child = LocalScope::new(Scope::with_parent(root.clone()));
        assert_eq!(child.borrow().lookup(name(1)), Some(Value::Int(10)));
        assert_eq!(child.borrow().lookup(name(2)), None);
    }

    #[test]
    fn define_shadows_instead_of_assigning_through() {
        let root = LocalScope::new(Scope::new());
        root.borrow_mut().define(name(1), Value::Int(10));
        let child = LocalScope::new(Scope::with_parent(root.clone()));
        child.borrow_mut().define(name(1), Value::Int(20));
        assert_eq!(child.borrow().lookup(name(1)), Some(Value::Int(20)));
        assert_eq!(root.borrow().lookup(name(1)), Some(Value::Int(10)));
    }

    #[test]
    fn parent_writes_after_capture_are_visible() {
        let root = LocalScope::new(Scope::new());
        let child = LocalScope::new(Scope::with_parent(root.clone()));
        root.borrow_mut().define(name(3), Value::Int(7));
        assert_eq!(child.borrow().lookup(name(3)), Some(Value::Int(7)));
    }
}
