//! Stack safety utilities for deep recursion.
//!
//! Both the recursive-descent parser and the tree-walking evaluator
//! recurse once per nesting level of the source program. Deeply nested
//! input (generated code, adversarial scripts) would otherwise exhaust
//! the host stack; wrapping the recursive entry points in
//! [`ensure_sufficient_stack`] grows the stack on demand instead.

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
///
/// If the remaining stack is below the red zone threshold, additional
/// stack space is allocated before calling `f`.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
