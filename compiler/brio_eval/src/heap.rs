//! Reference-counted copy-on-write storage for heap values.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Copy-on-write heap cell for strings and lists.
///
/// Cloning a `Heap` shares the allocation. [`Heap::make_mut`] clones the
/// contents first if the allocation is shared, so mutation through one
/// handle is never visible through another.
pub struct Heap<T>(Rc<T>);

impl<T> Heap<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Heap(Rc::new(value))
    }

    /// Whether two handles share one allocation.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl<T: Clone> Heap<T> {
    /// Mutable access, cloning the contents first if shared.
    #[inline]
    pub fn make_mut(&mut self) -> &mut T {
        Rc::make_mut(&mut self.0)
    }

    /// Take the contents, cloning only if shared.
    pub fn into_inner(self) -> T {
        Rc::try_unwrap(self.0).unwrap_or_else(|rc| (*rc).clone())
    }
}

impl<T> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Rc::clone(&self.0))
    }
}

impl<T> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: PartialEq> PartialEq for Heap<T> {
    /// Content equality, not pointer equality.
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_shares_the_allocation() {
        let a = Heap::new(vec![1, 2, 3]);
        let b = a.clone();
        assert!(Heap::ptr_eq(&a, &b));
        assert_eq!(a, b);
    }

    #[test]
    fn make_mut_unshares() {
        let a = Heap::new(vec![1, 2, 3]);
        let mut b = a.clone();
        b.make_mut().push(4);
        assert_eq!(*a, vec![1, 2, 3]);
        assert_eq!(*b, vec![1, 2, 3, 4]);
        assert!(!Heap::ptr_eq(&a, &b));
    }

    #[test]
    fn equality_is_by_content() {
        let a = Heap::new("hi".to_owned());
        let b = Heap::new("hi".to_owned());
        assert_eq!(a, b);
        assert!(!Heap::ptr_eq(&a, &b));
    }
}
