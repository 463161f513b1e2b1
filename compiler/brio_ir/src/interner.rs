//! String interner for identifiers and string literals.
//!
//! Provides O(1) interning and lookup. Interned strings are leaked to get
//! `&'static str` handles; an interpreter session interns a bounded set of
//! identifiers, so the leak is bounded by the source text.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

struct InternerInner {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name::raw()`.
    strings: Vec<&'static str>,
}

/// String interner.
///
/// One interner is created per `run()` invocation and shared by the
/// lexer, parser, and evaluator of that run.
pub struct StringInterner {
    inner: RwLock<InternerInner>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let mut map = FxHashMap::default();
        map.insert("", 0u32);
        StringInterner {
            inner: RwLock::new(InternerInner {
                map,
                strings: vec![""],
            }),
        }
    }

    /// Intern a string, returning its [`Name`].
    ///
    /// Repeated calls with the same content return the same name.
    pub fn intern(&self, s: &str) -> Name {
        {
            let inner = self.inner.read();
            if let Some(&idx) = inner.map.get(s) {
                return Name::from_raw(idx);
            }
        }

        let mut inner = self.inner.write();
        // Double-check under the write lock: another caller may have
        // interned the string between the read and write sections.
        if let Some(&idx) = inner.map.get(s) {
            return Name::from_raw(idx);
        }
        let idx = u32::try_from(inner.strings.len()).unwrap_or(u32::MAX);
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        inner.map.insert(leaked, idx);
        inner.strings.push(leaked);
        Name::from_raw(idx)
    }

    /// Look up the string content for a name.
    ///
    /// Returns the empty string for a name that was never interned here,
    /// which cannot occur for names produced by this run's lexer.
    pub fn lookup(&self, name: Name) -> &'static str {
        let inner = self.inner.read();
        inner
            .strings
            .get(name.raw() as usize)
            .copied()
            .unwrap_or("")
    }

    /// Number of interned strings (including the pre-interned empty string).
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    /// Whether the interner holds only the pre-interned empty string.
    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn interning_is_idempotent() {
        let interner = StringInterner::new();
        let a = interner.intern("alpha");
        let b = interner.intern("alpha");
        assert_eq!(a, b);
        assert_eq!(interner.lookup(a), "alpha");
    }

    #[test]
    fn distinct_strings_get_distinct_names() {
        let interner = StringInterner::new();
        let a = interner.intern("alpha");
        let b = interner.intern("beta");
        assert_ne!(a, b);
        assert_eq!(interner.lookup(b), "beta");
    }

    #[test]
    fn empty_string_is_pre_interned() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), "");
    }
}
