// src/pool.rs

//! Interned string pool
//!
//! Catalog records repeat the same short strings thousands of times (origins,
//! categories, locale keys, package names). The pool hands out one shared
//! `Arc<str>` per distinct value so every record referencing it shares the
//! allocation. An entry is released once the pool holds the only reference
//! and `purge()` runs.
//!
//! The pool is an explicit handle owned by the `Store`; there is no global
//! instance. `stats()` is the diagnostic view of its contents.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Shared immutable string used throughout component records
pub type RefStr = Arc<str>;

/// Snapshot of pool usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Distinct strings held by the pool
    pub strings: usize,
    /// Total bytes of string data held
    pub bytes: usize,
    /// Strings currently referenced by at least one owner besides the pool
    pub shared: usize,
}

/// Deduplicating pool of shared strings
#[derive(Debug, Default)]
pub struct StringPool {
    strings: Mutex<HashSet<RefStr>>,
}

impl StringPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the pooled copy of `value`, inserting it if needed
    pub fn intern(&self, value: &str) -> RefStr {
        let mut strings = self.strings.lock();
        if let Some(existing) = strings.get(value) {
            return Arc::clone(existing);
        }
        let new: RefStr = Arc::from(value);
        strings.insert(Arc::clone(&new));
        new
    }

    /// Replace `value` with the pooled copy of the same text
    pub fn intern_in_place(&self, value: &mut RefStr) {
        let pooled = self.intern(value);
        *value = pooled;
    }

    /// Drop every string no longer referenced outside the pool
    ///
    /// Returns the number of strings released.
    pub fn purge(&self) -> usize {
        let mut strings = self.strings.lock();
        let before = strings.len();
        strings.retain(|s| Arc::strong_count(s) > 1);
        before - strings.len()
    }

    /// Number of distinct strings held
    pub fn len(&self) -> usize {
        self.strings.lock().len()
    }

    /// Check if the pool is empty
    pub fn is_empty(&self) -> bool {
        self.strings.lock().is_empty()
    }

    /// Diagnostic snapshot of the pool contents
    pub fn stats(&self) -> PoolStats {
        let strings = self.strings.lock();
        PoolStats {
            strings: strings.len(),
            bytes: strings.iter().map(|s| s.len()).sum(),
            shared: strings.iter().filter(|s| Arc::strong_count(s) > 1).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_shares_allocation() {
        let pool = StringPool::new();
        let a = pool.intern("fedora");
        let b = pool.intern("fedora");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_intern_in_place() {
        let pool = StringPool::new();
        let pooled = pool.intern("Utility");
        let mut value: RefStr = Arc::from("Utility");
        assert!(!Arc::ptr_eq(&pooled, &value));
        pool.intern_in_place(&mut value);
        assert!(Arc::ptr_eq(&pooled, &value));
    }

    #[test]
    fn test_purge_releases_unowned() {
        let pool = StringPool::new();
        let kept = pool.intern("kept");
        drop(pool.intern("dropped"));
        assert_eq!(pool.len(), 2);

        assert_eq!(pool.purge(), 1);
        assert_eq!(pool.len(), 1);
        assert_eq!(&*kept, "kept");
    }

    #[test]
    fn test_stats() {
        let pool = StringPool::new();
        let _held = pool.intern("abc");
        drop(pool.intern("defgh"));

        let stats = pool.stats();
        assert_eq!(stats.strings, 2);
        assert_eq!(stats.bytes, 8);
        assert_eq!(stats.shared, 1);
    }
}
