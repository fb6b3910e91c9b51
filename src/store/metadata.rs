// src/store/metadata.rs

//! Lazily built metadata value indices
//!
//! The first `get_by_metadata` for a key builds a value -> components map
//! for that key; later queries for any value of the same key hit the map.
//! Any change to the store discards every index.

use super::ComponentKey;
use crate::pool::RefStr;
use parking_lot::Mutex;
use std::collections::HashMap;

type ValueIndex = HashMap<RefStr, Vec<ComponentKey>>;

#[derive(Debug, Default)]
pub(crate) struct MetadataIndex {
    indices: Mutex<HashMap<RefStr, ValueIndex>>,
}

impl MetadataIndex {
    /// Keys of components whose metadata `key` equals `value`
    ///
    /// `entries` yields `(component, value)` for every component carrying
    /// `key`; it is only consumed when the index for `key` is missing.
    pub fn lookup<'a, I>(&self, key: &str, value: &str, entries: I) -> Vec<ComponentKey>
    where
        I: IntoIterator<Item = (ComponentKey, &'a RefStr)>,
    {
        let mut indices = self.indices.lock();
        if !indices.contains_key(key) {
            let mut index = ValueIndex::new();
            for (component, v) in entries {
                index.entry(v.clone()).or_default().push(component);
            }
            indices.insert(RefStr::from(key), index);
        }
        indices
            .get(key)
            .and_then(|index| index.get(value))
            .cloned()
            .unwrap_or_default()
    }

    pub fn invalidate(&self) {
        self.indices.lock().clear();
    }

    /// Number of keys with a built index
    pub fn len(&self) -> usize {
        self.indices.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_index_built_once_until_invalidated() {
        let index = MetadataIndex::default();
        let gnome: RefStr = Arc::from("gnome");
        let kde: RefStr = Arc::from("kde");

        let hits = index.lookup("X-Desktop", "gnome", vec![(1, &gnome), (2, &kde), (3, &gnome)]);
        assert_eq!(hits, vec![1, 3]);
        assert_eq!(index.len(), 1);

        // already built: the entries are not consulted again
        let hits = index.lookup("X-Desktop", "kde", Vec::new());
        assert_eq!(hits, vec![2]);

        index.invalidate();
        assert_eq!(index.len(), 0);
        assert!(index.lookup("X-Desktop", "kde", Vec::new()).is_empty());
    }
}
