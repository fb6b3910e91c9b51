// src/store/watch.rs

//! Watched source paths
//!
//! Every file or directory the store loaded from is remembered together with
//! the scope and architecture it was loaded with, so a later filesystem event
//! for that path can be re-ingested the same way. Delivering the events is
//! the caller's business; see `Store::handle_fs_event`.

use crate::component::Scope;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Load context recorded for a watched path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchEntry {
    pub scope: Scope,
    pub arch: Option<String>,
}

impl WatchEntry {
    pub fn new(scope: Scope, arch: Option<&str>) -> Self {
        Self {
            scope,
            arch: arch.map(str::to_string),
        }
    }
}

/// A change reported for a path on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEvent {
    Added(PathBuf),
    Changed(PathBuf),
    Removed(PathBuf),
}

impl FsEvent {
    pub fn path(&self) -> &Path {
        match self {
            Self::Added(path) | Self::Changed(path) | Self::Removed(path) => path,
        }
    }
}

/// Paths the store has loaded from
#[derive(Debug, Default)]
pub struct WatchTable {
    entries: HashMap<PathBuf, WatchEntry>,
}

impl WatchTable {
    pub fn insert(&mut self, path: &Path, entry: WatchEntry) {
        self.entries.insert(path.to_path_buf(), entry);
    }

    /// Entry for a path, falling back to its parent directory's entry so
    /// files created after the load are picked up too
    pub fn lookup(&self, path: &Path) -> Option<&WatchEntry> {
        self.entries
            .get(path)
            .or_else(|| path.parent().and_then(|dir| self.entries.get(dir)))
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn remove(&mut self, path: &Path) -> Option<WatchEntry> {
        self.entries.remove(path)
    }

    /// All watched paths, sorted
    pub fn paths(&self) -> Vec<&Path> {
        let mut paths: Vec<&Path> = self.entries.keys().map(PathBuf::as_path).collect();
        paths.sort();
        paths
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_falls_back_to_directory() {
        let mut table = WatchTable::default();
        table.insert(
            Path::new("/usr/share/metainfo"),
            WatchEntry::new(Scope::System, Some("x86_64")),
        );

        let entry = table
            .lookup(Path::new("/usr/share/metainfo/new.metainfo.xml"))
            .unwrap();
        assert_eq!(entry.scope, Scope::System);
        assert_eq!(entry.arch.as_deref(), Some("x86_64"));

        assert!(table.lookup(Path::new("/usr/share/applications/a.desktop")).is_none());
    }

    #[test]
    fn test_exact_entry_wins() {
        let mut table = WatchTable::default();
        table.insert(Path::new("/data"), WatchEntry::new(Scope::System, None));
        table.insert(Path::new("/data/user.xml"), WatchEntry::new(Scope::User, None));
        assert_eq!(
            table.lookup(Path::new("/data/user.xml")).map(|e| e.scope),
            Some(Scope::User)
        );
        assert_eq!(table.paths().len(), 2);
    }

    #[test]
    fn test_event_path() {
        let event = FsEvent::Removed(PathBuf::from("/tmp/a.xml"));
        assert_eq!(event.path(), Path::new("/tmp/a.xml"));
    }
}
