// src/store/load.rs

//! Loading sources from disk and reacting to changes
//!
//! Bulk loads run under a single change inhibit and finish by re-attaching
//! addons, since an addon and its parent may come from different files read
//! in either order. Every path read is recorded in the watch table with the
//! scope and architecture it was read with.

use super::watch::{FsEvent, WatchEntry};
use super::Store;
use crate::component::Scope;
use crate::error::{Error, Result};
use crate::parser::{ParseError, SourceInfo};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// System-wide catalog and metadata directories
const SYSTEM_DIRS: &[&str] = &[
    "/usr/share/swcatalog/xml",
    "/usr/share/swcatalog/yaml",
    "/usr/share/app-info/xmls",
    "/usr/share/app-info/yaml",
    "/var/cache/swcatalog/xml",
    "/var/cache/app-info/xmls",
    "/usr/share/metainfo",
    "/usr/share/appdata",
    "/usr/share/applications",
];

/// Per-user directories, relative to the user data directory
const USER_DIRS: &[&str] = &[
    "swcatalog/xml",
    "swcatalog/yaml",
    "app-info/xmls",
    "app-info/yaml",
    "metainfo",
    "applications",
];

/// Extensions the built-in parsers understand
const SOURCE_EXTENSIONS: &[&str] = &[".xml", ".yml", ".yaml", ".desktop"];

/// Shared flag that stops a bulk load between files
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Standard system locations
pub fn system_locations() -> Vec<PathBuf> {
    SYSTEM_DIRS.iter().map(PathBuf::from).collect()
}

/// Standard per-user locations, empty when there is no data directory
pub fn user_locations() -> Vec<PathBuf> {
    dirs::data_dir()
        .map(|base| USER_DIRS.iter().map(|dir| base.join(dir)).collect())
        .unwrap_or_default()
}

fn is_loadable(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| SOURCE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)))
}

/// Name recorded on formats for a file; removal matches on it
fn source_name(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl Store {
    /// Parse and add components from an in-memory source
    ///
    /// `source_name` drives format detection and is recorded on every
    /// format, so `remove_by_source_file(source_name)` undoes the load.
    pub fn load_from_bytes(
        &mut self,
        bytes: &[u8],
        source_name: &str,
        scope: Scope,
        arch: Option<&str>,
    ) -> Result<usize> {
        let source = SourceInfo::new(source_name)
            .with_scope(scope)
            .with_arch(arch);
        let _guard = self.notifier.inhibit();
        let count = self
            .ingest(bytes, &source)
            .map_err(|source| Error::ParseError {
                path: source_name.to_string(),
                source,
            })?;
        self.attach_addons();
        Ok(count)
    }

    /// Load a file or a directory of sources
    ///
    /// Directories are read in file-name order and not recursively, except
    /// that `applications/` directories include one level of subdirectories.
    /// A cancelled token stops the load before the next file with
    /// [`Error::Cancelled`]; what was already added stays.
    pub fn load_from_path(
        &mut self,
        path: &Path,
        scope: Scope,
        arch: Option<&str>,
        cancel: &CancelToken,
    ) -> Result<usize> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let _guard = self.notifier.inhibit();
        let entry = WatchEntry::new(scope, arch);

        let count = if path.is_dir() {
            self.load_dir(path, &entry, cancel)?
        } else {
            let count = self.load_file_checked(path, &entry)?;
            self.watches.insert(path, entry);
            count
        };

        let addons = self.attach_addons();
        info!(
            "Loaded {} components from {} ({} addons attached)",
            count,
            path.display(),
            addons
        );
        Ok(count)
    }

    /// Load every existing standard location for a scope
    ///
    /// `Scope::Unknown` loads both system and user locations.
    pub fn load_locations(&mut self, scope: Scope, cancel: &CancelToken) -> Result<usize> {
        let mut locations: Vec<(PathBuf, Scope)> = Vec::new();
        if scope != Scope::User {
            locations.extend(system_locations().into_iter().map(|p| (p, Scope::System)));
        }
        if scope != Scope::System {
            locations.extend(user_locations().into_iter().map(|p| (p, Scope::User)));
        }

        let _guard = self.notifier.inhibit();
        let mut total = 0;
        for (dir, scope) in locations.iter().filter(|(dir, _)| dir.is_dir()) {
            total += self.load_from_path(dir, *scope, None, cancel)?;
        }
        Ok(total)
    }

    /// Re-ingest a watched path after it changed on disk
    ///
    /// Everything the path contributed is stripped first, then added and
    /// changed files are read again with their recorded scope and
    /// architecture. Files new to a watched directory use the directory's
    /// entry. Events for unwatched paths are ignored.
    pub fn handle_fs_event(&mut self, event: &FsEvent) -> Result<usize> {
        let path = event.path();
        let Some(entry) = self.watches.lookup(path).cloned() else {
            debug!("ignoring event for unwatched {}", path.display());
            return Ok(0);
        };
        let guard = self.notifier.inhibit();

        let mut removed = self.remove_by_source_file(&source_name(path));
        let count = match event {
            FsEvent::Removed(_) => {
                // a removed directory takes all its watched files along
                let nested: Vec<PathBuf> = self
                    .watches
                    .paths()
                    .into_iter()
                    .filter(|p| p.starts_with(path) && *p != path)
                    .map(Path::to_path_buf)
                    .collect();
                for file in &nested {
                    removed += self.remove_by_source_file(&source_name(file));
                    self.watches.remove(file);
                }
                self.watches.remove(path);
                debug!("{} removed, dropped {} components", path.display(), removed);
                removed
            }
            FsEvent::Added(_) | FsEvent::Changed(_) if path.is_dir() => {
                self.load_dir(path, &entry, &CancelToken::new())?
            }
            FsEvent::Added(_) | FsEvent::Changed(_) => {
                if !is_loadable(path) {
                    debug!("ignoring non-source file {}", path.display());
                    return Ok(0);
                }
                let count = self.load_file_checked(path, &entry)?;
                self.watches.insert(path, entry);
                count
            }
        };

        self.attach_addons();
        drop(guard);
        self.release_strings();
        Ok(count)
    }

    fn load_dir(&mut self, dir: &Path, entry: &WatchEntry, cancel: &CancelToken) -> Result<usize> {
        let depth = if dir.file_name().is_some_and(|n| n == "applications") {
            2
        } else {
            1
        };

        let mut files = Vec::new();
        for item in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(depth)
            .sort_by_file_name()
        {
            let item = item
                .map_err(|e| Error::IoError(format!("Failed to read {}: {}", dir.display(), e)))?;
            if item.path().is_file() && is_loadable(item.path()) {
                files.push(item.into_path());
            }
        }
        self.watches.insert(dir, entry.clone());

        let mut count = 0;
        for file in files {
            if cancel.is_cancelled() {
                info!("Load of {} cancelled after {} components", dir.display(), count);
                return Err(Error::Cancelled);
            }
            count += self.load_file_checked(&file, entry)?;
            self.watches.insert(&file, entry.clone());
        }
        Ok(count)
    }

    /// Load one file, skipping parse failures when `ignore_invalid` is set
    fn load_file_checked(&mut self, path: &Path, entry: &WatchEntry) -> Result<usize> {
        match self.load_file(path, entry) {
            Err(e @ Error::ParseError { .. }) if self.config.load.ignore_invalid => {
                warn!("Skipping invalid source: {}", e);
                Ok(0)
            }
            result => result,
        }
    }

    fn load_file(&mut self, path: &Path, entry: &WatchEntry) -> Result<usize> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::IoError(format!("Failed to read {}: {}", path.display(), e)))?;
        let name = source_name(path);
        let source = SourceInfo::new(&name)
            .with_scope(entry.scope)
            .with_arch(entry.arch.as_deref());
        let count = self
            .ingest(&bytes, &source)
            .map_err(|source| Error::ParseError { path: name, source })?;
        debug!("{}: {} components", path.display(), count);
        Ok(count)
    }

    fn ingest(&mut self, bytes: &[u8], source: &SourceInfo) -> std::result::Result<usize, ParseError> {
        let mut components = self.parser.parse(bytes, source)?;
        if self.config.load.only_native_languages {
            for component in &mut components {
                component.retain_locales(|locale| self.config.is_native_locale(locale));
            }
        }
        let count = components.len();
        self.add_many(components);
        Ok(count)
    }
}
