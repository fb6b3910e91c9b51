// src/lib.rs

//! Appcatalog component metadata store
//!
//! Collects partial, overlapping descriptions of software components
//! (applications, fonts, firmware, addons, ...) from system and user
//! catalogs, installed metainfo files and desktop launchers, and keeps one
//! authoritative, searchable record per component.
//!
//! # Architecture
//!
//! - Identity: six-part unique IDs with wildcard-aware equality
//! - Merging: priority and format trust decide between duplicates, and the
//!   loser's data is folded into the winner field by field
//! - Merge components: patches applied to components defined elsewhere,
//!   whichever arrives first
//! - Search: per-component stemmed token caches, built lazily or in parallel
//! - Notifications: a broadcast event bus with batched change events
//!
//! ```ignore
//! use appcatalog::{CancelToken, Scope, Store, StoreConfig};
//! use std::path::Path;
//!
//! let mut store = Store::new(StoreConfig::default());
//! store.load_from_path(Path::new("/usr/share/metainfo"), Scope::System, None, &CancelToken::new())?;
//! for hit in store.search("image editor") {
//!     println!("{} {}", hit.score, hit.unique_id);
//! }
//! ```

pub mod component;
pub mod config;
mod error;
pub mod parser;
pub mod pool;
pub mod search;
pub mod store;
pub mod validate;

pub use component::{Component, ComponentKind, Format, FormatKind, MergeKind, Scope, SubsumeFlags};
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use parser::{ParseError, Parser, SourceInfo, SourceParser};
pub use pool::{PoolStats, RefStr, StringPool};
pub use search::{SearchMatch, SearchResult};
pub use store::{CancelToken, ChangeGuard, FsEvent, Store, StoreEvent};
pub use validate::{DuplicateDataValidator, Problem, ProblemKind, ValidateFlags, Validator};
