// src/store/mod.rs

//! The component store
//!
//! The store owns every component and keeps one record per identity. All
//! ingestion goes through [`Store::add`], which reconciles the incoming
//! record with whatever is already stored:
//!
//! 1. records without an ID are rejected
//! 2. merge components (patches) are applied to matching stored records and
//!    kept pending for records that arrive later
//! 3. pending patches are folded into the incoming record
//! 4. an existing record with the same ID (or identity, in unique-ID mode)
//!    is looked up
//! 5. format trust and `priority` decide which record survives; the loser's
//!    formats and releases are always folded into the winner
//! 6. the survivor is (re)indexed and `ComponentAdded` is emitted
//!
//! Records live in an insertion-ordered arena keyed by a private integer;
//! every index maps to keys, never to owned copies.
//! Components refer to each other (addons) by unique ID only.

mod load;
mod metadata;
mod notify;
mod watch;

pub use load::{system_locations, user_locations, CancelToken};
pub use notify::{ChangeGuard, ChangeNotifier, StoreEvent};
pub use watch::{FsEvent, WatchEntry, WatchTable};

use crate::component::{
    unique_id_equal, unique_id_has_wildcard, Component, ComponentKind, FormatKind,
    LaunchableKind, ProvideKind, SubsumeFlags, UniqueId,
};
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::parser::{Parser, SourceParser};
use crate::pool::{PoolStats, RefStr, StringPool};
use crate::search::{rank, SearchContext, SearchResult, Stemmer, TokenCache};
use crate::validate::{Problem, ValidateFlags, Validator};
use indexmap::IndexMap;
use metadata::MetadataIndex;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Arena key of a stored component
pub(crate) type ComponentKey = u64;

/// Suffix toggled by the merge heuristic and ID fallbacks
const DESKTOP_SUFFIX: &str = ".desktop";

/// What survives when an incoming record meets a stored one
enum Resolution {
    /// The stored record stays; the incoming one has been folded into it
    KeepExisting,
    /// The stored record is dropped in favour of the incoming one
    Replace,
}

/// In-memory catalog of components
pub struct Store {
    config: StoreConfig,
    parser: Box<dyn Parser>,
    pool: StringPool,
    search: SearchContext,
    notifier: ChangeNotifier,
    watches: WatchTable,

    components: IndexMap<ComponentKey, Component>,
    next_key: ComponentKey,
    by_id: HashMap<RefStr, Vec<ComponentKey>>,
    by_unique_id: HashMap<RefStr, ComponentKey>,
    by_pkgname: HashMap<RefStr, ComponentKey>,
    /// Merge components by target ID, in arrival order
    merges: HashMap<RefStr, Vec<Component>>,
    metadata: MetadataIndex,
}

impl Store {
    /// Create an empty store using the built-in source parsers
    pub fn new(config: StoreConfig) -> Self {
        Self::with_parser(config, SourceParser::new())
    }

    /// Create an empty store with a custom parser
    pub fn with_parser(config: StoreConfig, parser: impl Parser + 'static) -> Self {
        let search = SearchContext::new(&config.search);
        Self {
            config,
            parser: Box::new(parser),
            pool: StringPool::new(),
            search,
            notifier: ChangeNotifier::new(),
            watches: WatchTable::default(),
            components: IndexMap::new(),
            next_key: 0,
            by_id: HashMap::new(),
            by_unique_id: HashMap::new(),
            by_pkgname: HashMap::new(),
            merges: HashMap::new(),
            metadata: MetadataIndex::default(),
        }
    }

    /// Replace the search stemmer; existing token caches are kept
    pub fn with_stemmer(mut self, stemmer: Arc<dyn Stemmer>) -> Self {
        self.search = self.search.with_stemmer(stemmer);
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Number of stored components (pending merge components excluded)
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// All stored components in insertion order
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    fn resolve(&self, keys: &[ComponentKey]) -> Vec<&Component> {
        keys.iter()
            .filter_map(|key| self.components.get(key))
            .collect()
    }

    /// Every component sharing an ID
    pub fn get_by_id(&self, id: &str) -> Vec<&Component> {
        self.by_id
            .get(id)
            .map(|keys| self.resolve(keys))
            .unwrap_or_default()
    }

    /// Like [`Store::get_by_id`], retrying with the `.desktop` suffix toggled
    pub fn get_by_id_with_fallbacks(&self, id: &str) -> Vec<&Component> {
        let found = self.get_by_id(id);
        if !found.is_empty() {
            return found;
        }
        self.get_by_id(&toggle_desktop_suffix(id))
    }

    /// Exact unique ID lookup; wildcard IDs return the first match
    pub fn get_by_unique_id(&self, unique_id: &str) -> Option<&Component> {
        if let Some(key) = self.by_unique_id.get(unique_id) {
            return self.components.get(key);
        }
        if unique_id_has_wildcard(unique_id) {
            return self.get_by_unique_id_wildcard(unique_id).into_iter().next();
        }
        None
    }

    /// Every component whose unique ID matches, treating `*` as a wildcard
    /// on either side
    pub fn get_by_unique_id_wildcard(&self, unique_id: &str) -> Vec<&Component> {
        let matches = |c: &&Component| unique_id_equal(c.unique_id(), unique_id);
        // a concrete ID segment narrows the scan to one bucket
        match UniqueId::parse(unique_id).ok().and_then(|parsed| parsed.id) {
            Some(id) => self.get_by_id(&id).into_iter().filter(matches).collect(),
            None => self.components.values().filter(matches).collect(),
        }
    }

    /// The component most recently indexed under a package name
    pub fn get_by_pkgname(&self, pkgname: &str) -> Option<&Component> {
        self.by_pkgname
            .get(pkgname)
            .and_then(|key| self.components.get(key))
    }

    /// First component providing a value
    pub fn get_by_provide(&self, kind: ProvideKind, value: &str) -> Option<&Component> {
        self.components.values().find(|c| {
            c.provides()
                .iter()
                .any(|p| p.kind == kind && &*p.value == value)
        })
    }

    /// First component with a matching launchable
    pub fn get_by_launchable(&self, kind: LaunchableKind, value: &str) -> Option<&Component> {
        self.components.values().find(|c| {
            c.launchables()
                .iter()
                .any(|l| l.kind == kind && &*l.value == value)
        })
    }

    /// Components whose metadata `key` equals `value`
    ///
    /// The first query for a key indexes that key across the store.
    pub fn get_by_metadata(&self, key: &str, value: &str) -> Vec<&Component> {
        let entries = self
            .components
            .iter()
            .filter_map(|(k, c)| c.metadata().get(key).map(|v| (*k, v)));
        let keys = self.metadata.lookup(key, value, entries);
        self.resolve(&keys)
    }

    /// Sorted, distinct IDs of every component of a kind
    pub fn get_ids_by_kind(&self, kind: ComponentKind) -> Vec<RefStr> {
        let mut ids: Vec<RefStr> = self
            .components
            .values()
            .filter(|c| c.kind() == kind)
            .filter_map(|c| c.id_ref().cloned())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Sorted target IDs of merge components seen so far
    pub fn pending_merge_ids(&self) -> Vec<RefStr> {
        let mut ids: Vec<RefStr> = self.merges.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Merge components recorded for a target ID
    pub fn merge_components(&self, id: &str) -> &[Component] {
        self.merges.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn watches(&self) -> &WatchTable {
        &self.watches
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Release pooled strings no component references any more
    pub fn purge_pool(&self) -> usize {
        self.pool.purge()
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<StoreEvent> {
        self.notifier.subscribe()
    }

    /// Batch changes: `Changed` is emitted once, when the last guard drops
    pub fn inhibit(&self) -> ChangeGuard {
        self.notifier.inhibit()
    }

    // ------------------------------------------------------------------
    // Adding
    // ------------------------------------------------------------------

    /// Add a batch of components under a single change notification
    pub fn add_many<I>(&mut self, components: I)
    where
        I: IntoIterator<Item = Component>,
    {
        let _guard = self.notifier.inhibit();
        for component in components {
            self.add(component);
        }
    }

    /// Add one component, reconciling it with what is already stored
    pub fn add(&mut self, mut component: Component) {
        if component.id().is_none() {
            warn!(
                "refusing to add component without an ID: {}",
                component.unique_id()
            );
            return;
        }
        component.intern(&self.pool);

        if component.merge_kind().is_patch() {
            self.add_merge_component(component);
            return;
        }

        self.apply_pending_merges(&mut component);

        let Some(key) = self.find_existing(&component) else {
            self.insert(component);
            return;
        };

        let previous = self.unique_id_of(key);
        match self.reconcile(key, &mut component) {
            Resolution::KeepExisting => self.existing_changed(key, previous),
            Resolution::Replace => {
                self.remove_key(key);
                self.insert(component);
            }
        }
    }

    /// Decide between a stored record and an incoming one, folding data
    /// across so nothing contributed by either is lost
    fn reconcile(&mut self, key: ComponentKey, incoming: &mut Component) -> Resolution {
        let prefer_local = self.config.add.prefer_local;
        let Some(item) = self.components.get_mut(&key) else {
            return Resolution::Replace;
        };
        let item_format = item.format_default().map(|f| f.kind()).unwrap_or_default();
        let new_format = incoming
            .format_default()
            .map(|f| f.kind())
            .unwrap_or_default();
        let salvage = SubsumeFlags::FORMATS | SubsumeFlags::RELEASES;
        let two_way = SubsumeFlags::DEFAULT | SubsumeFlags::BOTH_WAYS | SubsumeFlags::DEDUPE;

        if prefer_local {
            if new_format.is_remote() && item_format.is_local() {
                debug!("ignoring remote {} in favour of local copy", incoming);
                item.subsume_from(incoming, salvage);
                return Resolution::KeepExisting;
            }
            if new_format.is_local() && item_format.is_remote() {
                debug!("replacing remote {} with local copy", item);
                incoming.subsume_from(item, salvage);
                return Resolution::Replace;
            }
        } else {
            if item_format == FormatKind::AppStream && new_format.is_local_metadata() {
                debug!("replacing catalog entry {} with {}", item, new_format);
                incoming.subsume_from(item, salvage);
                return Resolution::Replace;
            }
            if item_format.is_local_metadata() && new_format == FormatKind::AppStream {
                debug!("merging catalog entry into {} {}", item_format, item);
                item.merge_with(incoming, two_way);
                return Resolution::KeepExisting;
            }
        }

        let (item_priority, new_priority) = (item.priority(), incoming.priority());
        if item_priority > new_priority {
            debug!(
                "ignoring duplicate {} (priority {} < {})",
                incoming, new_priority, item_priority
            );
            item.subsume_from(incoming, salvage);
            Resolution::KeepExisting
        } else if item_priority == new_priority {
            debug!("merging duplicate {}", incoming);
            item.merge_with(incoming, two_way);
            // a launcher is superseded by its own metainfo once both agree
            if item_format == FormatKind::Desktop && new_format.is_local_metadata() {
                Resolution::Replace
            } else {
                Resolution::KeepExisting
            }
        } else {
            debug!(
                "replacing {} (priority {} > {})",
                item, new_priority, item_priority
            );
            incoming.subsume_from(item, salvage);
            Resolution::Replace
        }
    }

    fn add_merge_component(&mut self, patch: Component) {
        let Some(id) = patch.id_ref().cloned() else {
            return;
        };
        let flags = merge_flags(&patch);
        let targets: Vec<ComponentKey> = self
            .by_id
            .get(&id)
            .map(|keys| {
                keys.iter()
                    .copied()
                    .filter(|key| {
                        self.components
                            .get(key)
                            .is_some_and(|c| merge_matches(&patch, c))
                    })
                    .collect()
            })
            .unwrap_or_default();

        if targets.is_empty() {
            debug!("no component for merge component {} yet, keeping it", id);
        }
        for key in targets {
            let previous = self.unique_id_of(key);
            if let Some(item) = self.components.get_mut(&key) {
                debug!("using merge component {} on {}", id, item);
                item.subsume_from(&patch, flags);
            }
            self.existing_changed(key, previous);
        }
        self.merges.entry(id).or_default().push(patch);
    }

    fn apply_pending_merges(&self, component: &mut Component) {
        let Some(patches) = component.id().and_then(|id| self.merges.get(id)) else {
            return;
        };
        for patch in patches {
            if merge_matches(patch, component) {
                debug!("using pending merge component on {}", component);
                component.subsume_from(patch, merge_flags(patch));
            }
        }
    }

    /// The stored record an incoming one should be reconciled with
    fn find_existing(&self, incoming: &Component) -> Option<ComponentKey> {
        let id = incoming.id()?;
        let use_unique_id = self.config.add.use_unique_id;
        let in_bucket = |id: &str, exact_id: bool| -> Option<ComponentKey> {
            let keys = self.by_id.get(id)?;
            if !use_unique_id {
                return keys.first().copied();
            }
            keys.iter().copied().find(|key| {
                self.components.get(key).is_some_and(|c| {
                    if exact_id {
                        c.identity_equal(incoming)
                    } else {
                        c.scope() == incoming.scope() && c.bundle_kind() == incoming.bundle_kind()
                    }
                })
            })
        };

        in_bucket(id, true).or_else(|| {
            self.config
                .add
                .use_merge_heuristic
                .then(|| in_bucket(&toggle_desktop_suffix(id), false))
                .flatten()
        })
    }

    fn insert(&mut self, component: Component) {
        let key = self.next_key;
        self.next_key += 1;

        let unique_id = component.unique_id_ref().clone();
        if let Some(id) = component.id_ref() {
            self.by_id.entry(id.clone()).or_default().push(key);
        }
        if let Some(previous) = self.by_unique_id.insert(unique_id.clone(), key) {
            debug!("{} now shadows an earlier record ({})", unique_id, previous);
        }
        for pkgname in component.pkgnames() {
            self.by_pkgname.insert(pkgname.clone(), key);
        }
        let addon = (component.kind() == ComponentKind::Addon).then(|| component.clone());
        self.components.insert(key, component);
        if let Some(addon) = addon {
            self.link_addon(&addon);
        }
        self.metadata.invalidate();

        self.notifier.emit(StoreEvent::ComponentAdded(unique_id));
        self.notifier.mark_changed();
    }

    fn unique_id_of(&self, key: ComponentKey) -> Option<RefStr> {
        self.components.get(&key).map(|c| c.unique_id_ref().clone())
    }

    /// Refresh indices after a stored record was modified in place
    ///
    /// `previous` is the record's unique ID before the modification.
    fn existing_changed(&mut self, key: ComponentKey, previous: Option<RefStr>) {
        let Some(component) = self.components.get(&key) else {
            return;
        };
        let unique_id = component.unique_id_ref().clone();
        let id = component.id_ref().cloned();
        let extends = (component.kind() == ComponentKind::Addon).then(|| component.extends().to_vec());
        if let Some(extends) = extends {
            let detached = previous.as_ref().unwrap_or(&unique_id).clone();
            self.detach_addon(&extends, &detached);
            if let Some(addon) = self.components.get(&key).cloned() {
                self.link_addon(&addon);
            }
        }
        if let Some(previous) = previous
            && previous != unique_id
            && self.by_unique_id.get(&previous) == Some(&key)
        {
            self.by_unique_id.remove(&previous);
            self.reindex_unique_id(id.as_ref(), &previous);
        }
        let Some(component) = self.components.get(&key) else {
            return;
        };
        self.by_unique_id.insert(unique_id.clone(), key);
        for pkgname in component.pkgnames() {
            self.by_pkgname.insert(pkgname.clone(), key);
        }
        self.metadata.invalidate();

        self.notifier.emit(StoreEvent::ComponentChanged(unique_id));
        self.notifier.mark_changed();
    }

    // ------------------------------------------------------------------
    // Removing
    // ------------------------------------------------------------------

    fn remove_key(&mut self, key: ComponentKey) -> Option<Component> {
        let component = self.components.shift_remove(&key)?;

        if let Some(id) = component.id_ref()
            && let Some(keys) = self.by_id.get_mut(id)
        {
            keys.retain(|k| *k != key);
            if keys.is_empty() {
                self.by_id.remove(id);
            }
        }
        let unique_id = component.unique_id_ref().clone();
        if self.by_unique_id.get(&unique_id) == Some(&key) {
            self.by_unique_id.remove(&unique_id);
            self.reindex_unique_id(component.id_ref(), &unique_id);
        }
        if component.kind() == ComponentKind::Addon {
            self.detach_addon(component.extends(), &unique_id);
        }
        for pkgname in component.pkgnames() {
            if self.by_pkgname.get(pkgname) == Some(&key) {
                self.by_pkgname.remove(pkgname);
            }
        }
        self.metadata.invalidate();

        self.notifier.emit(StoreEvent::ComponentRemoved(unique_id));
        self.notifier.mark_changed();
        Some(component)
    }

    /// Point a unique ID back at a stored record still carrying it
    ///
    /// Records differing only in architecture share a unique ID; when the
    /// indexed one goes away, another takes its place.
    fn reindex_unique_id(&mut self, id: Option<&RefStr>, unique_id: &RefStr) {
        let Some(keys) = id.and_then(|id| self.by_id.get(id)) else {
            return;
        };
        if let Some(key) = keys.iter().copied().find(|k| {
            self.components
                .get(k)
                .is_some_and(|c| c.unique_id_ref() == unique_id)
        }) {
            self.by_unique_id.insert(unique_id.clone(), key);
        }
    }

    fn remove_keys(&mut self, keys: Vec<ComponentKey>) -> usize {
        let guard = self.notifier.inhibit();
        let removed = keys
            .into_iter()
            .filter_map(|key| self.remove_key(key))
            .count();
        drop(guard);
        self.release_strings();
        removed
    }

    /// Purge the string pool unless a batch is still running
    fn release_strings(&self) {
        if self.notifier.is_inhibited() {
            return;
        }
        let released = self.pool.purge();
        if released > 0 {
            debug!("released {} pooled strings", released);
        }
    }

    /// Remove the stored record identity-equal to `component`
    pub fn remove(&mut self, component: &Component) -> bool {
        let key = self.by_unique_id.get(component.unique_id()).copied().or_else(|| {
            let keys = self.by_id.get(component.id()?)?;
            keys.iter().copied().find(|key| {
                self.components
                    .get(key)
                    .is_some_and(|c| c.identity_equal(component))
            })
        });
        key.and_then(|key| self.remove_key(key)).is_some()
    }

    /// Remove every record with an ID; pending merge components stay
    pub fn remove_by_id(&mut self, id: &str) -> usize {
        let keys = self.by_id.get(id).cloned().unwrap_or_default();
        self.remove_keys(keys)
    }

    /// Remove by unique ID; a wildcard ID removes every match
    pub fn remove_by_unique_id(&mut self, unique_id: &str) -> usize {
        let keys: Vec<ComponentKey> = if let Some(key) = self.by_unique_id.get(unique_id) {
            vec![*key]
        } else if unique_id_has_wildcard(unique_id) {
            self.components
                .iter()
                .filter(|(_, c)| unique_id_equal(c.unique_id(), unique_id))
                .map(|(k, _)| *k)
                .collect()
        } else {
            Vec::new()
        };
        self.remove_keys(keys)
    }

    /// Remove every record whose metadata `key` equals `value`
    pub fn remove_by_metadata(&mut self, key: &str, value: &str) -> usize {
        let keys: Vec<ComponentKey> = self
            .components
            .iter()
            .filter(|(_, c)| c.metadata_item(key) == Some(value))
            .map(|(k, _)| *k)
            .collect();
        self.remove_keys(keys)
    }

    /// Drop everything, including pending merge components
    pub fn remove_all(&mut self) {
        let keys: Vec<ComponentKey> = self.components.keys().copied().collect();
        let removed = self.remove_keys(keys);
        self.merges.clear();
        self.release_strings();
        debug!("removed {} components and all merge components", removed);
    }

    /// Strip everything a source file contributed
    ///
    /// Components left without any contributing format are removed; the
    /// rest keep the data other sources gave them. Merge components read
    /// from the file are forgotten.
    pub fn remove_by_source_file(&mut self, filename: &str) -> usize {
        let guard = self.notifier.inhibit();
        let owned: Vec<ComponentKey> = self
            .components
            .iter()
            .filter(|(_, c)| c.has_source_file(filename))
            .map(|(k, _)| *k)
            .collect();

        let mut removed = 0;
        for key in owned {
            let previous = self.unique_id_of(key);
            let orphaned = match self.components.get_mut(&key) {
                Some(c) => {
                    c.remove_formats_from_file(filename);
                    c.formats().is_empty()
                }
                None => continue,
            };
            if orphaned {
                self.remove_key(key);
                removed += 1;
            } else {
                self.existing_changed(key, previous);
            }
        }

        for patches in self.merges.values_mut() {
            patches.retain(|p| !p.has_source_file(filename));
        }
        self.merges.retain(|_, patches| !patches.is_empty());
        drop(guard);
        self.release_strings();
        removed
    }

    // ------------------------------------------------------------------
    // Addons
    // ------------------------------------------------------------------

    /// Attach one stored addon to its parents
    fn link_addon(&mut self, addon: &Component) {
        let unique_id = addon.unique_id_ref();
        for extends in addon.extends() {
            let Some(parents) = self.by_id.get(extends) else {
                continue;
            };
            for key in parents {
                if let Some(parent) = self.components.get_mut(key)
                    && parent.scope() == addon.scope()
                    && parent.bundle_kind() == addon.bundle_kind()
                {
                    parent.add_addon(unique_id.clone());
                }
            }
        }
    }

    /// Detach an addon from every parent it names; parents rebuild their
    /// token caches on the next search
    fn detach_addon(&mut self, extends: &[RefStr], unique_id: &str) {
        for parent_id in extends {
            let Some(parents) = self.by_id.get(parent_id) else {
                continue;
            };
            for key in parents {
                if let Some(parent) = self.components.get_mut(key) {
                    parent.remove_addon(unique_id);
                }
            }
        }
    }

    /// Attach every addon to the parents named in its `extends` list
    ///
    /// Parents must share the addon's scope and bundle kind. Attachments are
    /// rebuilt from scratch, so this is safe to run after every bulk load.
    pub fn attach_addons(&mut self) -> usize {
        let mut links: Vec<(ComponentKey, RefStr)> = Vec::new();
        for addon in self
            .components
            .values()
            .filter(|c| c.kind() == ComponentKind::Addon)
        {
            for extends in addon.extends() {
                let Some(parents) = self.by_id.get(extends) else {
                    debug!("{} extends unknown {}", addon, extends);
                    continue;
                };
                for key in parents {
                    if self.components.get(key).is_some_and(|parent| {
                        parent.scope() == addon.scope()
                            && parent.bundle_kind() == addon.bundle_kind()
                    }) {
                        links.push((*key, addon.unique_id_ref().clone()));
                    }
                }
            }
        }

        for component in self.components.values_mut() {
            component.clear_addons();
        }
        let attached = links.len();
        for (key, addon) in links {
            if let Some(parent) = self.components.get_mut(&key) {
                parent.add_addon(addon);
            }
        }
        attached
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    fn token_cache<'a>(&'a self, component: &'a Component) -> &'a TokenCache {
        component.token_cache.get_or_init(|| {
            let addons: Vec<&Component> = component
                .addons()
                .iter()
                .filter_map(|uid| self.by_unique_id.get(uid))
                .filter_map(|key| self.components.get(key))
                .collect();
            TokenCache::build(component, &addons, &self.search)
        })
    }

    /// Ranked full-text search; every query word must match
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        let tokens = self.search.query_tokens(query);
        if tokens.is_empty() {
            return Vec::new();
        }
        let mut results: Vec<SearchResult> = self
            .components
            .values()
            .filter_map(|c| {
                let score = self.token_cache(c).score_all(&tokens);
                (score > 0).then(|| SearchResult {
                    score,
                    unique_id: c.unique_id_ref().clone(),
                })
            })
            .collect();
        rank(&mut results);
        results
    }

    /// Build every missing token cache on a pool of `search.workers` threads
    pub fn build_search_caches(&self) -> Result<usize> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.search.workers)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to start search workers: {}", e)))?;

        let components: Vec<&Component> = self.components.values().collect();
        let tokens: usize = pool.install(|| {
            components
                .par_iter()
                .map(|c| self.token_cache(c).len())
                .sum()
        });
        info!(
            "built search caches for {} components ({} tokens)",
            components.len(),
            tokens
        );
        Ok(components.len())
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Run a validator over every component, keeping those with problems
    pub fn validate_all(
        &self,
        validator: &dyn Validator,
        flags: ValidateFlags,
    ) -> Vec<(RefStr, Vec<Problem>)> {
        self.components
            .values()
            .filter_map(|c| {
                let problems = validator.validate(c, flags);
                (!problems.is_empty()).then(|| (c.unique_id_ref().clone(), problems))
            })
            .collect()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("components", &self.components.len())
            .field("merges", &self.merges.len())
            .field("watches", &self.watches.len())
            .finish_non_exhaustive()
    }
}

/// Subsume flags a merge component is applied with
fn merge_flags(patch: &Component) -> SubsumeFlags {
    // the patch's own source file must not keep its targets alive
    let mut flags = (SubsumeFlags::DEFAULT - SubsumeFlags::FORMATS) | SubsumeFlags::NO_OVERWRITE;
    if patch.merge_kind() == crate::component::MergeKind::Replace {
        flags |= SubsumeFlags::REPLACE;
    }
    flags
}

fn merge_matches(patch: &Component, target: &Component) -> bool {
    if patch.has_quirk(crate::component::Quirks::MATCH_ANY_PREFIX) {
        return patch.id() == target.id();
    }
    patch.identity_equal(target)
}

fn toggle_desktop_suffix(id: &str) -> String {
    match id.strip_suffix(DESKTOP_SUFFIX) {
        Some(stem) => stem.to_string(),
        None => format!("{}{}", id, DESKTOP_SUFFIX),
    }
}
