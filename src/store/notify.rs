// src/store/notify.rs

//! Change notification with reentrant batching
//!
//! Mutations mark the store dirty and emit per-component events right away.
//! The coalesced [`StoreEvent::Changed`] is different: while any
//! [`ChangeGuard`] from [`ChangeNotifier::inhibit`] is alive it is held back,
//! and dropping the outermost guard flushes exactly one `Changed` if anything
//! happened in between.
//!
//! ```text
//! inhibit()            depth 0 -> 1
//!   add / remove ...   dirty = true, no Changed
//!   inhibit()          depth 1 -> 2
//!   drop               depth 2 -> 1, nothing
//! drop                 depth 1 -> 0, one Changed
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of the event channel; slow subscribers see `Lagged`
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Events emitted by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The catalog changed (coalesced)
    Changed,
    /// A component was inserted
    ComponentAdded(Arc<str>),
    /// A component was removed
    ComponentRemoved(Arc<str>),
    /// A stored component was modified in place
    ComponentChanged(Arc<str>),
}

struct NotifierInner {
    depth: AtomicUsize,
    dirty: AtomicBool,
    event_tx: broadcast::Sender<StoreEvent>,
}

/// Event bus plus the inhibit counter
#[derive(Clone)]
pub struct ChangeNotifier {
    inner: Arc<NotifierInner>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(NotifierInner {
                depth: AtomicUsize::new(0),
                dirty: AtomicBool::new(false),
                event_tx,
            }),
        }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.inner.event_tx.subscribe()
    }

    /// Broadcast an event to all subscribers
    pub fn emit(&self, event: StoreEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.inner.event_tx.send(event);
    }

    /// Hold back `Changed` until the returned guard (and any nested ones) drop
    pub fn inhibit(&self) -> ChangeGuard {
        self.inner.depth.fetch_add(1, Ordering::SeqCst);
        ChangeGuard {
            notifier: self.clone(),
        }
    }

    pub fn is_inhibited(&self) -> bool {
        self.inner.depth.load(Ordering::SeqCst) > 0
    }

    /// Record that something changed, emitting `Changed` unless inhibited
    pub fn mark_changed(&self) {
        self.inner.dirty.store(true, Ordering::SeqCst);
        if !self.is_inhibited() {
            self.flush();
        }
    }

    fn flush(&self) {
        if self.inner.dirty.swap(false, Ordering::SeqCst) {
            self.emit(StoreEvent::Changed);
        }
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("depth", &self.inner.depth.load(Ordering::SeqCst))
            .field("dirty", &self.inner.dirty.load(Ordering::SeqCst))
            .finish()
    }
}

/// Scoped inhibit; released on every exit path, including `?` and panics
#[must_use = "dropping the guard immediately releases the inhibit"]
pub struct ChangeGuard {
    notifier: ChangeNotifier,
}

impl Drop for ChangeGuard {
    fn drop(&mut self) {
        if self.notifier.inner.depth.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.notifier.flush();
        }
    }
}
