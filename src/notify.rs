//! Change notification.
//!
//! Observers register interest in an address. A change at address `C`
//! reaches an observer registered at `R` when:
//! - `R == C`,
//! - `R` is an ancestor of `C` and the observer asked for descendants, or
//! - `C` is an ancestor of `R` (a change to a collection touches its items).
//!
//! The notifier holds observers weakly; dropping the last `Arc` to an
//! observer unregisters it on the next registration or dispatch.

use crate::uri::ResourceUri;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tracing::{debug, trace};

/// Receives change notifications.
pub trait ChangeObserver: Send + Sync {
    fn on_change(&self, uri: &ResourceUri);
}

/// Handle returned by [`ChangeNotifier::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct Registration {
    id: ObserverId,
    uri: ResourceUri,
    descendants: bool,
    observer: Weak<dyn ChangeObserver>,
}

impl Registration {
    fn matches(&self, changed: &ResourceUri) -> bool {
        self.uri == *changed
            || (self.descendants && self.uri.is_ancestor_of(changed))
            || changed.is_ancestor_of(&self.uri)
    }
}

/// Registry of change observers.
#[derive(Default)]
pub struct ChangeNotifier {
    registrations: Mutex<Vec<Registration>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observer_count())
            .finish_non_exhaustive()
    }
}

impl ChangeNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `observer` at `uri`.
    pub fn register(
        &self,
        uri: &ResourceUri,
        descendants: bool,
        observer: &Arc<dyn ChangeObserver>,
    ) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        trace!(%uri, descendants, id = id.0, "Registering change observer");
        let mut registrations = self.lock();
        registrations.retain(|r| r.observer.strong_count() > 0);
        registrations.push(Registration {
            id,
            uri: uri.clone(),
            descendants,
            observer: Arc::downgrade(observer),
        });
        id
    }

    /// Remove a registration. Returns false if it was already gone.
    pub fn unregister(&self, id: ObserverId) -> bool {
        let mut registrations = self.lock();
        let before = registrations.len();
        registrations.retain(|r| r.id != id);
        registrations.len() != before
    }

    /// Dispatch a change at `uri` to every matching live observer.
    ///
    /// Returns the number of observers notified.
    pub fn notify_change(&self, uri: &ResourceUri) -> usize {
        let targets: Vec<Arc<dyn ChangeObserver>> = {
            let mut registrations = self.lock();
            registrations.retain(|r| r.observer.strong_count() > 0);
            registrations
                .iter()
                .filter(|r| r.matches(uri))
                .filter_map(|r| r.observer.upgrade())
                .collect()
        };

        debug!(%uri, observers = targets.len(), "Dispatching change notification");
        for observer in &targets {
            observer.on_change(uri);
        }
        targets.len()
    }

    /// Number of stored registrations, including ones not yet pruned.
    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.lock().len()
    }

    /// Number of live registrations.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|r| r.observer.strong_count() > 0)
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Registration>> {
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Observer that latches a flag on the first change it sees.
#[derive(Debug, Default)]
pub struct ChangeFlag {
    changed: AtomicBool,
}

impl ChangeFlag {
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.changed.load(Ordering::Acquire)
    }

    pub fn clear(&self) {
        self.changed.store(false, Ordering::Release);
    }
}

impl ChangeObserver for ChangeFlag {
    fn on_change(&self, _uri: &ResourceUri) {
        self.changed.store(true, Ordering::Release);
    }
}
