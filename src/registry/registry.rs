use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use super::listener::{Callback, ListenerRemoval, Listeners, Subscription, Topic};
use super::RegistryConfig;
use crate::catalog::{NoSubmissions, SubmissionSource};
use crate::clock::{Clock, SystemClock};
use crate::error::RegistryError;
use crate::record::{is_valid_id, Record, Versioned};

/// State shared by every clone of a [`Registry`].
pub(crate) struct Shared<R: Record> {
    pub(crate) records: RwLock<HashMap<String, Versioned<R>>>,
    listeners: Mutex<Listeners<R>>,
    last_bid_millis: Mutex<i64>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) submissions: Arc<dyn SubmissionSource<R>>,
}

impl<R: Record> Shared<R> {
    /// Next bid identifier: the clock's millisecond timestamp, bumped so
    /// identifiers handed out by this registry strictly increase.
    pub(crate) fn next_bid_millis(&self, now_millis: i64) -> i64 {
        let mut last = self.last_bid_millis.lock();
        let next = now_millis.max(last.saturating_add(1));
        *last = next;
        next
    }
}

impl<R: Record> ListenerRemoval for Shared<R> {
    fn remove_listener(&self, listener_id: u64) -> bool {
        let removed = self.listeners.lock().remove(listener_id);
        if removed {
            trace!(collection = R::COLLECTION, listener_id, "listener removed");
        }
        removed
    }
}

/// Shared in-memory registry of records with ordered change notification.
///
/// Clone-friendly via `Arc`: every clone sees the same records and
/// listeners. Construct one at the application's composition root and pass
/// it to whatever needs it.
pub struct Registry<R: Record> {
    pub(crate) shared: Arc<Shared<R>>,
}

impl<R: Record> Clone for Registry<R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<R: Record> Default for Registry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Registry<R> {
    /// Create an empty registry with default configuration.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> RegistryBuilder<R> {
        RegistryBuilder::new()
    }

    pub(crate) fn from_shared(shared: Arc<Shared<R>>) -> Self {
        Self { shared }
    }

    pub(crate) fn downgrade(&self) -> Weak<Shared<R>> {
        Arc::downgrade(&self.shared)
    }

    /// Insert `record` unless one with the same identifier already exists.
    ///
    /// The first registration wins; later calls are no-ops. A record with an
    /// empty identifier is ignored. Returns whether the record was stored.
    pub fn register(&self, record: R) -> bool {
        if !is_valid_id(record.id()) {
            return false;
        }

        let mut records = self.shared.records.write();
        if records.contains_key(record.id()) {
            debug!(
                collection = R::COLLECTION,
                id = record.id(),
                "record already registered"
            );
            return false;
        }

        debug!(collection = R::COLLECTION, id = record.id(), "record registered");
        records.insert(record.id().to_string(), Versioned::initial(record));
        true
    }

    /// Merge `patch` over the stored record and notify its listeners.
    ///
    /// Returns the merged record, or `None` when no record exists for `id`
    /// (nothing is created in that case). Last write wins.
    pub fn update(&self, id: &str, patch: R::Patch) -> Option<R> {
        self.modify(id, None, |_| patch)
            .ok()
            .map(|versioned| versioned.data)
    }

    /// Like [`Registry::update`] but only applies when the stored version
    /// equals `expected_version`.
    pub fn update_if_version(
        &self,
        id: &str,
        expected_version: u64,
        patch: R::Patch,
    ) -> Result<Versioned<R>, RegistryError> {
        self.modify(id, Some(expected_version), |_| patch)
    }

    /// Look up a record by identifier.
    pub fn get(&self, id: &str) -> Option<R> {
        self.get_versioned(id).map(|versioned| versioned.data)
    }

    pub fn get_versioned(&self, id: &str) -> Option<Versioned<R>> {
        if !is_valid_id(id) {
            return None;
        }
        self.shared.records.read().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.shared.records.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.shared.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.records.read().is_empty()
    }

    /// Identifiers of every stored record, in no particular order.
    pub fn ids(&self) -> Vec<String> {
        self.shared.records.read().keys().cloned().collect()
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.shared.listeners.lock().len()
    }

    /// Register `callback` for one record identifier, or for every record
    /// with [`Topic::All`] / `"*"`.
    ///
    /// Callbacks run synchronously inside the update that triggered them,
    /// in subscription order, and receive the merged record. An empty
    /// identifier yields an inert subscription.
    pub fn subscribe<F>(&self, topic: impl Into<Topic>, callback: F) -> Subscription
    where
        F: Fn(&R) + Send + Sync + 'static,
    {
        let topic = topic.into();
        let callback: Callback<R> = Arc::new(callback);

        let listener_id = self.shared.listeners.lock().insert(topic.clone(), callback);
        match listener_id {
            Some(listener_id) => {
                trace!(collection = R::COLLECTION, ?topic, listener_id, "listener added");
                let shared: Arc<dyn ListenerRemoval> = self.shared.clone();
                Subscription::new(listener_id, Arc::downgrade(&shared))
            }
            None => Subscription::inert(),
        }
    }

    /// Apply a patch built from the current record, bump the version, then
    /// notify. The write lock is released before any callback runs so
    /// callbacks may re-enter the registry.
    pub(crate) fn modify<F>(
        &self,
        id: &str,
        expected_version: Option<u64>,
        make_patch: F,
    ) -> Result<Versioned<R>, RegistryError>
    where
        F: FnOnce(&R) -> R::Patch,
    {
        let not_found = || RegistryError::NotFound {
            collection: R::COLLECTION.to_string(),
            id: id.to_string(),
        };
        if !is_valid_id(id) {
            return Err(not_found());
        }

        let updated = {
            let mut records = self.shared.records.write();
            let entry = records.get_mut(id).ok_or_else(not_found)?;

            if let Some(expected) = expected_version {
                if entry.version != expected {
                    return Err(RegistryError::ConcurrencyConflict {
                        collection: R::COLLECTION.to_string(),
                        id: id.to_string(),
                        expected,
                        actual: entry.version,
                    });
                }
            }

            let patch = make_patch(&entry.data);
            entry.data.apply(patch);
            entry.version += 1;
            entry.clone()
        };

        debug!(
            collection = R::COLLECTION,
            id,
            version = updated.version,
            "record updated"
        );
        self.notify(id, &updated.data);
        Ok(updated)
    }

    fn notify(&self, id: &str, record: &R) {
        let dispatches = self.shared.listeners.lock().matching(id);
        let mut delivered = 0usize;
        for dispatch in &dispatches {
            if dispatch.call(record) {
                delivered += 1;
            }
        }
        trace!(collection = R::COLLECTION, id, delivered, "listeners notified");
    }
}

/// Builder for a [`Registry`] with injected collaborators.
pub struct RegistryBuilder<R: Record> {
    config: RegistryConfig,
    clock: Arc<dyn Clock>,
    submissions: Arc<dyn SubmissionSource<R>>,
}

impl<R: Record> Default for RegistryBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RegistryBuilder<R> {
    pub fn new() -> Self {
        Self {
            config: RegistryConfig::default(),
            clock: Arc::new(SystemClock),
            submissions: Arc::new(NoSubmissions),
        }
    }

    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Clock used to timestamp bids.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Source of user-submitted records merged in by aggregation.
    pub fn submissions(mut self, submissions: impl SubmissionSource<R> + 'static) -> Self {
        self.submissions = Arc::new(submissions);
        self
    }

    pub fn build(self) -> Registry<R> {
        Registry::from_shared(Arc::new(Shared {
            records: RwLock::new(HashMap::new()),
            listeners: Mutex::new(Listeners::new(self.config.listener_warn_threshold)),
            last_bid_millis: Mutex::new(i64::MIN),
            clock: self.clock,
            submissions: self.submissions,
        }))
    }
}
