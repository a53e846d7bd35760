//! Listener bookkeeping and the scoped [`Subscription`] guard.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// Topic string that subscribes to every record.
pub const WILDCARD: &str = "*";

/// What a listener is subscribed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Every record in the registry.
    All,
    /// A single record identifier.
    Record(String),
}

impl Topic {
    pub fn matches(&self, id: &str) -> bool {
        match self {
            Topic::All => true,
            Topic::Record(topic_id) => topic_id == id,
        }
    }

    fn is_valid(&self) -> bool {
        match self {
            Topic::All => true,
            Topic::Record(id) => crate::record::is_valid_id(id),
        }
    }
}

impl From<&str> for Topic {
    fn from(id: &str) -> Self {
        if id == WILDCARD {
            Topic::All
        } else {
            Topic::Record(id.to_string())
        }
    }
}

impl From<String> for Topic {
    fn from(id: String) -> Self {
        if id == WILDCARD {
            Topic::All
        } else {
            Topic::Record(id)
        }
    }
}

impl From<&String> for Topic {
    fn from(id: &String) -> Self {
        Topic::from(id.as_str())
    }
}

pub(crate) type Callback<R> = Arc<dyn Fn(&R) + Send + Sync>;

struct ListenerEntry<R> {
    id: u64,
    topic: Topic,
    callback: Callback<R>,
    active: Arc<AtomicBool>,
}

/// A callback captured for one dispatch, together with the flag that tells
/// whether it is still registered.
pub(crate) struct Dispatch<R> {
    callback: Callback<R>,
    active: Arc<AtomicBool>,
}

impl<R> Dispatch<R> {
    /// Invoke the callback unless the listener was removed since the
    /// dispatch list was captured.
    pub(crate) fn call(&self, record: &R) -> bool {
        if !self.active.load(Ordering::Acquire) {
            return false;
        }
        (self.callback)(record);
        true
    }
}

/// Ordered listener list. Insertion order is notification order.
pub(crate) struct Listeners<R> {
    entries: Vec<ListenerEntry<R>>,
    next_id: u64,
    warn_threshold: usize,
    warned: bool,
}

impl<R> Listeners<R> {
    pub(crate) fn new(warn_threshold: usize) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            warn_threshold,
            warned: false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `None` for an invalid topic; nothing is registered then.
    pub(crate) fn insert(&mut self, topic: Topic, callback: Callback<R>) -> Option<u64> {
        if !topic.is_valid() {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(ListenerEntry {
            id,
            topic,
            callback,
            active: Arc::new(AtomicBool::new(true)),
        });

        if self.entries.len() >= self.warn_threshold && !self.warned {
            self.warned = true;
            tracing::warn!(
                listeners = self.entries.len(),
                threshold = self.warn_threshold,
                "registry listener count crossed threshold; subscriptions may be leaking"
            );
        }

        Some(id)
    }

    /// Remove the entry with this listener id. Removing twice is a no-op.
    pub(crate) fn remove(&mut self, listener_id: u64) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.id == listener_id) else {
            return false;
        };

        let entry = self.entries.remove(index);
        entry.active.store(false, Ordering::Release);

        if self.entries.len() < self.warn_threshold {
            self.warned = false;
        }
        true
    }

    /// Capture, in registration order, every listener interested in `id`.
    pub(crate) fn matching(&self, id: &str) -> Vec<Dispatch<R>> {
        self.entries
            .iter()
            .filter(|e| e.topic.matches(id))
            .map(|e| Dispatch {
                callback: Arc::clone(&e.callback),
                active: Arc::clone(&e.active),
            })
            .collect()
    }
}

/// Removal seam between a type-erased [`Subscription`] and its registry.
pub(crate) trait ListenerRemoval: Send + Sync {
    fn remove_listener(&self, listener_id: u64) -> bool;
}

/// Handle for a registered listener.
///
/// Dropping the handle unsubscribes, so a view that owns its subscription
/// releases it on every exit path. Use [`Subscription::detach`] to keep the
/// listener for the registry's lifetime instead.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    listener_id: u64,
    owner: Option<Weak<dyn ListenerRemoval>>,
}

impl Subscription {
    pub(crate) fn new(listener_id: u64, owner: Weak<dyn ListenerRemoval>) -> Self {
        Self {
            listener_id,
            owner: Some(owner),
        }
    }

    /// A subscription that was never registered (e.g. empty identifier).
    pub(crate) fn inert() -> Self {
        Self {
            listener_id: 0,
            owner: None,
        }
    }

    /// True while the listener is still registered with a live registry.
    pub fn is_active(&self) -> bool {
        self.owner
            .as_ref()
            .is_some_and(|owner| owner.strong_count() > 0)
    }

    /// Remove exactly this listener. Returns whether anything was removed;
    /// calling it again is a no-op that returns `false`.
    pub fn unsubscribe(&mut self) -> bool {
        match self.owner.take().and_then(|owner| owner.upgrade()) {
            Some(registry) => registry.remove_listener(self.listener_id),
            None => false,
        }
    }

    /// Give up the handle without unsubscribing.
    pub fn detach(mut self) {
        self.owner = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("listener_id", &self.listener_id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording(log: &Arc<Mutex<Vec<u32>>>, tag: u32) -> Callback<u32> {
        let log = Arc::clone(log);
        Arc::new(move |value: &u32| log.lock().unwrap().push(tag * 100 + value))
    }

    #[test]
    fn wildcard_topic_parses_from_star() {
        assert_eq!(Topic::from("*"), Topic::All);
        assert_eq!(Topic::from("car-1"), Topic::Record("car-1".into()));
        assert!(Topic::All.matches("anything"));
        assert!(!Topic::from("car-1").matches("car-2"));
    }

    #[test]
    fn empty_topic_is_not_registered() {
        let mut listeners = Listeners::<u32>::new(usize::MAX);
        let log = Arc::new(Mutex::new(Vec::new()));
        assert!(listeners.insert(Topic::from(""), recording(&log, 1)).is_none());
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn matching_keeps_registration_order() {
        let mut listeners = Listeners::<u32>::new(usize::MAX);
        let log = Arc::new(Mutex::new(Vec::new()));
        listeners.insert(Topic::All, recording(&log, 1));
        listeners.insert(Topic::from("a"), recording(&log, 2));
        listeners.insert(Topic::from("b"), recording(&log, 3));
        listeners.insert(Topic::from("a"), recording(&log, 4));

        for dispatch in listeners.matching("a") {
            dispatch.call(&7);
        }
        assert_eq!(*log.lock().unwrap(), vec![107, 207, 407]);
    }

    #[test]
    fn removed_listener_is_skipped_by_captured_dispatch() {
        let mut listeners = Listeners::<u32>::new(usize::MAX);
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = listeners.insert(Topic::All, recording(&log, 1)).unwrap();

        let captured = listeners.matching("x");
        assert!(listeners.remove(first));
        assert!(!listeners.remove(first));

        assert!(!captured[0].call(&1));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn warning_rearms_after_dropping_below_threshold() {
        let mut listeners = Listeners::<u32>::new(2);
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = listeners.insert(Topic::All, recording(&log, 1)).unwrap();
        listeners.insert(Topic::All, recording(&log, 2));
        assert!(listeners.warned);

        listeners.remove(a);
        assert!(!listeners.warned);
    }

    #[test]
    fn inert_subscription_is_a_no_op() {
        let mut subscription = Subscription::inert();
        assert!(!subscription.is_active());
        assert!(!subscription.unsubscribe());
    }
}
