use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::SubmissionSource;

/// Submission source with nothing in it; the registry default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSubmissions;

impl<R> SubmissionSource<R> for NoSubmissions {
    fn submissions_in(&self, _category: &str) -> Vec<R> {
        Vec::new()
    }
}

/// In-memory store of user-submitted records per category.
///
/// Clone-friendly via Arc: hand one clone to the registry builder and keep
/// another to file new submissions.
#[derive(Debug)]
pub struct InMemorySubmissions<R> {
    categories: Arc<RwLock<BTreeMap<String, Vec<R>>>>,
}

impl<R> Clone for InMemorySubmissions<R> {
    fn clone(&self) -> Self {
        Self {
            categories: Arc::clone(&self.categories),
        }
    }
}

impl<R> Default for InMemorySubmissions<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> InMemorySubmissions<R> {
    pub fn new() -> Self {
        Self {
            categories: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// File `record` under `category`, after earlier submissions.
    pub fn submit(&self, category: impl Into<String>, record: R) {
        self.categories
            .write()
            .entry(category.into())
            .or_default()
            .push(record);
    }

    pub fn len(&self, category: &str) -> usize {
        self.categories.read().get(category).map_or(0, Vec::len)
    }
}

impl<R: Clone + Send + Sync> SubmissionSource<R> for InMemorySubmissions<R> {
    fn submissions_in(&self, category: &str) -> Vec<R> {
        self.categories
            .read()
            .get(category)
            .cloned()
            .unwrap_or_default()
    }
}
