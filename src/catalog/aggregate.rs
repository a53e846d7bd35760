use std::sync::Arc;

use tracing::debug;

use super::{rank_for_display, Catalog};
use crate::record::{is_valid_id, Record, Versioned};
use crate::registry::{Registry, Subscription, Topic};

impl<R: Record> Registry<R> {
    /// Build the display sequence for `category`.
    ///
    /// User submissions come first, then the static catalog. Each record is
    /// replaced by its live registry version when one exists; submissions
    /// not yet in the registry are registered on the way. The result is
    /// stably sorted featured-first, then by descending identifier.
    pub fn aggregate_for_category<C>(&self, category: &str, catalog: &C) -> Vec<R>
    where
        C: Catalog<R> + ?Sized,
    {
        let submitted = self.shared.submissions.submissions_in(category);
        let baseline = catalog.records_in(category);
        let mut combined = Vec::with_capacity(submitted.len() + baseline.len());

        {
            let mut records = self.shared.records.write();
            for record in submitted {
                if !is_valid_id(record.id()) {
                    combined.push(record);
                    continue;
                }
                let live = records
                    .entry(record.id().to_string())
                    .or_insert_with(|| {
                        debug!(
                            collection = R::COLLECTION,
                            id = record.id(),
                            category,
                            "submitted record registered"
                        );
                        Versioned::initial(record.clone())
                    });
                combined.push(live.data.clone());
            }

            for record in baseline {
                match records.get(record.id()) {
                    Some(live) => combined.push(live.data.clone()),
                    None => combined.push(record),
                }
            }
        }

        rank_for_display(&mut combined);
        combined
    }

    /// Call `callback` with a fresh aggregation of `category` after every
    /// change to any record.
    ///
    /// The listener holds the registry weakly, so the subscription never
    /// keeps the registry alive.
    pub fn subscribe_to_category<C, F>(
        &self,
        category: impl Into<String>,
        catalog: Arc<C>,
        callback: F,
    ) -> Subscription
    where
        C: Catalog<R> + Send + Sync + ?Sized + 'static,
        F: Fn(&[R]) + Send + Sync + 'static,
    {
        let category = category.into();
        let registry = self.downgrade();

        self.subscribe(Topic::All, move |_changed: &R| {
            let Some(shared) = registry.upgrade() else {
                return;
            };
            let aggregated =
                Registry::from_shared(shared).aggregate_for_category(&category, catalog.as_ref());
            callback(&aggregated);
        })
    }
}
