//! Catalogs - baseline and user-submitted records grouped by category.
//!
//! Aggregation combines both sources with the registry's live state into
//! one display sequence per category (see
//! [`Registry::aggregate_for_category`](crate::Registry::aggregate_for_category)).

mod aggregate;
mod static_catalog;
mod submissions;

use std::cmp::Ordering;
use std::sync::Arc;

use crate::record::{compare_ids, Record};

pub use static_catalog::StaticCatalog;
pub use submissions::{InMemorySubmissions, NoSubmissions};

/// Read-only baseline data, per category, in catalog order.
pub trait Catalog<R> {
    fn records_in(&self, category: &str) -> Vec<R>;
}

impl<R, C: Catalog<R> + ?Sized> Catalog<R> for Arc<C> {
    fn records_in(&self, category: &str) -> Vec<R> {
        (**self).records_in(category)
    }
}

/// Records users have filed under a category, in submission order.
pub trait SubmissionSource<R>: Send + Sync {
    fn submissions_in(&self, category: &str) -> Vec<R>;
}

/// Display order: featured first, then higher identifiers first.
pub fn display_order<R: Record>(a: &R, b: &R) -> Ordering {
    b.is_featured()
        .cmp(&a.is_featured())
        .then_with(|| compare_ids(b.id(), a.id()))
}

/// Stable sort into display order; equal-ranked records keep their
/// relative input order.
pub fn rank_for_display<R: Record>(records: &mut [R]) {
    records.sort_by(display_order);
}
