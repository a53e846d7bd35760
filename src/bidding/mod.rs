//! Bidding - append-only bid history on records that accept bids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::Record;
use crate::registry::Registry;

/// One bid placed on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    /// Millisecond timestamp, strictly increasing within one registry.
    pub id: String,
    pub amount: u64,
    pub bidder: String,
    pub placed_at: DateTime<Utc>,
}

/// Records that keep a bid history.
pub trait Biddable: Record {
    /// Bids placed so far, oldest first.
    fn bids(&self) -> &[Bid];

    /// Patch that stores `bids` as the full history and records `amount`
    /// by `bidder` as the current highest bid.
    fn bid_patch(bids: Vec<Bid>, amount: u64, bidder: String) -> Self::Patch;
}

impl<R: Biddable> Registry<R> {
    /// Append a bid to the record and make it the current highest bid.
    ///
    /// Read, append and merge happen under one write lock, so concurrent
    /// bids never drop each other's entry. Listeners are notified as for
    /// [`Registry::update`]. Returns `None` when the record does not exist.
    ///
    /// The amount is not checked against the current bid and the auction
    /// end is not enforced; callers apply that policy before calling.
    pub fn record_bid(&self, id: &str, amount: u64, bidder: impl Into<String>) -> Option<R> {
        let bidder = bidder.into();
        let placed_at = self.shared.clock.now();

        let updated = self
            .modify(id, None, |current| {
                let bid_millis = self.shared.next_bid_millis(placed_at.timestamp_millis());
                let mut bids = current.bids().to_vec();
                bids.push(Bid {
                    id: bid_millis.to_string(),
                    amount,
                    bidder: bidder.clone(),
                    placed_at,
                });
                R::bid_patch(bids, amount, bidder)
            })
            .ok()?;

        debug!(
            collection = R::COLLECTION,
            id,
            amount,
            bids = updated.data.bids().len(),
            "bid recorded"
        );
        Some(updated.data)
    }
}
