//! Car listings - the marketplace's record type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::bidding::{Bid, Biddable};
use crate::Record;

/// Fuel type of a listed car.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    #[default]
    Petrol,
    Diesel,
    Hybrid,
    Electric,
    Cng,
    Lpg,
}

/// A car listing.
///
/// Only the identifier, featured flag and bidding fields are interpreted by
/// the registry. Presentation-only fields the registry never inspects go
/// in `extra`, which merges key by key on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Record)]
#[record(collection = "cars")]
#[serde(default, rename_all = "camelCase")]
pub struct Car {
    #[record(id)]
    pub id: String,
    pub title: String,
    pub price: u64,
    pub year: u16,
    pub mileage: u32,
    pub city: String,
    pub fuel_type: FuelType,
    pub image: Option<String>,
    pub category: String,
    #[record(featured)]
    pub featured: bool,
    pub bidding_enabled: bool,
    pub bidding_ends_at: Option<DateTime<Utc>>,
    pub current_bid: Option<u64>,
    pub highest_bidder: Option<String>,
    pub bids: Vec<Bid>,
    #[record(extend)]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Car {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// True while bidding is enabled and the end time (if any) is after `now`.
    pub fn accepts_bids_at(&self, now: DateTime<Utc>) -> bool {
        self.bidding_enabled && self.bidding_ends_at.map_or(true, |end| end > now)
    }
}

impl Biddable for Car {
    fn bids(&self) -> &[Bid] {
        &self.bids
    }

    fn bid_patch(bids: Vec<Bid>, amount: u64, bidder: String) -> CarPatch {
        CarPatch::new()
            .bids(bids)
            .current_bid(Some(amount))
            .highest_bidder(Some(bidder))
    }
}
