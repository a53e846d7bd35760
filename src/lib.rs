//! Shared in-memory registry for marketplace listings.
//!
//! One [`Registry`] per record type holds the authoritative copy of every
//! record, merges partial updates over it, and synchronously notifies the
//! listeners subscribed to that record (or to all records).
//!
//! ```ignore
//! use car_registry::{Car, CarPatch, Registry, StaticCatalog};
//!
//! let registry = Registry::<Car>::new();
//! registry.register(Car::new("car-1", "Corolla"));
//!
//! let _sub = registry.subscribe("*", |car: &Car| println!("{} changed", car.id));
//! registry.update("car-1", CarPatch::new().price(120));
//! registry.record_bid("car-1", 5_000_000, "Ali");
//!
//! let catalog = StaticCatalog::<Car>::from_path("catalog.json")?;
//! let sedans = registry.aggregate_for_category("sedan", &catalog);
//! ```

// Lets `#[derive(Record)]` refer to `car_registry::Record` from inside this crate.
extern crate self as car_registry;

mod bidding;
mod car;
mod catalog;
mod clock;
mod error;
mod record;
mod registry;

pub use bidding::{Bid, Biddable};
pub use car::{Car, CarPatch, FuelType};
pub use catalog::{
    display_order, rank_for_display, Catalog, InMemorySubmissions, NoSubmissions, StaticCatalog,
    SubmissionSource,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CatalogError, RegistryError};
pub use record::{compare_ids, Record, Versioned};
pub use registry::{Registry, RegistryBuilder, RegistryConfig, Subscription, Topic, WILDCARD};

pub use car_registry_macros::Record;

#[doc(hidden)]
pub mod __private {
    pub use crate::record::serde_support::{is_empty_collection, present};
}
