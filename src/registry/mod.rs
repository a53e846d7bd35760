//! Registry - the shared, in-memory source of truth for records.
//!
//! A [`Registry`] holds one record per identifier and fans out every
//! merge-update to the listeners subscribed to that identifier or to all
//! records.
//!
//! ## Example
//!
//! ```ignore
//! use car_registry::{Car, CarPatch, Registry};
//!
//! let registry = Registry::<Car>::new();
//! registry.register(Car::new("car-1", "Corolla"));
//!
//! let _subscription = registry.subscribe("car-1", |car: &Car| {
//!     println!("price is now {}", car.price);
//! });
//!
//! registry.update("car-1", CarPatch::new().price(120));
//! ```

mod config;
mod listener;
#[allow(clippy::module_inception)]
mod registry;

pub use config::RegistryConfig;
pub use listener::{Subscription, Topic, WILDCARD};
pub use registry::{Registry, RegistryBuilder};
