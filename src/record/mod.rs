//! Records - typed, identifiable entities held by a [`Registry`](crate::Registry).
//!
//! A record type declares which collection it belongs to, how its
//! identifier is read, and how a partial patch is merged over it. The usual
//! way to get all three is `#[derive(Record)]`:
//!
//! ```ignore
//! use car_registry::Record;
//!
//! #[derive(Clone, Debug, Serialize, Deserialize, Record)]
//! #[record(collection = "boats")]
//! struct Boat {
//!     #[record(id)]
//!     pub id: String,
//!     pub length: u32,
//! }
//!
//! let mut boat = Boat { id: "b-1".into(), length: 9 };
//! boat.apply(BoatPatch::new().length(12));
//! ```

mod ordering;
pub(crate) mod serde_support;

pub use ordering::compare_ids;

/// Trait for types that can be stored in a registry.
pub trait Record: Clone + Send + Sync + 'static {
    /// Partial field set merged over a stored record by [`Record::apply`].
    type Patch: Send;

    /// The collection name for this record type (e.g., "cars").
    const COLLECTION: &'static str;

    /// Returns the unique identifier for this record instance.
    fn id(&self) -> &str;

    /// Shallow-merge `patch` over `self`. Fields present in the patch win,
    /// absent fields are left untouched, and the identifier never changes.
    fn apply(&mut self, patch: Self::Patch);

    /// Primary ranking signal when records are aggregated for display.
    fn is_featured(&self) -> bool {
        false
    }
}

/// A versioned wrapper around record data.
///
/// The version starts at 1 when the record is registered and grows by one
/// for every applied update.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

impl<T> Versioned<T> {
    pub(crate) fn initial(data: T) -> Self {
        Self { data, version: 1 }
    }
}

/// Identifiers must be non-empty to take effect.
pub(crate) fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
}
