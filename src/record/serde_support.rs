//! Helpers named by code that `#[derive(Record)]` generates.

use serde::{Deserialize, Deserializer};

/// Deserialize a field that is present in the input as `Some`, even when
/// its value is `null`. Absent fields fall back to the container default.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub fn is_empty_collection<T>(value: &T) -> bool
where
    for<'a> &'a T: IntoIterator,
{
    value.into_iter().next().is_none()
}
