use std::cmp::Ordering;

/// Compare two record identifiers.
///
/// This is a total order. Identifiers that parse as unsigned integers rank
/// above every other identifier and compare numerically among themselves,
/// so `"10"` sorts after `"9"`. Everything else compares as plain strings.
/// Numerically equal spellings (`"07"`, `"7"`) fall back to string order.
/// Aggregation uses this as a recency proxy: a higher identifier is newer.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u128>(), b.parse::<u128>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Ok(_)) => Ordering::Less,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
