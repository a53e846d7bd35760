mod record;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Record)] derive macro
// ============================================================================

/// Derive macro for the `Record` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Debug, Serialize, Deserialize, Record)]
/// #[record(collection = "cars")]
/// struct Car {
///     #[record(id)]
///     pub id: String,
///     pub price: u64,
///     #[record(featured)]
///     pub featured: bool,
///     #[record(extend)]
///     pub extra: serde_json::Map<String, serde_json::Value>,
/// }
/// ```
///
/// Alongside the trait impl this generates `CarPatch`, a struct with one
/// `Option<T>` per non-id field and a chainable setter per field. For a field
/// that is itself an `Option`, JSON `null` deserializes to `Some(None)` so a
/// patch can clear it. The container `rename_all` rule is copied onto the patch.
///
/// - `#[record(collection = "...")]` sets the collection name.
///   If omitted, defaults to snake_case struct name + "s".
/// - `#[record(patch = "...")]` renames the generated patch struct.
/// - `#[record(id)]` marks the identifier field (defaults to a field named `id`).
///   The identifier is never part of the patch.
/// - `#[record(featured)]` marks the `bool` field reported by `is_featured`.
/// - `#[record(extend)]` merges the field with `Extend` instead of replacing it.
///   In the patch the field keeps its own type (empty means no change) and
///   keeps `#[serde(flatten)]` when the record field has it.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input)
}
