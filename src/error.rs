use std::path::PathBuf;

/// Errors reported by the registry operations that can be rejected.
///
/// The core operations (`register`, `update`, `get`, `record_bid`) never
/// fail; they degrade to no-ops or `None`. Only the version-checked update
/// reports errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("record not found: {collection}:{id}")]
    NotFound { collection: String, id: String },

    #[error(
        "concurrency conflict on {collection}:{id} (expected version {expected}, actual {actual})"
    )]
    ConcurrencyConflict {
        collection: String,
        id: String,
        expected: u64,
        actual: u64,
    },
}

/// Errors raised while loading a static catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
