use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::Catalog;
use crate::error::CatalogError;

/// Baseline records keyed by category.
///
/// Usually loaded once at start-up from a JSON object mapping each category
/// to an array of records:
///
/// ```json
/// { "sedan": [{ "id": "1", "title": "Civic" }], "suv": [] }
/// ```
#[derive(Debug, Clone)]
pub struct StaticCatalog<R> {
    categories: BTreeMap<String, Vec<R>>,
}

impl<R> Default for StaticCatalog<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> StaticCatalog<R> {
    pub fn new() -> Self {
        Self {
            categories: BTreeMap::new(),
        }
    }

    /// Replace the records of `category`.
    pub fn with_category(mut self, category: impl Into<String>, records: Vec<R>) -> Self {
        self.categories.insert(category.into(), records);
        self
    }

    /// Append one record to `category`.
    pub fn push(&mut self, category: impl Into<String>, record: R) {
        self.categories.entry(category.into()).or_default().push(record);
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn get(&self, category: &str) -> &[R] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl<R: DeserializeOwned> StaticCatalog<R> {
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let categories: BTreeMap<String, Vec<R>> = serde_json::from_str(json)?;
        tracing::debug!(categories = categories.len(), "static catalog loaded");
        Ok(Self { categories })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

impl<R: Clone> Catalog<R> for StaticCatalog<R> {
    fn records_in(&self, category: &str) -> Vec<R> {
        self.get(category).to_vec()
    }
}
