//! The item catalog - the single, immutable registry of item definitions.
//!
//! A catalog is built once at startup (from the built-in list or from a
//! content file) and then only read. Lookups never fail: unknown ids resolve
//! to the undefined sentinel.

mod loader;

pub use loader::*;

use std::collections::HashMap;

use thiserror::Error;

use crate::items::{ItemCategory, ItemDefinition, ItemId};

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Item id {id} is defined more than once")]
    DuplicateId { id: ItemId },

    #[error("Item id {id} is reserved for the undefined item")]
    ReservedId { id: ItemId },

    #[error("Could not parse catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not read catalog file: {0}")]
    Io(#[from] std::io::Error),
}

/// Immutable registry of item definitions keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    /// Definitions in the order they were registered.
    items: Vec<ItemDefinition>,

    /// Index: id -> position in `items`.
    by_id: HashMap<ItemId, usize>,
}

impl ItemCatalog {
    /// Build a catalog from a fixed list of definitions.
    ///
    /// Rejects duplicate ids and the reserved undefined id.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = ItemDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for definition in definitions {
            let id = definition.id;
            if id.is_undefined() {
                return Err(CatalogError::ReservedId { id });
            }
            if catalog.by_id.contains_key(&id) {
                return Err(CatalogError::DuplicateId { id });
            }
            catalog.by_id.insert(id, catalog.items.len());
            catalog.items.push(definition);
        }

        tracing::debug!(items = catalog.items.len(), "item catalog built");
        Ok(catalog)
    }

    /// Look up a definition, falling back to the undefined sentinel.
    pub fn lookup(&self, id: ItemId) -> ItemDefinition {
        self.get(id).cloned().unwrap_or_else(ItemDefinition::undefined)
    }

    /// Get a definition by id, if registered.
    pub fn get(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.by_id.get(&id).map(|&index| &self.items[index])
    }

    /// Check if an id is registered.
    pub fn contains(&self, id: ItemId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Category of an item, `Undefined` for unknown ids.
    pub fn category_of(&self, id: ItemId) -> ItemCategory {
        self.get(id)
            .map(|item| item.category)
            .unwrap_or(ItemCategory::Undefined)
    }

    /// Get the number of registered definitions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog has no definitions.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.iter()
    }

    /// All currency definitions, most valuable first.
    pub fn currencies(&self) -> Vec<&ItemDefinition> {
        let mut currencies: Vec<_> = self
            .items
            .iter()
            .filter(|item| item.category.is_currency())
            .collect();
        currencies.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        currencies
    }
}
