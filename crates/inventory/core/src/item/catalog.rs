//! Stable registry mapping item ids to their templates.

use std::collections::BTreeMap;

use crate::error::{ErrorSeverity, InventoryError};
use crate::item::{ItemId, ItemShape};

/// Immutable description of an item kind.
///
/// Created once at catalog load from external content data and read-only for
/// the engine's lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemTemplate {
    pub id: ItemId,
    pub shape: ItemShape,
    pub name: String,
    /// Size tier; bounds the shape editor grid (1..=5).
    pub tier: u8,
    pub description: String,
}

impl ItemTemplate {
    pub fn new(id: ItemId, shape: ItemShape, name: impl Into<String>) -> Self {
        Self {
            id,
            shape,
            name: name.into(),
            tier: 1,
            description: String::new(),
        }
    }

    pub fn with_tier(mut self, tier: u8) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Errors that occur while populating the catalog.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CatalogError {
    /// A template with this id is already registered.
    ///
    /// Surfaced to the loader instead of keep-first/overwrite so the caller
    /// decides recovery policy; silently keeping the first entry loses data.
    #[error("item id {id} is already registered")]
    DuplicateItemId {
        /// The conflicting id.
        id: ItemId,
    },
}

impl InventoryError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CatalogError::DuplicateItemId { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CatalogError::DuplicateItemId { .. } => "CATALOG_DUPLICATE_ITEM_ID",
        }
    }
}

/// Registry of item templates, keyed by id.
///
/// Populated once at startup, then shared immutably (typically behind an
/// `Arc`) across containers. Lookups are pure and side-effect-free. There is
/// no global instance; owners thread a handle through constructors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemCatalog {
    templates: BTreeMap<ItemId, ItemTemplate>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template, failing on id conflicts.
    pub fn register(&mut self, template: ItemTemplate) -> Result<(), CatalogError> {
        if self.templates.contains_key(&template.id) {
            return Err(CatalogError::DuplicateItemId { id: template.id });
        }
        self.templates.insert(template.id, template);
        Ok(())
    }

    pub fn lookup(&self, id: ItemId) -> Option<&ItemTemplate> {
        self.templates.get(&id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Iterates templates in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemTemplate> {
        self.templates.values()
    }
}
