//! Item identity, shapes, and the template catalog.
//!
//! Items are referenced everywhere by [`ItemId`]; the data behind an id (its
//! shape, display metadata) lives in an [`ItemCatalog`] that is populated once
//! at startup and read-only afterwards.

pub mod catalog;
pub mod shape;

pub use catalog::{CatalogError, ItemCatalog, ItemTemplate};
pub use shape::ItemShape;

use std::fmt;

/// Opaque identifier for an item template.
///
/// Unique per template while the catalog is loaded; never reused for a
/// different template. Absence of an item is expressed as `Option<ItemId>`,
/// not a sentinel value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
