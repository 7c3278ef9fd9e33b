//! Deterministic inventory placement engine shared across frontends.
//!
//! `inventory-core` defines the canonical rules for hosting items with
//! arbitrary multi-cell footprints on slot grids: one source of truth for
//! item identity ([`item::ItemCatalog`]), reversible placement and removal
//! that never leave a container inconsistent ([`grid::Grid`]), and linear
//! stack inventories ([`list::List`]). UI, persistence, and content layers
//! consume the capability traits in [`container`] and never touch slot
//! internals.
pub mod common;
pub mod config;
pub mod container;
pub mod error;
pub mod grid;
pub mod item;
pub mod list;
pub mod slot;

pub use common::Position;
pub use config::InventoryConfig;
pub use container::{
    ItemContainer, OnChanged, PositionalContainer, Redrawable, SingleItemContainer,
};
pub use error::{ErrorSeverity, InventoryError};
pub use grid::{CellFlat, Eviction, EvictionReason, Grid, GridFlat, PlacementError};
pub use item::{CatalogError, ItemCatalog, ItemId, ItemShape, ItemTemplate};
pub use list::{List, ListEntryFlat, ListFlat};
pub use slot::{Slot, SlotError, SlotKind, SlotVariant};
