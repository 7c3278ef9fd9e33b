//! Data-driven content definitions and loaders for the inventory engine.
//!
//! This crate turns external data files into engine state:
//! - Item catalogs (data-driven via RON)
//! - Inventory configuration (data-driven via TOML)
//!
//! Content is consumed once at startup; the resulting [`ItemCatalog`] is
//! shared immutably with containers and never reloaded mid-session.
//!
//! [`ItemCatalog`]: inventory_core::ItemCatalog

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ItemCatalogSpec, ItemLoader, ItemTemplateSpec, LoadResult};
