//! Content loaders for reading inventory data from files.
//!
//! This module provides loaders that convert RON/TOML files into engine
//! types. Loader failures carry file context; engine-level validation errors
//! (duplicate ids) are surfaced, not papered over.

pub mod config;
pub mod item;

pub use config::ConfigLoader;
pub use item::{ItemCatalogSpec, ItemLoader, ItemTemplateSpec};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
