//! Inventory configuration loader.

use std::path::Path;

use inventory_core::InventoryConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for inventory configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing fields fall back to [`InventoryConfig`] defaults, so a config
    /// file only needs to name what it overrides.
    pub fn load(path: &Path) -> LoadResult<InventoryConfig> {
        let content = read_file(path)?;
        let config: InventoryConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}
