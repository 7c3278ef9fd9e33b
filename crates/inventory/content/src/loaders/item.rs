//! Item catalog loader.
//!
//! Loads item templates from RON files into an [`ItemCatalog`]. Shapes are
//! normalized on load so authored offsets never leak into placement math.

use std::path::Path;

use inventory_core::{ItemCatalog, ItemId, ItemShape, ItemTemplate};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalogSpec {
    pub items: Vec<ItemTemplateSpec>,
}

/// Serialized form of a single item template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemTemplateSpec {
    pub id: u32,
    pub name: String,
    #[serde(default = "default_tier")]
    pub tier: u8,
    #[serde(default)]
    pub description: String,
    /// Relative occupancy cells; order matters for anchor tie-breaking.
    pub shape: Vec<(i32, i32)>,
}

fn default_tier() -> u8 {
    1
}

impl ItemTemplateSpec {
    fn into_template(self) -> ItemTemplate {
        let shape = ItemShape::from_coords(self.shape).normalize();
        ItemTemplate::new(ItemId(self.id), shape, self.name)
            .with_tier(self.tier)
            .with_description(self.description)
    }
}

/// Loader for item catalogs from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load an item catalog from a RON file.
    ///
    /// Duplicate ids abort the load; the caller decides whether to fix the
    /// data or drop the file. Templates with empty shapes load but are
    /// flagged, since no container will ever accept them.
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;
        let spec: ItemCatalogSpec = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        let mut catalog = ItemCatalog::new();
        for item_spec in spec.items {
            let template = item_spec.into_template();
            if !template.shape.is_placeable() {
                tracing::warn!(
                    id = template.id.0,
                    name = %template.name,
                    "item template has an empty shape and cannot be placed"
                );
            }
            catalog.register(template).map_err(|e| {
                anyhow::anyhow!("Invalid item catalog {}: {}", path.display(), e)
            })?;
        }
        tracing::info!(count = catalog.len(), path = %path.display(), "loaded item catalog");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_ron(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_and_normalizes_templates() {
        let file = write_ron(
            r#"(
                items: [
                    (id: 1, name: "Coin", shape: [(0, 0)]),
                    (id: 2, name: "Bracket", tier: 2, shape: [(2, 2), (3, 2), (2, 3)]),
                ],
            )"#,
        );

        let catalog = ItemLoader::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);

        let bracket = catalog.lookup(ItemId(2)).unwrap();
        assert_eq!(
            bracket.shape,
            ItemShape::from_coords([(0, 0), (1, 0), (0, 1)])
        );
        assert_eq!(bracket.tier, 2);
    }

    #[test]
    fn duplicate_ids_abort_the_load() {
        let file = write_ron(
            r#"(
                items: [
                    (id: 1, name: "Coin", shape: [(0, 0)]),
                    (id: 1, name: "Imposter", shape: [(0, 0)]),
                ],
            )"#,
        );

        let err = ItemLoader::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn malformed_ron_reports_parse_context() {
        let file = write_ron("(items: [");
        let err = ItemLoader::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("item catalog RON"));
    }
}
