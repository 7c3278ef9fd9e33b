/// Inventory configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct InventoryConfig {
    /// Default row count for newly created grids.
    pub default_rows: u32,
    /// Default column count for newly created grids.
    pub default_columns: u32,
    /// Maximum number of stack entries in a list container. None is unbounded.
    pub list_capacity: Option<usize>,
    /// Per-stack item capacity for stackable slots. None is unbounded.
    pub stack_size: Option<u32>,
}

impl InventoryConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of cells a single item shape may occupy (5x5 tier cap).
    pub const MAX_SHAPE_CELLS: usize = 25;
    /// Largest grid dimension the UI layer offers when sizing inventories.
    pub const MAX_GRID_DIMENSION: u32 = 20;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ROWS: u32 = 5;
    pub const DEFAULT_COLUMNS: u32 = 5;
    pub const DEFAULT_LIST_CAPACITY: usize = 20;
    pub const DEFAULT_STACK_SIZE: u32 = 99;

    pub fn new() -> Self {
        Self {
            default_rows: Self::DEFAULT_ROWS,
            default_columns: Self::DEFAULT_COLUMNS,
            list_capacity: Some(Self::DEFAULT_LIST_CAPACITY),
            stack_size: Some(Self::DEFAULT_STACK_SIZE),
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self::new()
    }
}
