//! 2D slot grid and the placement/removal algorithm.
//!
//! The grid owns all of its slots by value in a flat row-major array and is
//! the single authority over multi-cell footprints: the anchor cell stores
//! the item id, every other footprint cell stores a back-reference to the
//! anchor. All mutation is validate-then-commit; a failed operation leaves
//! the grid exactly as it was.

use std::fmt;
use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::common::Position;
use crate::config::InventoryConfig;
use crate::container::{ItemContainer, OnChanged, PositionalContainer, Redrawable};
use crate::error::{ErrorSeverity, InventoryError};
use crate::item::{ItemCatalog, ItemId, ItemShape};
use crate::slot::{Slot, SlotKind, SlotVariant};

/// Scratch storage for a translated footprint. Shapes are bounded by the
/// largest tier grid, so this never allocates.
type Footprint = ArrayVec<Position, { InventoryConfig::MAX_SHAPE_CELLS }>;

/// Errors returned by grid placement operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlacementError {
    /// One or more footprint cells are out of bounds, disabled, or occupied.
    /// The placement is rejected wholesale.
    #[error("cannot place item anchored at {anchor}")]
    Invalid {
        /// The requested anchor cell.
        anchor: Position,
    },

    /// The shape has no positions and cannot occupy any cell.
    #[error("shape is empty")]
    EmptyShape,

    /// The shape exceeds the engine's footprint bound.
    #[error("shape has {cells} cells (max {max})", max = InventoryConfig::MAX_SHAPE_CELLS)]
    ShapeTooLarge { cells: usize },

    /// The item id is not present in the catalog.
    #[error("item {item} is not in the catalog")]
    UnknownItem { item: ItemId },

    /// A flat representation does not match its declared dimensions.
    #[error("flat cell array has {actual} entries, expected {expected}")]
    LayoutMismatch { expected: usize, actual: usize },
}

impl InventoryError for PlacementError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            PlacementError::Invalid { .. } => ErrorSeverity::Recoverable,
            PlacementError::EmptyShape
            | PlacementError::ShapeTooLarge { .. }
            | PlacementError::UnknownItem { .. }
            | PlacementError::LayoutMismatch { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            PlacementError::Invalid { .. } => "PLACEMENT_INVALID",
            PlacementError::EmptyShape => "PLACEMENT_EMPTY_SHAPE",
            PlacementError::ShapeTooLarge { .. } => "PLACEMENT_SHAPE_TOO_LARGE",
            PlacementError::UnknownItem { .. } => "PLACEMENT_UNKNOWN_ITEM",
            PlacementError::LayoutMismatch { .. } => "PLACEMENT_LAYOUT_MISMATCH",
        }
    }
}

/// Why an item was forcibly removed from a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvictionReason {
    /// A resize left part of the footprint outside the new bounds.
    DanglingAnchor,
    /// A cell holding part of the item was disabled.
    SlotDisabled,
}

/// Report of a forced removal. Never silent: every eviction is returned to
/// the caller, who decides where the item goes next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Eviction {
    pub item: ItemId,
    /// Anchor cell the item occupied before eviction.
    pub anchor: Position,
    /// Stack count lost with the eviction (1 for non-stackable slots).
    pub count: u32,
    pub reason: EvictionReason,
}

/// Flat snapshot of a single cell, independent of any host serialization
/// hooks. Satellite cells store no occupant; anchor references are recomputed
/// on load, never trusted from storage.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellFlat {
    pub occupant: Option<ItemId>,
    pub count: u32,
    pub enabled: bool,
    pub variant: SlotVariant,
    pub capacity: Option<u32>,
}

/// Flat, serialization-friendly snapshot of a grid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridFlat {
    pub rows: u32,
    pub columns: u32,
    /// Row-major cell snapshots, `rows * columns` entries.
    pub cells: Vec<CellFlat>,
}

/// 2D collection of slots hosting items with arbitrary multi-cell footprints.
pub struct Grid {
    rows: u32,
    columns: u32,
    /// Row-major: index = y * columns + x.
    cells: Vec<Slot>,
    catalog: Arc<ItemCatalog>,
    on_changed: Option<OnChanged>,
}

impl Grid {
    /// Creates a grid of empty, enabled plain slots.
    pub fn new(rows: u32, columns: u32, catalog: Arc<ItemCatalog>) -> Self {
        Self::from_layout(rows, columns, catalog, Slot::new)
    }

    /// Creates a grid with a caller-provided slot for each position, e.g. to
    /// lay out locked or stackable cells. The returned slot must carry the
    /// position it was asked for.
    pub fn from_layout(
        rows: u32,
        columns: u32,
        catalog: Arc<ItemCatalog>,
        mut layout: impl FnMut(Position) -> Slot,
    ) -> Self {
        let mut cells = Vec::with_capacity((rows * columns) as usize);
        for y in 0..rows as i32 {
            for x in 0..columns as i32 {
                cells.push(layout(Position::new(x, y)));
            }
        }
        Self {
            rows,
            columns,
            cells,
            catalog,
            on_changed: None,
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn catalog(&self) -> &Arc<ItemCatalog> {
        &self.catalog
    }

    /// Read access to a cell; None when out of bounds.
    pub fn slot(&self, position: Position) -> Option<&Slot> {
        self.index(position).map(|i| &self.cells[i])
    }

    /// Iterates cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Slot> {
        self.cells.iter()
    }

    fn index(&self, position: Position) -> Option<usize> {
        if position.x < 0 || position.y < 0 {
            return None;
        }
        let (x, y) = (position.x as u32, position.y as u32);
        if x >= self.columns || y >= self.rows {
            return None;
        }
        Some((y * self.columns + x) as usize)
    }

    fn position_of(&self, index: usize) -> Position {
        Position::new(
            (index as u32 % self.columns) as i32,
            (index as u32 / self.columns) as i32,
        )
    }

    fn notify(&mut self) {
        if let Some(hook) = self.on_changed.as_mut() {
            hook();
        }
    }

    /// Translates a shape so its anchor lands on `anchor_target`.
    fn footprint(anchor_target: Position, shape: &ItemShape) -> Result<Footprint, PlacementError> {
        if !shape.is_placeable() {
            return Err(PlacementError::EmptyShape);
        }
        if shape.len() > InventoryConfig::MAX_SHAPE_CELLS {
            return Err(PlacementError::ShapeTooLarge { cells: shape.len() });
        }
        let origin = shape.anchor();
        let mut cells = Footprint::new();
        for &p in shape.positions() {
            cells.push(anchor_target + p - origin);
        }
        Ok(cells)
    }

    /// Shared validation walk over a translated footprint: resolves every
    /// cell to its index and proves it accepts the placement. Stackable slots
    /// hold single-cell stacks only. Returns the anchor index and the
    /// satellite indices, or None when any cell fails.
    fn validate(
        &self,
        anchor_target: Position,
        cells: &Footprint,
    ) -> Option<(usize, ArrayVec<usize, { InventoryConfig::MAX_SHAPE_CELLS }>)> {
        let mut anchor_index = None;
        let mut satellites = ArrayVec::new();
        for &cell in cells {
            let i = self.index(cell)?;
            if !self.cells[i].accepts() {
                return None;
            }
            if cells.len() > 1 && self.cells[i].variant() == SlotVariant::Stackable {
                return None;
            }
            if cell == anchor_target {
                anchor_index = Some(i);
            } else {
                satellites.push(i);
            }
        }
        // The shape's own anchor always maps onto anchor_target.
        anchor_index.map(|i| (i, satellites))
    }

    /// True iff [`Grid::place`] would succeed for this footprint. No partial
    /// answers: a single failing cell fails the whole placement.
    pub fn can_place(&self, anchor_target: Position, shape: &ItemShape) -> bool {
        match Self::footprint(anchor_target, shape) {
            Ok(cells) => self.validate(anchor_target, &cells).is_some(),
            Err(_) => false,
        }
    }

    /// Places an item's shape onto the grid with its anchor at
    /// `anchor_target`.
    ///
    /// Two-phase write after full validation: the item id goes into the
    /// anchor cell, then every other footprint cell records a back-reference
    /// to the anchor. Nothing observes the grid between the two phases.
    ///
    /// `shape` must be the item's template shape; [`Grid::place_item`]
    /// resolves it from the catalog.
    pub fn place(
        &mut self,
        anchor_target: Position,
        item: ItemId,
        shape: &ItemShape,
    ) -> Result<(), PlacementError> {
        let cells = Self::footprint(anchor_target, shape)?;
        let invalid = PlacementError::Invalid {
            anchor: anchor_target,
        };
        let (anchor_index, satellites) =
            self.validate(anchor_target, &cells).ok_or(invalid)?;

        self.cells[anchor_index].put(item).map_err(|_| invalid)?;
        for i in satellites {
            self.cells[i].set_anchor_ref(anchor_target);
        }
        self.notify();
        Ok(())
    }

    /// Places an item using its template shape from the catalog.
    pub fn place_item(
        &mut self,
        anchor_target: Position,
        item: ItemId,
    ) -> Result<(), PlacementError> {
        let catalog = Arc::clone(&self.catalog);
        let template = catalog
            .lookup(item)
            .ok_or(PlacementError::UnknownItem { item })?;
        self.place(anchor_target, item, &template.shape)
    }

    /// Removes the item covering `position`, whichever of its cells that is.
    ///
    /// The true anchor is resolved through the cell's back-reference, the
    /// footprint is re-derived from the occupant's template shape, and every
    /// footprint cell is freed. Returns the removed item id, or None if the
    /// position is empty, disabled, or out of bounds.
    pub fn remove(&mut self, position: Position) -> Option<ItemId> {
        let slot = self.slot(position)?;
        let anchor = slot.anchor_ref().unwrap_or(position);
        let anchor_index = self.index(anchor)?;
        let item = self.cells[anchor_index].occupant()?;

        let removed = self.cells[anchor_index].remove()?;
        debug_assert_eq!(removed, item);

        // A stackable anchor keeps its occupant until the count hits zero;
        // satellites only ever exist for plain multi-cell placements, which
        // are fully vacated here.
        if self.cells[anchor_index].occupant().is_none() {
            let catalog = Arc::clone(&self.catalog);
            match catalog.lookup(item) {
                Some(template) => match Self::footprint(anchor, &template.shape) {
                    Ok(cells) => {
                        for &cell in &cells {
                            if cell == anchor {
                                continue;
                            }
                            if let Some(i) = self.index(cell) {
                                debug_assert_eq!(self.cells[i].anchor_ref(), Some(anchor));
                                self.cells[i].clear_anchor_ref();
                            }
                        }
                    }
                    Err(_) => self.clear_satellites_of(anchor),
                },
                // Catalog no longer knows the item; scan instead so the
                // footprint is still freed completely.
                None => self.clear_satellites_of(anchor),
            }
        }

        self.notify();
        Some(removed)
    }

    /// Returns the occupant covering `position`, resolving satellite cells to
    /// their anchor. Any cell of a multi-cell item reports the same id.
    pub fn get_item(&self, position: Position) -> Option<ItemId> {
        let slot = self.slot(position)?;
        let anchor = slot.anchor_ref().unwrap_or(position);
        self.slot(anchor)?.occupant()
    }

    fn clear_satellites_of(&mut self, anchor: Position) {
        for slot in &mut self.cells {
            if slot.anchor_ref() == Some(anchor) {
                slot.clear_anchor_ref();
            }
        }
    }

    /// Unconditionally removes the item anchored at `anchor`, including a
    /// full stack, and reports it.
    fn force_evict(&mut self, anchor: Position, reason: EvictionReason) -> Option<Eviction> {
        let anchor_index = self.index(anchor)?;
        let item = self.cells[anchor_index].occupant()?;
        let count = self.cells[anchor_index].count();
        self.clear_satellites_of(anchor);
        self.cells[anchor_index].force_clear();
        Some(Eviction {
            item,
            anchor,
            count,
            reason,
        })
    }

    /// Resizes the grid, preserving every cell whose coordinates remain in
    /// bounds and constructing fresh enabled slots for new coordinates.
    ///
    /// Any item whose footprint would not survive intact is forcibly removed
    /// before cells move, so no anchor reference ever dangles into the void.
    /// The evictions are reported, never silently dropped.
    pub fn resize(&mut self, rows: u32, columns: u32) -> Vec<Eviction> {
        if rows == self.rows && columns == self.columns {
            return Vec::new();
        }
        let in_new_bounds = |p: Position| {
            p.x >= 0 && p.y >= 0 && (p.x as u32) < columns && (p.y as u32) < rows
        };

        let mut doomed = Vec::new();
        for slot in &self.cells {
            let Some(item) = slot.occupant() else { continue };
            if slot.anchor_ref().is_some() {
                continue;
            }
            let anchor = slot.position();
            let survives = match self.catalog.lookup(item) {
                Some(template) => Self::footprint(anchor, &template.shape)
                    .map(|cells| cells.iter().all(|&c| in_new_bounds(c)))
                    .unwrap_or(false),
                // Unverifiable footprint: evict rather than risk a dangling
                // anchor after the move.
                None => false,
            };
            if !survives {
                doomed.push(anchor);
            }
        }

        let mut evictions = Vec::new();
        for anchor in doomed {
            if let Some(eviction) = self.force_evict(anchor, EvictionReason::DanglingAnchor) {
                evictions.push(eviction);
            }
        }

        let mut cells = Vec::with_capacity((rows * columns) as usize);
        for y in 0..rows as i32 {
            for x in 0..columns as i32 {
                let position = Position::new(x, y);
                cells.push(
                    self.slot(position)
                        .cloned()
                        .unwrap_or_else(|| Slot::new(position)),
                );
            }
        }
        self.rows = rows;
        self.columns = columns;
        self.cells = cells;
        self.notify();
        evictions
    }

    /// Sets the enabled flag on one cell.
    ///
    /// Disabling a cell that holds part of an item forcibly evicts the whole
    /// item first and reports it; the engine never leaves a footprint
    /// straddling a disabled cell. Locked cells are unaffected.
    pub fn set_enabled(&mut self, position: Position, enabled: bool) -> Option<Eviction> {
        let i = self.index(position)?;
        let was = self.cells[i].is_enabled();
        let mut eviction = None;
        if !enabled && was {
            let anchor = self.cells[i].anchor_ref().unwrap_or(position);
            if self.slot(anchor).and_then(Slot::occupant).is_some() {
                eviction = self.force_evict(anchor, EvictionReason::SlotDisabled);
            }
        }
        self.cells[i].set_enabled(enabled);
        // Locked cells ignore the toggle; a no-op stays silent.
        if self.cells[i].is_enabled() != was {
            self.notify();
        }
        eviction
    }

    /// Sets the enabled flag on every cell, evicting all held items first
    /// when disabling. Locked cells stay disabled either way.
    pub fn set_enabled_all(&mut self, enabled: bool) -> Vec<Eviction> {
        let mut evictions = Vec::new();
        if !enabled {
            let anchors: Vec<Position> = self
                .cells
                .iter()
                .filter(|slot| slot.occupant().is_some() && slot.anchor_ref().is_none())
                .map(|slot| slot.position())
                .collect();
            for anchor in anchors {
                if let Some(eviction) = self.force_evict(anchor, EvictionReason::SlotDisabled) {
                    evictions.push(eviction);
                }
            }
        }
        let mut changed = !evictions.is_empty();
        for slot in &mut self.cells {
            let was = slot.is_enabled();
            slot.set_enabled(enabled);
            changed |= slot.is_enabled() != was;
        }
        if changed {
            self.notify();
        }
        evictions
    }

    pub fn enable_all(&mut self) {
        self.set_enabled_all(true);
    }

    pub fn disable_all(&mut self) -> Vec<Eviction> {
        self.set_enabled_all(false)
    }

    /// Produces the flat persistence snapshot of this grid.
    pub fn to_flat(&self) -> GridFlat {
        GridFlat {
            rows: self.rows,
            columns: self.columns,
            cells: self
                .cells
                .iter()
                .map(|slot| {
                    let is_satellite = slot.anchor_ref().is_some();
                    CellFlat {
                        occupant: if is_satellite { None } else { slot.occupant() },
                        count: if is_satellite { 0 } else { slot.count() },
                        enabled: slot.is_enabled(),
                        variant: slot.variant(),
                        capacity: match slot.kind() {
                            SlotKind::Stackable { capacity, .. } => capacity,
                            _ => None,
                        },
                    }
                })
                .collect(),
        }
    }

    /// Reconstructs a grid from its flat snapshot.
    ///
    /// Occupants are re-placed through the normal placement path so anchor
    /// references come from the template shapes, not from storage. Corrupt
    /// snapshots (mismatched dimensions, overlapping footprints, unknown
    /// items) fail with a [`PlacementError`] instead of loading a
    /// half-consistent grid.
    pub fn from_flat(flat: &GridFlat, catalog: Arc<ItemCatalog>) -> Result<Grid, PlacementError> {
        let expected = (flat.rows * flat.columns) as usize;
        if flat.cells.len() != expected {
            return Err(PlacementError::LayoutMismatch {
                expected,
                actual: flat.cells.len(),
            });
        }

        let columns = flat.columns;
        let mut grid = Grid::from_layout(flat.rows, flat.columns, catalog, |position| {
            let i = (position.y as u32 * columns + position.x as u32) as usize;
            let cell = &flat.cells[i];
            match cell.variant {
                SlotVariant::Plain => {
                    let mut slot = Slot::new(position);
                    slot.set_enabled(cell.enabled);
                    slot
                }
                SlotVariant::Locked => Slot::locked(position),
                SlotVariant::Stackable => {
                    let mut slot = Slot::stackable(position, cell.capacity);
                    slot.set_enabled(cell.enabled);
                    slot
                }
            }
        });

        for (i, cell) in flat.cells.iter().enumerate() {
            let Some(item) = cell.occupant else { continue };
            let position = grid.position_of(i);
            match cell.variant {
                SlotVariant::Stackable => {
                    for _ in 0..cell.count.max(1) {
                        grid.cells[i]
                            .put(item)
                            .map_err(|_| PlacementError::Invalid { anchor: position })?;
                    }
                }
                _ => grid.place_item(position, item)?,
            }
        }
        Ok(grid)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .field("cells", &self.cells)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.columns == other.columns && self.cells == other.cells
    }
}

impl ItemContainer for Grid {
    /// First-fit: scans anchors in row-major order and places at the first
    /// position the footprint fits.
    fn put_default(&mut self, item: ItemId) -> bool {
        let catalog = Arc::clone(&self.catalog);
        let Some(template) = catalog.lookup(item) else {
            return false;
        };
        for i in 0..self.cells.len() {
            let position = self.position_of(i);
            if self.can_place(position, &template.shape) {
                return self.place(position, item, &template.shape).is_ok();
            }
        }
        false
    }

    fn remove_default(&mut self) -> Option<ItemId> {
        let anchor = self
            .cells
            .iter()
            .find(|slot| slot.occupant().is_some() && slot.anchor_ref().is_none())
            .map(|slot| slot.position())?;
        self.remove(anchor)
    }
}

impl PositionalContainer for Grid {
    type Index = Position;

    fn put_at(&mut self, index: Position, item: ItemId) -> bool {
        self.place_item(index, item).is_ok()
    }

    fn remove_at(&mut self, index: Position) -> Option<ItemId> {
        self.remove(index)
    }

    fn get_at(&self, index: Position) -> Option<ItemId> {
        self.get_item(index)
    }
}

impl Redrawable for Grid {
    fn set_on_changed(&mut self, hook: OnChanged) {
        self.on_changed = Some(hook);
    }

    fn clear_on_changed(&mut self) {
        self.on_changed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemTemplate;

    const L_SHAPE: [(i32, i32); 3] = [(0, 0), (1, 0), (0, 1)];

    fn catalog() -> Arc<ItemCatalog> {
        let mut catalog = ItemCatalog::new();
        catalog
            .register(ItemTemplate::new(ItemId(1), ItemShape::single(), "Coin"))
            .unwrap();
        catalog
            .register(
                ItemTemplate::new(ItemId(2), ItemShape::from_coords(L_SHAPE), "Bracket")
                    .with_tier(2),
            )
            .unwrap();
        catalog
            .register(ItemTemplate::new(
                ItemId(3),
                ItemShape::from_coords([(0, 0), (1, 0)]),
                "Bar",
            ))
            .unwrap();
        Arc::new(catalog)
    }

    fn grid_5x5() -> Grid {
        Grid::new(5, 5, catalog())
    }

    /// Every satellite must point at an anchor whose template footprint,
    /// translated to that anchor, includes the satellite.
    fn assert_anchor_consistency(grid: &Grid) {
        for slot in grid.cells() {
            assert!(
                slot.occupant().is_none() || slot.anchor_ref().is_none(),
                "cell {} is both anchor and satellite",
                slot.position()
            );
            if let Some(anchor) = slot.anchor_ref() {
                let item = grid
                    .slot(anchor)
                    .and_then(Slot::occupant)
                    .expect("anchor_ref points at an empty cell");
                let template = grid.catalog().lookup(item).unwrap();
                let cells = Grid::footprint(anchor, &template.shape).unwrap();
                assert!(cells.contains(&slot.position()));
            }
        }
    }

    #[test]
    fn single_cell_place_and_remove() {
        let mut grid = grid_5x5();
        let target = Position::new(2, 2);
        grid.place_item(target, ItemId(1)).unwrap();
        assert_eq!(grid.get_item(target), Some(ItemId(1)));
        assert_eq!(grid.remove(target), Some(ItemId(1)));
        assert!(grid.cells().all(|slot| slot.occupant().is_none()));
    }

    #[test]
    fn l_shape_occupies_translated_footprint() {
        let mut grid = grid_5x5();
        grid.place_item(Position::new(1, 1), ItemId(2)).unwrap();

        for position in [Position::new(1, 1), Position::new(2, 1), Position::new(1, 2)] {
            assert_eq!(grid.get_item(position), Some(ItemId(2)), "at {position}");
        }
        assert_eq!(grid.get_item(Position::new(2, 2)), None);
        assert_anchor_consistency(&grid);
    }

    #[test]
    fn remove_via_any_footprint_cell_frees_everything() {
        let mut grid = grid_5x5();
        grid.place_item(Position::new(1, 1), ItemId(2)).unwrap();

        assert_eq!(grid.remove(Position::new(1, 2)), Some(ItemId(2)));
        assert!(grid.cells().all(|slot| {
            slot.occupant().is_none() && slot.anchor_ref().is_none()
        }));
    }

    #[test]
    fn out_of_bounds_footprint_is_rejected_wholesale() {
        let mut grid = grid_5x5();
        // Anchor in bounds, satellite (5, 4) out of bounds.
        let err = grid.place_item(Position::new(4, 4), ItemId(2)).unwrap_err();
        assert_eq!(
            err,
            PlacementError::Invalid {
                anchor: Position::new(4, 4)
            }
        );
        assert!(grid.cells().all(|slot| slot.occupant().is_none()
            && slot.anchor_ref().is_none()));
    }

    #[test]
    fn overlapping_placement_leaves_both_items_untouched() {
        let mut grid = grid_5x5();
        grid.place_item(Position::new(2, 1), ItemId(1)).unwrap();
        let before = grid.to_flat();

        // The L at (1, 1) would cover (2, 1), which is taken.
        let err = grid.place_item(Position::new(1, 1), ItemId(2)).unwrap_err();
        assert!(matches!(err, PlacementError::Invalid { .. }));
        assert_eq!(grid.to_flat(), before);
        assert_anchor_consistency(&grid);
    }

    #[test]
    fn round_trip_reproduces_identical_state() {
        let mut grid = grid_5x5();
        grid.place_item(Position::new(1, 1), ItemId(2)).unwrap();
        grid.place_item(Position::new(4, 4), ItemId(1)).unwrap();
        let before = grid.to_flat();

        assert_eq!(grid.remove(Position::new(2, 1)), Some(ItemId(2)));
        grid.place_item(Position::new(1, 1), ItemId(2)).unwrap();

        assert_eq!(grid.to_flat(), before);
        assert_anchor_consistency(&grid);
    }

    #[test]
    fn footprints_never_overlap() {
        let mut grid = grid_5x5();
        let mut placed = 0;
        for y in 0..5 {
            for x in 0..5 {
                if grid.place_item(Position::new(x, y), ItemId(2)).is_ok() {
                    placed += 1;
                }
            }
        }
        assert!(placed > 1);
        assert_anchor_consistency(&grid);

        let occupied = grid
            .cells()
            .filter(|slot| slot.occupant().is_some() || slot.anchor_ref().is_some())
            .count();
        assert_eq!(occupied, placed * 3);
    }

    #[test]
    fn placement_onto_disabled_cell_fails() {
        let mut grid = grid_5x5();
        grid.set_enabled(Position::new(2, 1), false);
        assert!(!grid.can_place(Position::new(1, 1), &ItemShape::from_coords(L_SHAPE)));
        assert!(grid.place_item(Position::new(1, 1), ItemId(2)).is_err());
    }

    #[test]
    fn can_place_and_place_agree_on_stackable_cells() {
        let mut grid = Grid::from_layout(1, 2, catalog(), |position| {
            if position == Position::new(1, 0) {
                Slot::stackable(position, None)
            } else {
                Slot::new(position)
            }
        });

        // The bar would cover the empty stackable cell; both paths refuse.
        let bar = ItemShape::from_coords([(0, 0), (1, 0)]);
        assert!(!grid.can_place(Position::new(0, 0), &bar));
        assert!(grid.place(Position::new(0, 0), ItemId(3), &bar).is_err());

        // Single-cell items still land on the stackable cell.
        assert!(grid.can_place(Position::new(1, 0), &ItemShape::single()));
        assert!(grid.put_at(Position::new(1, 0), ItemId(1)));
    }

    #[test]
    fn put_default_skips_footprints_over_stackable_cells() {
        let mut grid = Grid::from_layout(2, 2, catalog(), |position| {
            if position == Position::new(1, 0) {
                Slot::stackable(position, None)
            } else {
                Slot::new(position)
            }
        });

        // Row 0 is blocked by the stackable cell; first fit lands in row 1.
        assert!(grid.put_default(ItemId(3)));
        assert_eq!(grid.get_item(Position::new(0, 1)), Some(ItemId(3)));
        assert_eq!(grid.get_item(Position::new(1, 1)), Some(ItemId(3)));
        assert_eq!(grid.get_item(Position::new(0, 0)), None);
    }

    #[test]
    fn locked_layout_cells_never_accept() {
        let locked_at = Position::new(0, 0);
        let mut grid = Grid::from_layout(3, 3, catalog(), |position| {
            if position == locked_at {
                Slot::locked(position)
            } else {
                Slot::new(position)
            }
        });
        assert!(grid.place_item(locked_at, ItemId(1)).is_err());
        grid.enable_all();
        assert!(grid.place_item(locked_at, ItemId(1)).is_err());
    }

    #[test]
    fn resize_evicts_truncated_footprints_and_keeps_the_rest() {
        let mut grid = grid_5x5();
        // Survives: fully inside (0,0)-(1,1).
        grid.place_item(Position::new(0, 0), ItemId(2)).unwrap();
        // Evicted: anchored at (3, 4), extends to (4, 4).
        grid.place_item(Position::new(3, 4), ItemId(2)).unwrap();

        let evictions = grid.resize(3, 3);
        assert_eq!(evictions.len(), 1);
        assert_eq!(evictions[0].item, ItemId(2));
        assert_eq!(evictions[0].anchor, Position::new(3, 4));
        assert_eq!(evictions[0].reason, EvictionReason::DanglingAnchor);

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.get_item(Position::new(0, 0)), Some(ItemId(2)));
        assert_eq!(grid.get_item(Position::new(1, 0)), Some(ItemId(2)));
        assert_anchor_consistency(&grid);
    }

    #[test]
    fn resize_larger_exposes_fresh_enabled_cells() {
        let mut grid = grid_5x5();
        grid.place_item(Position::new(2, 2), ItemId(1)).unwrap();
        let evictions = grid.resize(6, 7);
        assert!(evictions.is_empty());
        assert_eq!(grid.get_item(Position::new(2, 2)), Some(ItemId(1)));
        assert!(grid.slot(Position::new(6, 5)).unwrap().accepts());
    }

    #[test]
    fn disabling_an_occupied_cell_evicts_the_whole_item() {
        let mut grid = grid_5x5();
        grid.place_item(Position::new(1, 1), ItemId(2)).unwrap();

        // Disable a satellite cell, not the anchor.
        let eviction = grid.set_enabled(Position::new(2, 1), false).unwrap();
        assert_eq!(eviction.item, ItemId(2));
        assert_eq!(eviction.anchor, Position::new(1, 1));
        assert_eq!(eviction.reason, EvictionReason::SlotDisabled);

        assert!(grid.cells().all(|slot| slot.occupant().is_none()
            && slot.anchor_ref().is_none()));
        assert!(!grid.slot(Position::new(2, 1)).unwrap().is_enabled());
    }

    #[test]
    fn disable_all_reports_every_eviction() {
        let mut grid = grid_5x5();
        grid.place_item(Position::new(0, 0), ItemId(2)).unwrap();
        grid.place_item(Position::new(4, 4), ItemId(1)).unwrap();

        let evictions = grid.disable_all();
        assert_eq!(evictions.len(), 2);
        assert!(grid.cells().all(|slot| !slot.is_enabled()));

        grid.enable_all();
        assert!(grid.cells().all(|slot| slot.accepts()));
    }

    #[test]
    fn flat_round_trip_recomputes_anchor_refs() {
        let mut grid = grid_5x5();
        grid.place_item(Position::new(1, 1), ItemId(2)).unwrap();
        grid.place_item(Position::new(3, 3), ItemId(1)).unwrap();
        grid.set_enabled(Position::new(4, 0), false);

        let flat = grid.to_flat();
        // Satellites persist no occupant.
        assert_eq!(
            flat.cells
                .iter()
                .filter(|cell| cell.occupant.is_some())
                .count(),
            2
        );

        let restored = Grid::from_flat(&flat, Arc::clone(grid.catalog())).unwrap();
        assert_eq!(restored, grid);
        assert_anchor_consistency(&restored);
    }

    #[test]
    fn from_flat_rejects_dimension_mismatch() {
        let mut flat = grid_5x5().to_flat();
        flat.cells.pop();
        let err = Grid::from_flat(&flat, catalog()).unwrap_err();
        assert_eq!(
            err,
            PlacementError::LayoutMismatch {
                expected: 25,
                actual: 24
            }
        );
    }

    #[test]
    fn put_default_scans_row_major_first_fit() {
        let mut grid = grid_5x5();
        grid.place_item(Position::new(0, 0), ItemId(1)).unwrap();
        assert!(grid.put_default(ItemId(1)));
        assert_eq!(grid.get_item(Position::new(1, 0)), Some(ItemId(1)));
    }

    #[test]
    fn put_default_fails_when_nothing_fits() {
        let mut grid = Grid::new(1, 1, catalog());
        // The L needs three cells.
        assert!(!grid.put_default(ItemId(2)));
        assert!(grid.put_default(ItemId(1)));
        assert!(!grid.put_default(ItemId(1)));
    }

    #[test]
    fn unknown_item_is_rejected() {
        let mut grid = grid_5x5();
        assert_eq!(
            grid.place_item(Position::ORIGIN, ItemId(99)),
            Err(PlacementError::UnknownItem { item: ItemId(99) })
        );
    }

    #[test]
    fn on_changed_fires_only_on_successful_mutation() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut grid = grid_5x5();
        grid.set_on_changed(Box::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        grid.place_item(Position::new(2, 2), ItemId(1)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Failed placement stays silent.
        let _ = grid.place_item(Position::new(2, 2), ItemId(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        grid.remove(Position::new(2, 2)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn redundant_enable_toggles_stay_silent() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut grid = grid_5x5();
        grid.set_on_changed(Box::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        // Everything is already enabled; nothing changes.
        grid.set_enabled(Position::new(0, 0), true);
        grid.enable_all();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        grid.set_enabled(Position::new(0, 0), false);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        grid.set_enabled(Position::new(0, 0), false);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
