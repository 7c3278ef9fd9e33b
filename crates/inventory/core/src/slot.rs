//! Single-occupancy cells and their closed set of variants.
//!
//! A slot either *is* the anchor holding an item id, or *points to* an anchor
//! elsewhere via `anchor_ref`, never both. Variant behavior (plain, locked,
//! stackable) is a closed [`SlotKind`] dispatched by pattern matching;
//! editor/UI layers enumerate [`SlotVariant`] statically instead of scanning
//! types at runtime.

use crate::common::Position;
use crate::container::{ItemContainer, SingleItemContainer};
use crate::error::{ErrorSeverity, InventoryError};
use crate::item::ItemId;

/// Errors returned by slot mutations.
///
/// All of these are expected, recoverable conditions driven by game data;
/// none of them panic or poison the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlotError {
    /// Mutation attempted on a locked slot.
    #[error("slot is locked")]
    Locked,

    /// Mutation attempted on a disabled slot.
    #[error("slot is disabled")]
    Disabled,

    /// Slot already holds a different item or part of one.
    #[error("slot is occupied")]
    Occupied,

    /// Stackable slot is at capacity.
    #[error("stack is at capacity")]
    CapacityExceeded,
}

impl InventoryError for SlotError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SlotError::Locked
            | SlotError::Disabled
            | SlotError::Occupied
            | SlotError::CapacityExceeded => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SlotError::Locked => "SLOT_LOCKED",
            SlotError::Disabled => "SLOT_DISABLED",
            SlotError::Occupied => "SLOT_OCCUPIED",
            SlotError::CapacityExceeded => "SLOT_CAPACITY_EXCEEDED",
        }
    }
}

/// Variant-specific slot state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlotKind {
    /// Ordinary slot holding at most one item reference.
    Plain,

    /// Permanently disabled slot; every mutation fails.
    Locked,

    /// Single-cell slot holding a bounded count of one item kind.
    Stackable {
        /// Items currently in the stack.
        count: u32,
        /// Stack bound. None is unbounded.
        capacity: Option<u32>,
    },
}

/// Fieldless discriminant of [`SlotKind`], used by editor/UI layers to list
/// the available slot types as a static set.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SlotVariant {
    #[default]
    Plain,
    Locked,
    Stackable,
}

/// A single inventory cell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    position: Position,
    occupant: Option<ItemId>,
    anchor_ref: Option<Position>,
    enabled: bool,
    kind: SlotKind,
}

impl Slot {
    /// Creates an empty, enabled plain slot.
    pub fn new(position: Position) -> Self {
        Self {
            position,
            occupant: None,
            anchor_ref: None,
            enabled: true,
            kind: SlotKind::Plain,
        }
    }

    /// Creates a locked slot. Locked slots are permanently disabled.
    pub fn locked(position: Position) -> Self {
        Self {
            position,
            occupant: None,
            anchor_ref: None,
            enabled: false,
            kind: SlotKind::Locked,
        }
    }

    /// Creates an empty stackable slot with the given stack bound.
    pub fn stackable(position: Position, capacity: Option<u32>) -> Self {
        Self {
            position,
            occupant: None,
            anchor_ref: None,
            enabled: true,
            kind: SlotKind::Stackable { count: 0, capacity },
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn occupant(&self) -> Option<ItemId> {
        self.occupant
    }

    pub fn anchor_ref(&self) -> Option<Position> {
        self.anchor_ref
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    pub fn variant(&self) -> SlotVariant {
        match self.kind {
            SlotKind::Plain => SlotVariant::Plain,
            SlotKind::Locked => SlotVariant::Locked,
            SlotKind::Stackable { .. } => SlotVariant::Stackable,
        }
    }

    /// Current stack count; 1 for an occupied non-stackable slot, 0 if empty.
    pub fn count(&self) -> u32 {
        match self.kind {
            SlotKind::Stackable { count, .. } => count,
            _ => u32::from(self.occupant.is_some()),
        }
    }

    /// True iff this slot can take a fresh item: enabled, empty, and not part
    /// of another item's footprint. Always false for locked slots.
    pub fn accepts(&self) -> bool {
        match self.kind {
            SlotKind::Locked => false,
            _ => self.enabled && self.occupant.is_none() && self.anchor_ref.is_none(),
        }
    }

    /// Attempts to put an item into the slot.
    ///
    /// A stackable slot additionally succeeds when it already holds the same
    /// item and has spare capacity, incrementing the count.
    pub fn put(&mut self, item: ItemId) -> Result<(), SlotError> {
        match &mut self.kind {
            SlotKind::Locked => Err(SlotError::Locked),
            SlotKind::Plain => {
                if !self.enabled {
                    return Err(SlotError::Disabled);
                }
                if self.occupant.is_some() || self.anchor_ref.is_some() {
                    return Err(SlotError::Occupied);
                }
                self.occupant = Some(item);
                Ok(())
            }
            SlotKind::Stackable { count, capacity } => {
                if !self.enabled {
                    return Err(SlotError::Disabled);
                }
                if self.anchor_ref.is_some() {
                    return Err(SlotError::Occupied);
                }
                match self.occupant {
                    None => {
                        if capacity.is_some_and(|cap| cap == 0) {
                            return Err(SlotError::CapacityExceeded);
                        }
                        self.occupant = Some(item);
                        *count = 1;
                        Ok(())
                    }
                    Some(existing) if existing == item => {
                        if capacity.is_some_and(|cap| *count >= cap) {
                            return Err(SlotError::CapacityExceeded);
                        }
                        *count += 1;
                        Ok(())
                    }
                    Some(_) => Err(SlotError::Occupied),
                }
            }
        }
    }

    /// Removes one item from the slot, returning its id.
    ///
    /// Stackable slots decrement and only clear the occupant at zero. Locked
    /// and disabled slots always return None.
    pub fn remove(&mut self) -> Option<ItemId> {
        match &mut self.kind {
            SlotKind::Locked => None,
            SlotKind::Plain => {
                if !self.enabled {
                    return None;
                }
                self.anchor_ref = None;
                self.occupant.take()
            }
            SlotKind::Stackable { count, .. } => {
                if !self.enabled || self.occupant.is_none() {
                    return None;
                }
                *count = count.saturating_sub(1);
                let removed = self.occupant;
                if *count == 0 {
                    self.occupant = None;
                }
                removed
            }
        }
    }

    /// Sets the enabled flag. No-op on locked slots, which stay disabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !matches!(self.kind, SlotKind::Locked) {
            self.enabled = enabled;
        }
    }

    /// Re-addresses the slot after its container shifts entries around.
    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Marks this cell as part of a footprint anchored elsewhere.
    pub(crate) fn set_anchor_ref(&mut self, anchor: Position) {
        self.anchor_ref = Some(anchor);
    }

    pub(crate) fn clear_anchor_ref(&mut self) {
        self.anchor_ref = None;
    }

    /// Unconditionally empties the slot, including a full stack. Used by the
    /// grid's forced-eviction paths; bypasses the enabled check on purpose.
    pub(crate) fn force_clear(&mut self) {
        self.occupant = None;
        self.anchor_ref = None;
        if let SlotKind::Stackable { count, .. } = &mut self.kind {
            *count = 0;
        }
    }
}

impl ItemContainer for Slot {
    fn put_default(&mut self, item: ItemId) -> bool {
        self.put(item).is_ok()
    }

    fn remove_default(&mut self) -> Option<ItemId> {
        self.remove()
    }
}

impl SingleItemContainer for Slot {
    fn item(&self) -> Option<ItemId> {
        self.occupant
    }
}
