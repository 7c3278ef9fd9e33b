//! Linear container of stackable slots for non-positioned inventories
//! (consumable lists, currency pouches).
//!
//! The 1D analogue of [`crate::grid::Grid`]: positions are indices into an
//! ordered sequence, and every slot is the stackable variant. Items have no
//! footprint here; a multi-cell shape never enters a list.

use std::fmt;

use crate::common::Position;
use crate::config::InventoryConfig;
use crate::container::{ItemContainer, OnChanged, PositionalContainer, Redrawable};
use crate::item::ItemId;
use crate::slot::{Slot, SlotError};

/// Flat snapshot of one stack entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListEntryFlat {
    pub item: ItemId,
    pub count: u32,
    pub capacity: Option<u32>,
}

/// Flat, serialization-friendly snapshot of a list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListFlat {
    pub capacity: Option<usize>,
    pub stack_size: Option<u32>,
    pub entries: Vec<ListEntryFlat>,
}

/// Ordered sequence of stackable slots.
pub struct List {
    slots: Vec<Slot>,
    /// Maximum number of stack entries. None is unbounded.
    capacity: Option<usize>,
    /// Per-stack capacity applied to newly created entries.
    stack_size: Option<u32>,
    on_changed: Option<OnChanged>,
}

impl List {
    pub fn new(capacity: Option<usize>, stack_size: Option<u32>) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
            stack_size,
            on_changed: None,
        }
    }

    pub fn from_config(config: &InventoryConfig) -> Self {
        Self::new(config.list_capacity, config.stack_size)
    }

    /// A list with no entry bound and unbounded stacks.
    pub fn unbounded() -> Self {
        Self::new(None, None)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    fn notify(&mut self) {
        if let Some(hook) = self.on_changed.as_mut() {
            hook();
        }
    }

    /// Adds one item: first-fit merge into an existing stack of the same item
    /// with spare capacity (insertion order preserved), otherwise a new entry
    /// at the end. Returns the index the item landed in.
    pub fn put(&mut self, item: ItemId) -> Result<usize, SlotError> {
        let mut landed = None;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.occupant() == Some(item) && slot.put(item).is_ok() {
                landed = Some(i);
                break;
            }
        }
        if let Some(i) = landed {
            self.notify();
            return Ok(i);
        }

        if self.capacity.is_some_and(|cap| self.slots.len() >= cap) {
            return Err(SlotError::CapacityExceeded);
        }
        let index = self.slots.len();
        let mut slot = Slot::stackable(Position::new(index as i32, 0), self.stack_size);
        slot.put(item)?;
        self.slots.push(slot);
        self.notify();
        Ok(index)
    }

    /// Removes one item from the stack at `index`.
    ///
    /// An entry whose count reaches zero is deleted and the sequence
    /// compacted: indices of later entries shift down, so callers must not
    /// cache indices across a removal without re-resolving.
    pub fn remove_at(&mut self, index: usize) -> Option<ItemId> {
        let slot = self.slots.get_mut(index)?;
        let removed = slot.remove()?;
        if slot.occupant().is_none() {
            self.slots.remove(index);
            self.reindex();
        }
        self.notify();
        Some(removed)
    }

    pub fn get_at(&self, index: usize) -> Option<ItemId> {
        self.slots.get(index)?.occupant()
    }

    /// Stack count at `index`; None when the index does not exist.
    pub fn count_at(&self, index: usize) -> Option<u32> {
        self.slots.get(index).map(Slot::count)
    }

    /// Total item count across all stacks of `item`.
    pub fn total_of(&self, item: ItemId) -> u32 {
        self.slots
            .iter()
            .filter(|slot| slot.occupant() == Some(item))
            .map(Slot::count)
            .sum()
    }

    fn reindex(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.set_position(Position::new(i as i32, 0));
        }
    }

    /// Produces the flat persistence snapshot of this list.
    pub fn to_flat(&self) -> ListFlat {
        ListFlat {
            capacity: self.capacity,
            stack_size: self.stack_size,
            entries: self
                .slots
                .iter()
                .filter_map(|slot| {
                    slot.occupant().map(|item| ListEntryFlat {
                        item,
                        count: slot.count(),
                        capacity: match slot.kind() {
                            crate::slot::SlotKind::Stackable { capacity, .. } => capacity,
                            _ => None,
                        },
                    })
                })
                .collect(),
        }
    }

    /// Reconstructs a list from its flat snapshot. Entries whose count does
    /// not fit their stored capacity fail with [`SlotError::CapacityExceeded`]
    /// rather than loading truncated.
    pub fn from_flat(flat: &ListFlat) -> Result<List, SlotError> {
        let mut list = List::new(flat.capacity, flat.stack_size);
        for (i, entry) in flat.entries.iter().enumerate() {
            let mut slot = Slot::stackable(Position::new(i as i32, 0), entry.capacity);
            for _ in 0..entry.count.max(1) {
                slot.put(entry.item)?;
            }
            list.slots.push(slot);
        }
        Ok(list)
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("slots", &self.slots)
            .field("capacity", &self.capacity)
            .field("stack_size", &self.stack_size)
            .finish_non_exhaustive()
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots
            && self.capacity == other.capacity
            && self.stack_size == other.stack_size
    }
}

impl ItemContainer for List {
    fn put_default(&mut self, item: ItemId) -> bool {
        self.put(item).is_ok()
    }

    fn remove_default(&mut self) -> Option<ItemId> {
        self.remove_at(0)
    }
}

impl PositionalContainer for List {
    type Index = usize;

    /// Puts into a specific entry; `index == len` appends a new entry.
    fn put_at(&mut self, index: usize, item: ItemId) -> bool {
        if index == self.slots.len() {
            if self.capacity.is_some_and(|cap| self.slots.len() >= cap) {
                return false;
            }
            let mut slot = Slot::stackable(Position::new(index as i32, 0), self.stack_size);
            if slot.put(item).is_err() {
                return false;
            }
            self.slots.push(slot);
            self.notify();
            return true;
        }
        match self.slots.get_mut(index) {
            Some(slot) => {
                let ok = slot.put(item).is_ok();
                if ok {
                    self.notify();
                }
                ok
            }
            None => false,
        }
    }

    fn remove_at(&mut self, index: usize) -> Option<ItemId> {
        List::remove_at(self, index)
    }

    fn get_at(&self, index: usize) -> Option<ItemId> {
        List::get_at(self, index)
    }
}

impl Redrawable for List {
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

    #[test]
    fn put_merges_first_fit_in_insertion_order() {
        let mut list = List::new(None, Some(3));
        assert_eq!(list.put(ItemId(1)), Ok(0));
        assert_eq!(list.put(ItemId(2)), Ok(1));
        assert_eq!(list.put(ItemId(1)), Ok(0));
        assert_eq!(list.count_at(0), Some(2));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn full_stack_spills_into_a_new_entry() {
        let mut list = List::new(None, Some(2));
        for _ in 0..3 {
            list.put(ItemId(1)).unwrap();
        }
        assert_eq!(list.len(), 2);
        assert_eq!(list.count_at(0), Some(2));
        assert_eq!(list.count_at(1), Some(1));
        assert_eq!(list.total_of(ItemId(1)), 3);

        // The spill entry merges before a third one is created.
        list.put(ItemId(1)).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.count_at(1), Some(2));
    }

    #[test]
    fn entry_capacity_limits_the_sequence() {
        let mut list = List::new(Some(2), Some(1));
        list.put(ItemId(1)).unwrap();
        list.put(ItemId(2)).unwrap();
        assert_eq!(list.put(ItemId(3)), Err(SlotError::CapacityExceeded));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn removal_compacts_and_shifts_indices() {
        let mut list = List::new(None, Some(9));
        list.put(ItemId(1)).unwrap();
        list.put(ItemId(2)).unwrap();
        list.put(ItemId(3)).unwrap();

        assert_eq!(list.remove_at(0), Some(ItemId(1)));
        // Entry 0 hit zero and was deleted; later entries shifted down.
        assert_eq!(list.get_at(0), Some(ItemId(2)));
        assert_eq!(list.get_at(1), Some(ItemId(3)));
        assert_eq!(list.get_at(2), None);
        assert_eq!(list.slots().next().unwrap().position(), Position::new(0, 0));
    }

    #[test]
    fn partial_removal_keeps_the_entry() {
        let mut list = List::new(None, Some(9));
        list.put(ItemId(1)).unwrap();
        list.put(ItemId(1)).unwrap();
        assert_eq!(list.remove_at(0), Some(ItemId(1)));
        assert_eq!(list.count_at(0), Some(1));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_at_out_of_range_is_none() {
        let mut list = List::unbounded();
        assert_eq!(list.remove_at(0), None);
    }

    #[test]
    fn put_at_targets_a_specific_entry() {
        let mut list = List::new(None, Some(5));
        list.put(ItemId(1)).unwrap();
        list.put(ItemId(2)).unwrap();

        assert!(list.put_at(1, ItemId(2)));
        assert_eq!(list.count_at(1), Some(2));
        // Mismatched item is refused at that entry.
        assert!(!list.put_at(0, ItemId(2)));
        // Appending at the end index works.
        assert!(list.put_at(2, ItemId(3)));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn flat_round_trip() {
        let mut list = List::new(Some(10), Some(4));
        for _ in 0..3 {
            list.put(ItemId(7)).unwrap();
        }
        list.put(ItemId(8)).unwrap();

        let flat = list.to_flat();
        let restored = List::from_flat(&flat).unwrap();
        assert_eq!(restored, list);
    }

    #[test]
    fn from_flat_rejects_overfull_entries() {
        let flat = ListFlat {
            capacity: None,
            stack_size: Some(2),
            entries: vec![ListEntryFlat {
                item: ItemId(1),
                count: 5,
                capacity: Some(2),
            }],
        };
        assert_eq!(List::from_flat(&flat), Err(SlotError::CapacityExceeded));
    }
}
