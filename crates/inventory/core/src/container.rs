//! Role-based container capability contracts.
//!
//! Drag-and-drop and UI code operate uniformly over anything that implements
//! these traits; they never reach into slot internals. A "which slot" handed
//! to external code is always a (container, index) pair, never a pointer back
//! into the container.

use crate::item::ItemId;

/// Minimal contract for anything items can be dropped into or taken from.
pub trait ItemContainer {
    /// Puts an item wherever the container sees fit. Returns false when no
    /// position accepts it.
    fn put_default(&mut self, item: ItemId) -> bool;

    /// Removes an item from a container-chosen position.
    fn remove_default(&mut self) -> Option<ItemId>;

    /// Returns an item that was previously taken out (e.g. a cancelled drag).
    fn return_item(&mut self, item: ItemId) -> bool {
        self.put_default(item)
    }
}

/// A container whose contents are addressed by position.
///
/// `Index` is a 2D cell position for grids and a linear index for lists.
pub trait PositionalContainer: ItemContainer {
    type Index: Copy;

    fn put_at(&mut self, index: Self::Index, item: ItemId) -> bool;

    fn remove_at(&mut self, index: Self::Index) -> Option<ItemId>;

    fn get_at(&self, index: Self::Index) -> Option<ItemId>;
}

/// A container exposing exactly one conceptual slot (e.g. an equipment slot).
pub trait SingleItemContainer: ItemContainer {
    fn item(&self) -> Option<ItemId>;
}

/// Change-notification hook invoked after every successful mutation.
pub type OnChanged = Box<dyn FnMut() + Send>;

/// Containers the UI layer can subscribe to for redraws.
///
/// This is the only coupling point exposed to rendering code: mutation pushes
/// a notification, the UI never polls. The hook fires only after a mutation
/// actually changed state; failed operations stay silent.
pub trait Redrawable {
    fn set_on_changed(&mut self, hook: OnChanged);

    fn clear_on_changed(&mut self);
}
