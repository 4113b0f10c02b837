#![forbid(unsafe_code)]

//! Registry of sortable items.
//!
//! One registry exists per drag surface. The host registers each list item
//! with its order index and gets back an [`ItemHandle`]; the engine resolves
//! event targets to items through an element side table, never by tagging
//! host nodes.
//!
//! # Invariants
//!
//! 1. Each [`ElementId`] maps to at most one item. Registering an element
//!    that is already present updates the existing item and returns its
//!    handle.
//! 2. At most one item is active. [`Registry::activate`] fails while another
//!    item is active.
//! 3. [`Registry::ordered_items`] sorts by index ascending. Equal indices are
//!    a host error; they are ordered by registration as a tie-break so the
//!    result is still deterministic.
//! 4. The pending target is an explicit integer slot, present only while an
//!    item is active.

use std::fmt;

use ahash::AHashMap;
use reorder_core::target::ElementId;

use crate::error::{Result, SortError};

/// Stable identity of a registered item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemHandle(u64);

impl ItemHandle {
    /// Build a handle from its raw value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item:{}", self.0)
    }
}

/// A participating list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortableItem {
    /// Host element rendered for this item.
    pub element: ElementId,
    /// Host-assigned order index.
    pub index: usize,
    /// Disabled items cannot be lifted but still take part in collision.
    pub disabled: bool,
}

impl SortableItem {
    #[must_use]
    pub const fn new(element: ElementId, index: usize) -> Self {
        Self {
            element,
            index,
            disabled: false,
        }
    }

    #[must_use]
    pub const fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Items of one drag surface plus the active-item state.
#[derive(Debug, Default)]
pub struct Registry {
    items: AHashMap<ItemHandle, SortableItem>,
    by_element: AHashMap<ElementId, ItemHandle>,
    next_handle: u64,
    active: Option<ItemHandle>,
    pending_target: Option<usize>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item. The index is not checked for uniqueness.
    pub fn register(&mut self, item: SortableItem) -> ItemHandle {
        if let Some(&handle) = self.by_element.get(&item.element) {
            self.items.insert(handle, item);
            return handle;
        }
        let handle = ItemHandle(self.next_handle);
        self.next_handle += 1;
        self.items.insert(handle, item);
        self.by_element.insert(item.element, handle);
        handle
    }

    /// Remove an item. Absent handles are a no-op.
    ///
    /// Removing the active item clears the active state.
    pub fn unregister(&mut self, handle: ItemHandle) -> Option<SortableItem> {
        let item = self.items.remove(&handle)?;
        self.by_element.remove(&item.element);
        if self.active == Some(handle) {
            self.active = None;
            self.pending_target = None;
        }
        Some(item)
    }

    pub fn update_index(&mut self, handle: ItemHandle, index: usize) -> Result<()> {
        let item = self
            .items
            .get_mut(&handle)
            .ok_or(SortError::NotRegistered(handle))?;
        item.index = index;
        Ok(())
    }

    pub fn update_disabled(&mut self, handle: ItemHandle, disabled: bool) -> Result<()> {
        let item = self
            .items
            .get_mut(&handle)
            .ok_or(SortError::NotRegistered(handle))?;
        item.disabled = disabled;
        Ok(())
    }

    #[must_use]
    pub fn get(&self, handle: ItemHandle) -> Option<&SortableItem> {
        self.items.get(&handle)
    }

    /// Side-table lookup from a host element to its item.
    #[must_use]
    pub fn handle_for(&self, element: ElementId) -> Option<ItemHandle> {
        self.by_element.get(&element).copied()
    }

    /// Items sorted ascending by index, recomputed on every call.
    #[must_use]
    pub fn ordered_items(&self) -> Vec<(ItemHandle, SortableItem)> {
        let mut items: Vec<_> = self.items.iter().map(|(&h, &item)| (h, item)).collect();
        items.sort_by_key(|&(handle, item)| (item.index, handle));
        items
    }

    /// Item whose index equals `index` exactly.
    #[must_use]
    pub fn item_at_index(&self, index: usize) -> Option<ItemHandle> {
        self.items
            .iter()
            .find(|(_, item)| item.index == index)
            .map(|(&handle, _)| handle)
    }

    /// Mark `handle` as the item being sorted.
    pub fn activate(&mut self, handle: ItemHandle) -> Result<()> {
        if let Some(active) = self.active {
            return Err(SortError::AlreadyActive { active });
        }
        if !self.items.contains_key(&handle) {
            return Err(SortError::NotRegistered(handle));
        }
        self.active = Some(handle);
        Ok(())
    }

    /// Clear the active item, returning it.
    pub fn deactivate(&mut self) -> Option<ItemHandle> {
        self.pending_target = None;
        self.active.take()
    }

    #[must_use]
    pub fn active(&self) -> Option<ItemHandle> {
        self.active
    }

    /// Slot the active item would land in if dropped now.
    #[must_use]
    pub fn pending_target(&self) -> Option<usize> {
        self.pending_target
    }

    pub(crate) fn set_pending_target(&mut self, target: usize) {
        if self.active.is_some() {
            self.pending_target = Some(target);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
