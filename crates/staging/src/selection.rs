//! Multi-select tracking
//!
//! The selection is independent of the ledger: selecting an item stages
//! nothing. It only decides whether a drop moves one item or a batch.

use relocate_core::ItemId;

/// Ordered set of selected items
///
/// Order is toggle order, which is the order a batch drop stages them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    items: Vec<ItemId>,
}

impl Selection {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip an item's membership, returning true if it is now selected
    pub fn toggle(&mut self, item: &ItemId) -> bool {
        match self.items.iter().position(|i| i == item) {
            Some(pos) => {
                self.items.remove(pos);
                false
            }
            None => {
                self.items.push(item.clone());
                true
            }
        }
    }

    /// Add every item not already selected
    pub fn select_all<'a, I>(&mut self, items: I)
    where
        I: IntoIterator<Item = &'a ItemId>,
    {
        for item in items {
            if !self.is_selected(item) {
                self.items.push(item.clone());
            }
        }
    }

    /// Deselect everything
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Membership test
    pub fn is_selected(&self, item: &ItemId) -> bool {
        self.items.iter().any(|i| i == item)
    }

    /// Selected items in toggle order
    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter()
    }

    /// Selected items as a slice
    pub fn as_slice(&self) -> &[ItemId] {
        &self.items
    }

    /// Number of selected items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing is selected
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
