//! Inventory ledger
//!
//! Tracks acquired items (id-unique, no stacking) and collected coins.
//! Every mutation bumps a revision counter; UI consumers diff the revision
//! once per frame instead of subscribing to callbacks.

use crate::level::ItemDef;

/// Ownership ledger of acquired items and collected currency
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    items: Vec<ItemDef>,
    coins: u32,
    revision: u64,
}

impl Inventory {
    /// Create a new empty inventory
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item. Re-adding an id replaces its definition.
    pub fn add_item(&mut self, item: ItemDef) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            *existing = item;
        } else {
            self.items.push(item);
        }
        self.revision += 1;
    }

    /// Remove an item by id. Removing an absent id is a no-op.
    pub fn remove_item(&mut self, id: &str) {
        self.items.retain(|i| i.id != id);
        self.revision += 1;
    }

    /// Whether the inventory holds an item with the given id
    pub fn has_item(&self, id: &str) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    /// All held items, in acquisition order
    pub fn items(&self) -> &[ItemDef] {
        &self.items
    }

    /// Collect one coin
    pub fn add_coin(&mut self) {
        self.coins += 1;
        self.revision += 1;
    }

    /// Number of coins collected
    pub fn coin_count(&self) -> u32 {
        self.coins
    }

    /// Change notification: incremented after every mutation. Consumers keep
    /// the last revision they saw and refresh when it moves.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
