//! Merging item updates into a snapshot by item ID.

use crate::item::{Item, ItemId};

/// Merge `updates` into `items`, matching by ID.
///
/// An update replaces the item with the same ID in place. Updates for IDs not in `items` are
/// appended in the order given.
pub fn merge_by_id(mut items: Vec<Item>, updates: impl IntoIterator<Item = Item>) -> Vec<Item> {
    for update in updates {
        match items.iter_mut().find(|item| item.id == update.id) {
            Some(existing) => *existing = update,
            None => items.push(update),
        }
    }

    items
}

/// Remove the item with `item_id` from `items`, keeping the order of the rest.
pub fn remove_by_id(mut items: Vec<Item>, item_id: ItemId) -> Vec<Item> {
    items.retain(|item| item.id != item_id);
    items
}
