//! Filtering items by their assigned stores.

use crate::{item::Item, view::StoreSelection};

/// Keep the items assigned to at least one of the `selected` stores.
///
/// Stores are compared by ID, so two stores sharing a name are still told apart. An empty
/// selection keeps every item. Surviving items keep their input order.
pub fn filter_by_stores<'a, I>(items: I, selected: &StoreSelection) -> Vec<&'a Item>
where
    I: IntoIterator<Item = &'a Item>,
{
    if selected.is_empty() {
        return items.into_iter().collect();
    }

    items
        .into_iter()
        .filter(|item| item.stores.iter().any(|store| selected.contains(store.id)))
        .collect()
}
