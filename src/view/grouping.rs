//! Grouping items into alphabetically sorted categories.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::item::Item;

/// Items sharing a category, sorted by item name.
///
/// `items` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    /// The category name shared by every item in the group.
    pub category: String,
    /// The items in the category, sorted by name.
    pub items: Vec<Item>,
}

/// Partition `items` by category name, then sort the groups and the items within each group by
/// name.
///
/// Items are grouped by their category's name string, so equal names from distinct category
/// instances end up in the same group. Names are compared by code point. Items with equal names
/// keep their input order.
pub fn group_and_sort<'a, I>(items: I) -> Vec<CategoryGroup>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut groups: BTreeMap<&'a str, Vec<&'a Item>> = BTreeMap::new();

    for item in items {
        groups.entry(item.category_name()).or_default().push(item);
    }

    groups
        .into_iter()
        .map(|(category, mut items)| {
            // `sort_by` is stable, which keeps ties in input order.
            items.sort_by(|a, b| a.name.as_ref().cmp(b.name.as_ref()));

            CategoryGroup {
                category: category.to_owned(),
                items: items.into_iter().cloned().collect(),
            }
        })
        .collect()
}
