//! Core item domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    category::{Category, CategoryId, UNKNOWN_CATEGORY},
    store_type::{StoreId, StoreType},
};

/// A validated, non-empty item name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub struct ItemName(String);

impl ItemName {
    /// Create an item name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyItemName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyItemName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create an item name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty
    /// invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ItemName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemName::new(s)
    }
}

impl Display for ItemName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for an item.
pub type ItemId = i64;

/// An entry on the shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// The ID of the item.
    pub id: ItemId,
    /// The name shown on the list.
    pub name: ItemName,
    /// The item's category, or `None` if the category reference could not be resolved.
    pub category: Option<Category>,
    /// Whether the item needs to be bought.
    pub needed: bool,
    /// The stores the item can be bought at, without duplicate IDs.
    pub stores: Vec<StoreType>,
}

impl Item {
    /// The name of the item's category, or [UNKNOWN_CATEGORY] if it has none.
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map(|category| category.name.as_ref())
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    /// Whether `store_id` is one of the item's assigned stores.
    pub fn has_store(&self, store_id: StoreId) -> bool {
        self.stores.iter().any(|store| store.id == store_id)
    }

    /// The IDs of the item's assigned stores, in assignment order.
    pub fn store_ids(&self) -> Vec<StoreId> {
        self.stores.iter().map(|store| store.id).collect()
    }
}

/// Request body for creating an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemData {
    /// The item's name, validated as an [ItemName].
    pub name: String,
    /// The category to put the item in.
    pub category_id: CategoryId,
}

/// Request body for setting an item's needed flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UpdateNeededData {
    /// Whether the item needs to be bought.
    pub needed: bool,
}

/// Request body for replacing an item's assigned stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStoresData {
    /// The complete set of stores for the item, in display order.
    pub store_ids: Vec<StoreId>,
}
