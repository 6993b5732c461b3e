//! The data collaborator a client session reads from and writes to.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error,
    category::{Category, CategoryId, get_all_categories},
    item::{
        Item, ItemId, ItemName, create_item, delete_item, get_items, set_item_needed,
        set_item_stores,
    },
    store_type::{StoreId, StoreType, get_all_stores},
};

/// Handles reading and writing the shopping list on behalf of a client session.
pub trait ShoppingListStore {
    /// List items. If `store_ids` is not empty, only items at one of those stores are listed.
    fn list_items(&self, store_ids: &[StoreId]) -> Result<Vec<Item>, Error>;

    /// List every known store.
    fn list_stores(&self) -> Result<Vec<StoreType>, Error>;

    /// List every known category.
    fn list_categories(&self) -> Result<Vec<Category>, Error>;

    /// Create an item and return it with its ID.
    fn create_item(&self, name: ItemName, category_id: CategoryId) -> Result<Item, Error>;

    /// Set an item's needed flag and return the updated item.
    fn update_item_needed(&self, item_id: ItemId, needed: bool) -> Result<Item, Error>;

    /// Replace an item's stores and return the updated item.
    fn update_item_stores(&self, item_id: ItemId, store_ids: &[StoreId]) -> Result<Item, Error>;

    /// Delete an item, returning whether it existed.
    fn delete_item(&self, item_id: ItemId) -> Result<bool, Error>;
}

/// A [ShoppingListStore] backed by a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteShoppingListStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteShoppingListStore {
    /// Create a store that reads and writes through `connection`.
    ///
    /// The database must already be initialized.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl ShoppingListStore for SQLiteShoppingListStore {
    fn list_items(&self, store_ids: &[StoreId]) -> Result<Vec<Item>, Error> {
        get_items(store_ids, &*self.lock()?)
    }

    fn list_stores(&self) -> Result<Vec<StoreType>, Error> {
        get_all_stores(&*self.lock()?)
    }

    fn list_categories(&self) -> Result<Vec<Category>, Error> {
        get_all_categories(&*self.lock()?)
    }

    fn create_item(&self, name: ItemName, category_id: CategoryId) -> Result<Item, Error> {
        create_item(name, category_id, &*self.lock()?)
    }

    fn update_item_needed(&self, item_id: ItemId, needed: bool) -> Result<Item, Error> {
        set_item_needed(item_id, needed, &*self.lock()?)
    }

    fn update_item_stores(&self, item_id: ItemId, store_ids: &[StoreId]) -> Result<Item, Error> {
        set_item_stores(item_id, store_ids, &*self.lock()?)
    }

    fn delete_item(&self, item_id: ItemId) -> Result<bool, Error> {
        match delete_item(item_id, &*self.lock()?) {
            Ok(()) => Ok(true),
            Err(Error::DeleteMissingItem) => Ok(false),
            Err(error) => Err(error),
        }
    }
}
