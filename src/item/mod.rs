//! Shopping list items: their storage and the JSON endpoints for managing them.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod create;
mod db;
mod delete;
mod domain;
mod list;
mod update;

pub use create::create_item_endpoint;
pub use db::{
    create_item, create_item_table, delete_item, get_item, get_items, set_item_needed,
    set_item_stores,
};
pub use delete::delete_item_endpoint;
pub use domain::{CreateItemData, Item, ItemId, ItemName, UpdateNeededData, UpdateStoresData};
pub use list::{ItemsQuery, get_items_endpoint};
pub use update::{update_item_needed_endpoint, update_item_stores_endpoint};

/// The state needed by the item endpoints.
#[derive(Debug, Clone)]
pub struct ItemState {
    /// The database connection for reading and writing items.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ItemState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
