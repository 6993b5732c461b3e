//! Store types are the places an item can be bought (e.g., 'Grocery', 'Big Box').

mod db;
mod domain;
mod list;

pub use db::{create_store, create_store_table, get_all_stores, get_store};
pub use domain::{StoreId, StoreName, StoreType};
pub use list::{StoreState, get_stores_endpoint};
