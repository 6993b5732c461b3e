//! Database operations for stores.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    error::is_unique_violation,
    store_type::{StoreId, StoreName, StoreType},
};

/// Create a store and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateStoreName] if a store with `name` already exists,
/// - [Error::SqlError] if there is some other SQL error.
pub fn create_store(name: StoreName, connection: &Connection) -> Result<StoreType, Error> {
    connection
        .execute("INSERT INTO store_type (name) VALUES (?1);", (name.as_ref(),))
        .map_err(|error| {
            if is_unique_violation(&error) {
                Error::DuplicateStoreName(name.to_string())
            } else {
                error.into()
            }
        })?;

    let id = connection.last_insert_rowid();

    Ok(StoreType { id, name })
}

/// Retrieve a single store by ID.
pub fn get_store(store_id: StoreId, connection: &Connection) -> Result<StoreType, Error> {
    connection
        .prepare("SELECT id, name FROM store_type WHERE id = :id;")?
        .query_row(&[(":id", &store_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all stores ordered alphabetically by name.
pub fn get_all_stores(connection: &Connection) -> Result<Vec<StoreType>, Error> {
    connection
        .prepare("SELECT id, name FROM store_type ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_store| maybe_store.map_err(|error| error.into()))
        .collect()
}

/// Initialize the store table.
pub fn create_store_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS store_type (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<StoreType, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = StoreName::new_unchecked(&raw_name);

    Ok(StoreType { id, name })
}
