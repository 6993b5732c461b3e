//! Database operations for items and their store assignments.

use std::collections::{HashMap, HashSet};

use rusqlite::{Connection, Row, ToSql, params_from_iter};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
    error::is_foreign_key_violation,
    item::{Item, ItemId, ItemName},
    store_type::{StoreId, StoreName, StoreType},
};

const SELECT_ITEMS: &str = "SELECT item.id, item.name, item.needed, category.id, category.name
    FROM item
    LEFT JOIN category ON category.id = item.category_id";

/// Create an item in `category_id` and return it with its generated ID.
///
/// New items are not needed and have no stores assigned.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if `category_id` does not refer to a valid category,
/// - [Error::SqlError] if there is some other SQL error.
pub fn create_item(
    name: ItemName,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Item, Error> {
    connection
        .execute(
            "INSERT INTO item (name, category_id, needed) VALUES (?1, ?2, 0);",
            (name.as_ref(), category_id),
        )
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                Error::InvalidCategory(category_id)
            } else {
                error.into()
            }
        })?;

    get_item(connection.last_insert_rowid(), connection)
}

/// Retrieve a single item by ID, including its category and stores.
pub fn get_item(item_id: ItemId, connection: &Connection) -> Result<Item, Error> {
    let mut item = connection
        .prepare(&format!("{SELECT_ITEMS} WHERE item.id = :id;"))?
        .query_row(&[(":id", &item_id)], map_row)?;

    item.stores = connection
        .prepare(
            "SELECT store_type.id, store_type.name
            FROM item_store
            INNER JOIN store_type ON store_type.id = item_store.store_id
            WHERE item_store.item_id = ?1
            ORDER BY item_store.rowid ASC",
        )?
        .query_map([item_id], |row| {
            let raw_name: String = row.get(1)?;
            Ok(StoreType {
                id: row.get(0)?,
                name: StoreName::new_unchecked(&raw_name),
            })
        })?
        .collect::<Result<_, _>>()?;

    Ok(item)
}

/// Retrieve all items in insertion order.
///
/// If `store_ids` is not empty, only items assigned to at least one of those stores are returned.
pub fn get_items(store_ids: &[StoreId], connection: &Connection) -> Result<Vec<Item>, Error> {
    let mut items: Vec<Item> = if store_ids.is_empty() {
        connection
            .prepare(&format!("{SELECT_ITEMS} ORDER BY item.id ASC;"))?
            .query_map([], map_row)?
            .collect::<Result<_, _>>()?
    } else {
        let placeholders = std::iter::repeat_n("?", store_ids.len())
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "{SELECT_ITEMS}
            WHERE EXISTS (
                SELECT 1 FROM item_store
                WHERE item_store.item_id = item.id AND item_store.store_id IN ({placeholders})
            )
            ORDER BY item.id ASC;"
        );
        let params: Vec<&dyn ToSql> = store_ids.iter().map(|id| id as &dyn ToSql).collect();

        connection
            .prepare(&query)?
            .query_map(params_from_iter(params), map_row)?
            .collect::<Result<_, _>>()?
    };

    let mut stores_by_item = get_store_assignments(connection)?;
    for item in &mut items {
        if let Some(stores) = stores_by_item.remove(&item.id) {
            item.stores = stores;
        }
    }

    Ok(items)
}

/// Set whether an item is needed and return the updated item.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingItem] if the item does not exist,
/// - [Error::SqlError] if there is some other SQL error.
pub fn set_item_needed(
    item_id: ItemId,
    needed: bool,
    connection: &Connection,
) -> Result<Item, Error> {
    let rows_affected = connection.execute(
        "UPDATE item SET needed = ?1 WHERE id = ?2",
        (needed, item_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingItem);
    }

    get_item(item_id, connection)
}

/// Replace an item's stores with `store_ids` and return the updated item.
///
/// Duplicate IDs are ignored, the remaining IDs keep the order they were given in.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingItem] if the item does not exist,
/// - [Error::InvalidStore] if any of `store_ids` does not refer to a valid store,
/// - [Error::SqlError] if there is some other SQL error.
pub fn set_item_stores(
    item_id: ItemId,
    store_ids: &[StoreId],
    connection: &Connection,
) -> Result<Item, Error> {
    let tx = connection.unchecked_transaction()?;

    let item_count: i64 =
        tx.query_row("SELECT COUNT(*) FROM item WHERE id = ?1", [item_id], |row| {
            row.get(0)
        })?;
    if item_count == 0 {
        return Err(Error::UpdateMissingItem);
    }

    tx.execute("DELETE FROM item_store WHERE item_id = ?1", [item_id])?;

    let mut stmt = tx.prepare("INSERT INTO item_store (item_id, store_id) VALUES (?1, ?2)")?;
    let mut seen = HashSet::new();

    for &store_id in store_ids {
        if !seen.insert(store_id) {
            continue;
        }

        stmt.execute((item_id, store_id)).map_err(|error| {
            if is_foreign_key_violation(&error) {
                Error::InvalidStore(store_ids.to_vec())
            } else {
                error.into()
            }
        })?;
    }

    drop(stmt);
    tx.commit()?;

    get_item(item_id, connection)
}

/// Delete an item by ID, along with its store assignments.
///
/// # Errors
/// Returns [Error::DeleteMissingItem] if the item doesn't exist.
pub fn delete_item(item_id: ItemId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM item WHERE id = ?1", [item_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingItem);
    }

    Ok(())
}

/// Initialize the item table and the item-store junction table.
///
/// The category and store tables must be created first.
pub fn create_item_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS item (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            needed INTEGER NOT NULL DEFAULT 0,
            category_id INTEGER NOT NULL,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
        );

        CREATE TABLE IF NOT EXISTS item_store (
            item_id INTEGER NOT NULL,
            store_id INTEGER NOT NULL,
            FOREIGN KEY(item_id) REFERENCES item(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(store_id) REFERENCES store_type(id) ON UPDATE CASCADE ON DELETE CASCADE,
            UNIQUE(item_id, store_id)
        );

        CREATE INDEX IF NOT EXISTS idx_item_category_id ON item(category_id);
        CREATE INDEX IF NOT EXISTS idx_item_store_store_id ON item_store(store_id);",
    )?;

    Ok(())
}

fn get_store_assignments(
    connection: &Connection,
) -> Result<HashMap<ItemId, Vec<StoreType>>, Error> {
    let mut stores_by_item: HashMap<ItemId, Vec<StoreType>> = HashMap::new();

    let mut stmt = connection.prepare(
        "SELECT item_store.item_id, store_type.id, store_type.name
        FROM item_store
        INNER JOIN store_type ON store_type.id = item_store.store_id
        ORDER BY item_store.rowid ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        let item_id: ItemId = row.get(0)?;
        let raw_name: String = row.get(2)?;
        let store = StoreType {
            id: row.get(1)?,
            name: StoreName::new_unchecked(&raw_name),
        };
        Ok((item_id, store))
    })?;

    for row in rows {
        let (item_id, store) = row?;
        stores_by_item.entry(item_id).or_default().push(store);
    }

    Ok(stores_by_item)
}

fn map_row(row: &Row) -> Result<Item, rusqlite::Error> {
    let raw_name: String = row.get(1)?;
    let category_id: Option<CategoryId> = row.get(3)?;
    let category_name: Option<String> = row.get(4)?;

    let category = match (category_id, category_name) {
        (Some(id), Some(name)) => Some(Category {
            id,
            name: CategoryName::new_unchecked(&name),
        }),
        _ => None,
    };

    Ok(Item {
        id: row.get(0)?,
        name: ItemName::new_unchecked(&raw_name),
        category,
        needed: row.get(2)?,
        stores: Vec::new(),
    })
}
