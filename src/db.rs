//! Creates the database schema and the default rows.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error, category::create_category_table, item::create_item_table,
    store_type::create_store_table,
};

/// The categories every new shopping list starts with.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["food", "cleaning", "household", "dog", "other"];

/// The stores every new shopping list starts with.
pub const DEFAULT_STORES: [&str; 3] = ["Big Box", "Grocery", "Department"];

/// Create the tables for the domain models if they do not exist.
///
/// Foreign key enforcement is enabled on `connection`, since SQLite leaves it off by default and
/// item deletion relies on it to remove store assignments.
///
/// # Errors
/// Returns an [Error::SqlError] if the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_store_table(&transaction)?;
    create_item_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Insert [DEFAULT_CATEGORIES] and [DEFAULT_STORES], skipping any that already exist.
///
/// The database must already be initialized with [initialize].
pub fn seed_defaults(connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    {
        let mut insert_category =
            transaction.prepare("INSERT OR IGNORE INTO category (name) VALUES (?1);")?;
        for name in DEFAULT_CATEGORIES {
            insert_category.execute([name])?;
        }

        let mut insert_store =
            transaction.prepare("INSERT OR IGNORE INTO store_type (name) VALUES (?1);")?;
        for name in DEFAULT_STORES {
            insert_store.execute([name])?;
        }
    }

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod db_tests {
    use rusqlite::Connection;

    use crate::{
        category::get_all_categories,
        db::{initialize, seed_defaults},
        store_type::get_all_stores,
    };

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();
        initialize(&connection).unwrap();
    }

    #[test]
    fn initialize_enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        let enabled: i64 = connection
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn seed_defaults_inserts_each_row_once() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        seed_defaults(&connection).unwrap();
        seed_defaults(&connection).unwrap();

        let categories: Vec<String> = get_all_categories(&connection)
            .unwrap()
            .into_iter()
            .map(|category| category.name.to_string())
            .collect();
        assert_eq!(categories, ["cleaning", "dog", "food", "household", "other"]);

        let stores: Vec<String> = get_all_stores(&connection)
            .unwrap()
            .into_iter()
            .map(|store| store.name.to_string())
            .collect();
        assert_eq!(stores, ["Big Box", "Department", "Grocery"]);
    }
}
