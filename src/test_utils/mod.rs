#![allow(missing_docs)]

pub(crate) mod http;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

pub(crate) use http::{assert_content_type, parse_json};

use crate::{
    category::{Category, CategoryName, create_category},
    db::initialize,
    item::{Item, ItemName, ItemState, create_item, set_item_stores},
    store_type::{StoreName, StoreType, create_store},
};

/// Build an item without touching the database.
///
/// The category ID is derived from the category name so that items built with the same name
/// share a category.
pub(crate) fn item(id: i64, name: &str, category: &str, stores: Vec<StoreType>) -> Item {
    let category_id = category.bytes().map(i64::from).sum();

    Item {
        id,
        name: ItemName::new_unchecked(name),
        category: Some(Category {
            id: category_id,
            name: CategoryName::new_unchecked(category),
        }),
        needed: false,
        stores,
    }
}

pub(crate) fn store(id: i64, name: &str) -> StoreType {
    StoreType {
        id,
        name: StoreName::new_unchecked(name),
    }
}

/// The rows created by [seeded_item_state].
pub(crate) struct Fixture {
    /// Milk, Apples and Mop, in creation order.
    pub items: Vec<Item>,
    pub grocery: StoreType,
    pub big_box: StoreType,
    pub food: Category,
    pub cleaning: Category,
}

/// Create an in-memory database holding the example shopping list.
///
/// Milk (food) is at the grocery store, Apples (food) at the big box store and Mop (cleaning) at
/// the grocery store.
pub(crate) fn seeded_item_state() -> (ItemState, Fixture) {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");

    let food = create_category(CategoryName::new_unchecked("food"), &connection).unwrap();
    let cleaning = create_category(CategoryName::new_unchecked("cleaning"), &connection).unwrap();
    let grocery = create_store(StoreName::new_unchecked("Grocery"), &connection).unwrap();
    let big_box = create_store(StoreName::new_unchecked("Big Box"), &connection).unwrap();

    let items = [
        ("Milk", &food, &grocery),
        ("Apples", &food, &big_box),
        ("Mop", &cleaning, &grocery),
    ]
    .into_iter()
    .map(|(name, category, store)| {
        let item = create_item(ItemName::new_unchecked(name), category.id, &connection).unwrap();
        set_item_stores(item.id, &[store.id], &connection).unwrap()
    })
    .collect();

    let state = ItemState {
        db_connection: Arc::new(Mutex::new(connection)),
    };

    (
        state,
        Fixture {
            items,
            grocery,
            big_box,
            food,
            cleaning,
        },
    )
}
