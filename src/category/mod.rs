//! Categories group items on the shopping list (e.g., 'food', 'cleaning').

mod db;
mod domain;
mod list;

pub use db::{create_category, create_category_table, get_all_categories, get_category};
pub use domain::{Category, CategoryId, CategoryName, UNKNOWN_CATEGORY};
pub use list::{CategoryState, get_categories_endpoint};
