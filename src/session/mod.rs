//! A client's session with the shopping list.
//!
//! [ShoppingListState] is an immutable record advanced by [ShoppingListState::reduce].
//! [ShoppingList] pairs it with a [ShoppingListStore], applying changes optimistically and
//! rolling them back when the store rejects them.

mod client;
mod merge;
mod state;
mod store;

pub use client::ShoppingList;
pub use merge::{merge_by_id, remove_by_id};
pub use state::{
    Mutation, MutationOutcome, MutationRequest, MutationTicket, ShoppingListState, Version,
    ViewEvent,
};
pub use store::{SQLiteShoppingListStore, ShoppingListStore};
