//! Endpoint serving the grouped shopping list.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::extract::Query;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    item::get_items,
    store_type::{StoreId, get_all_stores},
    view::{CategoryGroup, StoreSelection, compute_view},
};

/// The state needed for computing the list view.
#[derive(Debug, Clone)]
pub struct ViewEndpointState {
    /// The database connection for reading items and stores.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ViewEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters for the list view, e.g. `?query=milk&stores=1&stores=2`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewQuery {
    /// Free text to fuzzy search for. Empty means no search.
    #[serde(default)]
    pub query: String,
    /// Store IDs to filter by. Empty means no filter.
    #[serde(default)]
    pub stores: Vec<StoreId>,
}

/// Search, filter and group every item on the list.
pub async fn get_view_endpoint(
    State(state): State<ViewEndpointState>,
    Query(view_query): Query<ViewQuery>,
) -> Result<Json<Vec<CategoryGroup>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let items = get_items(&[], &connection)?;
    let stores = get_all_stores(&connection)?;
    drop(connection);

    let store_filters = StoreSelection::from_iter(view_query.stores.iter().copied());
    let groups = compute_view(&items, &stores, &view_query.query, &store_filters);

    tracing::debug!(
        "Computed view with {} groups for query {:?} and stores {:?}",
        groups.len(),
        view_query.query,
        view_query.stores
    );

    Ok(Json(groups))
}
