//! Endpoints for updating an item's needed flag and assigned stores.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    item::{
        Item, ItemId, ItemState, UpdateNeededData, UpdateStoresData, set_item_needed,
        set_item_stores,
    },
};

/// Set whether an item is needed. Responds with the updated item.
pub async fn update_item_needed_endpoint(
    Path(item_id): Path<ItemId>,
    State(state): State<ItemState>,
    Json(data): Json<UpdateNeededData>,
) -> Result<Json<Item>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let item = set_item_needed(item_id, data.needed, &connection)?;
    tracing::debug!("Set item {item_id} needed to {}", data.needed);

    Ok(Json(item))
}

/// Replace the set of stores assigned to an item. Responds with the updated item.
pub async fn update_item_stores_endpoint(
    Path(item_id): Path<ItemId>,
    State(state): State<ItemState>,
    Json(data): Json<UpdateStoresData>,
) -> Result<Json<Item>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let item = set_item_stores(item_id, &data.store_ids, &connection)?;
    tracing::debug!("Set item {item_id} stores to {:?}", data.store_ids);

    Ok(Json(item))
}
