//! Item deletion endpoint.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    item::{ItemId, ItemState, delete_item},
};

/// Delete an item. Responds with `true` once the item is gone.
pub async fn delete_item_endpoint(
    Path(item_id): Path<ItemId>,
    State(state): State<ItemState>,
) -> Result<Json<bool>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    match delete_item(item_id, &connection) {
        Ok(()) => {
            tracing::info!("Deleted item {item_id}");
            Ok(Json(true))
        }
        Err(Error::DeleteMissingItem) => Err(Error::DeleteMissingItem),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting item {item_id}: {error}");
            Err(error)
        }
    }
}
