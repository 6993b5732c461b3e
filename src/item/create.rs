//! Item creation endpoint.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    item::{CreateItemData, ItemName, ItemState, create_item},
};

/// Create an item from a name and category ID.
///
/// Responds with `201 Created` and the new item.
pub async fn create_item_endpoint(
    State(state): State<ItemState>,
    Json(new_item): Json<CreateItemData>,
) -> Response {
    let name = match ItemName::new(&new_item.name) {
        Ok(name) => name,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_item(name, new_item.category_id, &connection) {
        Ok(item) => {
            tracing::info!("Created item {} \"{}\"", item.id, item.name);
            (StatusCode::CREATED, Json(item)).into_response()
        }
        Err(error @ Error::InvalidCategory(_)) => error.into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating an item: {error}");
            error.into_response()
        }
    }
}
