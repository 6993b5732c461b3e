//! Item listing endpoint.

use axum::{Json, extract::State};
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    item::{Item, ItemState, get_items},
    store_type::StoreId,
};

/// Query parameters for listing items.
///
/// Repeat the `stores` parameter to allow more than one store, e.g. `?stores=1&stores=2`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemsQuery {
    /// Only list items assigned to at least one of these stores. Empty means every item.
    #[serde(default)]
    pub stores: Vec<StoreId>,
}

/// List items, optionally restricted to an allow-list of stores.
pub async fn get_items_endpoint(
    State(state): State<ItemState>,
    Query(query): Query<ItemsQuery>,
) -> Result<Json<Vec<Item>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_items(&query.stores, &connection).map(Json)
}

#[cfg(test)]
mod get_items_endpoint_tests {
    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Query;

    use crate::{
        item::{Item, ItemsQuery, get_items_endpoint},
        test_utils::{parse_json, seeded_item_state},
    };

    #[tokio::test]
    async fn lists_all_items_without_filter() {
        let (state, fixture) = seeded_item_state();

        let response = get_items_endpoint(State(state), Query(ItemsQuery::default()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let items: Vec<Item> = parse_json(response).await;
        let names: Vec<&str> = items.iter().map(|item| item.name.as_ref()).collect();
        assert_eq!(names, ["Milk", "Apples", "Mop"]);
        assert_eq!(items.len(), fixture.items.len());
    }

    #[tokio::test]
    async fn lists_items_at_selected_stores() {
        let (state, fixture) = seeded_item_state();

        let response = get_items_endpoint(
            State(state),
            Query(ItemsQuery {
                stores: vec![fixture.grocery.id],
            }),
        )
        .await
        .into_response();

        let items: Vec<Item> = parse_json(response).await;
        let names: Vec<&str> = items.iter().map(|item| item.name.as_ref()).collect();
        assert_eq!(names, ["Milk", "Mop"]);
    }
}
