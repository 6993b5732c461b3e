//! Application router configuration.

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{delete, get, put},
};

use crate::{
    AppState, Error,
    category::get_categories_endpoint,
    endpoints,
    item::{
        create_item_endpoint, delete_item_endpoint, get_items_endpoint,
        update_item_needed_endpoint, update_item_stores_endpoint,
    },
    store_type::get_stores_endpoint,
    view::get_view_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::ITEMS,
            get(get_items_endpoint).post(create_item_endpoint),
        )
        .route(endpoints::ITEM, delete(delete_item_endpoint))
        .route(endpoints::ITEM_NEEDED, put(update_item_needed_endpoint))
        .route(endpoints::ITEM_STORES, put(update_item_stores_endpoint))
        .route(endpoints::STORES, get(get_stores_endpoint))
        .route(endpoints::CATEGORIES, get(get_categories_endpoint))
        .route(endpoints::VIEW, get(get_view_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
