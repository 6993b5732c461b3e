//! Store listing endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    store_type::{StoreType, get_all_stores},
};

/// The state needed for listing stores.
#[derive(Debug, Clone)]
pub struct StoreState {
    /// The database connection for reading stores.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for StoreState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List every store, sorted by name.
pub async fn get_stores_endpoint(
    State(state): State<StoreState>,
) -> Result<Json<Vec<StoreType>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_all_stores(&connection).map(Json)
}
