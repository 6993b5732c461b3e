//! Defines the app level error type and its conversion to JSON responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{category::CategoryId, store_type::StoreId};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used to create an item name.
    #[error("Item name cannot be empty")]
    EmptyItemName,

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// An empty string was used to create a store name.
    #[error("Store name cannot be empty")]
    EmptyStoreName,

    /// The category ID used to create an item did not match a valid category.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// One of the store IDs assigned to an item did not match a valid store.
    #[error("the store IDs {0:?} do not all refer to valid stores")]
    InvalidStore(Vec<StoreId>),

    /// The specified category name already exists in the database.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// The specified store name already exists in the database.
    #[error("the store \"{0}\" already exists")]
    DuplicateStoreName(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an item that does not exist.
    #[error("tried to update an item that is not in the database")]
    UpdateMissingItem,

    /// Tried to delete an item that does not exist.
    #[error("tried to delete an item that is not in the database")]
    DeleteMissingItem,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// Returns true if `error` is a failed UNIQUE constraint.
pub(crate) fn is_unique_violation(error: &rusqlite::Error) -> bool {
    // Code 2067 occurs when a UNIQUE constraint failed.
    matches!(error, rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 2067)
}

/// Returns true if `error` is a failed FOREIGN KEY constraint.
pub(crate) fn is_foreign_key_violation(error: &rusqlite::Error) -> bool {
    // Code 787 occurs when a FOREIGN KEY constraint failed.
    matches!(error, rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 787)
}

/// The JSON body sent to clients when a request fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// A message that is safe to show to the user.
    pub error: String,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::EmptyItemName
            | Error::EmptyCategoryName
            | Error::EmptyStoreName
            | Error::InvalidCategory(_)
            | Error::InvalidStore(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::DuplicateCategoryName(_) | Error::DuplicateStoreName(_) => StatusCode::CONFLICT,
            Error::NotFound | Error::UpdateMissingItem | Error::DeleteMissingItem => {
                StatusCode::NOT_FOUND
            }
            Error::SqlError(_) | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            // Server errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod error_response_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{
        Error,
        test_utils::{assert_content_type, parse_json},
    };

    use super::ErrorBody;

    #[tokio::test]
    async fn client_errors_show_their_message() {
        let response = Error::EmptyItemName.into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_content_type(&response, "application/json");
        let body: ErrorBody = parse_json(response).await;
        assert_eq!(body.error, "Item name cannot be empty");
    }

    #[tokio::test]
    async fn server_errors_hide_their_message() {
        let response = Error::DatabaseLockError.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = parse_json(response).await;
        assert!(!body.error.contains("lock"));
    }

    #[tokio::test]
    async fn missing_items_are_not_found() {
        assert_eq!(
            Error::DeleteMissingItem.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::UpdateMissingItem.into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}
