//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/items/{item_id}', use [format_endpoint].

/// The route to list and create items.
pub const ITEMS: &str = "/api/items";
/// The route to delete a single item.
pub const ITEM: &str = "/api/items/{item_id}";
/// The route to set whether an item is needed.
pub const ITEM_NEEDED: &str = "/api/items/{item_id}/needed";
/// The route to replace an item's stores.
pub const ITEM_STORES: &str = "/api/items/{item_id}/stores";
/// The route to list stores.
pub const STORES: &str = "/api/stores";
/// The route to list categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route for the searched, filtered and grouped list.
pub const VIEW: &str = "/api/view";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/items/{item_id}', '{item_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ITEMS);
        assert_endpoint_is_valid_uri(endpoints::ITEM);
        assert_endpoint_is_valid_uri(endpoints::ITEM_NEEDED);
        assert_endpoint_is_valid_uri(endpoints::ITEM_STORES);
        assert_endpoint_is_valid_uri(endpoints::STORES);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES);
        assert_endpoint_is_valid_uri(endpoints::VIEW);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint(endpoints::ITEM, 1);

        assert_eq!(formatted_path, "/api/items/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint(endpoints::ITEMS, 1);

        assert_eq!(formatted_path, "/api/items");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint(endpoints::ITEM_NEEDED, 42);

        assert_eq!(formatted_path, "/api/items/42/needed");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
