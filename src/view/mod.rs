//! The list pipeline: search, filter by store, then group and sort by category.
//!
//! Every stage is a pure function over borrowed items, so the pipeline can be re-run cheaply
//! whenever the query, the store filter or the underlying items change.

mod endpoint;
mod filter;
mod grouping;
mod search;
mod selection;

pub use endpoint::{ViewEndpointState, ViewQuery, get_view_endpoint};
pub use filter::filter_by_stores;
pub use grouping::{CategoryGroup, group_and_sort};
pub use search::search;
pub use selection::{StoreSelection, toggle_store};

use crate::{item::Item, store_type::StoreType};

/// Compute the grouped list shown to the user.
///
/// Runs [search] with `query`, then [filter_by_stores] with `store_filters`, then
/// [group_and_sort]. Selected filters that are not one of the known `stores` are ignored.
///
/// The grouping stage always orders items alphabetically, so search ranking is not visible in
/// the result.
pub fn compute_view(
    items: &[Item],
    stores: &[StoreType],
    query: &str,
    store_filters: &StoreSelection,
) -> Vec<CategoryGroup> {
    let store_filters = store_filters.restricted_to(stores);

    let searched = search(items, query);
    let filtered = filter_by_stores(searched, &store_filters);

    group_and_sort(filtered)
}
