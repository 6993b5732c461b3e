//! Toggle semantics for the store filter and for per-item store assignment.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::store_type::{StoreId, StoreType};

/// The set of stores the user has chosen to filter the list by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSelection(BTreeSet<StoreId>);

impl StoreSelection {
    /// An empty selection, which filters nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `store_id` if it is not selected, otherwise deselect it.
    ///
    /// Returns whether the store is selected afterwards.
    pub fn toggle(&mut self, store_id: StoreId) -> bool {
        if self.0.remove(&store_id) {
            false
        } else {
            self.0.insert(store_id);
            true
        }
    }

    /// Select `store_id`, leaving it selected if it already is.
    pub fn select(&mut self, store_id: StoreId) {
        self.0.insert(store_id);
    }

    /// Deselect every store.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Whether `store_id` is selected.
    pub fn contains(&self, store_id: StoreId) -> bool {
        self.0.contains(&store_id)
    }

    /// Whether no store is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The selected store IDs in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = StoreId> + '_ {
        self.0.iter().copied()
    }

    /// Keep only the selected stores that are in `stores`.
    pub fn restricted_to(&self, stores: &[StoreType]) -> Self {
        Self(
            self.0
                .iter()
                .copied()
                .filter(|id| stores.iter().any(|store| store.id == *id))
                .collect(),
        )
    }
}

impl FromIterator<StoreId> for StoreSelection {
    fn from_iter<T: IntoIterator<Item = StoreId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Toggle `store` in an item's assigned stores.
///
/// Adds the store at the end if no assigned store has its ID, otherwise removes it. The order of
/// the other stores is kept.
pub fn toggle_store(stores: &[StoreType], store: &StoreType) -> Vec<StoreType> {
    if stores.iter().any(|assigned| assigned.id == store.id) {
        stores
            .iter()
            .filter(|assigned| assigned.id != store.id)
            .cloned()
            .collect()
    } else {
        let mut toggled = stores.to_vec();
        toggled.push(store.clone());
        toggled
    }
}
