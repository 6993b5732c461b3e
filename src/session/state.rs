//! The client's view of the shopping list, advanced one event at a time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    category::Category,
    item::{Item, ItemId},
    session::merge::{merge_by_id, remove_by_id},
    store_type::{StoreId, StoreType},
    view::{CategoryGroup, StoreSelection, compute_view, toggle_store},
};

/// Orders the mutations requested by a session. Later requests have larger versions.
pub type Version = u64;

/// A change to a single item that the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Mark an item as needed or not needed.
    SetNeeded {
        /// The item to change.
        item_id: ItemId,
        /// Whether the item needs to be bought.
        needed: bool,
    },
    /// Add a store to an item if it is not assigned, otherwise remove it.
    ToggleStore {
        /// The item to change.
        item_id: ItemId,
        /// The store to add or remove.
        store_id: StoreId,
    },
    /// Remove an item from the list.
    Delete {
        /// The item to remove.
        item_id: ItemId,
    },
}

impl Mutation {
    /// The item the mutation applies to.
    pub fn item_id(&self) -> ItemId {
        match self {
            Mutation::SetNeeded { item_id, .. }
            | Mutation::ToggleStore { item_id, .. }
            | Mutation::Delete { item_id } => *item_id,
        }
    }
}

/// The request that must be sent to the data collaborator for a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationRequest {
    /// Set the item's needed flag.
    SetNeeded {
        /// The new value of the flag.
        needed: bool,
    },
    /// Replace the item's stores with exactly these stores.
    SetStores {
        /// The complete set of stores, in display order.
        store_ids: Vec<StoreId>,
    },
    /// Delete the item.
    Delete,
}

/// Describes an in-flight mutation.
///
/// Returned by the reducer when a mutation is applied optimistically, and handed back with the
/// result of sending `request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationTicket {
    /// The item the mutation applies to.
    pub item_id: ItemId,
    /// Identifies the mutation among those requested for the session.
    pub version: Version,
    /// What to send to the data collaborator.
    pub request: MutationRequest,
}

/// What the data collaborator reported after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The authoritative copy of the item after the change.
    Updated(Item),
    /// The item was deleted.
    Deleted,
}

/// Everything that can happen to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// A fresh copy of the shopping list was fetched.
    Loaded {
        /// Every item on the list.
        items: Vec<Item>,
        /// Every known store.
        stores: Vec<StoreType>,
        /// Every known category.
        categories: Vec<Category>,
    },
    /// Fetching the shopping list failed.
    LoadFailed(String),
    /// The search text changed.
    QueryChanged(String),
    /// A store in the store filter was selected or deselected.
    StoreFilterToggled(StoreId),
    /// A store in the store filter was selected. Selecting a selected store changes nothing.
    StoreFilterSelected(StoreId),
    /// Every store in the store filter was deselected.
    StoreFiltersCleared,
    /// The user asked for a change to an item.
    MutationRequested(Mutation),
    /// The data collaborator accepted a mutation.
    MutationSucceeded {
        /// The ticket returned when the mutation was requested.
        ticket: MutationTicket,
        /// The collaborator's copy of the result.
        outcome: MutationOutcome,
    },
    /// The data collaborator rejected a mutation, or could not be reached.
    MutationFailed {
        /// The ticket returned when the mutation was requested.
        ticket: MutationTicket,
        /// A description of the failure to show the user.
        error: String,
    },
    /// The data collaborator created an item.
    ItemCreated(Item),
    /// The user acknowledged the current error.
    ErrorDismissed,
}

/// An optimistic change waiting for the data collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Patch {
    SetNeeded(bool),
    SetStores(Vec<StoreType>),
    Delete,
}

impl Patch {
    fn apply(&self, item: Option<Item>) -> Option<Item> {
        let mut item = item?;

        match self {
            Patch::SetNeeded(needed) => item.needed = *needed,
            Patch::SetStores(stores) => item.stores = stores.clone(),
            Patch::Delete => return None,
        }

        Some(item)
    }
}

/// The bookkeeping for an item with mutations in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingItem {
    /// The last authoritative copy, `None` once the item is known to be deleted.
    base: Option<Item>,
    /// The newest mutation `base` is known to include.
    base_version: Version,
    /// In-flight patches in request order.
    patches: Vec<(Version, Patch)>,
}

impl PendingItem {
    fn visible(&self) -> Option<Item> {
        self.patches
            .iter()
            .filter(|(version, _)| *version > self.base_version)
            .fold(self.base.clone(), |item, (_, patch)| patch.apply(item))
    }
}

/// An immutable snapshot of a client's shopping list session.
///
/// Use [ShoppingListState::reduce] to advance it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShoppingListState {
    items: Vec<Item>,
    stores: Vec<StoreType>,
    categories: Vec<Category>,
    query: String,
    store_filters: StoreSelection,
    /// Set by a failed refresh and cleared by the next successful one.
    load_error: Option<String>,
    /// Set by a rejected mutation and kept until dismissed.
    write_error: Option<String>,
    pending: BTreeMap<ItemId, PendingItem>,
    last_version: Version,
}

impl ShoppingListState {
    /// Apply `event` and return the next state.
    ///
    /// When the event is a [ViewEvent::MutationRequested] for a known item, the change is applied
    /// to the returned state straight away and the returned ticket describes the request to send.
    /// Report the result with [ViewEvent::MutationSucceeded] or [ViewEvent::MutationFailed].
    pub fn reduce(mut self, event: ViewEvent) -> (Self, Option<MutationTicket>) {
        match event {
            ViewEvent::Loaded {
                items,
                stores,
                categories,
            } => self.load(items, stores, categories),
            ViewEvent::LoadFailed(error) => {
                tracing::warn!("keeping the last loaded list after a failed refresh: {error}");
                self.load_error = Some(error);
            }
            ViewEvent::QueryChanged(query) => self.query = query,
            ViewEvent::StoreFilterToggled(store_id) => {
                self.store_filters.toggle(store_id);
            }
            ViewEvent::StoreFilterSelected(store_id) => self.store_filters.select(store_id),
            ViewEvent::StoreFiltersCleared => self.store_filters.clear(),
            ViewEvent::MutationRequested(mutation) => {
                let ticket = self.request(mutation);
                return (self, ticket);
            }
            ViewEvent::MutationSucceeded { ticket, outcome } => self.succeed(ticket, outcome),
            ViewEvent::MutationFailed { ticket, error } => self.fail(ticket, error),
            ViewEvent::ItemCreated(item) => {
                self.items = merge_by_id(std::mem::take(&mut self.items), [item]);
            }
            ViewEvent::ErrorDismissed => {
                self.load_error = None;
                self.write_error = None;
            }
        }

        (self, None)
    }

    /// The items as the user should see them, including changes still in flight.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The known stores.
    pub fn stores(&self) -> &[StoreType] {
        &self.stores
    }

    /// The known categories.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The current search text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The stores selected in the store filter.
    pub fn store_filters(&self) -> &StoreSelection {
        &self.store_filters
    }

    /// The failure to show the user, if any.
    ///
    /// A rejected mutation is shown until it is dismissed, even if the list is refreshed
    /// afterwards. A failed refresh is shown until it is dismissed or a refresh succeeds.
    pub fn error(&self) -> Option<&str> {
        self.write_error.as_deref().or(self.load_error.as_deref())
    }

    /// Whether `item_id` has mutations waiting for the data collaborator.
    pub fn is_pending(&self, item_id: ItemId) -> bool {
        self.pending.contains_key(&item_id)
    }

    /// The grouped list for the current query and store filter.
    pub fn view(&self) -> Vec<CategoryGroup> {
        compute_view(&self.items, &self.stores, &self.query, &self.store_filters)
    }

    fn load(&mut self, items: Vec<Item>, stores: Vec<StoreType>, categories: Vec<Category>) {
        self.items = items;
        self.stores = stores;
        self.categories = categories;
        self.load_error = None;

        let pending_ids: Vec<ItemId> = self.pending.keys().copied().collect();

        for item_id in pending_ids {
            if let Some(pending) = self.pending.get_mut(&item_id) {
                pending.base = self.items.iter().find(|item| item.id == item_id).cloned();
            }

            self.settle(item_id);
        }
    }

    fn request(&mut self, mutation: Mutation) -> Option<MutationTicket> {
        let item_id = mutation.item_id();

        let Some(current) = self.items.iter().find(|item| item.id == item_id).cloned() else {
            tracing::warn!("ignoring {mutation:?} for an item that is not on the list");
            return None;
        };

        let (patch, request) = match mutation {
            Mutation::SetNeeded { needed, .. } => (
                Patch::SetNeeded(needed),
                MutationRequest::SetNeeded { needed },
            ),
            Mutation::ToggleStore { store_id, .. } => {
                let Some(store) = self.stores.iter().find(|store| store.id == store_id) else {
                    tracing::warn!("ignoring toggle of unknown store {store_id} on item {item_id}");
                    return None;
                };

                let stores = toggle_store(&current.stores, store);
                let store_ids = stores.iter().map(|store| store.id).collect();

                (
                    Patch::SetStores(stores),
                    MutationRequest::SetStores { store_ids },
                )
            }
            Mutation::Delete { .. } => (Patch::Delete, MutationRequest::Delete),
        };

        let base_version = self.last_version;
        self.last_version += 1;
        let version = self.last_version;

        self.pending
            .entry(item_id)
            .or_insert_with(|| PendingItem {
                base: Some(current),
                base_version,
                patches: Vec::new(),
            })
            .patches
            .push((version, patch));

        self.settle(item_id);

        Some(MutationTicket {
            item_id,
            version,
            request,
        })
    }

    fn succeed(&mut self, ticket: MutationTicket, outcome: MutationOutcome) {
        let Some(pending) = self.pending.get_mut(&ticket.item_id) else {
            tracing::warn!(
                "ignoring result of mutation {} for item {}, which has nothing in flight",
                ticket.version,
                ticket.item_id
            );
            return;
        };

        pending
            .patches
            .retain(|(version, _)| *version != ticket.version);

        if ticket.version > pending.base_version {
            pending.base = match outcome {
                MutationOutcome::Updated(item) => Some(item),
                MutationOutcome::Deleted => None,
            };
            pending.base_version = ticket.version;
        } else {
            tracing::debug!(
                "discarding stale result of mutation {} for item {}",
                ticket.version,
                ticket.item_id
            );
        }

        self.settle(ticket.item_id);
    }

    fn fail(&mut self, ticket: MutationTicket, error: String) {
        tracing::warn!(
            "rolling back mutation {} for item {}: {error}",
            ticket.version,
            ticket.item_id
        );

        if let Some(pending) = self.pending.get_mut(&ticket.item_id) {
            pending
                .patches
                .retain(|(version, _)| *version != ticket.version);
        }

        self.settle(ticket.item_id);
        self.write_error = Some(error);
    }

    /// Write the visible copy of `item_id` into `items` and forget it once nothing is in flight.
    fn settle(&mut self, item_id: ItemId) {
        let Some(pending) = self.pending.get(&item_id) else {
            return;
        };

        let items = std::mem::take(&mut self.items);
        self.items = match pending.visible() {
            Some(item) => merge_by_id(items, [item]),
            None => remove_by_id(items, item_id),
        };

        if pending.patches.is_empty() {
            self.pending.remove(&item_id);
        }
    }
}
