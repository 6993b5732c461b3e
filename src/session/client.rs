//! Drives a [ShoppingListState] against a [ShoppingListStore].

use crate::{
    Error,
    category::CategoryId,
    item::{Item, ItemId, ItemName},
    session::{
        ShoppingListStore,
        state::{
            Mutation, MutationOutcome, MutationRequest, MutationTicket, ShoppingListState,
            ViewEvent,
        },
    },
    store_type::StoreId,
    view::CategoryGroup,
};

/// A client's shopping list session.
///
/// Every change is applied to the local state first and then sent to the store. A failed write
/// is rolled back and recorded in [ShoppingListState::error]. A successful write is followed by
/// a refresh so the local list reflects changes made by other clients.
#[derive(Debug)]
pub struct ShoppingList<S> {
    store: S,
    state: ShoppingListState,
}

impl<S> ShoppingList<S>
where
    S: ShoppingListStore,
{
    /// Create an empty session. Call [ShoppingList::refresh] to load the list.
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: ShoppingListState::default(),
        }
    }

    /// The current state of the session.
    pub fn state(&self) -> &ShoppingListState {
        &self.state
    }

    /// The grouped list for the current query and store filter.
    pub fn view(&self) -> Vec<CategoryGroup> {
        self.state.view()
    }

    /// Fetch the items, stores and categories from the store.
    ///
    /// # Errors
    /// Returns the store's error if any list could not be fetched. The previously loaded list is
    /// kept and the error is recorded in the state.
    pub fn refresh(&mut self) -> Result<(), Error> {
        let fetched = self.store.list_items(&[]).and_then(|items| {
            Ok((
                items,
                self.store.list_stores()?,
                self.store.list_categories()?,
            ))
        });

        match fetched {
            Ok((items, stores, categories)) => {
                self.dispatch(ViewEvent::Loaded {
                    items,
                    stores,
                    categories,
                });
                Ok(())
            }
            Err(error) => {
                self.dispatch(ViewEvent::LoadFailed(error.to_string()));
                Err(error)
            }
        }
    }

    /// Set the search text.
    pub fn set_query(&mut self, query: &str) {
        self.dispatch(ViewEvent::QueryChanged(query.to_owned()));
    }

    /// Select `store_id` in the store filter, or deselect it if it is selected.
    pub fn toggle_store_filter(&mut self, store_id: StoreId) {
        self.dispatch(ViewEvent::StoreFilterToggled(store_id));
    }

    /// Select `store_id` in the store filter, keeping it selected if it already is.
    pub fn select_store_filter(&mut self, store_id: StoreId) {
        self.dispatch(ViewEvent::StoreFilterSelected(store_id));
    }

    /// Deselect every store in the store filter.
    pub fn clear_store_filters(&mut self) {
        self.dispatch(ViewEvent::StoreFiltersCleared);
    }

    /// Clear the error shown to the user.
    pub fn dismiss_error(&mut self) {
        self.dispatch(ViewEvent::ErrorDismissed);
    }

    /// Mark an item as needed or not needed.
    pub fn set_needed(&mut self, item_id: ItemId, needed: bool) -> Result<(), Error> {
        self.mutate(Mutation::SetNeeded { item_id, needed })
    }

    /// Add `store_id` to an item's stores, or remove it if it is already assigned.
    pub fn toggle_item_store(&mut self, item_id: ItemId, store_id: StoreId) -> Result<(), Error> {
        self.mutate(Mutation::ToggleStore { item_id, store_id })
    }

    /// Remove an item from the list.
    pub fn delete_item(&mut self, item_id: ItemId) -> Result<(), Error> {
        self.mutate(Mutation::Delete { item_id })
    }

    /// Create an item and add it to the list once the store returns it.
    ///
    /// # Errors
    /// Returns an [Error::EmptyItemName] if `name` is blank, or the store's error if the item
    /// could not be created.
    pub fn create_item(&mut self, name: &str, category_id: CategoryId) -> Result<Item, Error> {
        let name = ItemName::new(name)?;
        let item = self.store.create_item(name, category_id)?;

        self.dispatch(ViewEvent::ItemCreated(item.clone()));

        Ok(item)
    }

    /// Apply `mutation` to the local state without sending it.
    ///
    /// Returns `None` if the item or store it refers to is not on the list.
    pub fn begin(&mut self, mutation: Mutation) -> Option<MutationTicket> {
        self.dispatch(ViewEvent::MutationRequested(mutation))
    }

    /// Send the request described by `ticket` to the store.
    pub fn send(&self, ticket: &MutationTicket) -> Result<MutationOutcome, Error> {
        match &ticket.request {
            MutationRequest::SetNeeded { needed } => self
                .store
                .update_item_needed(ticket.item_id, *needed)
                .map(MutationOutcome::Updated),
            MutationRequest::SetStores { store_ids } => self
                .store
                .update_item_stores(ticket.item_id, store_ids)
                .map(MutationOutcome::Updated),
            MutationRequest::Delete => {
                if self.store.delete_item(ticket.item_id)? {
                    Ok(MutationOutcome::Deleted)
                } else {
                    Err(Error::DeleteMissingItem)
                }
            }
        }
    }

    /// Record that the store accepted the mutation for `ticket`.
    pub fn succeed(&mut self, ticket: MutationTicket, outcome: MutationOutcome) {
        self.dispatch(ViewEvent::MutationSucceeded { ticket, outcome });
    }

    /// Record that the store rejected the mutation for `ticket`, rolling it back.
    pub fn fail(&mut self, ticket: MutationTicket, error: &Error) {
        self.dispatch(ViewEvent::MutationFailed {
            ticket,
            error: error.to_string(),
        });
    }

    fn mutate(&mut self, mutation: Mutation) -> Result<(), Error> {
        let ticket = self.begin(mutation).ok_or(Error::NotFound)?;

        match self.send(&ticket) {
            Ok(outcome) => {
                self.succeed(ticket, outcome);

                if let Err(error) = self.refresh() {
                    tracing::warn!("could not refresh the list after a change: {error}");
                }

                Ok(())
            }
            Err(error) => {
                self.fail(ticket, &error);
                Err(error)
            }
        }
    }

    fn dispatch(&mut self, event: ViewEvent) -> Option<MutationTicket> {
        let (state, ticket) = std::mem::take(&mut self.state).reduce(event);
        self.state = state;
        ticket
    }
}

#[cfg(test)]
mod shopping_list_tests {
    use std::sync::{Arc, Mutex};

    use crate::{
        Error,
        category::{Category, CategoryId},
        item::{Item, ItemId, ItemName},
        session::{Mutation, SQLiteShoppingListStore, ShoppingList, ShoppingListStore},
        store_type::{StoreId, StoreType},
        test_utils::{Fixture, seeded_item_state},
    };

    /// Delegates to a database until it is taken offline, after which every call fails as if the
    /// database lock could not be acquired.
    #[derive(Clone)]
    struct FlakyStore {
        inner: SQLiteShoppingListStore,
        offline: Arc<Mutex<bool>>,
    }

    impl FlakyStore {
        fn set_offline(&self, offline: bool) {
            *self.offline.lock().unwrap() = offline;
        }

        fn check(&self) -> Result<(), Error> {
            if *self.offline.lock().unwrap() {
                Err(Error::DatabaseLockError)
            } else {
                Ok(())
            }
        }
    }

    impl ShoppingListStore for FlakyStore {
        fn list_items(&self, store_ids: &[StoreId]) -> Result<Vec<Item>, Error> {
            self.check()?;
            self.inner.list_items(store_ids)
        }

        fn list_stores(&self) -> Result<Vec<StoreType>, Error> {
            self.check()?;
            self.inner.list_stores()
        }

        fn list_categories(&self) -> Result<Vec<Category>, Error> {
            self.check()?;
            self.inner.list_categories()
        }

        fn create_item(&self, name: ItemName, category_id: CategoryId) -> Result<Item, Error> {
            self.check()?;
            self.inner.create_item(name, category_id)
        }

        fn update_item_needed(&self, item_id: ItemId, needed: bool) -> Result<Item, Error> {
            self.check()?;
            self.inner.update_item_needed(item_id, needed)
        }

        fn update_item_stores(
            &self,
            item_id: ItemId,
            store_ids: &[StoreId],
        ) -> Result<Item, Error> {
            self.check()?;
            self.inner.update_item_stores(item_id, store_ids)
        }

        fn delete_item(&self, item_id: ItemId) -> Result<bool, Error> {
            self.check()?;
            self.inner.delete_item(item_id)
        }
    }

    fn loaded_session() -> (ShoppingList<FlakyStore>, FlakyStore, Fixture) {
        let (state, fixture) = seeded_item_state();
        let store = FlakyStore {
            inner: SQLiteShoppingListStore::new(state.db_connection),
            offline: Arc::new(Mutex::new(false)),
        };
        let mut session = ShoppingList::new(store.clone());
        session.refresh().expect("could not load list");

        (session, store, fixture)
    }

    fn find<'a>(session: &'a ShoppingList<FlakyStore>, item_id: ItemId) -> Option<&'a Item> {
        session
            .state()
            .items()
            .iter()
            .find(|item| item.id == item_id)
    }

    #[test]
    fn refresh_loads_items_stores_and_categories() {
        let (session, _, fixture) = loaded_session();

        assert_eq!(session.state().items(), fixture.items);
        assert_eq!(session.state().stores().len(), 2);
        assert_eq!(session.state().categories().len(), 2);
        assert_eq!(session.view().len(), 2);
    }

    #[test]
    fn set_needed_is_persisted() {
        let (mut session, store, fixture) = loaded_session();
        let milk = &fixture.items[0];

        session.set_needed(milk.id, true).unwrap();

        assert!(find(&session, milk.id).unwrap().needed);
        assert!(!session.state().is_pending(milk.id));
        let stored = store.inner.list_items(&[]).unwrap();
        assert!(stored[0].needed);
    }

    #[test]
    fn failed_write_rolls_back_and_reports_error() {
        let (mut session, store, fixture) = loaded_session();
        let milk = &fixture.items[0];
        store.set_offline(true);

        let result = session.set_needed(milk.id, true);

        assert_eq!(result, Err(Error::DatabaseLockError));
        assert_eq!(find(&session, milk.id), Some(milk));
        assert_eq!(
            session.state().error(),
            Some(Error::DatabaseLockError.to_string().as_str())
        );
    }

    #[test]
    fn failed_write_error_survives_later_refresh() {
        let (mut session, store, fixture) = loaded_session();
        let milk = &fixture.items[0];
        let mop = &fixture.items[2];

        store.set_offline(true);
        assert!(session.set_needed(milk.id, true).is_err());
        store.set_offline(false);
        session.set_needed(mop.id, true).unwrap();

        assert!(find(&session, mop.id).unwrap().needed);
        assert!(session.state().error().is_some());

        session.dismiss_error();
        assert_eq!(session.state().error(), None);
    }

    #[test]
    fn toggling_item_store_twice_restores_stores() {
        let (mut session, _, fixture) = loaded_session();
        let mop = &fixture.items[2];

        session
            .toggle_item_store(mop.id, fixture.big_box.id)
            .unwrap();
        assert_eq!(
            find(&session, mop.id).unwrap().stores,
            vec![fixture.grocery.clone(), fixture.big_box.clone()]
        );

        session
            .toggle_item_store(mop.id, fixture.big_box.id)
            .unwrap();
        assert_eq!(
            find(&session, mop.id).unwrap().stores,
            vec![fixture.grocery.clone()]
        );
    }

    #[test]
    fn delete_removes_item_and_failure_restores_it() {
        let (mut session, store, fixture) = loaded_session();
        let apples = &fixture.items[1];
        let mop = &fixture.items[2];

        session.delete_item(apples.id).unwrap();
        assert_eq!(find(&session, apples.id), None);

        store.set_offline(true);
        assert!(session.delete_item(mop.id).is_err());
        assert_eq!(find(&session, mop.id), Some(mop));
    }

    #[test]
    fn mutating_unknown_item_is_not_found() {
        let (mut session, _, _) = loaded_session();

        assert_eq!(session.set_needed(999, true), Err(Error::NotFound));
    }

    #[test]
    fn failed_refresh_keeps_last_list() {
        let (mut session, store, fixture) = loaded_session();
        store.set_offline(true);

        assert!(session.refresh().is_err());

        assert_eq!(session.state().items(), fixture.items);
        assert!(session.state().error().is_some());

        store.set_offline(false);
        session.refresh().unwrap();
        assert_eq!(session.state().error(), None);
    }

    #[test]
    fn create_item_adds_it_to_list() {
        let (mut session, _, fixture) = loaded_session();

        let bread = session.create_item("Bread", fixture.food.id).unwrap();

        assert_eq!(find(&session, bread.id), Some(&bread));
        assert_eq!(
            session.create_item("  ", fixture.food.id),
            Err(Error::EmptyItemName)
        );
    }

    #[test]
    fn stale_response_does_not_overwrite_newer_change() {
        let (mut session, _, fixture) = loaded_session();
        let milk_id = fixture.items[0].id;

        let first = session
            .begin(Mutation::SetNeeded {
                item_id: milk_id,
                needed: true,
            })
            .unwrap();
        let second = session
            .begin(Mutation::SetNeeded {
                item_id: milk_id,
                needed: false,
            })
            .unwrap();

        let first_outcome = session.send(&first).unwrap();
        let second_outcome = session.send(&second).unwrap();
        session.succeed(second, second_outcome);
        session.succeed(first, first_outcome);

        assert!(!find(&session, milk_id).unwrap().needed);
        assert!(!session.state().is_pending(milk_id));
    }

    #[test]
    fn filters_and_query_shape_view() {
        let (mut session, _, fixture) = loaded_session();

        session.toggle_store_filter(fixture.grocery.id);
        let names: Vec<String> = session
            .view()
            .iter()
            .flat_map(|group| group.items.iter().map(|item| item.name.to_string()))
            .collect();
        assert_eq!(names, ["Mop", "Milk"]);

        session.set_query("milk");
        assert_eq!(session.view().len(), 1);

        session.clear_store_filters();
        session.set_query("");
        assert_eq!(session.view().len(), 2);
    }

    #[test]
    fn selecting_same_store_twice_keeps_filter() {
        let (mut session, _, fixture) = loaded_session();

        session.select_store_filter(fixture.grocery.id);
        session.select_store_filter(fixture.grocery.id);

        assert!(session.state().store_filters().contains(fixture.grocery.id));
        assert_eq!(session.view().len(), 2);
    }
}
