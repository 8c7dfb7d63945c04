// State container for today's check-in list.
//
// Responsibilities
// - Own the `{ loading, items }` state and publish every change to subscribers.
// - Fetch the whole daily partition in one ordered query and replace the items with it.
//
// No pagination: a day's check-ins are expected to be a bounded, small set.

use crate::modules::checkins::core::partition::{CHECKIN_ORDER_FIELD, daily_records, today_local};
use crate::shared::core::primitives::Document;
use crate::shared::infrastructure::document_store::{DocumentStore, DocumentStoreError};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct CheckinsState {
    pub loading: bool,
    pub items: Vec<Document>,
}

impl Default for CheckinsState {
    fn default() -> Self {
        Self {
            loading: true,
            items: Vec::new(),
        }
    }
}

pub struct CheckinsListStore<TDocumentStore>
where
    TDocumentStore: DocumentStore + ?Sized,
{
    documents: Arc<TDocumentStore>,
    state: watch::Sender<CheckinsState>,
    today: fn() -> NaiveDate,
}

impl<TDocumentStore> CheckinsListStore<TDocumentStore>
where
    TDocumentStore: DocumentStore + ?Sized,
{
    pub fn new(documents: Arc<TDocumentStore>) -> Self {
        Self {
            documents,
            state: watch::Sender::new(CheckinsState::default()),
            today: today_local,
        }
    }

    /// Replaces the local-clock date lookup.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<CheckinsState> {
        self.state.subscribe()
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn items(&self) -> Vec<Document> {
        self.state.borrow().items.clone()
    }

    pub fn snapshot(&self) -> CheckinsState {
        self.state.borrow().clone()
    }

    fn init(&self) {
        self.state.send_modify(|state| state.loading = true);
    }

    fn loaded(&self, items: Vec<Document>) {
        self.state.send_modify(|state| {
            state.items = items;
            state.loading = false;
        });
    }

    /// Loads today's check-ins ordered by check-in time. On failure `loading` stays set.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_items(&self) -> Result<(), DocumentStoreError> {
        self.init();
        let records = daily_records((self.today)());
        let items = self
            .documents
            .list_ordered(&records, CHECKIN_ORDER_FIELD)
            .await?;
        debug!(%records, count = items.len(), "check-ins loaded");
        self.loaded(items);
        Ok(())
    }
}
