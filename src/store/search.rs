use std::sync::Mutex;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::AbortHandle;

use crate::media::{Movie, PaginatedResponse, FIRST_PAGE};
use crate::repository::{Producer, Repository};
use crate::store::{Slice, Store, StoreHandle};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);
pub const MIN_QUERY_CHARS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Slice<Vec<Movie>>,
}

/// Movie search with debounced typing.
///
/// At most one search job (pending timer or in-flight request) exists at a
/// time; arming a new one aborts the previous one.
pub struct SearchStore {
    store: Store<SearchState>,
    repository: Repository,
    pending: Mutex<Option<AbortHandle>>,
}

impl SearchStore {
    pub fn new(repository: Repository) -> Self {
        Self {
            store: Store::new(),
            repository,
            pending: Mutex::new(None),
        }
    }

    /// Search has nothing to load on entry.
    pub fn open(repository: Repository) -> Self {
        Self::new(repository)
    }

    pub fn snapshot(&self) -> SearchState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.store.subscribe()
    }

    pub async fn settled(&self) {
        self.store.settled().await;
    }

    pub fn close(&self) {
        self.replace_pending(None);
        self.store.close();
    }

    /// Keystroke entry point. An empty query clears results at once; a query
    /// of at least three characters searches after 500ms of quiet; anything
    /// shorter only cancels what was pending.
    pub fn update_search_query(&self, query: &str) {
        self.store.update(|s| s.query = query.to_string());
        self.replace_pending(None);

        if query.is_empty() {
            self.clear_results();
            return;
        }
        if query.chars().count() < MIN_QUERY_CHARS {
            tracing::debug!(query, "query too short, search not armed");
            return;
        }

        tracing::debug!(query, "arming debounced search");
        let handle = self.store.handle();
        let producer = self.repository.search_movies(query, FIRST_PAGE);
        let job = self.store.spawn(async move {
            tokio::time::sleep(SEARCH_DEBOUNCE).await;
            handle.update(|s| s.results.begin());
            drain(handle, producer).await;
        });
        self.replace_pending(Some(job));
    }

    /// Searches immediately, superseding any pending or in-flight search.
    pub fn search_movies(&self, query: &str) {
        if query.is_empty() {
            self.replace_pending(None);
            self.store.update(|s| s.query.clear());
            self.clear_results();
            return;
        }

        self.replace_pending(None);
        if self.store.is_closed() {
            return;
        }
        self.store.update(|s| {
            s.query = query.to_string();
            s.results.begin();
        });
        let producer = self.repository.search_movies(query, FIRST_PAGE);
        let job = self.store.spawn(drain(self.store.handle(), producer));
        self.replace_pending(Some(job));
    }

    /// Retry for the results slice.
    pub fn retry(&self) {
        let query = self.snapshot().query;
        self.search_movies(&query);
    }

    fn clear_results(&self) {
        self.store.update(|s| s.results.clear());
    }

    fn replace_pending(&self, next: Option<AbortHandle>) {
        let previous = match self.pending.lock() {
            Ok(mut pending) => std::mem::replace(&mut *pending, next),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), next),
        };
        let Some(previous) = previous else {
            return;
        };
        if !previous.is_finished() {
            previous.abort();
            // An aborted request never reports back.
            self.store.update(|s| s.results.is_loading = false);
        }
    }
}

async fn drain(
    handle: StoreHandle<SearchState>,
    mut producer: Producer<PaginatedResponse<Movie>>,
) {
    while let Some(resource) = producer.next().await {
        handle.update(|s| {
            s.results.apply_page(resource);
        });
    }
}
