//! Per-screen state stores.
//!
//! Every screen owns one observable state record made of independent
//! [`Slice`]s. Loads run as tasks bound to the screen: they are cancelled when
//! the store is closed or dropped, and a failing slice never touches another.

pub mod home;
pub mod movie_detail;
pub mod movies;
pub mod player;
pub mod search;
pub mod trending;
pub mod tv_detail;
pub mod tv_shows;

use std::future::Future;
use std::ops::Deref;
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::media::PaginatedResponse;
use crate::repository::Producer;
use crate::resource::Resource;

pub use home::{HomeState, HomeStore};
pub use movie_detail::{MovieDetailState, MovieDetailStore};
pub use movies::{MoviesState, MoviesStore};
pub use player::{VideoPlayerState, VideoPlayerStore};
pub use search::{SearchState, SearchStore};
pub use trending::{TrendingState, TrendingStore};
pub use tv_detail::{TvDetailState, TvDetailStore};
pub use tv_shows::{TvShowsState, TvShowsStore};

/// One independently loadable piece of screen state.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice<T> {
    pub items: T,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<T: Default> Default for Slice<T> {
    fn default() -> Self {
        Self {
            items: T::default(),
            is_loading: false,
            error: None,
        }
    }
}

impl<T> Slice<T> {
    /// Marks a new attempt. Items stay visible and stale error text is kept
    /// until the attempt ends.
    pub fn begin(&mut self) {
        self.is_loading = true;
    }

    /// Folds one producer value into the slice; returns `true` on success.
    ///
    /// An error leaves `items` untouched so the last good value stays on
    /// screen next to the retry action.
    pub fn apply<R>(&mut self, resource: Resource<R>, into_items: impl FnOnce(R) -> T) -> bool {
        match resource {
            Resource::Loading(_) => {
                self.is_loading = true;
                false
            }
            Resource::Success(data) => {
                self.items = into_items(data);
                self.is_loading = false;
                self.error = None;
                true
            }
            Resource::Error { message, .. } => {
                self.is_loading = false;
                self.error = Some(message);
                false
            }
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

impl<T: Default> Slice<T> {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl<T> Slice<Vec<T>> {
    pub fn apply_page(&mut self, resource: Resource<PaginatedResponse<T>>) -> bool {
        self.apply(resource, |page| page.results)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub(crate) type SliceOf<S, T> = fn(&mut S) -> &mut Slice<T>;

/// Cloneable access to a screen's state and task scope.
///
/// Handles never cancel anything on drop; only the owning [`Store`] does.
pub(crate) struct StoreHandle<S> {
    state: Arc<watch::Sender<S>>,
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl<S> Clone for StoreHandle<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            cancel: self.cancel.clone(),
            tracker: self.tracker.clone(),
        }
    }
}

impl<S> StoreHandle<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn snapshot(&self) -> S {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.state.subscribe()
    }

    pub fn update(&self, modify: impl FnOnce(&mut S)) {
        self.state.send_modify(modify);
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Runs `task` on the current Tokio runtime until it finishes or the
    /// screen goes away. Cancellation is checked first on every wake-up, so
    /// nothing is applied after `close`.
    pub fn spawn<F>(&self, task: F) -> AbortHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cancel = self.cancel.clone();
        self.tracker
            .spawn(async move {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {}
                    _ = task => {}
                }
            })
            .abort_handle()
    }

    /// Drains `producer`, handing every value to `apply` under the state lock.
    pub fn track<T, A>(&self, producer: Producer<T>, apply: A) -> AbortHandle
    where
        T: Send + 'static,
        A: Fn(&mut S, Resource<T>) + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        self.spawn(async move {
            let mut producer = producer;
            while let Some(resource) = producer.next().await {
                state.send_modify(|s| apply(s, resource));
            }
        })
    }

    /// Standard slice load: flag the slice, then fold every producer value
    /// into it. `on_success` runs under the same lock right after a success.
    /// Does nothing once the store is closed.
    pub fn load_slice<R, T>(
        &self,
        producer: Producer<R>,
        slice: SliceOf<S, T>,
        into_items: fn(R) -> T,
        on_success: fn(&mut S),
    ) where
        R: Send + 'static,
        T: 'static,
    {
        if self.is_closed() {
            return;
        }
        self.update(|s| slice(s).begin());
        self.track(producer, move |s, resource| {
            if slice(s).apply(resource, into_items) {
                on_success(s);
            }
        });
    }

    /// Resolves once every task spawned so far has finished.
    pub async fn settled(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    pub fn close(&self) {
        if !self.is_closed() {
            tracing::debug!(in_flight = self.tracker.len(), "closing screen store");
        }
        self.cancel.cancel();
    }
}

pub(crate) fn keep<S>(_: &mut S) {}

pub(crate) fn page_results<T>(page: PaginatedResponse<T>) -> Vec<T> {
    page.results
}

/// Owner of a screen's state. Dropping it cancels every in-flight load.
pub(crate) struct Store<S> {
    handle: StoreHandle<S>,
}

impl<S: Default> Store<S> {
    pub fn new() -> Self {
        Self {
            handle: StoreHandle {
                state: Arc::new(watch::Sender::new(S::default())),
                cancel: CancellationToken::new(),
                tracker: TaskTracker::new(),
            },
        }
    }
}

impl<S> Store<S> {
    /// Handle for tasks that must touch state after they are spawned.
    pub fn handle(&self) -> StoreHandle<S> {
        self.handle.clone()
    }
}

impl<S> Deref for Store<S> {
    type Target = StoreHandle<S>;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl<S> Drop for Store<S> {
    fn drop(&mut self) {
        self.handle.cancel.cancel();
    }
}
