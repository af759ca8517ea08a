use serde::de::DeserializeOwned;
use tokio::sync::watch;

use crate::media::{Movie, OpaquePage, TimeWindow, TrendingMedia, TvShow, FIRST_PAGE};
use crate::repository::Repository;
use crate::store::{keep, Slice, SliceOf, Store};

/// Trending lists read from the generic trending feed. Records that do not
/// fit the slice's shape are dropped individually.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendingState {
    pub movies_today: Slice<Vec<Movie>>,
    pub movies_this_week: Slice<Vec<Movie>>,
    pub tv_shows_today: Slice<Vec<TvShow>>,
    pub tv_shows_this_week: Slice<Vec<TvShow>>,
}

fn typed<T: DeserializeOwned>(page: OpaquePage) -> Vec<T> {
    page.decode_lenient().results
}

pub struct TrendingStore {
    store: Store<TrendingState>,
    repository: Repository,
}

impl TrendingStore {
    pub fn new(repository: Repository) -> Self {
        Self {
            store: Store::new(),
            repository,
        }
    }

    pub fn open(repository: Repository) -> Self {
        let store = Self::new(repository);
        store.load_trending_today();
        store
    }

    pub fn snapshot(&self) -> TrendingState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<TrendingState> {
        self.store.subscribe()
    }

    pub async fn settled(&self) {
        self.store.settled().await;
    }

    pub fn close(&self) {
        self.store.close();
    }

    pub fn load_trending_today(&self) {
        self.load_trending_movies_today();
        self.load_trending_tv_shows_today();
    }

    pub fn load_trending_this_week(&self) {
        self.load_trending_movies_this_week();
        self.load_trending_tv_shows_this_week();
    }

    pub fn load_trending_movies_today(&self) {
        self.load(TrendingMedia::Movie, TimeWindow::Day, |s| &mut s.movies_today);
    }

    pub fn load_trending_movies_this_week(&self) {
        self.load(TrendingMedia::Movie, TimeWindow::Week, |s| &mut s.movies_this_week);
    }

    pub fn load_trending_tv_shows_today(&self) {
        self.load(TrendingMedia::Tv, TimeWindow::Day, |s| &mut s.tv_shows_today);
    }

    pub fn load_trending_tv_shows_this_week(&self) {
        self.load(TrendingMedia::Tv, TimeWindow::Week, |s| &mut s.tv_shows_this_week);
    }

    fn load<T>(
        &self,
        media: TrendingMedia,
        window: TimeWindow,
        slice: SliceOf<TrendingState, Vec<T>>,
    ) where
        T: DeserializeOwned + 'static,
    {
        self.store.load_slice(
            self.repository.trending(media, window, FIRST_PAGE),
            slice,
            typed::<T>,
            keep,
        );
    }
}
