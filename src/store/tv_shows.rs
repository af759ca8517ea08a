use tokio::sync::watch;

use crate::media::{TvCategory, TvShow, FIRST_PAGE};
use crate::repository::Repository;
use crate::store::{keep, page_results, Slice, SliceOf, Store};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TvShowsState {
    pub popular_tv_shows: Slice<Vec<TvShow>>,
    pub top_rated_tv_shows: Slice<Vec<TvShow>>,
    pub on_the_air_tv_shows: Slice<Vec<TvShow>>,
}

pub struct TvShowsStore {
    store: Store<TvShowsState>,
    repository: Repository,
}

impl TvShowsStore {
    pub fn new(repository: Repository) -> Self {
        Self {
            store: Store::new(),
            repository,
        }
    }

    pub fn open(repository: Repository) -> Self {
        let store = Self::new(repository);
        store.load_tv_shows();
        store
    }

    pub fn snapshot(&self) -> TvShowsState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<TvShowsState> {
        self.store.subscribe()
    }

    pub async fn settled(&self) {
        self.store.settled().await;
    }

    pub fn close(&self) {
        self.store.close();
    }

    pub fn load_tv_shows(&self) {
        self.load_popular_tv_shows();
        self.load_top_rated_tv_shows();
        self.load_on_the_air_tv_shows();
    }

    pub fn load_popular_tv_shows(&self) {
        self.load_category(TvCategory::Popular, |s| &mut s.popular_tv_shows);
    }

    pub fn load_top_rated_tv_shows(&self) {
        self.load_category(TvCategory::TopRated, |s| &mut s.top_rated_tv_shows);
    }

    pub fn load_on_the_air_tv_shows(&self) {
        self.load_category(TvCategory::OnTheAir, |s| &mut s.on_the_air_tv_shows);
    }

    fn load_category(&self, category: TvCategory, slice: SliceOf<TvShowsState, Vec<TvShow>>) {
        self.store.load_slice(
            self.repository.tv_shows(category, FIRST_PAGE),
            slice,
            page_results,
            keep,
        );
    }
}
