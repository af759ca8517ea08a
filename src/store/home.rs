use rand::seq::SliceRandom;
use tokio::sync::watch;

use crate::media::{
    FeaturedItem, MediaId, MediaType, Movie, MovieCategory, TimeWindow, TvCategory, TvShow,
    FIRST_PAGE,
};
use crate::repository::Repository;
use crate::store::{keep, page_results, Slice, Store};

const FEATURED_PER_TRENDING_SOURCE: usize = 3;
const FEATURED_TOP_UP_PER_SOURCE: usize = 2;
const FEATURED_TARGET: usize = 6;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeState {
    pub popular_movies: Slice<Vec<Movie>>,
    pub top_rated_movies: Slice<Vec<Movie>>,
    pub upcoming_movies: Slice<Vec<Movie>>,
    pub trending_movies: Slice<Vec<Movie>>,
    pub popular_tv_shows: Slice<Vec<TvShow>>,
    pub top_rated_tv_shows: Slice<Vec<TvShow>>,
    pub on_the_air_tv_shows: Slice<Vec<TvShow>>,
    pub trending_tv_shows: Slice<Vec<TvShow>>,
    /// Shuffled carousel content; see [`HomeState::featured_candidates`].
    pub featured_items: Vec<FeaturedItem>,
}

impl HomeState {
    /// Carousel content before shuffling.
    ///
    /// Up to three trending movies and three trending shows, then topped up
    /// with the first two popular movies and, if still short, the first two
    /// popular shows. A top-up item already present is skipped, not replaced.
    pub fn featured_candidates(&self) -> Vec<FeaturedItem> {
        let mut items: Vec<FeaturedItem> = self
            .trending_movies
            .items
            .iter()
            .take(FEATURED_PER_TRENDING_SOURCE)
            .cloned()
            .map(FeaturedItem::Movie)
            .chain(
                self.trending_tv_shows
                    .items
                    .iter()
                    .take(FEATURED_PER_TRENDING_SOURCE)
                    .cloned()
                    .map(FeaturedItem::TvShow),
            )
            .collect();

        if items.len() < FEATURED_TARGET {
            let extra: Vec<FeaturedItem> = self
                .popular_movies
                .items
                .iter()
                .take(FEATURED_TOP_UP_PER_SOURCE)
                .filter(|m| !is_featured(&items, MediaType::Movie, m.id))
                .cloned()
                .map(FeaturedItem::Movie)
                .collect();
            items.extend(extra);
        }

        if items.len() < FEATURED_TARGET {
            let extra: Vec<FeaturedItem> = self
                .popular_tv_shows
                .items
                .iter()
                .take(FEATURED_TOP_UP_PER_SOURCE)
                .filter(|t| !is_featured(&items, MediaType::Tv, t.id))
                .cloned()
                .map(FeaturedItem::TvShow)
                .collect();
            items.extend(extra);
        }

        items
    }

    fn refresh_featured(&mut self) {
        let mut items = self.featured_candidates();
        items.shuffle(&mut rand::rng());
        self.featured_items = items;
    }
}

fn is_featured(items: &[FeaturedItem], media_type: MediaType, id: MediaId) -> bool {
    items
        .iter()
        .any(|item| item.media_type() == media_type && item.id() == id)
}

pub struct HomeStore {
    store: Store<HomeState>,
    repository: Repository,
}

impl HomeStore {
    pub fn new(repository: Repository) -> Self {
        Self {
            store: Store::new(),
            repository,
        }
    }

    /// Creates the store and starts every home slice.
    pub fn open(repository: Repository) -> Self {
        let store = Self::new(repository);
        store.load_all();
        store
    }

    pub fn snapshot(&self) -> HomeState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<HomeState> {
        self.store.subscribe()
    }

    pub async fn settled(&self) {
        self.store.settled().await;
    }

    pub fn close(&self) {
        self.store.close();
    }

    pub fn load_all(&self) {
        self.load_movies();
        self.load_tv_shows();
    }

    pub fn load_movies(&self) {
        self.load_popular_movies();
        self.load_top_rated_movies();
        self.load_upcoming_movies();
        self.load_trending_movies();
    }

    pub fn load_tv_shows(&self) {
        self.load_popular_tv_shows();
        self.load_top_rated_tv_shows();
        self.load_on_the_air_tv_shows();
        self.load_trending_tv_shows();
    }

    pub fn load_popular_movies(&self) {
        self.store.load_slice(
            self.repository.movies(MovieCategory::Popular, FIRST_PAGE),
            |s| &mut s.popular_movies,
            page_results,
            HomeState::refresh_featured,
        );
    }

    pub fn load_top_rated_movies(&self) {
        self.store.load_slice(
            self.repository.movies(MovieCategory::TopRated, FIRST_PAGE),
            |s| &mut s.top_rated_movies,
            page_results,
            keep,
        );
    }

    pub fn load_upcoming_movies(&self) {
        self.store.load_slice(
            self.repository.movies(MovieCategory::Upcoming, FIRST_PAGE),
            |s| &mut s.upcoming_movies,
            page_results,
            keep,
        );
    }

    pub fn load_trending_movies(&self) {
        self.store.load_slice(
            self.repository.trending_movies(TimeWindow::Day, FIRST_PAGE),
            |s| &mut s.trending_movies,
            page_results,
            HomeState::refresh_featured,
        );
    }

    pub fn load_popular_tv_shows(&self) {
        self.store.load_slice(
            self.repository.tv_shows(TvCategory::Popular, FIRST_PAGE),
            |s| &mut s.popular_tv_shows,
            page_results,
            HomeState::refresh_featured,
        );
    }

    pub fn load_top_rated_tv_shows(&self) {
        self.store.load_slice(
            self.repository.tv_shows(TvCategory::TopRated, FIRST_PAGE),
            |s| &mut s.top_rated_tv_shows,
            page_results,
            keep,
        );
    }

    pub fn load_on_the_air_tv_shows(&self) {
        self.store.load_slice(
            self.repository.tv_shows(TvCategory::OnTheAir, FIRST_PAGE),
            |s| &mut s.on_the_air_tv_shows,
            page_results,
            keep,
        );
    }

    pub fn load_trending_tv_shows(&self) {
        self.store.load_slice(
            self.repository.trending_tv_shows(TimeWindow::Day, FIRST_PAGE),
            |s| &mut s.trending_tv_shows,
            page_results,
            HomeState::refresh_featured,
        );
    }
}
