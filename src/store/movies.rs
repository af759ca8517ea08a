use tokio::sync::watch;

use crate::media::{Genre, Movie, MovieCategory, FIRST_PAGE};
use crate::repository::Repository;
use crate::store::{keep, page_results, Slice, SliceOf, Store};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoviesState {
    pub popular_movies: Slice<Vec<Movie>>,
    pub top_rated_movies: Slice<Vec<Movie>>,
    pub upcoming_movies: Slice<Vec<Movie>>,
    pub now_playing_movies: Slice<Vec<Movie>>,
    pub genres: Slice<Vec<Genre>>,
    /// Genre whose movies `genre_movies` holds or is loading.
    pub selected_genre: Option<u32>,
    pub genre_movies: Slice<Vec<Movie>>,
}

impl MoviesState {
    pub fn selected_genre_name(&self) -> Option<&str> {
        let id = self.selected_genre?;
        self.genres
            .items
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.name.as_str())
    }
}

pub struct MoviesStore {
    store: Store<MoviesState>,
    repository: Repository,
}

impl MoviesStore {
    pub fn new(repository: Repository) -> Self {
        Self {
            store: Store::new(),
            repository,
        }
    }

    pub fn open(repository: Repository) -> Self {
        let store = Self::new(repository);
        store.load_all();
        store
    }

    pub fn snapshot(&self) -> MoviesState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<MoviesState> {
        self.store.subscribe()
    }

    pub async fn settled(&self) {
        self.store.settled().await;
    }

    pub fn close(&self) {
        self.store.close();
    }

    pub fn load_all(&self) {
        self.load_popular_movies();
        self.load_top_rated_movies();
        self.load_upcoming_movies();
        self.load_now_playing_movies();
    }

    pub fn load_popular_movies(&self) {
        self.load_category(MovieCategory::Popular, |s| &mut s.popular_movies);
    }

    pub fn load_top_rated_movies(&self) {
        self.load_category(MovieCategory::TopRated, |s| &mut s.top_rated_movies);
    }

    pub fn load_upcoming_movies(&self) {
        self.load_category(MovieCategory::Upcoming, |s| &mut s.upcoming_movies);
    }

    pub fn load_now_playing_movies(&self) {
        self.load_category(MovieCategory::NowPlaying, |s| &mut s.now_playing_movies);
    }

    pub fn load_genres(&self) {
        self.store.load_slice(
            self.repository.genres(),
            |s| &mut s.genres,
            std::convert::identity,
            keep,
        );
    }

    pub fn load_genre_movies(&self, genre_id: u32) {
        self.store.update(|s| s.selected_genre = Some(genre_id));
        self.store.load_slice(
            self.repository.genre_movies(genre_id, FIRST_PAGE),
            |s| &mut s.genre_movies,
            page_results,
            keep,
        );
    }

    fn load_category(&self, category: MovieCategory, slice: SliceOf<MoviesState, Vec<Movie>>) {
        self.store.load_slice(
            self.repository.movies(category, FIRST_PAGE),
            slice,
            page_results,
            keep,
        );
    }
}
