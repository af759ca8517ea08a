use tokio::sync::watch;

use crate::media::{Credits, MediaId, MediaType, Movie, MovieDetails, Review, Video, FIRST_PAGE};
use crate::playback::{first_youtube_trailer, PlaybackRequest};
use crate::repository::Repository;
use crate::store::{keep, page_results, Slice, Store};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieDetailState {
    pub movie_id: MediaId,
    pub details: Slice<Option<MovieDetails>>,
    pub credits: Slice<Option<Credits>>,
    pub videos: Slice<Vec<Video>>,
    pub similar_movies: Slice<Vec<Movie>>,
    pub reviews: Slice<Vec<Review>>,
}

impl MovieDetailState {
    pub fn trailer_key(&self) -> Option<&str> {
        first_youtube_trailer(&self.videos.items).map(|v| v.key.as_str())
    }

    /// Main-feature hand-off; `None` until details have loaded.
    pub fn playback_request(&self) -> Option<PlaybackRequest> {
        let details = self.details.items.as_ref()?;
        Some(PlaybackRequest::new(MediaType::Movie, details.id, &details.title))
    }

    /// Trailer hand-off; `None` without details or a YouTube trailer.
    pub fn trailer_request(&self) -> Option<PlaybackRequest> {
        let key = self.trailer_key()?;
        Some(self.playback_request()?.trailer(key))
    }
}

pub struct MovieDetailStore {
    store: Store<MovieDetailState>,
    repository: Repository,
    movie_id: MediaId,
}

impl MovieDetailStore {
    pub fn new(repository: Repository, movie_id: MediaId) -> Self {
        let store: Store<MovieDetailState> = Store::new();
        store.update(|s| s.movie_id = movie_id);
        Self {
            store,
            repository,
            movie_id,
        }
    }

    /// Creates the store and loads details, credits, videos and similar titles.
    pub fn open(repository: Repository, movie_id: MediaId) -> Self {
        let store = Self::new(repository, movie_id);
        store.load_all();
        store
    }

    pub fn movie_id(&self) -> MediaId {
        self.movie_id
    }

    pub fn snapshot(&self) -> MovieDetailState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<MovieDetailState> {
        self.store.subscribe()
    }

    pub async fn settled(&self) {
        self.store.settled().await;
    }

    pub fn close(&self) {
        self.store.close();
    }

    pub fn load_all(&self) {
        self.load_movie_details();
        self.load_movie_credits();
        self.load_movie_videos();
        self.load_similar_movies();
    }

    pub fn load_movie_details(&self) {
        self.store.load_slice(
            self.repository.movie_details(self.movie_id),
            |s| &mut s.details,
            Some,
            keep,
        );
    }

    pub fn load_movie_credits(&self) {
        self.store.load_slice(
            self.repository.movie_credits(self.movie_id),
            |s| &mut s.credits,
            Some,
            keep,
        );
    }

    pub fn load_movie_videos(&self) {
        self.store.load_slice(
            self.repository.movie_videos(self.movie_id),
            |s| &mut s.videos,
            page_results,
            keep,
        );
    }

    pub fn load_similar_movies(&self) {
        self.store.load_slice(
            self.repository.similar_movies(self.movie_id, FIRST_PAGE),
            |s| &mut s.similar_movies,
            page_results,
            keep,
        );
    }

    pub fn load_reviews(&self) {
        self.store.load_slice(
            self.repository.movie_reviews(self.movie_id, FIRST_PAGE),
            |s| &mut s.reviews,
            page_results,
            keep,
        );
    }
}
