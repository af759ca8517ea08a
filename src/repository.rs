use std::future::Future;
use std::sync::Arc;

use async_stream::stream;
use futures::stream::BoxStream;

use crate::catalog::{ApiError, CatalogApi};
use crate::media::{
    Credits, Genre, MediaId, Movie, MovieCategory, MovieDetails, OpaquePage, PaginatedResponse,
    Review, SeasonDetails, TimeWindow, TrendingMedia, TvCategory, TvShow, TvShowDetails, Video,
};
use crate::resource::Resource;

const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Single-shot sequence of fetch states: `Loading(None)`, then exactly one
/// `Success` or `Error`, then end of stream.
///
/// Nothing is requested until the stream is first polled. A finished
/// producer cannot be restarted; call the repository again to retry.
pub type Producer<T> = BoxStream<'static, Resource<T>>;

/// Wraps every catalog read in the uniform loading/success/error lifecycle.
///
/// No caching and no deduplication: two producers for the same operation
/// issue two catalog calls.
#[derive(Clone)]
pub struct Repository {
    catalog: Arc<dyn CatalogApi>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository").finish_non_exhaustive()
    }
}

fn produce<T, F>(operation: &'static str, call: F) -> Producer<T>
where
    T: Send + 'static,
    F: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    Box::pin(stream! {
        yield Resource::Loading(None);
        match call.await {
            Ok(data) => yield Resource::Success(data),
            Err(e) => {
                let message = error_message(&e);
                tracing::warn!(operation, error = %message, "catalog call failed");
                yield Resource::error(message);
            }
        }
    })
}

fn error_message(error: &ApiError) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

impl Repository {
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogApi> {
        &self.catalog
    }

    pub fn movies(&self, category: MovieCategory, page: u32) -> Producer<PaginatedResponse<Movie>> {
        let catalog = Arc::clone(&self.catalog);
        produce("movies", async move { catalog.movies(category, page).await })
    }

    pub fn movie_details(&self, id: MediaId) -> Producer<MovieDetails> {
        let catalog = Arc::clone(&self.catalog);
        produce("movie_details", async move { catalog.movie_details(id).await })
    }

    pub fn movie_credits(&self, id: MediaId) -> Producer<Credits> {
        let catalog = Arc::clone(&self.catalog);
        produce("movie_credits", async move { catalog.movie_credits(id).await })
    }

    pub fn movie_videos(&self, id: MediaId) -> Producer<PaginatedResponse<Video>> {
        let catalog = Arc::clone(&self.catalog);
        produce("movie_videos", async move { catalog.movie_videos(id).await })
    }

    pub fn movie_reviews(&self, id: MediaId, page: u32) -> Producer<PaginatedResponse<Review>> {
        let catalog = Arc::clone(&self.catalog);
        produce("movie_reviews", async move {
            catalog.movie_reviews(id, page).await
        })
    }

    pub fn similar_movies(&self, id: MediaId, page: u32) -> Producer<PaginatedResponse<Movie>> {
        let catalog = Arc::clone(&self.catalog);
        produce("similar_movies", async move {
            catalog.similar_movies(id, page).await
        })
    }

    pub fn search_movies(&self, query: &str, page: u32) -> Producer<PaginatedResponse<Movie>> {
        let catalog = Arc::clone(&self.catalog);
        let query = query.to_string();
        produce("search_movies", async move {
            catalog.search_movies(&query, page).await
        })
    }

    pub fn genres(&self) -> Producer<Vec<Genre>> {
        let catalog = Arc::clone(&self.catalog);
        produce("genres", async move { catalog.genres().await })
    }

    pub fn genre_movies(&self, genre_id: u32, page: u32) -> Producer<PaginatedResponse<Movie>> {
        let catalog = Arc::clone(&self.catalog);
        produce("genre_movies", async move {
            catalog.genre_movies(genre_id, page).await
        })
    }

    /// Generic trending feed. Records are passed through untyped; see
    /// [`OpaquePage::decode_lenient`] for best-effort mapping.
    pub fn trending(
        &self,
        media: TrendingMedia,
        window: TimeWindow,
        page: u32,
    ) -> Producer<OpaquePage> {
        let catalog = Arc::clone(&self.catalog);
        produce("trending", async move {
            catalog.trending(media, window, page).await
        })
    }

    pub fn trending_movies(
        &self,
        window: TimeWindow,
        page: u32,
    ) -> Producer<PaginatedResponse<Movie>> {
        let catalog = Arc::clone(&self.catalog);
        produce("trending_movies", async move {
            catalog.trending_movies(window, page).await
        })
    }

    pub fn trending_tv_shows(
        &self,
        window: TimeWindow,
        page: u32,
    ) -> Producer<PaginatedResponse<TvShow>> {
        let catalog = Arc::clone(&self.catalog);
        produce("trending_tv_shows", async move {
            catalog.trending_tv_shows(window, page).await
        })
    }

    pub fn tv_shows(&self, category: TvCategory, page: u32) -> Producer<PaginatedResponse<TvShow>> {
        let catalog = Arc::clone(&self.catalog);
        produce("tv_shows", async move { catalog.tv_shows(category, page).await })
    }

    pub fn tv_details(&self, id: MediaId) -> Producer<TvShowDetails> {
        let catalog = Arc::clone(&self.catalog);
        produce("tv_details", async move { catalog.tv_details(id).await })
    }

    pub fn tv_credits(&self, id: MediaId) -> Producer<Credits> {
        let catalog = Arc::clone(&self.catalog);
        produce("tv_credits", async move { catalog.tv_credits(id).await })
    }

    pub fn tv_videos(&self, id: MediaId) -> Producer<PaginatedResponse<Video>> {
        let catalog = Arc::clone(&self.catalog);
        produce("tv_videos", async move { catalog.tv_videos(id).await })
    }

    pub fn similar_tv_shows(&self, id: MediaId, page: u32) -> Producer<PaginatedResponse<TvShow>> {
        let catalog = Arc::clone(&self.catalog);
        produce("similar_tv_shows", async move {
            catalog.similar_tv_shows(id, page).await
        })
    }

    pub fn season_details(&self, tv_id: MediaId, season_number: u32) -> Producer<SeasonDetails> {
        let catalog = Arc::clone(&self.catalog);
        produce("season_details", async move {
            catalog.season_details(tv_id, season_number).await
        })
    }
}
