use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::media::{
    Credits, Genre, MediaId, Movie, MovieCategory, MovieDetails, OpaquePage, PaginatedResponse,
    Review, SeasonDetails, TimeWindow, TrendingMedia, TvCategory, TvShow, TvShowDetails, Video,
};
use crate::settings::AppSettings;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error: {status}")]
    Http { status: u16 },
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Remote catalog, one method per resource.
///
/// Implementations are stateless and shared by every screen, so they must be
/// safe to call concurrently.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn movies(
        &self,
        category: MovieCategory,
        page: u32,
    ) -> Result<PaginatedResponse<Movie>, ApiError>;

    async fn movie_details(&self, id: MediaId) -> Result<MovieDetails, ApiError>;

    async fn movie_credits(&self, id: MediaId) -> Result<Credits, ApiError>;

    async fn movie_videos(&self, id: MediaId) -> Result<PaginatedResponse<Video>, ApiError>;

    async fn movie_reviews(
        &self,
        id: MediaId,
        page: u32,
    ) -> Result<PaginatedResponse<Review>, ApiError>;

    async fn similar_movies(
        &self,
        id: MediaId,
        page: u32,
    ) -> Result<PaginatedResponse<Movie>, ApiError>;

    async fn search_movies(
        &self,
        query: &str,
        page: u32,
    ) -> Result<PaginatedResponse<Movie>, ApiError>;

    async fn genres(&self) -> Result<Vec<Genre>, ApiError>;

    async fn genre_movies(
        &self,
        genre_id: u32,
        page: u32,
    ) -> Result<PaginatedResponse<Movie>, ApiError>;

    async fn trending(
        &self,
        media: TrendingMedia,
        window: TimeWindow,
        page: u32,
    ) -> Result<OpaquePage, ApiError>;

    async fn trending_movies(
        &self,
        window: TimeWindow,
        page: u32,
    ) -> Result<PaginatedResponse<Movie>, ApiError>;

    async fn trending_tv_shows(
        &self,
        window: TimeWindow,
        page: u32,
    ) -> Result<PaginatedResponse<TvShow>, ApiError>;

    async fn tv_shows(
        &self,
        category: TvCategory,
        page: u32,
    ) -> Result<PaginatedResponse<TvShow>, ApiError>;

    async fn tv_details(&self, id: MediaId) -> Result<TvShowDetails, ApiError>;

    async fn tv_credits(&self, id: MediaId) -> Result<Credits, ApiError>;

    async fn tv_videos(&self, id: MediaId) -> Result<PaginatedResponse<Video>, ApiError>;

    async fn similar_tv_shows(
        &self,
        id: MediaId,
        page: u32,
    ) -> Result<PaginatedResponse<TvShow>, ApiError>;

    async fn season_details(
        &self,
        tv_id: MediaId,
        season_number: u32,
    ) -> Result<SeasonDetails, ApiError>;
}

/// reqwest-backed catalog client. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    http_client: Arc<reqwest::Client>,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn with_http_client(
        base_url: &str,
        http_client: reqwest::Client,
    ) -> Result<Self, ApiError> {
        let parsed =
            url::Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client: Arc::new(http_client),
        })
    }

    pub fn from_settings(settings: &AppSettings) -> Result<Self, ApiError> {
        Self::new(&settings.api_base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}/api{}", self.base_url, endpoint)
    }

    async fn fetch_response(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, ApiError> {
        tracing::debug!(url, ?query, "catalog request");
        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        match response.status().as_u16() {
            401 => Err(ApiError::Unauthorized),
            429 => Err(ApiError::RateLimit),
            s if s >= 400 => Err(ApiError::Http { status: s }),
            _ => Ok(response),
        }
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.fetch_response(&self.build_url(endpoint), query)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        page: u32,
    ) -> Result<PaginatedResponse<T>, ApiError> {
        self.fetch_json(endpoint, &[("page", page.to_string())])
            .await
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn movies(
        &self,
        category: MovieCategory,
        page: u32,
    ) -> Result<PaginatedResponse<Movie>, ApiError> {
        self.fetch_page(&format!("/movies/{}", category.as_str()), page)
            .await
    }

    async fn movie_details(&self, id: MediaId) -> Result<MovieDetails, ApiError> {
        self.fetch_json(&format!("/movie/{id}"), &[]).await
    }

    async fn movie_credits(&self, id: MediaId) -> Result<Credits, ApiError> {
        self.fetch_json(&format!("/movie/{id}/credits"), &[]).await
    }

    async fn movie_videos(&self, id: MediaId) -> Result<PaginatedResponse<Video>, ApiError> {
        self.fetch_json(&format!("/movie/{id}/videos"), &[]).await
    }

    async fn movie_reviews(
        &self,
        id: MediaId,
        page: u32,
    ) -> Result<PaginatedResponse<Review>, ApiError> {
        self.fetch_page(&format!("/movie/{id}/reviews"), page).await
    }

    async fn similar_movies(
        &self,
        id: MediaId,
        page: u32,
    ) -> Result<PaginatedResponse<Movie>, ApiError> {
        self.fetch_page(&format!("/movie/{id}/similar"), page).await
    }

    async fn search_movies(
        &self,
        query: &str,
        page: u32,
    ) -> Result<PaginatedResponse<Movie>, ApiError> {
        self.fetch_json(
            "/search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    async fn genres(&self) -> Result<Vec<Genre>, ApiError> {
        self.fetch_json("/genres/movie/list", &[]).await
    }

    async fn genre_movies(
        &self,
        genre_id: u32,
        page: u32,
    ) -> Result<PaginatedResponse<Movie>, ApiError> {
        self.fetch_page(&format!("/genres/{genre_id}"), page).await
    }

    async fn trending(
        &self,
        media: TrendingMedia,
        window: TimeWindow,
        page: u32,
    ) -> Result<OpaquePage, ApiError> {
        self.fetch_page(
            &format!("/trending/{}/{}", media.as_str(), window.as_str()),
            page,
        )
        .await
    }

    async fn trending_movies(
        &self,
        window: TimeWindow,
        page: u32,
    ) -> Result<PaginatedResponse<Movie>, ApiError> {
        self.fetch_page(&format!("/trending/movie/{}", window.as_str()), page)
            .await
    }

    async fn trending_tv_shows(
        &self,
        window: TimeWindow,
        page: u32,
    ) -> Result<PaginatedResponse<TvShow>, ApiError> {
        self.fetch_page(&format!("/trending/tv/{}", window.as_str()), page)
            .await
    }

    async fn tv_shows(
        &self,
        category: TvCategory,
        page: u32,
    ) -> Result<PaginatedResponse<TvShow>, ApiError> {
        self.fetch_page(&format!("/tv/{}", category.as_str()), page)
            .await
    }

    async fn tv_details(&self, id: MediaId) -> Result<TvShowDetails, ApiError> {
        self.fetch_json(&format!("/tv/{id}"), &[]).await
    }

    async fn tv_credits(&self, id: MediaId) -> Result<Credits, ApiError> {
        self.fetch_json(&format!("/tv/{id}/credits"), &[]).await
    }

    async fn tv_videos(&self, id: MediaId) -> Result<PaginatedResponse<Video>, ApiError> {
        self.fetch_json(&format!("/tv/{id}/videos"), &[]).await
    }

    async fn similar_tv_shows(
        &self,
        id: MediaId,
        page: u32,
    ) -> Result<PaginatedResponse<TvShow>, ApiError> {
        self.fetch_page(&format!("/tv/{id}/similar"), page).await
    }

    async fn season_details(
        &self,
        tv_id: MediaId,
        season_number: u32,
    ) -> Result<SeasonDetails, ApiError> {
        self.fetch_json(&format!("/tv/{tv_id}/season/{season_number}"), &[])
            .await
    }
}
