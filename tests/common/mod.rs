#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reelview::catalog::{ApiError, CatalogApi};
use reelview::media::{
    Credits, Genre, MediaId, Movie, MovieCategory, MovieDetails, OpaquePage, PaginatedResponse,
    Review, SeasonDetails, TimeWindow, TrendingMedia, TvCategory, TvShow, TvShowDetails, Video,
};
use reelview::Repository;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::{watch, Semaphore};

/// In-memory catalog keyed by endpoint path (`/movies/popular`,
/// `/tv/7/season/2`, `/search/movie?query=abc`).
#[derive(Debug, Clone, Default)]
pub struct FakeCatalog {
    inner: Arc<RwLock<FakeState>>,
}

#[derive(Debug, Default)]
struct FakeState {
    responses: HashMap<String, Value>,
    failures: HashMap<String, ApiError>,
    gates: HashMap<String, Arc<Semaphore>>,
    calls: Vec<String>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        reelview::logging::init();
        Self::default()
    }

    pub fn repository(&self) -> Repository {
        Repository::new(Arc::new(self.clone()))
    }

    pub fn respond(&self, endpoint: &str, body: Value) -> &Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.failures.remove(endpoint);
            guard.responses.insert(endpoint.to_string(), body);
        }
        self
    }

    pub fn fail(&self, endpoint: &str, error: ApiError) -> &Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.failures.insert(endpoint.to_string(), error);
        }
        self
    }

    /// Holds every later call to `endpoint` until the returned gate gets a
    /// permit; one permit releases one call.
    pub fn hold(&self, endpoint: &str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        if let Ok(mut guard) = self.inner.write() {
            guard.gates.insert(endpoint.to_string(), Arc::clone(&gate));
        }
        gate
    }

    pub fn release(&self, endpoint: &str) {
        if let Ok(mut guard) = self.inner.write() {
            if let Some(gate) = guard.gates.remove(endpoint) {
                gate.add_permits(Semaphore::MAX_PERMITS / 2);
            }
        }
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.inner
            .read()
            .map(|guard| guard.calls.iter().filter(|c| *c == endpoint).count())
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.inner.read().map(|guard| guard.calls.len()).unwrap_or(0)
    }

    async fn serve<T: DeserializeOwned>(&self, endpoint: String) -> Result<T, ApiError> {
        let gate = {
            let mut guard = self.inner.write().unwrap();
            guard.calls.push(endpoint.clone());
            guard.gates.get(&endpoint).cloned()
        };
        if let Some(gate) = gate {
            gate.acquire()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?
                .forget();
        }

        let body = {
            let guard = self.inner.read().unwrap();
            if let Some(error) = guard.failures.get(&endpoint) {
                return Err(error.clone());
            }
            guard.responses.get(&endpoint).cloned()
        };
        let body = body.ok_or(ApiError::Http { status: 404 })?;
        serde_json::from_value(body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn movies(
        &self,
        category: MovieCategory,
        _page: u32,
    ) -> Result<PaginatedResponse<Movie>, ApiError> {
        self.serve(format!("/movies/{}", category.as_str())).await
    }

    async fn movie_details(&self, id: MediaId) -> Result<MovieDetails, ApiError> {
        self.serve(format!("/movie/{id}")).await
    }

    async fn movie_credits(&self, id: MediaId) -> Result<Credits, ApiError> {
        self.serve(format!("/movie/{id}/credits")).await
    }

    async fn movie_videos(&self, id: MediaId) -> Result<PaginatedResponse<Video>, ApiError> {
        self.serve(format!("/movie/{id}/videos")).await
    }

    async fn movie_reviews(
        &self,
        id: MediaId,
        _page: u32,
    ) -> Result<PaginatedResponse<Review>, ApiError> {
        self.serve(format!("/movie/{id}/reviews")).await
    }

    async fn similar_movies(
        &self,
        id: MediaId,
        _page: u32,
    ) -> Result<PaginatedResponse<Movie>, ApiError> {
        self.serve(format!("/movie/{id}/similar")).await
    }

    async fn search_movies(
        &self,
        query: &str,
        _page: u32,
    ) -> Result<PaginatedResponse<Movie>, ApiError> {
        self.serve(format!("/search/movie?query={query}")).await
    }

    async fn genres(&self) -> Result<Vec<Genre>, ApiError> {
        self.serve("/genres/movie/list".to_string()).await
    }

    async fn genre_movies(
        &self,
        genre_id: u32,
        _page: u32,
    ) -> Result<PaginatedResponse<Movie>, ApiError> {
        self.serve(format!("/genres/{genre_id}")).await
    }

    async fn trending(
        &self,
        media: TrendingMedia,
        window: TimeWindow,
        _page: u32,
    ) -> Result<OpaquePage, ApiError> {
        self.serve(format!("/trending/{}/{}", media.as_str(), window.as_str()))
            .await
    }

    async fn trending_movies(
        &self,
        window: TimeWindow,
        _page: u32,
    ) -> Result<PaginatedResponse<Movie>, ApiError> {
        self.serve(format!("/trending/movie/{}", window.as_str()))
            .await
    }

    async fn trending_tv_shows(
        &self,
        window: TimeWindow,
        _page: u32,
    ) -> Result<PaginatedResponse<TvShow>, ApiError> {
        self.serve(format!("/trending/tv/{}", window.as_str())).await
    }

    async fn tv_shows(
        &self,
        category: TvCategory,
        _page: u32,
    ) -> Result<PaginatedResponse<TvShow>, ApiError> {
        self.serve(format!("/tv/{}", category.as_str())).await
    }

    async fn tv_details(&self, id: MediaId) -> Result<TvShowDetails, ApiError> {
        self.serve(format!("/tv/{id}")).await
    }

    async fn tv_credits(&self, id: MediaId) -> Result<Credits, ApiError> {
        self.serve(format!("/tv/{id}/credits")).await
    }

    async fn tv_videos(&self, id: MediaId) -> Result<PaginatedResponse<Video>, ApiError> {
        self.serve(format!("/tv/{id}/videos")).await
    }

    async fn similar_tv_shows(
        &self,
        id: MediaId,
        _page: u32,
    ) -> Result<PaginatedResponse<TvShow>, ApiError> {
        self.serve(format!("/tv/{id}/similar")).await
    }

    async fn season_details(
        &self,
        tv_id: MediaId,
        season_number: u32,
    ) -> Result<SeasonDetails, ApiError> {
        self.serve(format!("/tv/{tv_id}/season/{season_number}"))
            .await
    }
}

pub fn movie(id: u64) -> Value {
    json!({"id": id, "title": format!("m{id}"), "vote_average": 7.1})
}

pub fn show(id: u64) -> Value {
    json!({"id": id, "name": format!("t{id}"), "first_air_date": "2011-04-17"})
}

pub fn page(results: Vec<Value>) -> Value {
    let total = results.len();
    json!({"page": 1, "results": results, "total_pages": 1, "total_results": total})
}

pub fn movies(ids: &[u64]) -> Value {
    page(ids.iter().copied().map(movie).collect())
}

pub fn shows(ids: &[u64]) -> Value {
    page(ids.iter().copied().map(show).collect())
}

pub fn video(key: &str, site: &str, kind: &str, official: bool) -> Value {
    json!({"id": format!("v-{key}"), "key": key, "site": site, "type": kind, "official": official})
}

pub fn episode(season: u32, number: u32) -> Value {
    json!({
        "id": season * 100 + number,
        "episode_number": number,
        "season_number": season,
        "name": format!("S{season}E{number}")
    })
}

pub fn season(number: u32, episodes: &[u32]) -> Value {
    json!({
        "id": 900 + number,
        "season_number": number,
        "episodes": episodes.iter().map(|e| episode(number, *e)).collect::<Vec<_>>()
    })
}

/// Waits (bounded) until the observed state satisfies `ready`.
pub async fn wait_until<S, F>(rx: &mut watch::Receiver<S>, ready: F) -> S
where
    S: Clone,
    F: FnMut(&S) -> bool,
{
    let state = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(ready))
        .await
        .expect("state never reached the expected shape")
        .expect("store dropped while waiting");
    S::clone(&state)
}
