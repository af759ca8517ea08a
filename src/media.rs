use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub type MediaId = u64;

pub const FIRST_PAGE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovieCategory {
    Popular,
    TopRated,
    Upcoming,
    NowPlaying,
}

impl MovieCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieCategory::Popular => "popular",
            MovieCategory::TopRated => "top_rated",
            MovieCategory::Upcoming => "upcoming",
            MovieCategory::NowPlaying => "now_playing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TvCategory {
    Popular,
    TopRated,
    OnTheAir,
}

impl TvCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TvCategory::Popular => "popular",
            TvCategory::TopRated => "top_rated",
            TvCategory::OnTheAir => "on_the_air",
        }
    }
}

/// Media filter for the generic trending endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendingMedia {
    Movie,
    Tv,
    All,
}

impl TrendingMedia {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingMedia::Movie => "movie",
            TrendingMedia::Tv => "tv",
            TrendingMedia::All => "all",
        }
    }
}

impl From<MediaType> for TrendingMedia {
    fn from(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Movie => TrendingMedia::Movie,
            MediaType::Tv => TrendingMedia::Tv,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeWindow {
    #[default]
    Day,
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    FIRST_PAGE
}

impl<T> Default for PaginatedResponse<T> {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

/// Untyped record list returned by the generic trending endpoint.
pub type OpaquePage = PaginatedResponse<serde_json::Value>;

impl OpaquePage {
    /// Maps every opaque record onto `T`, dropping the ones that do not fit.
    ///
    /// A single malformed record never fails the page; the page metadata is
    /// carried over untouched.
    pub fn decode_lenient<T: DeserializeOwned>(self) -> PaginatedResponse<T> {
        let total = self.results.len();
        let results: Vec<T> = self
            .results
            .into_iter()
            .filter_map(|record| match T::deserialize(record) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::debug!(error = %e, "dropping trending record that does not match");
                    None
                }
            })
            .collect();

        if results.len() < total {
            tracing::debug!(
                kept = results.len(),
                dropped = total - results.len(),
                "lenient decode dropped records"
            );
        }

        PaginatedResponse {
            page: self.page,
            results,
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MediaId,
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub video: bool,
}

impl Movie {
    /// Four-digit year from `release_date`, when present and well formed.
    pub fn release_year(&self) -> Option<u32> {
        release_year(self.release_date.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvShow {
    pub id: MediaId,
    pub name: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub origin_country: Vec<String>,
}

impl TvShow {
    pub fn first_air_year(&self) -> Option<u32> {
        release_year(self.first_air_date.as_deref())
    }
}

fn release_year(date: Option<&str>) -> Option<u32> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse().ok())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: u64,
    pub logo_path: Option<String>,
    pub name: String,
    #[serde(default)]
    pub origin_country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCountry {
    #[serde(default)]
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokenLanguage {
    #[serde(default)]
    pub english_name: String,
    #[serde(default)]
    pub iso_639_1: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: u64,
    pub name: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: MediaId,
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub video: bool,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub revenue: u64,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub status: String,
    pub tagline: Option<String>,
    pub belongs_to_collection: Option<Collection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub id: u64,
    pub name: String,
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    pub air_date: Option<String>,
    #[serde(default)]
    pub episode_count: u32,
    pub poster_path: Option<String>,
    pub season_number: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub episode_number: u32,
    #[serde(default)]
    pub season_number: u32,
    pub still_path: Option<String>,
    pub runtime: Option<u32>,
    pub vote_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonDetails {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    pub air_date: Option<String>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
    pub poster_path: Option<String>,
    pub season_number: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvShowDetails {
    pub id: MediaId,
    pub name: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    pub first_air_date: Option<String>,
    pub last_air_date: Option<String>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub homepage: Option<String>,
    #[serde(default)]
    pub in_production: bool,
    #[serde(default)]
    pub languages: Vec<String>,
    pub last_episode_to_air: Option<Episode>,
    pub next_episode_to_air: Option<Episode>,
    #[serde(default)]
    pub networks: Vec<Network>,
    #[serde(default)]
    pub number_of_episodes: u32,
    #[serde(default)]
    pub number_of_seasons: u32,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub status: String,
    pub tagline: Option<String>,
    #[serde(rename = "type", default)]
    pub show_type: String,
}

impl TvShowDetails {
    /// First regular season, skipping specials (season 0).
    pub fn first_regular_season(&self) -> Option<&Season> {
        self.seasons.iter().find(|s| s.season_number > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub known_for_department: String,
    pub profile_path: Option<String>,
    pub gender: Option<u8>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub popularity: f64,
    pub cast_id: Option<u64>,
    #[serde(default)]
    pub credit_id: String,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub known_for_department: String,
    pub profile_path: Option<String>,
    pub gender: Option<u8>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub credit_id: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub job: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    pub id: MediaId,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

impl Credits {
    pub fn directors(&self) -> impl Iterator<Item = &CrewMember> {
        self.crew.iter().filter(|c| c.job == "Director")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub key: String,
    pub site: String,
    #[serde(default)]
    pub size: u32,
    #[serde(rename = "type")]
    pub video_type: String,
    #[serde(default)]
    pub official: bool,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub iso_639_1: String,
    #[serde(default)]
    pub iso_3166_1: String,
}

impl Video {
    pub fn is_youtube(&self) -> bool {
        self.site.eq_ignore_ascii_case("YouTube")
    }

    pub fn is_trailer(&self) -> bool {
        self.video_type.eq_ignore_ascii_case("Trailer")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    pub avatar_path: Option<String>,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub author_details: Option<AuthorDetails>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub url: String,
}

/// Home carousel entry mixing both catalog variants.
#[derive(Debug, Clone, PartialEq)]
pub enum FeaturedItem {
    Movie(Movie),
    TvShow(TvShow),
}

impl FeaturedItem {
    pub fn id(&self) -> MediaId {
        match self {
            FeaturedItem::Movie(m) => m.id,
            FeaturedItem::TvShow(t) => t.id,
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            FeaturedItem::Movie(_) => MediaType::Movie,
            FeaturedItem::TvShow(_) => MediaType::Tv,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            FeaturedItem::Movie(m) => &m.title,
            FeaturedItem::TvShow(t) => &t.name,
        }
    }

    pub fn backdrop_path(&self) -> Option<&str> {
        match self {
            FeaturedItem::Movie(m) => m.backdrop_path.as_deref(),
            FeaturedItem::TvShow(t) => t.backdrop_path.as_deref(),
        }
    }
}
