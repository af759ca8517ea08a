use url::form_urlencoded;

use crate::media::{MediaId, MediaType, Video};

pub const NO_TRAILER_FOUND: &str = "No trailer found";

const YOUTUBE_EMBED_PARAMS: &str = "autoplay=1&controls=1&showinfo=0&rel=0";

/// Everything the host needs to start playback outside this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackRequest {
    pub media_type: MediaType,
    pub media_id: MediaId,
    pub title: String,
    /// Empty when no video was picked.
    pub video_key: String,
    pub trailer: bool,
    pub season: u32,
    pub episode: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackTarget {
    EmbeddedTrailer { url: String },
    ExternalPlayer { url: String },
}

impl PlaybackTarget {
    pub fn url(&self) -> &str {
        match self {
            PlaybackTarget::EmbeddedTrailer { url } | PlaybackTarget::ExternalPlayer { url } => url,
        }
    }
}

impl PlaybackRequest {
    pub fn new(media_type: MediaType, media_id: MediaId, title: impl Into<String>) -> Self {
        Self {
            media_type,
            media_id,
            title: title.into(),
            video_key: String::new(),
            trailer: false,
            season: 1,
            episode: 1,
        }
    }

    pub fn with_video_key(mut self, key: impl Into<String>) -> Self {
        self.video_key = key.into();
        self
    }

    /// Trailer mode: the key itself is what gets played.
    pub fn trailer(self, key: impl Into<String>) -> Self {
        let mut request = self.with_video_key(key);
        request.trailer = true;
        request
    }

    pub fn with_episode(mut self, season: u32, episode: u32) -> Self {
        self.season = season;
        self.episode = episode;
        self
    }

    pub fn is_trailer(&self) -> bool {
        self.trailer && !self.video_key.is_empty()
    }

    /// Trailers with a key play embedded; everything else is handed to the
    /// external player page under `base_url`.
    pub fn resolve(&self, base_url: &str) -> PlaybackTarget {
        if self.is_trailer() {
            return PlaybackTarget::EmbeddedTrailer {
                url: format!(
                    "https://www.youtube.com/embed/{}?{}",
                    self.video_key, YOUTUBE_EMBED_PARAMS
                ),
            };
        }

        PlaybackTarget::ExternalPlayer {
            url: format!(
                "{}/player?{}",
                base_url.trim_end_matches('/'),
                self.player_query()
            ),
        }
    }

    fn player_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("mediaType", self.media_type.as_str())
            .append_pair("mediaId", &self.media_id.to_string())
            .append_pair("season", &self.season.to_string())
            .append_pair("episode", &self.episode.to_string());
        if !self.video_key.is_empty() {
            query.append_pair("videoKey", &self.video_key);
        }
        query.append_pair("isTrailer", if self.trailer { "true" } else { "false" });
        query.finish()
    }
}

/// Trailer used by the detail screens: the first YouTube "Trailer".
pub fn first_youtube_trailer(videos: &[Video]) -> Option<&Video> {
    videos.iter().find(|v| v.is_youtube() && v.is_trailer())
}

/// Trailer used by the player: official YouTube trailer, then any YouTube
/// trailer, then any YouTube video at all.
pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .filter(|v| v.is_youtube())
        .find(|v| v.is_trailer() && v.official)
        .or_else(|| first_youtube_trailer(videos))
        .or_else(|| videos.iter().find(|v| v.is_youtube()))
}
