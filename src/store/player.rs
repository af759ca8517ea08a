use tokio::sync::watch;

use crate::media::{MediaId, MediaType, PaginatedResponse, Season, Video};
use crate::playback::{select_trailer, PlaybackRequest, NO_TRAILER_FOUND};
use crate::repository::Repository;
use crate::resource::Resource;
use crate::store::{keep, Slice, Store};

#[derive(Debug, Clone, PartialEq)]
pub struct VideoPlayerState {
    pub media_id: MediaId,
    pub media_type: Option<MediaType>,
    /// Season list, TV media only.
    pub seasons: Slice<Vec<Season>>,
    /// Provider key of the chosen trailer, empty when none was found.
    pub trailer: Slice<String>,
    pub selected_season: u32,
    pub selected_episode: u32,
}

impl Default for VideoPlayerState {
    fn default() -> Self {
        Self {
            media_id: 0,
            media_type: None,
            seasons: Slice::default(),
            trailer: Slice::default(),
            selected_season: 1,
            selected_episode: 1,
        }
    }
}

impl VideoPlayerState {
    pub fn video_key(&self) -> &str {
        &self.trailer.items
    }

    pub fn is_loading(&self) -> bool {
        self.seasons.is_loading || self.trailer.is_loading
    }

    /// Hand-off for the current selection. `None` before
    /// [`VideoPlayerStore::initialize_with_media`].
    pub fn playback_request(&self, title: &str) -> Option<PlaybackRequest> {
        let media_type = self.media_type?;
        Some(
            PlaybackRequest::new(media_type, self.media_id, title)
                .with_video_key(self.video_key())
                .with_episode(self.selected_season, self.selected_episode),
        )
    }
}

fn pick_trailer(state: &mut VideoPlayerState, resource: Resource<PaginatedResponse<Video>>) {
    let resource = match resource {
        Resource::Success(page) => match select_trailer(&page.results) {
            Some(video) => Resource::Success(video.key.clone()),
            None => {
                state.trailer.items.clear();
                Resource::error(NO_TRAILER_FOUND)
            }
        },
        other => other.map(|_| String::new()),
    };
    state.trailer.apply(resource, std::convert::identity);
}

pub struct VideoPlayerStore {
    store: Store<VideoPlayerState>,
    repository: Repository,
}

impl VideoPlayerStore {
    pub fn new(repository: Repository) -> Self {
        Self {
            store: Store::new(),
            repository,
        }
    }

    /// The player loads nothing until it is told what to play.
    pub fn open(repository: Repository) -> Self {
        Self::new(repository)
    }

    pub fn snapshot(&self) -> VideoPlayerState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<VideoPlayerState> {
        self.store.subscribe()
    }

    pub async fn settled(&self) {
        self.store.settled().await;
    }

    pub fn close(&self) {
        self.store.close();
    }

    /// Records what is being played; TV media also loads its season list.
    ///
    /// A non-empty `video_key` is the trailer handed over by the caller and
    /// becomes the current key. An empty one keeps whatever key is there.
    pub fn initialize_with_media(
        &self,
        media_id: MediaId,
        media_type: MediaType,
        video_key: &str,
    ) {
        self.store.update(|s| {
            s.media_id = media_id;
            s.media_type = Some(media_type);
            if !video_key.is_empty() {
                s.trailer.items = video_key.to_string();
            }
        });
        if media_type == MediaType::Tv {
            self.load_seasons(media_id);
        }
    }

    fn load_seasons(&self, tv_id: MediaId) {
        self.store.load_slice(
            self.repository.tv_details(tv_id),
            |s| &mut s.seasons,
            |details| details.seasons,
            keep,
        );
    }

    /// Resolves a trailer key from the media's videos; finding none is
    /// reported as the "No trailer found" error.
    pub fn load_video_trailer(&self, media_id: MediaId, media_type: MediaType) {
        let producer = match media_type {
            MediaType::Movie => self.repository.movie_videos(media_id),
            MediaType::Tv => self.repository.tv_videos(media_id),
        };
        if self.store.is_closed() {
            return;
        }
        self.store.update(|s| s.trailer.begin());
        self.store.track(producer, pick_trailer);
    }

    /// Changing season always restarts at episode 1.
    pub fn update_season(&self, season_number: u32) {
        self.store.update(|s| {
            s.selected_season = season_number;
            s.selected_episode = 1;
        });
    }

    pub fn update_episode(&self, episode_number: u32) {
        self.store.update(|s| s.selected_episode = episode_number);
    }
}
