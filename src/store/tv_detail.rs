use futures::StreamExt;
use tokio::sync::watch;

use crate::media::{
    Credits, Episode, MediaId, MediaType, SeasonDetails, TvShow, TvShowDetails, Video, FIRST_PAGE,
};
use crate::playback::{first_youtube_trailer, PlaybackRequest};
use crate::repository::Repository;
use crate::store::{keep, page_results, Slice, Store, StoreHandle};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TvDetailState {
    pub tv_id: MediaId,
    pub details: Slice<Option<TvShowDetails>>,
    pub credits: Slice<Option<Credits>>,
    pub videos: Slice<Vec<Video>>,
    pub similar_tv_shows: Slice<Vec<TvShow>>,
    pub selected_season: Option<u32>,
    /// Episodes of `selected_season`.
    pub episodes: Slice<Vec<Episode>>,
}

impl TvDetailState {
    pub fn trailer_key(&self) -> Option<&str> {
        first_youtube_trailer(&self.videos.items).map(|v| v.key.as_str())
    }

    /// Hand-off for one episode of the selected season (season 1 when none
    /// is selected yet).
    pub fn playback_request(&self, episode: u32) -> Option<PlaybackRequest> {
        let details = self.details.items.as_ref()?;
        Some(
            PlaybackRequest::new(MediaType::Tv, details.id, &details.name)
                .with_episode(self.selected_season.unwrap_or(1), episode),
        )
    }

    pub fn trailer_request(&self) -> Option<PlaybackRequest> {
        let key = self.trailer_key()?;
        Some(self.playback_request(1)?.trailer(key))
    }
}

pub struct TvDetailStore {
    store: Store<TvDetailState>,
    repository: Repository,
    tv_id: MediaId,
}

impl TvDetailStore {
    pub fn new(repository: Repository, tv_id: MediaId) -> Self {
        let store: Store<TvDetailState> = Store::new();
        store.update(|s| s.tv_id = tv_id);
        Self {
            store,
            repository,
            tv_id,
        }
    }

    /// Creates the store and loads details, credits, videos and similar
    /// shows. The first regular season follows once details arrive.
    pub fn open(repository: Repository, tv_id: MediaId) -> Self {
        let store = Self::new(repository, tv_id);
        store.load_all();
        store
    }

    pub fn tv_id(&self) -> MediaId {
        self.tv_id
    }

    pub fn snapshot(&self) -> TvDetailState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<TvDetailState> {
        self.store.subscribe()
    }

    pub async fn settled(&self) {
        self.store.settled().await;
    }

    pub fn close(&self) {
        self.store.close();
    }

    pub fn load_all(&self) {
        self.load_tv_details();
        self.load_tv_credits();
        self.load_tv_videos();
        self.load_similar_tv_shows();
    }

    /// Loads details. If no season has been picked when they arrive, the
    /// first season numbered above zero is selected.
    pub fn load_tv_details(&self) {
        let handle = self.store.handle();
        let repository = self.repository.clone();
        let tv_id = self.tv_id;
        if self.store.is_closed() {
            return;
        }
        let mut producer = self.repository.tv_details(tv_id);

        self.store.update(|s| s.details.begin());
        self.store.spawn(async move {
            while let Some(resource) = producer.next().await {
                let mut default_season = None;
                handle.update(|s| {
                    if s.details.apply(resource, Some) && s.selected_season.is_none() {
                        default_season = s
                            .details
                            .items
                            .as_ref()
                            .and_then(TvShowDetails::first_regular_season)
                            .map(|season| season.season_number);
                    }
                });
                if let Some(season_number) = default_season {
                    load_season(&handle, &repository, tv_id, season_number);
                }
            }
        });
    }

    pub fn load_tv_credits(&self) {
        self.store.load_slice(
            self.repository.tv_credits(self.tv_id),
            |s| &mut s.credits,
            Some,
            keep,
        );
    }

    pub fn load_tv_videos(&self) {
        self.store.load_slice(
            self.repository.tv_videos(self.tv_id),
            |s| &mut s.videos,
            page_results,
            keep,
        );
    }

    pub fn load_similar_tv_shows(&self) {
        self.store.load_slice(
            self.repository.similar_tv_shows(self.tv_id, FIRST_PAGE),
            |s| &mut s.similar_tv_shows,
            page_results,
            keep,
        );
    }

    /// Switches to `season_number`: the episode list empties and its error
    /// clears before the new season is requested.
    pub fn load_season_episodes(&self, season_number: u32) {
        load_season(&self.store, &self.repository, self.tv_id, season_number);
    }
}

fn load_season(
    handle: &StoreHandle<TvDetailState>,
    repository: &Repository,
    tv_id: MediaId,
    season_number: u32,
) {
    if handle.is_closed() {
        return;
    }
    tracing::debug!(tv_id, season_number, "loading season episodes");
    handle.update(|s| {
        s.selected_season = Some(season_number);
        s.episodes.items.clear();
        s.episodes.error = None;
        s.episodes.begin();
    });
    handle.track(
        repository.season_details(tv_id, season_number),
        move |s, resource| {
            // a reply for a season that is no longer selected is stale
            if s.selected_season == Some(season_number) {
                s.episodes.apply(resource, |season: SeasonDetails| season.episodes);
            }
        },
    );
}
