mod common;

use common::{movies, page, season, shows, video, wait_until, FakeCatalog};
use reelview::media::MediaType;
use reelview::store::{MovieDetailStore, TvDetailStore, VideoPlayerStore};
use reelview::{ApiError, PlaybackTarget};
use serde_json::json;

fn movie_catalog() -> FakeCatalog {
    let fake = FakeCatalog::new();
    fake.respond(
        "/movie/550",
        json!({
            "id": 550,
            "title": "Fight Club",
            "runtime": 139,
            "genres": [{"id": 18, "name": "Drama"}]
        }),
    )
    .respond(
        "/movie/550/credits",
        json!({
            "id": 550,
            "cast": [{"id": 819, "name": "Edward Norton", "character": "The Narrator"}],
            "crew": [{
                "id": 7467,
                "name": "David Fincher",
                "department": "Directing",
                "job": "Director"
            }]
        }),
    )
    .respond(
        "/movie/550/videos",
        page(vec![
            video("teaser", "YouTube", "Teaser", true),
            video("trailer", "YouTube", "Trailer", false),
        ]),
    )
    .respond("/movie/550/similar", movies(&[807, 1422]))
    .respond(
        "/movie/550/reviews",
        page(vec![json!({"id": "r1", "author": "critic", "content": "Great."})]),
    );
    fake
}

fn tv_catalog() -> FakeCatalog {
    let fake = FakeCatalog::new();
    fake.respond(
        "/tv/1399",
        json!({
            "id": 1399,
            "name": "Game of Thrones",
            "seasons": [
                {"id": 3627, "season_number": 0, "name": "Specials"},
                {"id": 3624, "season_number": 1, "name": "Season 1", "episode_count": 2},
                {"id": 3625, "season_number": 2, "name": "Season 2", "episode_count": 3}
            ]
        }),
    )
    .respond("/tv/1399/credits", json!({"id": 1399, "cast": [], "crew": []}))
    .respond("/tv/1399/videos", page(vec![video("got", "YouTube", "Trailer", true)]))
    .respond("/tv/1399/similar", shows(&[1402]))
    .respond("/tv/1399/season/1", season(1, &[1, 2]))
    .respond("/tv/1399/season/2", season(2, &[1, 2, 3]));
    fake
}

#[tokio::test]
async fn movie_detail_loads_its_four_slices_on_entry() {
    let fake = movie_catalog();
    let store = MovieDetailStore::open(fake.repository(), 550);
    store.settled().await;
    let state = store.snapshot();

    let details = state.details.items.as_ref().expect("details");
    assert_eq!(details.title, "Fight Club");
    let credits = state.credits.items.as_ref().expect("credits");
    assert_eq!(credits.directors().next().map(|c| c.name.as_str()), Some("David Fincher"));
    assert_eq!(state.videos.items.len(), 2);
    assert_eq!(state.similar_movies.items.len(), 2);
    assert!(state.reviews.items.is_empty());
    assert_eq!(fake.calls("/movie/550/reviews"), 0);
    assert_eq!(state.trailer_key(), Some("trailer"));
}

#[tokio::test]
async fn movie_detail_hands_off_trailer_and_main_feature() {
    let fake = movie_catalog();
    let store = MovieDetailStore::open(fake.repository(), 550);
    store.settled().await;
    let state = store.snapshot();

    let trailer = state.trailer_request().expect("trailer request");
    assert!(matches!(
        trailer.resolve("https://catalog.example.com"),
        PlaybackTarget::EmbeddedTrailer { .. }
    ));

    let feature = state.playback_request().expect("playback request");
    assert_eq!(feature.video_key, "");
    assert_eq!(
        feature.resolve("https://catalog.example.com").url(),
        "https://catalog.example.com/player?mediaType=movie&mediaId=550&season=1&episode=1&isTrailer=false"
    );
}

#[tokio::test]
async fn movie_detail_reviews_and_failures_are_per_slice() {
    let fake = movie_catalog();
    fake.fail("/movie/550/similar", ApiError::Http { status: 404 });
    let store = MovieDetailStore::open(fake.repository(), 550);
    store.load_reviews();
    store.settled().await;
    let state = store.snapshot();

    assert_eq!(state.reviews.items[0].author, "critic");
    assert_eq!(state.similar_movies.error.as_deref(), Some("HTTP error: 404"));
    assert!(state.details.items.is_some());
    assert_eq!(state.details.error, None);
}

#[tokio::test]
async fn tv_detail_selects_the_first_regular_season() {
    let fake = tv_catalog();
    let store = TvDetailStore::open(fake.repository(), 1399);
    store.settled().await;
    let state = store.snapshot();

    assert_eq!(state.selected_season, Some(1));
    assert_eq!(state.episodes.items.len(), 2);
    assert_eq!(fake.calls("/tv/1399/season/0"), 0);
    assert_eq!(state.trailer_key(), Some("got"));
    assert_eq!(
        state.playback_request(2).map(|r| (r.season, r.episode)),
        Some((1, 2))
    );
}

#[tokio::test]
async fn switching_season_empties_episodes_before_the_reply() {
    let fake = tv_catalog();
    let store = TvDetailStore::open(fake.repository(), 1399);
    store.settled().await;
    assert_eq!(store.snapshot().episodes.items.len(), 2);

    let gate = fake.hold("/tv/1399/season/2");
    let mut rx = store.subscribe();
    store.load_season_episodes(2);

    let pending = store.snapshot();
    assert_eq!(pending.selected_season, Some(2));
    assert!(pending.episodes.items.is_empty());
    assert_eq!(pending.episodes.error, None);
    assert!(pending.episodes.is_loading);

    gate.add_permits(1);
    let state = wait_until(&mut rx, |s| !s.episodes.is_loading).await;
    assert_eq!(
        state.episodes.items.iter().map(|e| e.episode_number).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert!(state.episodes.items.iter().all(|e| e.season_number == 2));
}

#[tokio::test]
async fn season_switch_clears_a_previous_episode_error() {
    let fake = tv_catalog();
    fake.fail("/tv/1399/season/1", ApiError::Http { status: 500 });
    let store = TvDetailStore::open(fake.repository(), 1399);
    store.settled().await;
    assert_eq!(store.snapshot().episodes.error.as_deref(), Some("HTTP error: 500"));

    let _gate = fake.hold("/tv/1399/season/2");
    store.load_season_episodes(2);
    assert_eq!(store.snapshot().episodes.error, None);
    store.close();
}

#[tokio::test]
async fn late_reply_for_an_abandoned_season_is_ignored() {
    let fake = tv_catalog();
    let store = TvDetailStore::new(fake.repository(), 1399);
    let slow = fake.hold("/tv/1399/season/1");

    store.load_season_episodes(1);
    store.load_season_episodes(2);
    let mut rx = store.subscribe();
    wait_until(&mut rx, |s| !s.episodes.is_loading).await;

    slow.add_permits(1);
    store.settled().await;
    let state = store.snapshot();
    assert_eq!(state.selected_season, Some(2));
    assert_eq!(state.episodes.items.len(), 3);
    assert_eq!(fake.calls("/tv/1399/season/1"), 1);
}

#[tokio::test]
async fn player_loads_seasons_for_tv_only() {
    let fake = tv_catalog();
    fake.respond("/movie/603/videos", page(vec![]));

    let tv = VideoPlayerStore::open(fake.repository());
    tv.initialize_with_media(1399, MediaType::Tv, "");
    tv.settled().await;
    assert_eq!(tv.snapshot().seasons.items.len(), 3);

    let movie = VideoPlayerStore::open(fake.repository());
    movie.initialize_with_media(603, MediaType::Movie, "");
    movie.settled().await;
    assert!(movie.snapshot().seasons.items.is_empty());
    assert_eq!(fake.calls("/movie/603"), 0);
}

#[tokio::test]
async fn player_prefers_official_trailer_and_reports_absence() {
    let fake = FakeCatalog::new();
    fake.respond(
        "/movie/1/videos",
        page(vec![
            video("fan", "YouTube", "Trailer", false),
            video("official", "YouTube", "Trailer", true),
        ]),
    )
    .respond("/tv/2/videos", page(vec![video("vimeo", "Vimeo", "Trailer", true)]));

    let store = VideoPlayerStore::open(fake.repository());
    store.load_video_trailer(1, MediaType::Movie);
    store.settled().await;
    assert_eq!(store.snapshot().video_key(), "official");

    store.load_video_trailer(2, MediaType::Tv);
    store.settled().await;
    let state = store.snapshot();
    assert_eq!(state.trailer.error.as_deref(), Some("No trailer found"));
    assert_eq!(state.video_key(), "");
    assert!(!state.is_loading());
}

#[tokio::test]
async fn player_receives_the_trailer_key_from_a_detail_screen() {
    let fake = movie_catalog();
    let detail = MovieDetailStore::open(fake.repository(), 550);
    detail.settled().await;
    let handoff = detail.snapshot().trailer_request().expect("trailer request");
    assert_eq!(handoff.video_key, "trailer");

    let player = VideoPlayerStore::open(fake.repository());
    player.initialize_with_media(handoff.media_id, handoff.media_type, &handoff.video_key);
    let state = player.snapshot();
    assert_eq!(state.video_key(), "trailer");

    let request = state.playback_request(&handoff.title).expect("request");
    assert_eq!(request.video_key, "trailer");
    assert_eq!(request.media_id, 550);
    assert_eq!(request.title, "Fight Club");

    player.initialize_with_media(550, MediaType::Movie, "");
    assert_eq!(player.snapshot().video_key(), "trailer");
    assert_eq!(fake.calls("/movie/550/videos"), 1);
}

#[tokio::test]
async fn player_season_change_resets_episode() {
    let fake = FakeCatalog::new();
    let store = VideoPlayerStore::open(fake.repository());
    store.initialize_with_media(1399, MediaType::Tv, "");
    store.update_episode(4);
    store.update_season(3);

    let state = store.snapshot();
    assert_eq!((state.selected_season, state.selected_episode), (3, 1));

    store.update_episode(6);
    let request = store.snapshot().playback_request("Game of Thrones").expect("request");
    assert_eq!((request.season, request.episode), (3, 6));
    assert_eq!(request.media_type, MediaType::Tv);
    store.close();
}

#[tokio::test]
async fn closing_a_screen_cancels_in_flight_loads() {
    let fake = movie_catalog();
    let gate = fake.hold("/movie/550");
    let store = MovieDetailStore::new(fake.repository(), 550);
    store.load_movie_details();
    tokio::task::yield_now().await;

    store.close();
    gate.add_permits(1);
    store.settled().await;

    let state = store.snapshot();
    assert!(state.details.items.is_none());
    assert!(state.details.is_loading);
}

#[tokio::test]
async fn dropping_a_screen_cancels_in_flight_loads() {
    let fake = tv_catalog();
    let gate = fake.hold("/tv/1399");
    let store = TvDetailStore::open(fake.repository(), 1399);
    tokio::task::yield_now().await;
    drop(store);

    gate.add_permits(1);
    tokio::task::yield_now().await;
    assert_eq!(fake.calls("/tv/1399/season/1"), 0);
}
