mod common;

use common::{container, episode, movie, movie_section, sections, show_section, FakeFetcher};
use marquee_proto::lookback::{Lookback, SECS_PER_DAY};
use marquee_proto::pipeline::{
    fetch_now_streaming, fetch_recently_added, RecentlyAddedRequest, RECENTLY_ADDED_PATH,
    SESSIONS_PATH,
};
use marquee_proto::protocol::SessionMedia;
use marquee_proto::sections::{scan_episodes, section_episodes_path, SECTIONS_PATH};
use serde_json::json;

const NOW: i64 = 1_700_000_000;

fn request(movies: usize, episodes: usize, lookback_days: u32) -> RecentlyAddedRequest {
    RecentlyAddedRequest {
        movie_limit: movies,
        episode_limit: episodes,
        lookback: Lookback::days(lookback_days),
    }
}

#[tokio::test]
async fn movies_are_limited_in_server_order() {
    let items = (1..=7)
        .map(|i| movie(i, &format!("Movie {i}"), NOW - i as i64 * 60))
        .collect();
    let fetcher = FakeFetcher::new()
        .serve(RECENTLY_ADDED_PATH, container(items))
        .serve(SECTIONS_PATH, sections(vec![]));

    let result = fetch_recently_added(&fetcher, request(5, 5, 0), NOW).await;

    let titles: Vec<_> = result.movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, ["Movie 1", "Movie 2", "Movie 3", "Movie 4", "Movie 5"]);
    assert!(result.episodes.is_empty());
    assert_eq!(result.error, None);
    assert_eq!(result.movies[0].media.quality.as_deref(), Some("1080p"));
}

#[tokio::test]
async fn episodes_in_the_global_feed_are_ignored() {
    let fetcher = FakeFetcher::new()
        .serve(
            RECENTLY_ADDED_PATH,
            container(vec![episode(1, "Feed Show", 1, 1, NOW), movie(2, "Film", NOW)]),
        )
        .serve(SECTIONS_PATH, sections(vec![]));

    let result = fetch_recently_added(&fetcher, request(5, 5, 0), NOW).await;
    assert_eq!(result.movies.len(), 1);
    assert!(result.episodes.is_empty());
}

#[tokio::test]
async fn failing_section_is_skipped_and_later_sections_fill_the_limit() {
    let fetcher = FakeFetcher::new()
        .serve(
            SECTIONS_PATH,
            sections(vec![
                show_section("1"),
                movie_section("2"),
                show_section("3"),
                show_section("4"),
            ]),
        )
        .fail(section_episodes_path("1", 5), 500)
        .serve(
            section_episodes_path("3", 5),
            container((1..=3).map(|n| episode(30 + n, "Three", 1, n, NOW)).collect()),
        )
        .serve(
            section_episodes_path("4", 5),
            container((1..=4).map(|n| episode(40 + n, "Four", 2, n, NOW)).collect()),
        );

    let outcome = scan_episodes(&fetcher, 5).await.unwrap();

    assert_eq!(outcome.visited, ["1", "3", "4"]);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].0, "1");
    assert!(!outcome.all_failed());

    let labels: Vec<_> = outcome
        .episodes
        .iter()
        .map(|e| format!("{} {:?}", e.series_title, e.episode_number))
        .collect();
    assert_eq!(
        labels,
        ["Three Some(1)", "Three Some(2)", "Three Some(3)", "Four Some(1)", "Four Some(2)"]
    );
}

#[tokio::test]
async fn scan_stops_once_the_limit_is_reached() {
    let fetcher = FakeFetcher::new()
        .serve(SECTIONS_PATH, sections(vec![show_section("1"), show_section("2")]))
        .serve(
            section_episodes_path("1", 2),
            container((1..=2).map(|n| episode(n, "One", 1, n, NOW)).collect()),
        )
        .serve(
            section_episodes_path("2", 2),
            container(vec![episode(9, "Two", 1, 1, NOW)]),
        );

    let outcome = scan_episodes(&fetcher, 2).await.unwrap();

    assert_eq!(outcome.episodes.len(), 2);
    assert_eq!(outcome.visited, ["1"]);
    assert!(!fetcher
        .requests()
        .contains(&section_episodes_path("2", 2)));
}

#[tokio::test]
async fn every_section_failing_is_reported_but_movies_survive() {
    let fetcher = FakeFetcher::new()
        .serve(RECENTLY_ADDED_PATH, container(vec![movie(1, "Film", NOW)]))
        .serve(SECTIONS_PATH, sections(vec![show_section("1"), show_section("2")]))
        .fail(section_episodes_path("1", 5), 500)
        .fail(section_episodes_path("2", 5), 503);

    let result = fetch_recently_added(&fetcher, request(5, 5, 0), NOW).await;

    assert_eq!(result.movies.len(), 1);
    assert!(result.episodes.is_empty());
    let error = result.error.expect("all sections failed");
    assert!(error.contains("section 1"));
    assert!(error.contains("section 2"));
}

#[tokio::test]
async fn section_list_failure_keeps_movies_without_error() {
    let fetcher = FakeFetcher::new()
        .serve(RECENTLY_ADDED_PATH, container(vec![movie(1, "Film", NOW)]))
        .fail(SECTIONS_PATH, 401);

    let result = fetch_recently_added(&fetcher, request(5, 5, 0), NOW).await;
    assert_eq!(result.movies.len(), 1);
    assert!(result.episodes.is_empty());
    assert_eq!(result.error, None);
}

#[tokio::test]
async fn movies_feed_failure_yields_empty_result_with_error() {
    let fetcher = FakeFetcher::new()
        .fail(RECENTLY_ADDED_PATH, 500)
        .serve(SECTIONS_PATH, sections(vec![show_section("1")]))
        .serve(
            section_episodes_path("1", 5),
            container(vec![episode(1, "Show", 1, 1, NOW)]),
        );

    let result = fetch_recently_added(&fetcher, request(5, 5, 0), NOW).await;

    assert!(result.movies.is_empty());
    assert!(result.episodes.is_empty());
    assert!(result.error.unwrap().contains("500"));
    assert_eq!(fetcher.requests(), [RECENTLY_ADDED_PATH]);
}

#[tokio::test]
async fn lookback_applies_after_the_limit() {
    let day = SECS_PER_DAY;
    let fetcher = FakeFetcher::new()
        .serve(
            RECENTLY_ADDED_PATH,
            container(vec![
                movie(1, "Fresh", NOW - day),
                movie(2, "Old", NOW - 40 * day),
                movie(3, "Edge", NOW - 30 * day),
                movie(4, "Beyond Limit", NOW),
            ]),
        )
        .serve(SECTIONS_PATH, sections(vec![show_section("1")]))
        .serve(
            section_episodes_path("1", 3),
            container(vec![
                episode(10, "Show", 1, 1, NOW - 2 * day),
                episode(11, "Show", 1, 2, NOW - 31 * day),
            ]),
        );

    let result = fetch_recently_added(&fetcher, request(3, 3, 30), NOW).await;

    let titles: Vec<_> = result.movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, ["Fresh", "Edge"]);
    assert_eq!(result.episodes.len(), 1);
    assert_eq!(result.episodes[0].episode_number, Some(1));
}

#[tokio::test]
async fn now_streaming_normalizes_video_sessions() {
    let fetcher = FakeFetcher::new().serve(
        SESSIONS_PATH,
        json!({
            "MediaContainer": {
                "size": 3,
                "Metadata": [
                    {
                        "type": "episode",
                        "title": "Pilot",
                        "grandparentTitle": "Show",
                        "parentIndex": 1,
                        "index": 1,
                        "duration": 3_600_000,
                        "viewOffset": 600_000,
                        "User": { "title": "sam" },
                        "Player": { "product": "Plex Web", "state": "playing" },
                        "Session": { "bandwidth": 12000 }
                    },
                    { "type": "track", "title": "Song" },
                    { "type": "movie", "title": "Film", "year": 1999 }
                ]
            }
        }),
    );

    let result = fetch_now_streaming(&fetcher, 5).await;

    assert_eq!(result.error, None);
    assert_eq!(result.sessions.len(), 2);
    let first = &result.sessions[0];
    assert!(first.is_episode());
    assert_eq!(first.user_name.as_deref(), Some("sam"));
    assert_eq!(first.media.bitrate_kbps, Some(12000));
    assert_eq!(
        result.sessions[1].playing,
        SessionMedia::Movie {
            title: "Film".into()
        }
    );
}

#[tokio::test]
async fn now_streaming_failure_reports_error() {
    let fetcher = FakeFetcher::new().fail(SESSIONS_PATH, 502);
    let result = fetch_now_streaming(&fetcher, 5).await;
    assert!(result.sessions.is_empty());
    assert!(result.error.is_some());
}

#[tokio::test]
async fn malformed_body_degrades_to_empty() {
    let fetcher = FakeFetcher::new()
        .serve_raw(RECENTLY_ADDED_PATH, "<MediaContainer/>")
        .serve(SECTIONS_PATH, sections(vec![]));
    let result = fetch_recently_added(&fetcher, request(5, 5, 0), NOW).await;
    assert!(result.movies.is_empty());
    assert_eq!(result.error, None);
}
