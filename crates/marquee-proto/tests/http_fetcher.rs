use marquee_proto::error::PlexError;
use marquee_proto::fetch::{probe_identity, Fetcher, HttpFetcher, Target, TOKEN_PARAM};
use marquee_proto::pipeline::{fetch_recently_added, RecentlyAddedRequest, RECENTLY_ADDED_PATH};
use marquee_proto::lookback::Lookback;
use marquee_proto::sections::SECTIONS_PATH;
use mockito::{Matcher, Server};
use serde_json::json;

fn fetcher_for(server: &Server, token: &str) -> HttpFetcher {
    let host_port = server.host_with_port();
    let (host, port) = host_port.rsplit_once(':').expect("host:port");
    HttpFetcher::new(Target {
        host: host.to_string(),
        port: port.parse().expect("port"),
        https: false,
        token: token.to_string(),
    })
}

fn token(value: &str) -> Matcher {
    Matcher::UrlEncoded(TOKEN_PARAM.into(), value.into())
}

#[tokio::test]
async fn sends_token_and_accept_header() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/identity")
        .match_query(token("abc123"))
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "MediaContainer": {
                    "size": 0,
                    "machineIdentifier": "f00d",
                    "version": "1.40.0.7998"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let identity = probe_identity(&fetcher_for(&server, "abc123")).await.unwrap();

    mock.assert_async().await;
    assert_eq!(identity.machine_identifier.as_deref(), Some("f00d"));
    assert_eq!(identity.version.as_deref(), Some("1.40.0.7998"));
}

#[tokio::test]
async fn token_is_appended_to_an_existing_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/library/sections/3/all")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("type".into(), "4".into()),
            Matcher::UrlEncoded("sort".into(), "addedAt:desc".into()),
            token("t"),
        ]))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let body = fetcher_for(&server, "t")
        .get("/library/sections/3/all?type=4&sort=addedAt:desc")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(body, "{}");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/status/sessions")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body("Unauthorized")
        .create_async()
        .await;

    let err = fetcher_for(&server, "wrong")
        .get("/status/sessions")
        .await
        .unwrap_err();

    assert!(matches!(err, PlexError::Status { status: 401, .. }));
    assert!(err.is_transport());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let fetcher = HttpFetcher::new(Target {
        host: "127.0.0.1".into(),
        port: 1,
        https: false,
        token: "t".into(),
    });
    let err = fetcher.get("/identity").await.unwrap_err();
    assert!(matches!(err, PlexError::Transport { .. }));
}

#[tokio::test]
async fn recently_added_end_to_end() {
    let mut server = Server::new_async().await;
    let _feed = server
        .mock("GET", RECENTLY_ADDED_PATH)
        .match_query(token("t"))
        .with_status(200)
        .with_body(
            json!({
                "MediaContainer": {
                    "Metadata": [
                        { "type": "movie", "title": "Heat", "year": "1995", "duration": "10200000" }
                    ]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _sections = server
        .mock("GET", SECTIONS_PATH)
        .match_query(token("t"))
        .with_status(200)
        .with_body(json!({ "MediaContainer": { "Directory": [] } }).to_string())
        .create_async()
        .await;

    let request = RecentlyAddedRequest {
        movie_limit: 5,
        episode_limit: 5,
        lookback: Lookback::days(0),
    };
    let result = fetch_recently_added(&fetcher_for(&server, "t"), request, 0).await;

    assert_eq!(result.error, None);
    assert_eq!(result.movies.len(), 1);
    assert_eq!(result.movies[0].title, "Heat");
    assert_eq!(result.movies[0].year, Some(1995));
    assert_eq!(result.movies[0].runtime_ms, Some(10_200_000));
}
