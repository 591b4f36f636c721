//! `ApiService` against a mock server.

use saavtui::http::{ApiError, ApiService, MusicApi};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn song_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("Song {id}"),
        "duration": 200,
        "artists": { "primary": [{ "name": "Artist" }] },
        "album": { "id": "alb", "name": "Album" },
        "image": [{ "quality": "500x500", "url": format!("https://img.test/{id}.jpg") }],
        "downloadUrl": [
            { "quality": "96kbps", "url": format!("https://cdn.test/{id}_96.mp4") },
            { "quality": "320kbps", "url": format!("https://cdn.test/{id}_320.mp4") }
        ]
    })
}

async fn service(server: &MockServer) -> ApiService {
    ApiService::new(server.uri()).expect("client builds")
}

#[tokio::test]
async fn get_song_normalizes_the_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/songs/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [song_json("abc")]
        })))
        .mount(&server)
        .await;

    let song = service(&server).await.get_song("abc").await.unwrap();

    assert_eq!(song.id, "abc");
    assert_eq!(song.primary_artists, "Artist");
    assert_eq!(song.best_stream_url(), Some("https://cdn.test/abc_320.mp4"));
}

#[tokio::test]
async fn recommendations_send_limit_and_drop_the_seed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/songs/abc/suggestions"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [song_json("abc"), song_json("d"), song_json("e")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let songs = service(&server)
        .await
        .get_recommendations("abc", 5)
        .await
        .unwrap();

    let ids: Vec<_> = songs.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["d", "e"]);
}

#[tokio::test]
async fn search_passes_query_and_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/songs"))
        .and(query_param("query", "tum hi ho"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "total": 41, "start": 40, "results": [song_json("s1")] }
        })))
        .mount(&server)
        .await;

    let page = service(&server)
        .await
        .search_songs("tum hi ho", 2, 20)
        .await
        .unwrap();

    assert_eq!(page.total, 41);
    assert_eq!(page.start, 40);
    assert_eq!(page.results.len(), 1);
}

#[tokio::test]
async fn album_and_playlist_are_fetched_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/albums"))
        .and(query_param("id", "alb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "id": "alb",
                "name": "Greatest &amp; Latest",
                "year": 2013,
                "artists": { "primary": [{ "name": "Band" }] },
                "songs": [song_json("t1"), song_json("t2")]
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/playlists"))
        .and(query_param("id", "pl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "SUCCESS",
            "data": { "id": "pl", "name": "Mix", "songs": [song_json("t3")] }
        })))
        .mount(&server)
        .await;

    let api = service(&server).await;
    let album = api.get_album("alb").await.unwrap();
    assert_eq!(album.name, "Greatest & Latest");
    assert_eq!(album.year.as_deref(), Some("2013"));
    assert_eq!(album.songs.len(), 2);

    let playlist = api.get_playlist("pl").await.unwrap();
    assert_eq!(playlist.name, "Mix");
    assert_eq!(playlist.songs[0].id, "t3");
}

#[tokio::test]
async fn http_failures_map_to_errors() {
    let server = MockServer::start().await;
    Mock::given(path("/songs/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(path("/songs/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(path("/songs/refused"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "song not available"
        })))
        .mount(&server)
        .await;

    let api = service(&server).await;

    assert!(matches!(
        api.get_song("missing").await,
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        api.get_song("broken").await,
        Err(ApiError::Status { status: 500, .. })
    ));
    match api.get_song("refused").await {
        Err(ApiError::Unsuccessful(message)) => assert_eq!(message, "song not available"),
        other => panic!("expected Unsuccessful, got {other:?}"),
    }
}
