use anyhow::Result;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use axum::Router;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

use anisearch::anilist::{AniListClient, MediaSource, SEARCH_QUERY};
use anisearch::error::FetchError;

mod test_helpers {
    use super::*;

    pub struct MockAniList {
        pub status: StatusCode,
        pub body: String,
        pub seen: Mutex<Vec<(HeaderMap, Value)>>,
    }

    async fn graphql(
        State(mock): State<Arc<MockAniList>>,
        headers: HeaderMap,
        body: String,
    ) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
        let parsed = serde_json::from_str(&body).unwrap_or(Value::Null);
        mock.seen.lock().unwrap().push((headers, parsed));
        (
            mock.status,
            [(header::CONTENT_TYPE, "application/json")],
            mock.body.clone(),
        )
    }

    /// Serves `body` with `status` on `/` of a fresh local port.
    pub async fn spawn_anilist(status: StatusCode, body: &str) -> Result<(String, Arc<MockAniList>)> {
        let mock = Arc::new(MockAniList {
            status,
            body: body.to_string(),
            seen: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .route("/", post(graphql))
            .with_state(mock.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Ok((format!("http://{addr}/"), mock))
    }

    pub fn media_page(media: Value) -> String {
        json!({ "data": { "Page": { "media": media } } }).to_string()
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_sends_fixed_document_with_search_variable() -> Result<()> {
    let body = media_page(json!([
        {
            "id": 1,
            "title": { "romaji": "Cowboy Bebop", "english": "Cowboy Bebop" },
            "description": "In the year 2071...<br>",
            "coverImage": { "large": "https://img.anili.st/media/1.jpg" }
        },
        {
            "id": 20,
            "title": { "romaji": null, "english": "Naruto" },
            "description": null,
            "coverImage": { "large": null }
        }
    ]));
    let (endpoint, mock) = spawn_anilist(StatusCode::OK, &body).await?;
    let client = AniListClient::new(endpoint);

    let results = client.search("naruto").await?;

    let seen = mock.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (headers, request) = &seen[0];
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(headers[header::ACCEPT], "application/json");
    assert_eq!(request["query"], SEARCH_QUERY);
    assert_eq!(request["variables"], json!({ "search": "naruto" }));

    assert_eq!(results.len(), 2);
    let first = &results.items()[0];
    assert_eq!(first.id, 1);
    assert_eq!(first.display_title(), "Cowboy Bebop");
    assert_eq!(first.description.as_deref(), Some("In the year 2071...<br>"));
    assert_eq!(
        first.cover_image_url.as_deref(),
        Some("https://img.anili.st/media/1.jpg")
    );
    let second = &results.items()[1];
    assert_eq!(second.id, 20);
    assert_eq!(second.display_title(), "Naruto");
    assert_eq!(second.cover_image_url, None);
    Ok(())
}

#[tokio::test]
async fn test_empty_query_is_sent_verbatim() -> Result<()> {
    let (endpoint, mock) = spawn_anilist(StatusCode::OK, &media_page(json!([]))).await?;
    let client = AniListClient::new(endpoint);

    let results = client.search("").await?;

    assert!(results.is_empty());
    let seen = mock.seen.lock().unwrap();
    assert_eq!(seen[0].1["variables"], json!({ "search": "" }));
    Ok(())
}

#[tokio::test]
async fn test_non_json_body_is_a_decode_error() -> Result<()> {
    let (endpoint, _mock) = spawn_anilist(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").await?;
    let client = AniListClient::new(endpoint);

    let err = client.search("naruto").await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)), "{err:?}");
    Ok(())
}

#[tokio::test]
async fn test_graphql_errors_are_missing_data() -> Result<()> {
    let body = json!({
        "data": null,
        "errors": [{ "message": "Too Many Requests.", "status": 429 }]
    })
    .to_string();
    let (endpoint, _mock) = spawn_anilist(StatusCode::TOO_MANY_REQUESTS, &body).await?;
    let client = AniListClient::new(endpoint);

    let err = client.search("naruto").await.unwrap_err();
    match err {
        FetchError::MissingData(messages) => assert_eq!(messages, vec!["Too Many Requests."]),
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_transport_error() -> Result<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let endpoint = format!("http://{addr}/");
    let client = AniListClient::new(endpoint.clone());

    let err = client.search("naruto").await.unwrap_err();
    match &err {
        FetchError::Transport { endpoint: e, .. } => assert_eq!(e, &endpoint),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains(&endpoint));
    Ok(())
}
