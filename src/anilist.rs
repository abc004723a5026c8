use futures::future::BoxFuture;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::config::CONFIG;
use crate::data_models::{GraphQlRequest, GraphQlResponse, ResultSet, SearchVariables};
use crate::error::FetchError;

/// The fixed document sent on every search.
pub const SEARCH_QUERY: &str = r#"
query ($search: String) {
  Page {
    media(search: $search, type: ANIME) {
      id
      title {
        romaji
        english
      }
      description
      coverImage {
        large
      }
    }
  }
}
"#;

/// Anything that can answer a title search with a result set.
pub trait MediaSource: Send + Sync {
    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<ResultSet, FetchError>>;
}

pub struct AniListClient {
    http: reqwest::Client,
    endpoint: String,
}

impl AniListClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config() -> Self {
        Self::new(CONFIG.endpoint.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post_search(&self, search: &str) -> Result<ResultSet, FetchError> {
        let body = GraphQlRequest {
            query: SEARCH_QUERY,
            variables: SearchVariables { search },
        };

        let transport = |source: reqwest::Error| FetchError::Transport {
            endpoint: self.endpoint.clone(),
            source,
        };

        let res = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let status = res.status();
        let text = res.text().await.map_err(transport)?;
        tracing::debug!(%status, bytes = text.len(), "anilist responded");

        parse_search_response(&text)
    }
}

impl MediaSource for AniListClient {
    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<ResultSet, FetchError>> {
        Box::pin(self.post_search(query))
    }
}

/// Pulls `data.Page.media` out of a response body.
///
/// The HTTP status is not consulted: AniList reports failures as a body with
/// `data: null` and an `errors` array, which ends up as
/// [`FetchError::MissingData`]. A null `media` list is an empty result set.
pub fn parse_search_response(body: &str) -> Result<ResultSet, FetchError> {
    let response: GraphQlResponse = serde_json::from_str(body)?;
    let errors = || -> Vec<String> { response.errors.iter().map(|e| e.message.clone()).collect() };

    let page = response
        .data
        .as_ref()
        .and_then(|data| data.page.as_ref())
        .ok_or_else(|| FetchError::MissingData(errors()))?;

    Ok(page.media.clone().unwrap_or_default().into_iter().collect())
}

#[test]
fn test_parse_search_response() {
    let body = r#"{"data":{"Page":{"media":[
        {"id":1,"title":{"romaji":"Cowboy Bebop","english":"Cowboy Bebop"},
         "description":"<i>Space</i> bounty hunters","coverImage":{"large":"https://img/1.jpg"}},
        {"id":20,"title":{"romaji":null,"english":"Naruto"},"description":null,"coverImage":{"large":null}}
    ]}}}"#;
    let set = parse_search_response(body).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.items()[0].id, 1);
    assert_eq!(
        set.items()[0].description.as_deref(),
        Some("<i>Space</i> bounty hunters")
    );
    assert_eq!(
        set.items()[0].cover_image_url.as_deref(),
        Some("https://img/1.jpg")
    );
    assert_eq!(set.items()[1].display_title(), "Naruto");
}

#[test]
fn test_parse_search_response_failures() {
    assert!(matches!(
        parse_search_response("<html>502</html>"),
        Err(FetchError::Decode(_))
    ));
    assert!(matches!(
        parse_search_response("{}"),
        Err(FetchError::MissingData(m)) if m.is_empty()
    ));
    assert!(matches!(
        parse_search_response(r#"{"data":null,"errors":[{"message":"Too Many Requests."}]}"#),
        Err(FetchError::MissingData(m)) if m == vec!["Too Many Requests.".to_string()]
    ));
    assert!(matches!(
        parse_search_response(r#"{"data":{"Page":null}}"#),
        Err(FetchError::MissingData(_))
    ));
}

#[test]
fn test_null_media_is_empty() {
    let set = parse_search_response(r#"{"data":{"Page":{"media":null}}}"#).unwrap();
    assert!(set.is_empty());
}
