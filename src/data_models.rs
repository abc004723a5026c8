use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// Wire shapes of the AniList GraphQL API
// -----------------------------------------------------------------------------

#[derive(Serialize, Debug, Clone)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: SearchVariables<'a>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchVariables<'a> {
    pub search: &'a str,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GraphQlResponse {
    pub data: Option<ResponseData>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ResponseData {
    #[serde(rename = "Page")]
    pub page: Option<MediaPage>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MediaPage {
    pub media: Option<Vec<Media>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: u64,
    #[serde(default)]
    pub title: Option<MediaTitle>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image: Option<CoverImage>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct MediaTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct CoverImage {
    pub large: Option<String>,
}

// -----------------------------------------------------------------------------
// Screen-side model
// -----------------------------------------------------------------------------

/// One anime entry as the screen sees it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResultItem {
    pub id: u64,
    pub title_romaji: Option<String>,
    pub title_english: Option<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
}

impl ResultItem {
    /// Romaji title first, then English, then nothing.
    pub fn display_title(&self) -> &str {
        non_empty(self.title_romaji.as_deref())
            .or_else(|| non_empty(self.title_english.as_deref()))
            .unwrap_or("")
    }

    /// Render key, unique within a result set.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

impl From<Media> for ResultItem {
    fn from(media: Media) -> Self {
        let title = media.title.unwrap_or_default();
        ResultItem {
            id: media.id,
            title_romaji: title.romaji,
            title_english: title.english,
            description: media.description,
            cover_image_url: media.cover_image.and_then(|c| c.large),
        }
    }
}

/// Ordered results of the last applied fetch. Replaced wholesale, never merged.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct ResultSet {
    items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new(items: Vec<ResultItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultItem> {
        self.items.iter()
    }
}

impl FromIterator<Media> for ResultSet {
    fn from_iter<I: IntoIterator<Item = Media>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(ResultItem::from).collect())
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ResultItem;
    type IntoIter = std::slice::Iter<'a, ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
fn item(romaji: Option<&str>, english: Option<&str>) -> ResultItem {
    ResultItem {
        id: 1,
        title_romaji: romaji.map(String::from),
        title_english: english.map(String::from),
        description: None,
        cover_image_url: None,
    }
}

#[test]
fn test_display_title_fallback() {
    assert_eq!(item(None, Some("Naruto")).display_title(), "Naruto");
    assert_eq!(item(Some("Naruto"), None).display_title(), "Naruto");
    assert_eq!(
        item(Some("Shingeki no Kyojin"), Some("Attack on Titan")).display_title(),
        "Shingeki no Kyojin"
    );
    assert_eq!(item(None, None).display_title(), "");
    assert_eq!(item(Some(""), Some("Naruto")).display_title(), "Naruto");
}

#[test]
fn test_media_with_null_fields_maps_to_item() {
    let json = r#"{
        "id": 20,
        "title": { "romaji": null, "english": "Naruto" },
        "description": null,
        "coverImage": null
    }"#;
    let media: Media = serde_json::from_str(json).unwrap();
    let item = ResultItem::from(media);
    assert_eq!(item.id, 20);
    assert_eq!(item.title_romaji, None);
    assert_eq!(item.title_english.as_deref(), Some("Naruto"));
    assert_eq!(item.description, None);
    assert_eq!(item.cover_image_url, None);
}

#[test]
fn test_request_body_shape() {
    let body = GraphQlRequest {
        query: "query { x }",
        variables: SearchVariables { search: "" },
    };
    let value = serde_json::to_value(&body).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "query": "query { x }", "variables": { "search": "" } })
    );
}
