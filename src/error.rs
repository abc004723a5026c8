use thiserror::Error;

/// Everything that can go wrong during one fetch cycle.
///
/// The controller never lets these escape into the UI: they are logged and
/// turned into a single [`Alert`](crate::alert::Alert).
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response has no data{}", format_graphql_errors(.0))]
    MissingData(Vec<String>),

    #[error("media source unavailable: {0}")]
    Unavailable(String),
}

fn format_graphql_errors(messages: &[String]) -> String {
    if messages.is_empty() {
        String::new()
    } else {
        format!(" ({})", messages.join("; "))
    }
}

#[test]
fn test_missing_data_message() {
    let err = FetchError::MissingData(vec![]);
    assert_eq!(err.to_string(), "response has no data");

    let err = FetchError::MissingData(vec!["Not Found.".into(), "Rate limited".into()]);
    assert_eq!(
        err.to_string(),
        "response has no data (Not Found.; Rate limited)"
    );
}
