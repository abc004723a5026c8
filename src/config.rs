use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;

use crate::controller::StalePolicy;

pub const DEFAULT_ENDPOINT: &str = "https://graphql.anilist.co";

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        endpoint: get_env_or_default("ANILIST_ENDPOINT", DEFAULT_ENDPOINT),
        stale_policy: parse_stale_policy(&get_env_or_default(
            "ANISEARCH_STALE_POLICY",
            "last-write-wins",
        )),
        plain_text: parse_bool(&get_env_or_default("ANISEARCH_PLAIN_TEXT", "false")),
        log_file: PathBuf::from(get_env_or_default("ANISEARCH_LOG_FILE", "anisearch.log")),
        log_filter: get_env_or_default("ANISEARCH_LOG", "info"),
    }
});

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub stale_policy: StalePolicy,
    /// Strip markup from descriptions before rendering.
    pub plain_text: bool,
    pub log_file: PathBuf,
    pub log_filter: String,
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_stale_policy(value: &str) -> StalePolicy {
    value.parse().unwrap_or_else(|_| {
        eprintln!("unknown ANISEARCH_STALE_POLICY {value:?}, using last-write-wins");
        StalePolicy::LastWriteWins
    })
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[test]
fn test_parse_bool() {
    assert!(parse_bool("true"));
    assert!(parse_bool(" YES "));
    assert!(parse_bool("1"));
    assert!(!parse_bool("false"));
    assert!(!parse_bool(""));
    assert!(!parse_bool("nope"));
}

#[test]
fn test_parse_stale_policy_falls_back() {
    assert_eq!(parse_stale_policy("discard-stale"), StalePolicy::DiscardStale);
    assert_eq!(parse_stale_policy("whatever"), StalePolicy::LastWriteWins);
}
