use chrono::{DateTime, Utc};
use std::str::FromStr;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::alert::{Alert, AlertSink};
use crate::anilist::MediaSource;
use crate::data_models::ResultSet;
use crate::error::FetchError;

/// What to do with a response that arrives after a newer one was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StalePolicy {
    /// Every settled fetch overwrites the state, in settlement order.
    #[default]
    LastWriteWins,
    /// Responses older than the last applied one are dropped, and loading
    /// only ends when the most recently issued fetch settles.
    DiscardStale,
}

impl FromStr for StalePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as clap::ValueEnum>::from_str(s.trim(), true)
    }
}

/// Everything the screen renders from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: ResultSet,
    pub loading: bool,
    pub last_settled_at: Option<DateTime<Utc>>,
    /// Sequence number of the most recently dispatched fetch.
    pub issued: u64,
    /// Sequence number of the fetch whose results are on screen.
    pub applied: u64,
}

impl SearchState {
    /// Enters the loading state for a new cycle and returns its sequence
    /// number. The query, when given, changes in the same update so no
    /// subscriber sees it next to a settled grid.
    fn begin(&mut self, query: Option<&str>) -> u64 {
        if let Some(query) = query {
            self.query.clear();
            self.query.push_str(query);
        }
        self.issued += 1;
        self.loading = true;
        self.issued
    }
}

/// Owns the query, the result set and the loading flag, and runs one fetch
/// cycle per query change.
///
/// State is published through a `watch` channel; renderers hold a receiver
/// from [`SearchController::subscribe`] and re-derive the screen whenever it
/// changes.
pub struct SearchController {
    source: Arc<dyn MediaSource>,
    alerts: Arc<dyn AlertSink>,
    state: watch::Sender<SearchState>,
    policy: StalePolicy,
    runtime: Handle,
}

impl SearchController {
    /// Panics when called outside a tokio runtime.
    pub fn new(
        source: Arc<dyn MediaSource>,
        alerts: Arc<dyn AlertSink>,
        policy: StalePolicy,
    ) -> Arc<Self> {
        Self::with_runtime(source, alerts, policy, Handle::current())
    }

    pub fn with_runtime(
        source: Arc<dyn MediaSource>,
        alerts: Arc<dyn AlertSink>,
        policy: StalePolicy,
        runtime: Handle,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(SearchState::default());
        Arc::new(Self {
            source,
            alerts,
            state,
            policy,
            runtime,
        })
    }

    pub fn policy(&self) -> StalePolicy {
        self.policy
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Resets the screen and fires the initial empty-query fetch.
    pub fn mount(self: &Arc<Self>) -> JoinHandle<()> {
        let mut seq = 0;
        self.state.send_modify(|s| {
            s.results = ResultSet::default();
            s.last_settled_at = None;
            seq = s.begin(Some(""));
        });
        self.spawn_cycle(seq, String::new())
    }

    /// Stores the new query and dispatches a fetch for it. Never debounced,
    /// and earlier fetches keep running.
    pub fn set_query(self: &Arc<Self>, text: impl Into<String>) -> JoinHandle<()> {
        let text = text.into();
        let mut seq = 0;
        self.state.send_modify(|s| seq = s.begin(Some(text.as_str())));
        self.spawn_cycle(seq, text)
    }

    fn spawn_cycle(self: &Arc<Self>, seq: u64, text: String) -> JoinHandle<()> {
        tracing::debug!(seq, query = %text, "fetch dispatched");
        let span = tracing::info_span!("fetch_cycle", seq, query = %text);
        let this = Arc::clone(self);
        self.runtime.spawn(
            async move {
                // failures are already logged and alerted
                let _ = this.complete_cycle(seq, &text).await;
            }
            .instrument(span),
        )
    }

    /// Runs one full fetch cycle for `query` on the current task.
    ///
    /// The outcome is returned as well as applied to the state, so callers
    /// without a renderer can use it directly.
    pub async fn fetch(&self, query: &str) -> Result<ResultSet, FetchError> {
        let seq = self.begin_cycle(query);
        self.complete_cycle(seq, query).await
    }

    fn begin_cycle(&self, query: &str) -> u64 {
        let mut seq = 0;
        self.state.send_modify(|s| seq = s.begin(None));
        tracing::debug!(seq, query, "fetch dispatched");
        seq
    }

    async fn complete_cycle(&self, seq: u64, query: &str) -> Result<ResultSet, FetchError> {
        let outcome = self.source.search(query).await;
        match &outcome {
            Ok(results) => {
                tracing::info!(seq, query, count = results.len(), "fetch settled");
                self.settle(seq, Some(results.clone()));
            }
            Err(e) => {
                tracing::error!(seq, query, "error fetching anime list: {:#}", e);
                self.settle(seq, None);
                self.alerts.notify(Alert::fetch_failure());
            }
        }
        outcome
    }

    fn settle(&self, seq: u64, results: Option<ResultSet>) {
        let policy = self.policy;
        self.state.send_modify(|s| {
            match policy {
                StalePolicy::LastWriteWins => {
                    if let Some(results) = results {
                        s.results = results;
                        s.applied = seq;
                    }
                    s.loading = false;
                }
                StalePolicy::DiscardStale => {
                    if let Some(results) = results {
                        if seq > s.applied {
                            s.results = results;
                            s.applied = seq;
                        } else {
                            tracing::debug!(seq, applied = s.applied, "discarding stale response");
                        }
                    }
                    if seq == s.issued {
                        s.loading = false;
                    }
                }
            }
            s.last_settled_at = Some(Utc::now());
        });
    }
}

#[test]
fn test_stale_policy_from_str() {
    assert_eq!(
        "last-write-wins".parse::<StalePolicy>(),
        Ok(StalePolicy::LastWriteWins)
    );
    assert_eq!(
        " Discard-Stale ".parse::<StalePolicy>(),
        Ok(StalePolicy::DiscardStale)
    );
    assert!("newest".parse::<StalePolicy>().is_err());
}

#[test]
fn test_begin_sets_query_and_loading_together() {
    let mut state = SearchState {
        query: "nar".into(),
        results: ResultSet::new(vec![]),
        issued: 3,
        applied: 3,
        ..SearchState::default()
    };

    let seq = state.begin(Some("naruto"));
    assert_eq!(seq, 4);
    assert_eq!(state.query, "naruto");
    assert!(state.loading);
    assert_eq!(state.applied, 3);

    let seq = state.begin(None);
    assert_eq!(seq, 5);
    assert_eq!(state.query, "naruto");
}
