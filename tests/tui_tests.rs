use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use anisearch::alert::Alert;
use anisearch::anilist::MediaSource;
use anisearch::controller::{SearchController, StalePolicy};
use anisearch::data_models::ResultSet;
use anisearch::error::FetchError;
use anisearch::style::StyleSheet;
use anisearch::tui::app::App;
use anisearch::view::ResultsView;

mod test_helpers {
    use super::*;

    pub struct Pending {
        pub query: String,
        reply: oneshot::Sender<Result<ResultSet, FetchError>>,
    }

    impl Pending {
        pub fn succeed(self) {
            let _ = self.reply.send(Ok(ResultSet::default()));
        }
    }

    /// Media source whose searches stay in flight until the test answers them.
    pub struct GatedSource {
        requests: mpsc::UnboundedSender<Pending>,
    }

    impl MediaSource for GatedSource {
        fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<ResultSet, FetchError>> {
            let (reply, rx) = oneshot::channel();
            let sent = self.requests.send(Pending {
                query: query.to_string(),
                reply,
            });
            Box::pin(async move {
                sent.map_err(|_| FetchError::Unavailable("test harness gone".into()))?;
                rx.await
                    .unwrap_or_else(|_| Err(FetchError::Unavailable("reply dropped".into())))
            })
        }
    }

    pub struct Screen {
        pub app: App,
        pub controller: Arc<SearchController>,
        pub requests: mpsc::UnboundedReceiver<Pending>,
        pub alerts: mpsc::UnboundedSender<Alert>,
    }

    impl Screen {
        /// Mounted app with the initial empty search already answered.
        pub async fn mounted() -> Screen {
            let (requests_tx, mut requests) = mpsc::unbounded_channel();
            let (alerts, alerts_rx) = mpsc::unbounded_channel();
            let controller = SearchController::new(
                Arc::new(GatedSource {
                    requests: requests_tx,
                }),
                Arc::new(alerts.clone()),
                StalePolicy::LastWriteWins,
            );
            let app = App::new(
                controller.clone(),
                alerts_rx,
                ResultsView::new(StyleSheet::terminal()),
            );
            let initial = requests.recv().await.expect("mount did not fetch");
            assert_eq!(initial.query, "");
            initial.succeed();

            Screen {
                app,
                controller,
                requests,
                alerts,
            }
        }

        pub fn press(&mut self, code: KeyCode) {
            self.app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
        }

        pub fn press_with(&mut self, code: KeyCode, modifiers: KeyModifiers) {
            self.app.handle_key(KeyEvent::new(code, modifiers));
        }

        pub fn dispatched(&self) -> u64 {
            self.controller.snapshot().issued
        }

        pub async fn next_query(&mut self) -> String {
            let pending = self.requests.recv().await.expect("no request dispatched");
            let query = pending.query.clone();
            pending.succeed();
            query
        }
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_each_typed_char_dispatches_one_fetch() {
    let mut s = Screen::mounted().await;
    assert_eq!(s.dispatched(), 1);

    for (i, c) in "naruto".chars().enumerate() {
        s.press(KeyCode::Char(c));
        assert_eq!(s.dispatched(), 2 + i as u64);
    }
    for expected in ["n", "na", "nar", "naru", "narut", "naruto"] {
        assert_eq!(s.next_query().await, expected);
    }
    assert_eq!(s.app.input.value(), "naruto");
    assert_eq!(s.controller.snapshot().query, "naruto");
}

#[tokio::test]
async fn test_edits_that_change_nothing_do_not_fetch() {
    let mut s = Screen::mounted().await;

    s.press(KeyCode::Backspace);
    s.press(KeyCode::Delete);
    s.press_with(KeyCode::Char('u'), KeyModifiers::CONTROL);
    assert_eq!(s.dispatched(), 1);

    s.press(KeyCode::Char('a'));
    assert_eq!(s.next_query().await, "a");
    s.press(KeyCode::End);
    s.press(KeyCode::Delete);
    s.press(KeyCode::Home);
    s.press(KeyCode::Backspace);
    assert_eq!(s.dispatched(), 2);

    s.press(KeyCode::Delete);
    assert_eq!(s.dispatched(), 3);
    assert_eq!(s.next_query().await, "");
}

#[tokio::test]
async fn test_movement_and_scroll_keys_do_not_fetch() {
    let mut s = Screen::mounted().await;
    s.press(KeyCode::Char('x'));
    assert_eq!(s.next_query().await, "x");

    for code in [
        KeyCode::Left,
        KeyCode::Right,
        KeyCode::Home,
        KeyCode::End,
        KeyCode::Down,
        KeyCode::Down,
        KeyCode::PageDown,
        KeyCode::Up,
    ] {
        s.press(code);
    }
    assert_eq!(s.dispatched(), 2);
    assert_eq!(s.app.scroll, 11);

    s.press(KeyCode::PageUp);
    s.press(KeyCode::PageUp);
    assert_eq!(s.app.scroll, 0);

    s.press(KeyCode::Down);
    s.press(KeyCode::Char('y'));
    assert_eq!(s.app.scroll, 0);
    assert_eq!(s.next_query().await, "xy");
}

#[tokio::test]
async fn test_key_while_alert_shown_only_dismisses() {
    let mut s = Screen::mounted().await;

    s.alerts.send(Alert::fetch_failure()).unwrap();
    s.app.sync();
    assert_eq!(s.app.alert, Some(Alert::fetch_failure()));

    s.press(KeyCode::Char('n'));
    assert_eq!(s.app.alert, None);
    assert_eq!(s.app.input.value(), "");
    assert_eq!(s.dispatched(), 1);
    assert!(!s.app.should_quit);

    s.alerts.send(Alert::fetch_failure()).unwrap();
    s.app.sync();
    s.press(KeyCode::Esc);
    assert_eq!(s.app.alert, None);
    assert!(!s.app.should_quit);

    s.press(KeyCode::Esc);
    assert!(s.app.should_quit);
}

#[tokio::test]
async fn test_modified_chars_are_not_typed() {
    let mut s = Screen::mounted().await;

    s.press_with(KeyCode::Char('b'), KeyModifiers::ALT);
    s.press_with(KeyCode::Char('f'), KeyModifiers::ALT | KeyModifiers::SHIFT);
    assert_eq!(s.app.input.value(), "");
    assert_eq!(s.dispatched(), 1);

    s.press_with(KeyCode::Char('N'), KeyModifiers::SHIFT);
    assert_eq!(s.app.input.value(), "N");
    assert_eq!(s.next_query().await, "N");

    s.press_with(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(s.app.should_quit);
    assert_eq!(s.dispatched(), 2);
}

#[tokio::test]
async fn test_release_events_are_ignored() {
    let mut s = Screen::mounted().await;

    let mut release = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE);
    release.kind = KeyEventKind::Release;
    s.app.handle_key(release);

    assert_eq!(s.app.input.value(), "");
    assert_eq!(s.dispatched(), 1);
}
