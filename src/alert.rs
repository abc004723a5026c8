use tokio::sync::mpsc;

pub const FETCH_FAILURE_TITLE: &str = "Error";
pub const FETCH_FAILURE_MESSAGE: &str = "Hubo un error obteniendo la lista de anime.";

/// A blocking, user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn fetch_failure() -> Self {
        Self {
            title: FETCH_FAILURE_TITLE.to_string(),
            message: FETCH_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Where the controller sends alerts. The UI owns the other end.
pub trait AlertSink: Send + Sync {
    fn notify(&self, alert: Alert);
}

impl AlertSink for mpsc::UnboundedSender<Alert> {
    fn notify(&self, alert: Alert) {
        if self.send(alert).is_err() {
            tracing::warn!("alert dropped, nobody is listening");
        }
    }
}

/// Writes alerts to stderr, for non-interactive use.
pub struct StderrAlerts;

impl AlertSink for StderrAlerts {
    fn notify(&self, alert: Alert) {
        eprintln!("{}: {}", alert.title, alert.message);
    }
}
