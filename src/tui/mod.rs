//! Interactive search screen.

pub mod app;
pub mod input;
pub mod ui;

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::alert::Alert;
use crate::controller::SearchController;
use crate::view::ResultsView;

/// Takes over the terminal until the user quits.
///
/// Blocks the calling thread, so run it on a blocking-capable thread.
pub fn run(
    controller: Arc<SearchController>,
    alerts: mpsc::UnboundedReceiver<Alert>,
    view: ResultsView,
) -> Result<()> {
    let mut terminal = ratatui::init();
    let mut app = app::App::new(controller, alerts, view);
    let res = app.run(&mut terminal);
    ratatui::restore();
    res
}
