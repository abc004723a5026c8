use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use anisearch::alert::StderrAlerts;
use anisearch::anilist::AniListClient;
use anisearch::config::CONFIG;
use anisearch::controller::{SearchController, SearchState, StalePolicy};
use anisearch::style::StyleSheet;
use anisearch::telemetry::{self, LogTarget};
use anisearch::view::ResultsView;

#[derive(Parser)]
#[command(version, about = "Search the AniList anime catalog by title")]
struct Cli {
    /// GraphQL endpoint to query
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// How to treat responses that arrive after a newer one
    #[arg(long, global = true, value_enum)]
    stale_policy: Option<StalePolicy>,

    /// Strip markup from descriptions
    #[arg(long, global = true)]
    plain_text: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive search screen (default)
    Tui {
        /// Log file for the session
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Run one search and print the results
    Search {
        query: String,

        /// Print the result set as JSON instead of a grid
        #[arg(long)]
        json: bool,

        /// Width of the printed grid in columns
        #[arg(long, default_value_t = 80)]
        width: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let endpoint = cli.endpoint.unwrap_or_else(|| CONFIG.endpoint.clone());
    let policy = cli.stale_policy.unwrap_or(CONFIG.stale_policy);
    let style = StyleSheet::terminal().with_plain_text(cli.plain_text || CONFIG.plain_text);
    let source = Arc::new(AniListClient::new(endpoint));

    match cli.command.unwrap_or(Command::Tui { log_file: None }) {
        Command::Tui { log_file } => {
            let log_file = log_file.unwrap_or_else(|| CONFIG.log_file.clone());
            telemetry::init(&CONFIG.log_filter, LogTarget::File(&log_file))?;
            tracing::info!(endpoint = source.endpoint(), ?policy, "starting search screen");

            let (alerts_tx, alerts_rx) = mpsc::unbounded_channel();
            let controller = SearchController::new(source, Arc::new(alerts_tx), policy);
            let view = ResultsView::new(style);

            tokio::task::spawn_blocking(move || anisearch::tui::run(controller, alerts_rx, view))
                .await
                .context("Search screen panicked")??;
        }
        Command::Search { query, json, width } => {
            telemetry::init(&CONFIG.log_filter, LogTarget::Stderr)?;

            let controller = SearchController::new(source, Arc::new(StderrAlerts), policy);
            let Ok(results) = controller.fetch(&query).await else {
                std::process::exit(1);
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                let state = SearchState {
                    query,
                    ..controller.snapshot()
                };
                let screen = ResultsView::new(style).render(&state, width);
                for line in screen.to_lines(width) {
                    println!("{line}");
                }
            }
        }
    }
    Ok(())
}
