use anyhow::{Context, Result, anyhow};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where log output goes. The interactive screen owns the terminal, so it
/// logs to a file instead.
pub enum LogTarget<'a> {
    File(&'a Path),
    Stderr,
}

/// Installs the global subscriber. `log` records from dependencies are
/// bridged into it as well.
pub fn init(filter: &str, target: LogTarget<'_>) -> Result<()> {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|e| {
        eprintln!("invalid log filter {filter:?} ({e}), using info");
        EnvFilter::new("info")
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    let installed = match target {
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))
}
