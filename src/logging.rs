use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "chat.log";

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

pub fn log_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow!("Could not determine data directory"))?;

    Ok(data_dir.join("chat-client"))
}

/// Send logs to a file; the terminal is busy drawing the UI.
///
/// `RUST_LOG` wins over `verbose` when set. Keep the returned guard alive
/// for the lifetime of the program or buffered lines are lost. Logging is
/// optional: when the log file can't be set up a warning goes to stderr and
/// the client runs without it.
pub fn init(verbose: u8) -> Option<WorkerGuard> {
    init_in(log_dir(), verbose)
}

fn init_in(dir: Result<PathBuf>, verbose: u8) -> Option<WorkerGuard> {
    match dir.and_then(|dir| install(&dir, verbose)) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("warning: file logging disabled: {err:#}");
            None
        }
    }
}

fn install(dir: &Path, verbose: u8) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::builder()
        .with_default_directive(level_for(verbose).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;

    tracing::info!(path = %dir.join(LOG_FILE).display(), "logging initialized");
    Ok(guard)
}
