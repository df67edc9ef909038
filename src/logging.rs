//! `tracing` subscriber setup.
//!
//! Headless commands log to stderr. The TUI owns the terminal, so its logs go
//! to `--log-file` when given and are discarded otherwise.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::{AppError, EXIT_INPUT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Full-screen mode: never write to the terminal.
    Tui,
}

pub fn init(config: &AppConfig, target: LogTarget) -> Result<(), AppError> {
    let filter = EnvFilter::try_new(&config.log_filter)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid log filter '{}': {e}", config.log_filter)))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match (&config.log_file, target) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open log file '{}': {e}", path.display())))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        (None, LogTarget::Stderr) => builder.with_writer(io::stderr).try_init(),
        (None, LogTarget::Tui) => builder.with_writer(io::sink).try_init(),
    };

    // A subscriber may already be installed (e.g. by a test harness); keep it.
    if let Err(err) = result {
        tracing::debug!("logging already initialised: {err}");
    }
    Ok(())
}
