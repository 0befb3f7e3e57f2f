// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log_level` CLI flag (if provided)
//! 2. `PROGRAM_STARTER_LOG` environment variable (e.g. "info", "debug")
//! 3. `debug` when logging to a file, `info` otherwise
//!
//! Logs go to the `--log_file` path when given, otherwise to STDERR so that
//! script stdout stays clean.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>, log_file: Option<&Path>) -> Result<()> {
    let level = match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => std::env::var("PROGRAM_STARTER_LOG")
            .ok()
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(if log_file.is_some() {
                tracing::Level::DEBUG
            } else {
                tracing::Level::INFO
            }),
    };

    let builder = fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

/// Level names as accepted by `tracing::Level`, plus `warning`.
fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim() {
        w if w.eq_ignore_ascii_case("warning") => Some(tracing::Level::WARN),
        other => other.parse().ok(),
    }
}
