//! Tracing setup.
//!
//! Two layers: human-readable output on stderr and JSON lines appended to
//! `server.log`. Stdout carries protocol traffic only, so nothing here may
//! write to it.

use std::path::Path;

use anyhow::{Context as _, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const CRATES: &[&str] = &[
    "trellis",
    "trellis_config",
    "trellis_client",
    "trellis_tools",
    "trellis_mcp",
];

fn directives(level: &str, fallback: &str) -> String {
    let mut parts: Vec<String> = CRATES.iter().map(|c| format!("{}={}", c, level)).collect();
    parts.push(fallback.to_string());
    parts.join(",")
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must live
/// until the process exits.
pub fn init(verbose: bool, log_dir: Option<&Path>) -> Result<WorkerGuard> {
    let log_dir = trellis_config::log_dir(log_dir);
    trellis_config::ensure_dir(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, trellis_config::LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_filter = if verbose {
        directives("debug", "info")
    } else {
        directives("warn", "warn")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(EnvFilter::new(console_filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(EnvFilter::new(directives(
                    if verbose { "debug" } else { "info" },
                    "warn",
                ))),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}
