//! Tracing setup for the binary.
//!
//! Two layers with independent filters: warnings and errors go to stderr
//! so they never interleave with the conversation on stdout, and everything
//! at the configured level goes to a daily rolling file.

use std::path::Path;

use anyhow::{Context, Result};
use ireno_core::config::LoggingSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "ireno.log";

/// Installs the global subscriber. Keep the returned guard alive until exit
/// so buffered file output is flushed.
pub fn init(settings: &LoggingSettings, log_dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG wins over the configured level for the file.
    let file_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let terminal_filter = if verbose {
        EnvFilter::new("info,hyper=warn,reqwest=warn,rustyline=warn")
    } else {
        EnvFilter::new("warn,rustyline=error")
    };

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer);
    let terminal_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(file_layer.with_filter(file_filter))
        .with(terminal_layer.with_filter(terminal_filter))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
