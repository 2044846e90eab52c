//! Tracing subscriber setup.
//!
//! Console events go to stderr. A plain-text log file keeps a persistent
//! record of every run next to it.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs::{File, OpenOptions};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Log file used when `--log-file` is not given.
pub const DEFAULT_LOG_FILE: &str = "vcast_si.log";

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Installs the global subscriber.
///
/// The console shows `warn` and above (`debug` with `verbose`); the log
/// file, when given, records `info` and above (`debug` with `verbose`).
/// `RUST_LOG` overrides both. The returned guard flushes the file when
/// dropped and must be held until the process exits.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter(if verbose { "debug" } else { "warn" }));

    let (file_layer, guard) = match log_file.map(open_log_file) {
        Some(Ok(file)) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter(if verbose { "debug" } else { "info" }));
            (Some(layer), Some(guard))
        }
        Some(Err(e)) => {
            eprintln!("{}: {:#}", "warning".yellow(), e);
            (None, None)
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init();

    guard
}

/// Opens `path` for appending, creating it if needed.
pub fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}
