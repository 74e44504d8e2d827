//! `tracing` subscriber setup.
//!
//! - CLI subcommands log to stderr (`warn`, or `info` with `--verbose`)
//! - the dashboard owns the terminal, so it logs to a daily file under the
//!   configured log directory instead
//!
//! `RUST_LOG` always takes precedence over the default level.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_NAME: &str = "travel.log";

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Level used for CLI runs.
pub fn cli_level(verbose: bool) -> &'static str {
    if verbose { "info" } else { "warn" }
}

/// Log to stderr. Safe to call more than once; later calls are no-ops.
pub fn init_cli(verbose: bool) {
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(env_filter(cli_level(verbose)));

    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
}

/// Log to `<log_dir>/travel.log.<date>`.
///
/// The returned guard flushes buffered lines on drop and must be held for the
/// lifetime of the dashboard.
pub fn init_file(log_dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("info"));

    let _ = tracing_subscriber::registry().with(file_layer).try_init();
    guard
}
