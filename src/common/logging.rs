//! Logging and tracing configuration
//!
//! The CLI logs to stderr so report output on stdout stays clean; an
//! optional file layer keeps a full-detail copy of a run.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::paths;

/// Initialize tracing for the CLI
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// Default level is INFO for this crate, WARN for dependencies.
/// With `log_to_file`, a copy goes to `<data dir>/logs/tiercheck.log`.
pub fn init(log_to_file: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tiercheck=info,warn"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    if log_to_file {
        if let Some(log_dir) = paths::log_dir() {
            if std::fs::create_dir_all(&log_dir).is_ok() {
                let file_layer = fmt::layer()
                    .with_writer(tracing_appender::rolling::never(&log_dir, "tiercheck.log"))
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true);

                tracing_subscriber::registry()
                    .with(filter)
                    .with(stderr_layer)
                    .with(file_layer)
                    .init();
                return;
            }
        }
        eprintln!("Warning: could not create log directory, logging to stderr only");
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();
}
