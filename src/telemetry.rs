//! Logging setup for the server binary.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name prefix of the rolling log files
const LOG_FILE_PREFIX: &str = "taxi-service.log";

/// The filter used when `RUST_LOG` is not set
pub fn default_filter(debug: bool) -> String {
    let level = if debug { "debug" } else { "info" };
    format!("taxi_service={level},taxi_server={level},tower_http={level},warn")
}

/// Installs the global tracing subscriber.
///
/// Logs go to stdout, as JSON if `json` is set, and additionally to a daily
/// rolling file in `log_dir`. The returned guard flushes the file writer
/// and must be held until shutdown.
pub fn init_tracing(debug: bool, json: bool, log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer().with_target(true)))
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
