//! File logging setup
//!
//! Standard output belongs to command results, so logs go to a JSON-lines file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "RELEASE_TRACKER_LOG";

/// Install the global subscriber writing to `log_path`
///
/// Keep the returned guard alive until exit; dropping it flushes pending lines.
pub fn init(log_path: &Path) -> anyhow::Result<WorkerGuard> {
    let directory = log_path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = log_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid log path: {:?}", log_path))?;
    std::fs::create_dir_all(directory)?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_writer(writer).with_ansi(false))
        .try_init()?;

    tracing::info!("Logging initialized, writing to {}", log_path.display());
    Ok(guard)
}
