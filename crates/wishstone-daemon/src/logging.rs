//! Tracing setup.
//!
//! Two sinks: the console at the configured level (`RUST_LOG` wins), and a
//! daily file `logs/wishstone.YYYY-MM-DD.log` under the data directory that
//! always records everything at debug. Generated key material is only
//! logged at debug, so the file is where an operator finds it.

use std::path::{Path, PathBuf};

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Directive applied to the log file regardless of the console level.
const FILE_DIRECTIVE: &str = "wishstone=debug";

/// Log file name prefix.
pub const LOG_FILE_PREFIX: &str = "wishstone";

/// Directory holding the daily log files.
pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// Build the console + file subscriber without installing it.
///
/// The returned guard flushes the file writer when dropped; keep it alive
/// for as long as logging should reach the file.
pub fn subscriber(
    console_level: &str,
    log_dir: &Path,
) -> anyhow::Result<(impl Subscriber + Send + Sync + 'static, WorkerGuard)> {
    std::fs::create_dir_all(log_dir)?;

    let console_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("wishstone={console_level}")))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(log_dir)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().with_filter(console_filter))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer)
                .with_filter(EnvFilter::try_new(FILE_DIRECTIVE)?),
        );

    Ok((subscriber, guard))
}

/// Install the subscriber globally.
pub fn init(console_level: &str, data_dir: &Path) -> anyhow::Result<WorkerGuard> {
    let (subscriber, guard) = subscriber(console_level, &log_dir(data_dir))?;
    subscriber.try_init()?;
    Ok(guard)
}
