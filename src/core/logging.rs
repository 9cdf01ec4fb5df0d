use crate::shared::paths::{ensure_dir, get_log_dir};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Keeps the non-blocking log writer alive; drop it last.
pub struct LoggingGuards {
    _guards: Vec<WorkerGuard>,
}

/// Installs the global subscriber writing to `<data_dir>/logs/daylist.log`.
///
/// `RUST_LOG` wins over `default_level`.
pub fn init_logging(data_dir: &Path, default_level: &str) -> std::io::Result<LoggingGuards> {
    let log_dir = get_log_dir(data_dir);
    ensure_dir(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "daylist.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        // Already installed (tests, embedding); keep the existing one.
        return Ok(LoggingGuards {
            _guards: vec![guard],
        });
    }

    tracing::info!(target: "system", "Logging initialized at {:?}", log_dir);

    Ok(LoggingGuards {
        _guards: vec![guard],
    })
}

/// Like [`init_logging`], but a log directory that cannot be created only
/// costs file logging: the failure goes to stderr and startup continues.
pub fn init_logging_or_warn(data_dir: &Path, default_level: &str) -> Option<LoggingGuards> {
    match init_logging(data_dir, default_level) {
        Ok(guards) => Some(guards),
        Err(e) => {
            eprintln!(
                "warning: file logging disabled, cannot create {:?}: {}",
                get_log_dir(data_dir),
                e
            );
            None
        }
    }
}
