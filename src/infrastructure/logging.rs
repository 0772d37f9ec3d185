//! Centralized file-based logging system
//!
//! Writes logs to files in logs/ directory, separated by log type:
//! - logs/main - General application logs (JSON)
//! - logs/error - Error and warning logs only
//! - logs/catalog - Cache and discovery logs

use std::fs;
use std::io;
use std::path::Path;
use tracing::Metadata;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

/// Log file kinds, one subdirectory each
pub const LOG_TYPES: [&str; 3] = ["main", "error", "catalog"];

/// Initialize console and file logging
///
/// Creates the log directories under `logs_dir` and installs the global
/// subscriber. `RUST_LOG` overrides the default `info` filter.
/// Returns WorkerGuards which must be kept alive for the duration of the program.
pub fn init_logging(logs_dir: &Path) -> io::Result<Vec<WorkerGuard>> {
    create_log_dirs(logs_dir)?;

    let mut guards = Vec::new();

    // Main log - all logs
    let (main_appender, main_guard) = create_appender(logs_dir, "main");
    guards.push(main_guard);

    // Error log - ERROR and WARN only
    let (error_appender, error_guard) = create_appender(logs_dir, "error");
    guards.push(error_guard);

    // Catalog log - cache and discovery
    let (catalog_appender, catalog_guard) = create_appender(logs_dir, "catalog");
    guards.push(catalog_guard);

    let main_layer = tracing_subscriber::fmt::layer()
        .with_writer(main_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json();

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(tracing_subscriber::filter::LevelFilter::WARN);

    let catalog_layer = tracing_subscriber::fmt::layer()
        .with_writer(catalog_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(tracing_subscriber::filter::filter_fn(is_catalog_event));

    // Console layer for development
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(main_layer)
        .with(error_layer)
        .with(catalog_layer)
        .with(console_layer)
        .init();

    tracing::info!("Logging system initialized. Log files in {}", logs_dir.display());

    Ok(guards)
}

fn create_log_dirs(logs_dir: &Path) -> io::Result<()> {
    for log_type in LOG_TYPES {
        fs::create_dir_all(logs_dir.join(log_type))?;
    }
    Ok(())
}

fn is_catalog_event(metadata: &Metadata<'_>) -> bool {
    is_catalog_target(metadata.target())
}

fn is_catalog_target(target: &str) -> bool {
    target.contains("cache") || target.contains("discovery")
}

/// Create a daily rolling file appender in `logs_dir/name`
fn create_appender(logs_dir: &Path, name: &str) -> (NonBlocking, WorkerGuard) {
    let appender = RollingFileAppender::new(Rotation::DAILY, logs_dir.join(name), name);

    tracing_appender::non_blocking(appender)
}

/// Log macro helpers for specific log types
#[macro_export]
macro_rules! log_cache {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "cache", $level, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_discovery {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "discovery", $level, $($arg)+)
    };
}
