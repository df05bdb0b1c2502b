//! # Conducta Logging Infrastructure
//!
//! Structured logging for every Conducta binary.
//! Wraps `tracing-subscriber` with JSON, pretty and compact output, an
//! optional rolling log file, and environment-based overrides.

pub mod config;
pub mod macros;
pub mod request_id;

pub use config::{LogFormat, LoggingConfig};
pub use request_id::{RequestId, REQUEST_ID_HEADER};
// Re-export tracing macros
pub use tracing::{debug, error, info, trace, warn};
pub use tracing_appender::non_blocking::WorkerGuard;

/// Error returned when the global subscriber cannot be installed.
pub type InitError = tracing::subscriber::SetGlobalDefaultError;

/// Initialize the logging system.
///
/// # Arguments
///
/// * `level` - Log filter directive (`info`, `debug`, `conducta=debug,sqlx=warn`)
/// * `format` - Output format (json, pretty, compact)
/// * `log_file` - Optional path to a log file rotated hourly
///
/// # Returns
///
/// The file writer guard when a log file is configured. It must be held for
/// the lifetime of the process or buffered lines are lost.
pub fn init(level: &str, format: &str, log_file: Option<&str>) -> Result<Option<WorkerGuard>, InitError> {
    init_with_config(LoggingConfig::from_env(level, format, log_file))
}

/// Initialize logging with a custom configuration.
pub fn init_with_config(config: LoggingConfig) -> Result<Option<WorkerGuard>, InitError> {
    let (subscriber, guard) = config.build();
    tracing::subscriber::set_global_default(subscriber)?;
    info!(
        level = %config.level,
        format = %config.format,
        environment = %config.environment,
        log_file = ?config.log_file,
        "Logging initialized"
    );
    Ok(guard)
}
