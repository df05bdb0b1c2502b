//! # Logging Configuration
//!
//! Configuration for the logging subsystem.
//! Supports environment variables and programmatic configuration.

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt as sub_fmt, prelude::*, EnvFilter, Registry};

/// Boxed subscriber produced by [`LoggingConfig::build`].
pub type BoxedSubscriber = Box<dyn tracing::Subscriber + Send + Sync>;

/// Console output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
        }
    }
}

/// Logging configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Filter directive (debug, info, warn, error, or a full `EnvFilter` string)
    #[serde(default = "default_level")]
    pub level:       String,

    /// Output format
    #[serde(default)]
    pub format:      LogFormat,

    /// Optional log file path, written as JSON
    #[serde(default)]
    pub log_file:    Option<String>,

    /// Environment (development, testing, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_level() -> String { "info".to_string() }

fn default_environment() -> String { "development".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level:       default_level(),
            format:      LogFormat::default(),
            log_file:    None,
            environment: default_environment(),
        }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables.
    ///
    /// `RUST_LOG`, `CONDUCTA_LOG_FORMAT`, `CONDUCTA_LOG_FILE` and `CONDUCTA_ENV`
    /// take precedence over the arguments. An unknown format falls back to JSON.
    pub fn from_env(level: &str, format: &str, log_file: Option<&str>) -> Self {
        let format = std::env::var("CONDUCTA_LOG_FORMAT")
            .ok()
            .unwrap_or_else(|| format.to_string());

        Self {
            level:       std::env::var("RUST_LOG")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| level.to_string()),
            format:      format.parse().unwrap_or_default(),
            log_file:    std::env::var("CONDUCTA_LOG_FILE")
                .ok()
                .or(log_file.map(|s| s.to_string())),
            environment: std::env::var("CONDUCTA_ENV").unwrap_or_else(|_| default_environment()),
        }
    }

    /// Parse the level into a filter, falling back to `info`.
    pub fn filter(&self) -> EnvFilter { EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info")) }

    /// Build the tracing subscriber from this configuration.
    ///
    /// Returns the file writer guard when a log file is configured.
    pub fn build(&self) -> (BoxedSubscriber, Option<WorkerGuard>) {
        let (file_layer, guard) = match self.log_file.as_deref() {
            Some(path) => {
                let path = Path::new(path);
                let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "conducta.log".to_string());
                let appender = tracing_appender::rolling::hourly(dir, name);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (
                    Some(sub_fmt::layer().json().with_writer(writer)),
                    Some(guard),
                )
            },
            None => (None, None),
        };

        let registry = Registry::default().with(self.filter()).with(file_layer);
        let timer = sub_fmt::time::UtcTime::rfc_3339();

        let subscriber: BoxedSubscriber = match self.format {
            LogFormat::Json => Box::new(registry.with(sub_fmt::layer().json().with_timer(timer))),
            LogFormat::Pretty => Box::new(registry.with(sub_fmt::layer().pretty().with_timer(timer))),
            LogFormat::Compact => Box::new(registry.with(sub_fmt::layer().compact().with_timer(timer))),
        };

        (subscriber, guard)
    }
}
