//! Logging configuration: the `[logging]` config table and the resolved
//! settings handed to [`super::init`].

use std::path::PathBuf;

use serde::Deserialize;
use tracing::Level;
use tracing_appender::rolling::Rotation;

use super::format_service_name;

/// Line format of a log sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

/// How often the log file rolls over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Minutely => Rotation::MINUTELY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

/// The `[logging]` table of the oracle config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Appended to the service name, e.g. "prod" or "dev".
    pub service_label: Option<String>,

    pub format: LogFormat,

    /// Enables the rolling file sink.
    pub log_dir: Option<PathBuf>,

    /// Log file name prefix, the service name when unset.
    pub log_file_prefix: Option<String>,

    pub rotation: LogRotation,
}

impl LoggingConfig {
    /// Resolves the table into settings for `service`.
    pub fn to_logger_config(&self, service: &str) -> LoggerConfig {
        let service_name = format_service_name(service, self.service_label.as_deref());
        let file = self.log_dir.as_ref().map(|dir| FileSink {
            directory: dir.clone(),
            file_name_prefix: self
                .log_file_prefix
                .clone()
                .unwrap_or_else(|| service.to_owned()),
            rotation: self.rotation,
            format: self.format,
        });

        LoggerConfig {
            service_name,
            default_level: Level::INFO,
            format: self.format,
            file,
        }
    }
}

/// Rolling log file, written without ANSI colors.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSink {
    pub directory: PathBuf,
    /// "alpen-oracle" rolls to "alpen-oracle.2026-10-19" and so on.
    pub file_name_prefix: String,
    pub rotation: LogRotation,
    pub format: LogFormat,
}

/// Resolved logger settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerConfig {
    pub service_name: String,
    /// Used when `RUST_LOG` is unset.
    pub default_level: Level,
    /// Stdout format.
    pub format: LogFormat,
    pub file: Option<FileSink>,
}
