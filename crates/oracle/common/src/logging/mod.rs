//! Logging subsystem: stdout plus an optional rolling log file.

pub mod manager;
pub mod types;


pub use manager::{build_env_filter, init};
pub use types::{FileSink, LogFormat, LogRotation, LoggerConfig, LoggingConfig};

/// Formats a service name with an optional label suffix.
pub fn format_service_name(base: &str, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("{base}%{label}"),
        None => base.to_owned(),
    }
}
