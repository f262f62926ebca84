//! Subscriber setup.

use std::io;

use tracing::*;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{
    fmt::{layer, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use super::types::{LogFormat, LoggerConfig};

/// Filter honoring `RUST_LOG`, falling back to the configured level.
pub fn build_env_filter(config: &LoggerConfig) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(config.default_level.into())
        .from_env_lossy()
}

fn sink<S, W>(
    format: LogFormat,
    writer: W,
    ansi: bool,
    filter: EnvFilter,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = layer().with_writer(writer).with_ansi(ansi);
    match format {
        LogFormat::Compact => base.compact().with_filter(filter).boxed(),
        LogFormat::Json => base.json().with_filter(filter).boxed(),
    }
}

/// Installs the global subscriber: stdout, plus the rolling file when
/// configured. Panics if a global subscriber is already set.
pub fn init(config: LoggerConfig) {
    let filter = build_env_filter(&config);

    let stdout = sink(config.format, io::stdout, true, filter.clone());
    let file = config.file.as_ref().map(|f| {
        let appender =
            RollingFileAppender::new(f.rotation.into(), &f.directory, &f.file_name_prefix);
        sink(f.format, appender, false, filter.clone())
    });

    tracing_subscriber::registry()
        .with(stdout)
        .with(file)
        .init();

    info!(
        service_name = %config.service_name,
        format = ?config.format,
        log_dir = ?config.file.as_ref().map(|f| &f.directory),
        "logging initialized"
    );
}
