use std::{env, path::PathBuf};

use argh::FromArgs;

/// Settings overridable by environment.
#[derive(Debug, Clone, Default)]
pub(crate) struct EnvArgs {
    /// Rollup HTTP server, as exported by the rollup node.
    pub rollup_http_server_url: Option<String>,
    /// Network entry to load from the networks file.
    pub network: Option<String>,
    /// Service label to include in service name
    pub service_label: Option<String>,
    /// Directory for rolling log files
    pub log_dir: Option<PathBuf>,
    /// Log as JSON instead of compact text
    pub log_json: Option<bool>,
}

impl EnvArgs {
    pub(crate) fn from_env() -> Self {
        Self {
            rollup_http_server_url: env::var("ROLLUP_HTTP_SERVER_URL").ok(),
            network: env::var("NETWORK").ok(),
            service_label: env::var("ALPEN_ORACLE_SVC_LABEL").ok(),
            log_dir: env::var("ALPEN_ORACLE_LOG_DIR").ok().map(PathBuf::from),
            log_json: env::var("ALPEN_ORACLE_LOG_JSON")
                .ok()
                .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes")),
        }
    }
}

#[derive(Debug, Clone, FromArgs)]
#[argh(description = "Alpen rollup oracle verifier")]
pub(crate) struct Args {
    #[argh(option, short = 'c', description = "path to the TOML config file")]
    pub config: PathBuf,

    #[argh(
        option,
        short = 'n',
        description = "network entry to load from the networks file"
    )]
    pub network: Option<String>,

    #[argh(option, short = 'u', description = "rollup HTTP server URL")]
    pub rollup_url: Option<String>,

    #[argh(option, description = "path to the networks JSON file")]
    pub networks_file: Option<PathBuf>,
}
