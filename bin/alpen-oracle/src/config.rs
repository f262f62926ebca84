use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alpen_oracle_codec::{parse_address, U256};
use alpen_oracle_common::{
    logging::{LogFormat, LoggingConfig},
    retry::RetryConfig,
};
use alpen_oracle_engine::{CompliancePolicy, RewardConfig};
use alpen_oracle_perception::DetectorConfig;
use serde::Deserialize;

use crate::{
    args::{Args, EnvArgs},
    errors::InitError,
};

pub(crate) const DEFAULT_ROLLUP_URL: &str = "http://127.0.0.1:5004";
pub(crate) const DEFAULT_NETWORK: &str = "localhost";
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 30;

/// REST model server hosting the detection model.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ModelServerConfig {
    pub url: String,
    pub model_name: String,
    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,
    /// Readiness probing at startup.
    #[serde(default)]
    pub startup_retry: RetryConfig,
}

fn default_model_timeout() -> u64 {
    DEFAULT_MODEL_TIMEOUT_SECS
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ClassifierConfig {
    /// JSON file with the fitted envelope parameters.
    pub params_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RewardSection {
    pub contract: String,
    pub recipient: String,
    /// Decimal or `0x` hex.
    pub amount: String,
}

impl RewardSection {
    pub(crate) fn to_reward_config(&self) -> Result<RewardConfig, InitError> {
        Ok(RewardConfig {
            contract: parse_address(&self.contract)?,
            recipient: parse_address(&self.recipient)?,
            amount: U256::from_str(self.amount.trim())
                .map_err(|_| InitError::InvalidAmount(self.amount.clone()))?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Config {
    pub rollup_http_server_url: Option<String>,
    pub network: Option<String>,
    pub networks_file: PathBuf,
    /// Long-poll timeout for rollup server requests; unset waits forever.
    pub http_timeout_secs: Option<u64>,
    #[serde(default)]
    pub compliance_policy: CompliancePolicy,
    #[serde(default)]
    pub detector: DetectorConfig,
    pub model_server: ModelServerConfig,
    pub classifier: ClassifierConfig,
    pub reward: RewardSection,
    /// Backoff after failed `finish` calls.
    #[serde(default)]
    pub finish_retry: RetryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub(crate) fn from_toml_str(text: &str) -> Result<Self, InitError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads the config file and applies env and CLI overrides, in that
    /// order of precedence (CLI wins).
    pub(crate) fn load(args: &Args, env: &EnvArgs) -> Result<Self, InitError> {
        let text = fs::read_to_string(&args.config)?;
        let mut config = Self::from_toml_str(&text)?;
        if let Some(dir) = args.config.parent() {
            config.resolve_paths(dir);
        }
        config.apply_overrides(args, env);
        Ok(config)
    }

    /// Makes relative file paths relative to the config file's directory.
    fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.networks_file, &mut self.classifier.params_path] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    fn apply_overrides(&mut self, args: &Args, env: &EnvArgs) {
        if let Some(url) = args.rollup_url.clone().or_else(|| env.rollup_http_server_url.clone()) {
            self.rollup_http_server_url = Some(url);
        }
        if let Some(network) = args.network.clone().or_else(|| env.network.clone()) {
            self.network = Some(network);
        }
        if let Some(path) = &args.networks_file {
            self.networks_file = path.clone();
        }
        if let Some(label) = &env.service_label {
            self.logging.service_label = Some(label.clone());
        }
        if let Some(dir) = &env.log_dir {
            self.logging.log_dir = Some(dir.clone());
        }
        if let Some(json) = env.log_json {
            self.logging.format = LogFormat::from_json_flag(json);
        }
    }

    pub(crate) fn rollup_url(&self) -> &str {
        self.rollup_http_server_url
            .as_deref()
            .unwrap_or(DEFAULT_ROLLUP_URL)
    }

    pub(crate) fn network(&self) -> &str {
        self.network.as_deref().unwrap_or(DEFAULT_NETWORK)
    }
}
