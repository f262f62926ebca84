//! Error types for initialization and configuration.

use std::io;

use alpen_oracle_codec::CodecError;
use alpen_oracle_perception::PerceptionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum InitError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("config: {0}")]
    MalformedConfig(#[from] toml::de::Error),

    #[error("unparsable networks file: {0}")]
    MalformedNetworks(#[from] serde_json::Error),

    #[error("network '{0}' not found in networks file")]
    UnknownNetwork(String),

    #[error("address: {0}")]
    InvalidAddress(#[from] CodecError),

    #[error("invalid reward amount '{0}'")]
    InvalidAmount(String),

    /// Also covers a model server that never became ready.
    #[error("perception: {0}")]
    Perception(#[from] PerceptionError),

    #[error("http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
