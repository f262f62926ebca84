//! Per-network address table.
//!
//! ```json
//! { "localhost": { "DAPP_RELAY_ADDRESS": "0x…", "ETHER_PORTAL_ADDRESS": "0x…", … } }
//! ```

use std::{collections::BTreeMap, fs, path::Path};

use alpen_oracle_codec::{parse_address, CodecResult};
use alpen_oracle_engine::KnownAddresses;
use serde::Deserialize;
use tracing::*;

use crate::errors::InitError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) struct NetworkEntry {
    pub dapp_relay_address: String,
    pub ether_portal_address: String,
    pub erc20_portal_address: String,
    pub erc721_portal_address: String,
    pub verifier_sender_address: String,
    /// Known dapp address, if deployed before the relay runs.
    #[serde(default)]
    pub dapp_address: Option<String>,
}

impl NetworkEntry {
    pub(crate) fn to_known_addresses(&self) -> CodecResult<KnownAddresses> {
        Ok(KnownAddresses {
            relay: parse_address(&self.dapp_relay_address)?,
            ether_portal: parse_address(&self.ether_portal_address)?,
            erc20_portal: parse_address(&self.erc20_portal_address)?,
            erc721_portal: parse_address(&self.erc721_portal_address)?,
            trusted_verifier_sender: parse_address(&self.verifier_sender_address)?,
            voucher_destination: self
                .dapp_address
                .as_deref()
                .map(parse_address)
                .transpose()?,
        })
    }
}

pub(crate) type NetworkTable = BTreeMap<String, NetworkEntry>;

pub(crate) fn parse_known_addresses(text: &str, network: &str) -> Result<KnownAddresses, InitError> {
    let table: NetworkTable = serde_json::from_str(text)?;
    let entry = table
        .get(network)
        .ok_or_else(|| InitError::UnknownNetwork(network.to_owned()))?;
    Ok(entry.to_known_addresses()?)
}

pub(crate) fn load_known_addresses(path: &Path, network: &str) -> Result<KnownAddresses, InitError> {
    debug!(?path, %network, "loading network addresses");
    let text = fs::read_to_string(path)?;
    parse_known_addresses(&text, network)
}
