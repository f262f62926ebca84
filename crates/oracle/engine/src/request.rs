//! Requests and outputs exchanged with the rollup HTTP server.

use std::{borrow::Cow, fmt};

use alpen_oracle_codec::{hex_decode, hex_encode, parse_address, Address, Bytes, CodecResult, Voucher};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request_type", content = "data", rename_all = "snake_case")]
pub enum RollupRequest {
    AdvanceState(AdvanceRequest),
    InspectState(InspectRequest),
}

impl RollupRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            RollupRequest::AdvanceState(_) => "advance_state",
            RollupRequest::InspectState(_) => "inspect_state",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceRequest {
    pub metadata: AdvanceMetadata,
    /// `0x`-prefixed hex.
    pub payload: String,
}

impl AdvanceRequest {
    pub fn sender(&self) -> CodecResult<Address> {
        parse_address(&self.metadata.msg_sender)
    }

    pub fn payload_bytes(&self) -> CodecResult<Vec<u8>> {
        hex_decode(&self.payload)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceMetadata {
    pub msg_sender: String,
    #[serde(default)]
    pub epoch_index: u64,
    #[serde(default)]
    pub input_index: u64,
    #[serde(default)]
    pub block_number: u64,
    #[serde(default)]
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectRequest {
    /// `0x`-prefixed hex.
    pub payload: String,
}

/// Verifiable informational output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    payload: Bytes,
}

impl Notice {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(text.as_bytes().to_vec())
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

/// Diagnostic output without on-chain effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    payload: Bytes,
}

impl Report {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(text.as_bytes().to_vec())
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Voucher(Voucher),
    Notice(Notice),
    Report(Report),
}

impl Output {
    /// Server endpoint the output is posted to.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Output::Voucher(_) => "voucher",
            Output::Notice(_) => "notice",
            Output::Report(_) => "report",
        }
    }

    /// JSON body for [`Self::endpoint`].
    pub fn to_json(&self) -> Value {
        match self {
            Output::Voucher(v) => json!({
                "destination": v.destination().to_string().to_lowercase(),
                "payload": v.payload_hex(),
            }),
            Output::Notice(n) => json!({ "payload": hex_encode(n.payload()) }),
            Output::Report(r) => json!({ "payload": hex_encode(r.payload()) }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinishStatus {
    #[default]
    Accept,
    Reject,
}

impl fmt::Display for FinishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FinishStatus::Accept => "accept",
            FinishStatus::Reject => "reject",
        })
    }
}

/// What handling one request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: FinishStatus,
    outputs: Vec<Output>,
}

impl Response {
    pub fn accept(outputs: Vec<Output>) -> Self {
        Self {
            status: FinishStatus::Accept,
            outputs,
        }
    }

    pub fn reject(outputs: Vec<Output>) -> Self {
        Self {
            status: FinishStatus::Reject,
            outputs,
        }
    }

    pub fn status(&self) -> FinishStatus {
        self.status
    }

    /// Outputs in the order they are posted.
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }
}
