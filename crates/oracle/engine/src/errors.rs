use std::fmt::{Debug, Display};

use alpen_oracle_codec::{Address, CodecError, Selector, U256};
use alpen_oracle_perception::{PerceptionError, FEATURE_COUNT};
use thiserror::Error;

/// A generic "expected vs got" error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("(expected {expected}, got {got})")]
pub struct Mismatch<T>
where
    T: Debug + Display + Clone,
{
    /// The value that was expected.
    pub expected: T,
    /// The value that was actually encountered.
    pub got: T,
}

/// Reasons a rollup request is rejected.
///
/// These never stop the oracle; each becomes a report and a `reject`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("codec: {0}")]
    Codec(#[from] CodecError),

    #[error("perception: {0}")]
    Perception(#[from] PerceptionError),

    /// The sender is not one of the known addresses.
    #[error("unrecognized sender {0}")]
    UnknownSender(Address),

    /// Verifier call targets a function other than the evidence entrypoint.
    #[error("verifier selector mismatch {0}")]
    SelectorMismatch(Mismatch<Selector>),

    /// The evidence image contains no detected objects.
    #[error("evidence image yielded no detections")]
    NoDetections,

    /// The sensor reading falls outside the learned inlier region.
    #[error("sensor reading {features:?} is an outlier")]
    OutlierReading { features: [f64; FEATURE_COUNT] },

    /// A refund needs the dapp address but the relay has not announced it.
    #[error("dapp address unknown, no relay input received yet")]
    DappAddressUnknown,

    /// The portal reported that pulling the tokens into the dapp failed.
    #[error("erc20 deposit of {amount} from {depositor} on token {token} was not transferred")]
    DepositTransferFailed {
        token: Address,
        depositor: Address,
        amount: U256,
    },
}

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Failures talking to the rollup HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("http: {0}")]
    Http(String),

    #[error("unexpected http status {0}")]
    UnexpectedStatus(u16),

    /// The server answered with a body that is not a rollup request.
    #[error("malformed rollup request: {0}")]
    MalformedRequest(String),
}
