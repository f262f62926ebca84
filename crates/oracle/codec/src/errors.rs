use thiserror::Error;

use crate::{deposit::DepositKind, verifier::SELECTOR_LEN};

/// Errors raised while decoding rollup payloads or encoding vouchers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Deposit payload is shorter than its fixed header.
    #[error("malformed {kind} deposit: expected at least {expected} bytes, got {got} bytes")]
    MalformedDeposit {
        kind: DepositKind,
        expected: usize,
        got: usize,
    },

    /// Verifier payload is too short to carry a function selector.
    #[error("malformed verifier input: expected at least {SELECTOR_LEN} bytes, got {0} bytes")]
    MalformedVerifierInput(usize),

    /// Address payload is not exactly 20 bytes.
    #[error("malformed address: expected 20 bytes, got {0} bytes")]
    MalformedAddress(usize),

    /// Text is not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Bytes are not valid UTF-8.
    #[error("invalid utf-8: {0}")]
    InvalidEncoding(String),

    /// Voucher arguments do not match their declared ABI types.
    #[error("abi encoding mismatch: {0}")]
    EncodingMismatch(String),

    /// Voucher template is incomplete or cannot be resolved.
    #[error("invalid voucher template: {0}")]
    InvalidTemplate(String),
}

pub type CodecResult<T> = Result<T, CodecError>;
