//! Hex and text conversions used at the rollup HTTP boundary.

use alloy_primitives::Address;

use crate::errors::{CodecError, CodecResult};

/// Length of an EVM address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Encodes bytes as `0x`-prefixed lowercase hex.
pub fn hex_encode(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decodes hex text, with or without a `0x` prefix.
pub fn hex_decode(text: &str) -> CodecResult<Vec<u8>> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    hex::decode(digits).map_err(|e| CodecError::InvalidHex(e.to_string()))
}

/// Hex-encodes the UTF-8 bytes of `text`.
pub fn str_to_hex(text: &str) -> String {
    hex_encode(text.as_bytes())
}

/// Decodes hex text and interprets the bytes as UTF-8.
pub fn hex_to_str(text: &str) -> CodecResult<String> {
    let bytes = hex_decode(text)?;
    String::from_utf8(bytes).map_err(|e| CodecError::InvalidEncoding(e.utf8_error().to_string()))
}

/// Interprets exactly 20 bytes as an address.
pub fn decode_address(bytes: &[u8]) -> CodecResult<Address> {
    if bytes.len() != ADDRESS_LEN {
        return Err(CodecError::MalformedAddress(bytes.len()));
    }
    Ok(Address::from_slice(bytes))
}

/// Parses a hex address. Case is ignored, checksums are not enforced.
pub fn parse_address(text: &str) -> CodecResult<Address> {
    decode_address(&hex_decode(text.trim())?)
}
