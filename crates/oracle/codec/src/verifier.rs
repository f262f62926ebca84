use std::str;

use alloy_primitives::Selector;

use crate::errors::{CodecError, CodecResult};

/// Length of an ABI function selector.
pub const SELECTOR_LEN: usize = 4;

/// Call submitted by the verifier contract: a selector followed by UTF-8
/// real-world data, usually JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifierPayload<'a> {
    pub selector: Selector,
    data: &'a [u8],
}

impl<'a> VerifierPayload<'a> {
    /// The bytes after the selector, decoded as UTF-8.
    pub fn real_world_data(&self) -> CodecResult<&'a str> {
        str::from_utf8(self.data).map_err(|e| CodecError::InvalidEncoding(e.to_string()))
    }
}

/// Splits off the selector. The remainder is only decoded on demand, so the
/// selector can be checked first.
pub fn decode_verifier_input(bytes: &[u8]) -> CodecResult<VerifierPayload<'_>> {
    if bytes.len() < SELECTOR_LEN {
        return Err(CodecError::MalformedVerifierInput(bytes.len()));
    }
    let (selector, data) = bytes.split_at(SELECTOR_LEN);
    Ok(VerifierPayload {
        selector: Selector::from_slice(selector),
        data,
    })
}
