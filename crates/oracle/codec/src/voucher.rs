//! Outbound vouchers: ABI-encoded calls replayed on the base chain.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, Bytes, Selector, U256};

use crate::{
    convert::hex_encode,
    errors::{CodecError, CodecResult},
    selector::SelectorRegistry,
    verifier::SELECTOR_LEN,
};

/// A contract call to be executed on the base chain once the epoch settles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Voucher {
    destination: Address,
    payload: Bytes,
}

impl Voucher {
    pub fn destination(&self) -> Address {
        self.destination
    }

    /// Selector followed by the ABI-encoded arguments.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn selector(&self) -> Selector {
        Selector::from_slice(&self.payload[..SELECTOR_LEN])
    }

    /// ABI-encoded arguments without the selector.
    pub fn args(&self) -> &[u8] {
        &self.payload[SELECTOR_LEN..]
    }

    /// Hex form used on the wire.
    pub fn payload_hex(&self) -> String {
        hex_encode(&self.payload)
    }
}

/// Encodes `values` as the parameters of a call with `selector`.
///
/// Every value must match its declared type, including integer width.
pub fn encode_voucher(
    selector: Selector,
    arg_types: &[DynSolType],
    arg_values: Vec<DynSolValue>,
    destination: Address,
) -> CodecResult<Voucher> {
    if arg_types.len() != arg_values.len() {
        return Err(CodecError::EncodingMismatch(format!(
            "expected {} arguments, got {}",
            arg_types.len(),
            arg_values.len()
        )));
    }
    for (idx, (ty, value)) in arg_types.iter().zip(&arg_values).enumerate() {
        check_value(ty, value)
            .map_err(|reason| CodecError::EncodingMismatch(format!("argument {idx}: {reason}")))?;
    }

    let encoded = DynSolValue::Tuple(arg_values).abi_encode_params();
    let mut payload = Vec::with_capacity(SELECTOR_LEN + encoded.len());
    payload.extend_from_slice(selector.as_slice());
    payload.extend_from_slice(&encoded);

    Ok(Voucher {
        destination,
        payload: payload.into(),
    })
}

fn check_value(ty: &DynSolType, value: &DynSolValue) -> Result<(), String> {
    if !ty.matches(value) {
        return Err(format!("value does not match type {}", ty.sol_type_name()));
    }
    check_width(value)
}

fn check_width(value: &DynSolValue) -> Result<(), String> {
    match value {
        DynSolValue::Uint(v, bits) if v.bit_len() > *bits => {
            Err(format!("{v} does not fit in uint{bits}"))
        }
        DynSolValue::Int(v, bits) if !int_fits(v.into_raw(), *bits) => {
            Err(format!("{v} does not fit in int{bits}"))
        }
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            items.iter().try_for_each(check_width)
        }
        _ => Ok(()),
    }
}

/// Two's complement `raw` fits `bits` iff everything above the sign bit is a
/// copy of it.
fn int_fits(raw: U256, bits: usize) -> bool {
    if bits == 0 || bits >= 256 {
        return true;
    }
    let high = raw >> (bits - 1);
    high.is_zero() || high == U256::MAX >> (bits - 1)
}

fn address_uint_args() -> [DynSolType; 2] {
    [DynSolType::Address, DynSolType::Uint(256)]
}

/// `token.transfer(receiver, amount)`
pub fn erc20_transfer_voucher(
    selectors: &SelectorRegistry,
    token: Address,
    receiver: Address,
    amount: U256,
) -> CodecResult<Voucher> {
    encode_voucher(
        selectors.erc20_transfer(),
        &address_uint_args(),
        vec![DynSolValue::Address(receiver), DynSolValue::Uint(amount, 256)],
        token,
    )
}

/// `token.safeTransferFrom(from, receiver, token_id)`
pub fn erc721_safe_transfer_voucher(
    selectors: &SelectorRegistry,
    token: Address,
    from: Address,
    receiver: Address,
    token_id: U256,
) -> CodecResult<Voucher> {
    encode_voucher(
        selectors.erc721_safe_transfer(),
        &[DynSolType::Address, DynSolType::Address, DynSolType::Uint(256)],
        vec![
            DynSolValue::Address(from),
            DynSolValue::Address(receiver),
            DynSolValue::Uint(token_id, 256),
        ],
        token,
    )
}

/// `dapp.withdrawEther(receiver, amount)`
pub fn ether_withdrawal_voucher(
    selectors: &SelectorRegistry,
    dapp: Address,
    receiver: Address,
    amount: U256,
) -> CodecResult<Voucher> {
    encode_voucher(
        selectors.ether_withdrawal(),
        &address_uint_args(),
        vec![DynSolValue::Address(receiver), DynSolValue::Uint(amount, 256)],
        dapp,
    )
}

/// `contract.increaseAllowance(recipient, amount)`
pub fn reward_voucher(
    selectors: &SelectorRegistry,
    contract: Address,
    recipient: Address,
    amount: U256,
) -> CodecResult<Voucher> {
    encode_voucher(
        selectors.compliance_reward(),
        &address_uint_args(),
        vec![DynSolValue::Address(recipient), DynSolValue::Uint(amount, 256)],
        contract,
    )
}
