//! Portal deposit payloads.
//!
//! Each portal packs its deposit as fixed-width fields followed by an opaque
//! data blob forwarded verbatim by the depositor. Offsets are dictated by the
//! portal contracts and must match byte for byte.

use std::fmt;

use alloy_primitives::{Address, Bytes, U256};

use crate::errors::{CodecError, CodecResult};

const ADDR: usize = 20;
const WORD: usize = 32;

/// `depositor(20) | amount(32)`
pub const ETHER_DEPOSIT_HEADER_LEN: usize = ADDR + WORD;

/// `success(1) | token(20) | depositor(20) | amount(32)`
pub const ERC20_DEPOSIT_HEADER_LEN: usize = 1 + ADDR + ADDR + WORD;

/// `token(20) | depositor(20) | token_id(32)`
pub const ERC721_DEPOSIT_HEADER_LEN: usize = ADDR + ADDR + WORD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepositKind {
    Ether,
    Erc20,
    Erc721,
}

impl DepositKind {
    pub fn header_len(&self) -> usize {
        match self {
            DepositKind::Ether => ETHER_DEPOSIT_HEADER_LEN,
            DepositKind::Erc20 => ERC20_DEPOSIT_HEADER_LEN,
            DepositKind::Erc721 => ERC721_DEPOSIT_HEADER_LEN,
        }
    }
}

impl fmt::Display for DepositKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DepositKind::Ether => "ether",
            DepositKind::Erc20 => "erc20",
            DepositKind::Erc721 => "erc721",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtherDeposit {
    pub depositor: Address,
    pub amount: U256,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Erc20Deposit {
    /// Whether the portal's `transferFrom` into the dapp succeeded.
    pub success: bool,
    pub token: Address,
    pub depositor: Address,
    pub amount: U256,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Erc721Deposit {
    pub token: Address,
    pub depositor: Address,
    pub token_id: U256,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositPayload {
    Ether(EtherDeposit),
    Erc20(Erc20Deposit),
    Erc721(Erc721Deposit),
}

impl DepositPayload {
    pub fn kind(&self) -> DepositKind {
        match self {
            DepositPayload::Ether(_) => DepositKind::Ether,
            DepositPayload::Erc20(_) => DepositKind::Erc20,
            DepositPayload::Erc721(_) => DepositKind::Erc721,
        }
    }

    pub fn depositor(&self) -> Address {
        match self {
            DepositPayload::Ether(d) => d.depositor,
            DepositPayload::Erc20(d) => d.depositor,
            DepositPayload::Erc721(d) => d.depositor,
        }
    }
}

/// Decodes a deposit of the given kind.
pub fn decode_deposit(kind: DepositKind, bytes: &[u8]) -> CodecResult<DepositPayload> {
    Ok(match kind {
        DepositKind::Ether => DepositPayload::Ether(decode_ether_deposit(bytes)?),
        DepositKind::Erc20 => DepositPayload::Erc20(decode_erc20_deposit(bytes)?),
        DepositKind::Erc721 => DepositPayload::Erc721(decode_erc721_deposit(bytes)?),
    })
}

pub fn decode_ether_deposit(bytes: &[u8]) -> CodecResult<EtherDeposit> {
    check_header(DepositKind::Ether, bytes)?;
    Ok(EtherDeposit {
        depositor: read_address(bytes, 0),
        amount: read_uint(bytes, ADDR),
        data: trailing_data(bytes, ETHER_DEPOSIT_HEADER_LEN),
    })
}

pub fn decode_erc20_deposit(bytes: &[u8]) -> CodecResult<Erc20Deposit> {
    check_header(DepositKind::Erc20, bytes)?;
    Ok(Erc20Deposit {
        success: bytes[0] != 0,
        token: read_address(bytes, 1),
        depositor: read_address(bytes, 1 + ADDR),
        amount: read_uint(bytes, 1 + 2 * ADDR),
        data: trailing_data(bytes, ERC20_DEPOSIT_HEADER_LEN),
    })
}

pub fn decode_erc721_deposit(bytes: &[u8]) -> CodecResult<Erc721Deposit> {
    check_header(DepositKind::Erc721, bytes)?;
    Ok(Erc721Deposit {
        token: read_address(bytes, 0),
        depositor: read_address(bytes, ADDR),
        token_id: read_uint(bytes, 2 * ADDR),
        data: trailing_data(bytes, ERC721_DEPOSIT_HEADER_LEN),
    })
}

fn check_header(kind: DepositKind, bytes: &[u8]) -> CodecResult<()> {
    let expected = kind.header_len();
    if bytes.len() < expected {
        return Err(CodecError::MalformedDeposit {
            kind,
            expected,
            got: bytes.len(),
        });
    }
    Ok(())
}

// Callers check the header length first.
fn read_address(bytes: &[u8], offset: usize) -> Address {
    Address::from_slice(&bytes[offset..offset + ADDR])
}

fn read_uint(bytes: &[u8], offset: usize) -> U256 {
    U256::from_be_slice(&bytes[offset..offset + WORD])
}

fn trailing_data(bytes: &[u8], header_len: usize) -> Bytes {
    Bytes::copy_from_slice(&bytes[header_len..])
}
