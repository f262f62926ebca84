//! Wire codec for the rollup oracle.
//!
//! Decodes the fixed-layout payloads the portals and the verifier contract
//! send into the rollup, and encodes outbound vouchers as ABI calls.

mod convert;
mod deposit;
mod errors;
mod selector;
mod template;
mod verifier;
mod voucher;

pub use convert::*;
pub use deposit::*;
pub use errors::*;
pub use selector::*;
pub use template::*;
pub use verifier::*;
pub use voucher::*;

pub use alloy_dyn_abi::{DynSolType, DynSolValue};
pub use alloy_primitives::{Address, Bytes, Selector, U256};
