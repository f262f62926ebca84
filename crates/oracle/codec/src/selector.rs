//! Function selectors for every call the oracle emits or accepts.

use alloy_primitives::{keccak256, Selector};
use alloy_sol_types::{sol, SolCall};

sol! {
    /// ERC-20 refund of a portal deposit.
    function transfer(address to, uint256 amount);

    /// ERC-721 refund of a portal deposit.
    function safeTransferFrom(address from, address to, uint256 tokenId);

    /// Ether refund through the dapp contract.
    function withdrawEther(address receiver, uint256 value);

    /// Evidence submission from the verifier contract.
    function verifyRealWorldState(string realWorldData);

    /// Reward paid out once evidence is accepted.
    function increaseAllowance(address spender, uint256 addedValue);
}

/// Derives the selector of a canonical function signature such as
/// `transfer(address,uint256)`.
pub fn selector_for(signature: &str) -> Selector {
    Selector::from_slice(&keccak256(signature.as_bytes())[..4])
}

/// Selectors computed once at startup and shared read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorRegistry {
    erc20_transfer: Selector,
    erc721_safe_transfer: Selector,
    ether_withdrawal: Selector,
    verifier: Selector,
    compliance_reward: Selector,
}

impl SelectorRegistry {
    pub fn new() -> Self {
        Self {
            erc20_transfer: selector_for(transferCall::SIGNATURE),
            erc721_safe_transfer: selector_for(safeTransferFromCall::SIGNATURE),
            ether_withdrawal: selector_for(withdrawEtherCall::SIGNATURE),
            verifier: selector_for(verifyRealWorldStateCall::SIGNATURE),
            compliance_reward: selector_for(increaseAllowanceCall::SIGNATURE),
        }
    }

    pub fn erc20_transfer(&self) -> Selector {
        self.erc20_transfer
    }

    pub fn erc721_safe_transfer(&self) -> Selector {
        self.erc721_safe_transfer
    }

    pub fn ether_withdrawal(&self) -> Selector {
        self.ether_withdrawal
    }

    /// Selector the verifier contract must use for evidence submissions.
    pub fn verifier(&self) -> Selector {
        self.verifier
    }

    pub fn compliance_reward(&self) -> Selector {
        self.compliance_reward
    }
}

impl Default for SelectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
