use alpen_oracle_codec::{Address, U256};

/// Addresses the dispatcher routes on. Loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownAddresses {
    /// Announces the dapp's own address.
    pub relay: Address,
    pub ether_portal: Address,
    pub erc20_portal: Address,
    pub erc721_portal: Address,
    /// Only source of evidence submissions.
    pub trusted_verifier_sender: Address,
    /// Dapp address to use until the relay announces one.
    pub voucher_destination: Option<Address>,
}

/// Reward paid out as `contract.increaseAllowance(recipient, amount)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardConfig {
    pub contract: Address,
    pub recipient: Address,
    pub amount: U256,
}
