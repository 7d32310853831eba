//! Deterministic fixtures for contract tests.
//!
//! Accounts are plain byte-pattern addresses: tests never need key
//! material, only distinct identities with stable values across runs.

use flextoken_common::address::Address;
use flextoken_common::token::{TokenContract, TokenError, TokenMetadata};

/// Named set of deterministic test accounts
pub struct TestAccounts {
    pub owner: Address,
    pub alice: Address,
    pub bob: Address,
    pub carol: Address,
}

impl TestAccounts {
    pub fn new() -> Self {
        TestAccounts {
            owner: test_address(1),
            alice: test_address(2),
            bob: test_address(3),
            carol: test_address(4),
        }
    }

    /// All accounts, owner first
    pub fn all(&self) -> [&Address; 4] {
        [&self.owner, &self.alice, &self.bob, &self.carol]
    }
}

impl Default for TestAccounts {
    fn default() -> Self {
        Self::new()
    }
}

/// Address filled with a single seed byte
pub fn test_address(seed: u8) -> Address {
    Address::new([seed; 32])
}

/// Deploy a token with standard test metadata and the given supply
pub fn deploy_token(owner: &Address, initial_supply: u64) -> Result<TokenContract, TokenError> {
    log::debug!("deploying test token, supply {} to {}", initial_supply, owner);
    TokenContract::new(
        TokenMetadata::new("Flexible Token".into(), "FLX".into(), 10)?,
        owner.clone(),
        initial_supply,
    )
}

/// Assert the ledger's core invariant: the balance table sums to the
/// recorded total supply.
pub fn assert_supply_invariant(contract: &TokenContract) {
    assert_eq!(
        contract.ledger.balance_sum(),
        contract.total_supply(),
        "sum of balances diverged from total supply"
    );
}
