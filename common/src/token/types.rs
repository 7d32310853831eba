//! Token State Types
//!
//! Capability structs composed by value inside the contract state. Each one
//! owns a single concern (metadata, ledger tables, ownership handshake) and
//! is mutated only through the entry points in `contract.rs`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::constants::{MAX_DECIMALS, MAX_NAME_LENGTH, MAX_SYMBOL_LENGTH};
use super::error::TokenError;
use crate::address::Address;
use crate::serializer::{Reader, ReaderError, Serializer, Writer};

/// Display metadata, mutable only by the owner while the contract is unlocked
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Token display name
    pub name: String,
    /// Token symbol/ticker
    pub symbol: String,
    /// Decimal places (0-18)
    pub decimals: u8,
}

impl TokenMetadata {
    pub fn new(name: String, symbol: String, decimals: u8) -> Result<Self, TokenError> {
        validate_name(&name)?;
        validate_symbol(&symbol)?;
        if decimals > MAX_DECIMALS {
            return Err(TokenError::DecimalsTooHigh);
        }
        Ok(TokenMetadata {
            name,
            symbol,
            decimals,
        })
    }
}

pub fn validate_name(name: &str) -> Result<(), TokenError> {
    if name.is_empty() {
        return Err(TokenError::NameEmpty);
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(TokenError::NameTooLong);
    }
    Ok(())
}

pub fn validate_symbol(symbol: &str) -> Result<(), TokenError> {
    if symbol.is_empty() {
        return Err(TokenError::SymbolEmpty);
    }
    if symbol.len() > MAX_SYMBOL_LENGTH {
        return Err(TokenError::SymbolTooLong);
    }
    Ok(())
}

impl Serializer for TokenMetadata {
    fn write(&self, writer: &mut Writer) {
        self.name.write(writer);
        self.symbol.write(writer);
        self.decimals.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(TokenMetadata {
            name: reader.read()?,
            symbol: reader.read()?,
            decimals: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        self.name.size() + self.symbol.size() + 1
    }
}

/// Composite allowance key. A flat (owner, spender) pair instead of a
/// map-of-maps, so lookups never have to materialize an inner table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AllowanceKey {
    pub owner: Address,
    pub spender: Address,
}

impl AllowanceKey {
    pub fn new(owner: Address, spender: Address) -> Self {
        AllowanceKey { owner, spender }
    }
}

impl Serializer for AllowanceKey {
    fn write(&self, writer: &mut Writer) {
        self.owner.write(writer);
        self.spender.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(AllowanceKey {
            owner: reader.read()?,
            spender: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        self.owner.size() + self.spender.size()
    }
}

/// Balance and allowance tables plus the recorded total supply.
///
/// Invariant: the sum of all balance entries equals `total_supply` in every
/// reachable state. Entries are created on first credit and never removed,
/// a zero balance stays present as a zero entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    balances: IndexMap<Address, u64>,
    // Composite keys cannot be JSON object keys, serialize as entry pairs
    #[serde(with = "indexmap::map::serde_seq")]
    allowances: IndexMap<AllowanceKey, u64>,
    total_supply: u64,
}

impl LedgerState {
    /// Genesis ledger: the full initial supply credited to a single account
    pub fn new(owner: Address, initial_supply: u64) -> Self {
        let mut balances = IndexMap::new();
        balances.insert(owner, initial_supply);
        LedgerState {
            balances,
            allowances: IndexMap::new(),
            total_supply: initial_supply,
        }
    }

    /// Balance of an account, absent entries read as zero
    #[inline]
    pub fn balance_of(&self, account: &Address) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Remaining allowance granted by `owner` to `spender`, absent reads as zero
    #[inline]
    pub fn allowance_of(&self, owner: &Address, spender: &Address) -> u64 {
        self.allowances
            .get(&AllowanceKey::new(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    #[inline]
    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// Sum of every balance entry. Equals `total_supply()` in every
    /// reachable state; exposed so callers can audit the invariant.
    pub fn balance_sum(&self) -> u64 {
        self.balances.values().sum()
    }

    pub fn set_balance(&mut self, account: Address, amount: u64) {
        self.balances.insert(account, amount);
    }

    /// Overwrite (not add to) an allowance entry
    pub fn set_allowance(&mut self, owner: Address, spender: Address, amount: u64) {
        self.allowances
            .insert(AllowanceKey::new(owner, spender), amount);
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &u64)> {
        self.balances.iter()
    }
}

impl Serializer for LedgerState {
    fn write(&self, writer: &mut Writer) {
        writer.write_u16(&(self.balances.len() as u16));
        for (account, amount) in &self.balances {
            account.write(writer);
            amount.write(writer);
        }
        writer.write_u16(&(self.allowances.len() as u16));
        for (key, amount) in &self.allowances {
            key.write(writer);
            amount.write(writer);
        }
        self.total_supply.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let balance_count = reader.read_u16()? as usize;
        let mut balances = IndexMap::with_capacity(balance_count);
        for _ in 0..balance_count {
            let account = reader.read()?;
            let amount = reader.read()?;
            balances.insert(account, amount);
        }

        let allowance_count = reader.read_u16()? as usize;
        let mut allowances = IndexMap::with_capacity(allowance_count);
        for _ in 0..allowance_count {
            let key = reader.read()?;
            let amount = reader.read()?;
            allowances.insert(key, amount);
        }

        let total_supply = reader.read()?;
        Ok(LedgerState {
            balances,
            allowances,
            total_supply,
        })
    }

    fn size(&self) -> usize {
        2 + self
            .balances
            .iter()
            .map(|(account, amount)| account.size() + amount.size())
            .sum::<usize>()
            + 2
            + self
                .allowances
                .iter()
                .map(|(key, amount)| key.size() + amount.size())
                .sum::<usize>()
            + 8
    }
}

/// Two-step ownership handshake state.
///
/// `Stable` (no pending owner) moves to `Pending` only via
/// `transfer_ownership`, and back only via `accept_ownership` from the
/// designated address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipState {
    pub owner: Address,
    pub pending_owner: Option<Address>,
}

impl OwnershipState {
    pub fn new(owner: Address) -> Self {
        OwnershipState {
            owner,
            pending_owner: None,
        }
    }

    #[inline]
    pub fn is_owner(&self, account: &Address) -> bool {
        self.owner == *account
    }
}

impl Serializer for OwnershipState {
    fn write(&self, writer: &mut Writer) {
        self.owner.write(writer);
        self.pending_owner.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(OwnershipState {
            owner: reader.read()?,
            pending_owner: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        self.owner.size() + self.pending_owner.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(seed: u8) -> Address {
        Address::new([seed; 32])
    }

    #[test]
    fn metadata_validation() {
        assert!(TokenMetadata::new("Token".into(), "TOK".into(), 8).is_ok());
        assert_eq!(
            TokenMetadata::new("".into(), "TOK".into(), 8),
            Err(TokenError::NameEmpty)
        );
        assert_eq!(
            TokenMetadata::new("Token".into(), "VERYLONGSYMBOL".into(), 8),
            Err(TokenError::SymbolTooLong)
        );
        assert_eq!(
            TokenMetadata::new("Token".into(), "TOK".into(), 19),
            Err(TokenError::DecimalsTooHigh)
        );
    }

    #[test]
    fn genesis_credits_owner() {
        let ledger = LedgerState::new(addr(1), 40);
        assert_eq!(ledger.balance_of(&addr(1)), 40);
        assert_eq!(ledger.total_supply(), 40);
        assert_eq!(ledger.balance_sum(), 40);
    }

    #[test]
    fn absent_entries_read_as_zero() {
        let ledger = LedgerState::new(addr(1), 40);
        assert_eq!(ledger.balance_of(&addr(2)), 0);
        assert_eq!(ledger.allowance_of(&addr(1), &addr(2)), 0);
    }

    #[test]
    fn ledger_codec_roundtrip() {
        let mut ledger = LedgerState::new(addr(1), 100);
        ledger.set_balance(addr(2), 25);
        ledger.set_allowance(addr(1), addr(3), 10);

        let encoded = Serializer::to_bytes(&ledger);
        let decoded = LedgerState::from_bytes(&encoded).unwrap();
        assert_eq!(ledger, decoded);
    }
}
