//! Token Contract State and Entry Points
//!
//! One concrete contract state composed of the capability structs from
//! `types.rs`, with every entry point implemented as a free function over a
//! mutable reference.
//!
//! Entry points are phased: every guard and every piece of checked
//! arithmetic runs before the first write, so a failed call leaves the
//! state untouched and callers get all-or-nothing semantics without an
//! explicit journal.

use serde::{Deserialize, Serialize};

use super::error::TokenError;
use super::types::{validate_name, validate_symbol, LedgerState, OwnershipState, TokenMetadata};
use crate::address::Address;
use crate::serializer::{Reader, ReaderError, Serializer, Writer};
use crate::token::constants::MAX_DECIMALS;

/// Complete persisted state of one token contract instance
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenContract {
    pub metadata: TokenMetadata,
    pub ledger: LedgerState,
    pub ownership: OwnershipState,
    /// While true, balance- and metadata-mutating calls from anyone but the
    /// owner are rejected
    pub locked: bool,
}

impl TokenContract {
    /// Deploy-time construction: validates metadata and credits the whole
    /// initial supply to the owner. The contract starts unlocked with no
    /// pending owner.
    pub fn new(
        metadata: TokenMetadata,
        owner: Address,
        initial_supply: u64,
    ) -> Result<Self, TokenError> {
        validate_name(&metadata.name)?;
        validate_symbol(&metadata.symbol)?;
        if metadata.decimals > MAX_DECIMALS {
            return Err(TokenError::DecimalsTooHigh);
        }

        Ok(TokenContract {
            metadata,
            ledger: LedgerState::new(owner.clone(), initial_supply),
            ownership: OwnershipState::new(owner),
            locked: false,
        })
    }

    // ===== Views (pure, side-effect free) =====

    #[inline]
    pub fn total_supply(&self) -> u64 {
        self.ledger.total_supply()
    }

    #[inline]
    pub fn balance_of(&self, account: &Address) -> u64 {
        self.ledger.balance_of(account)
    }

    #[inline]
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u64 {
        self.ledger.allowance_of(owner, spender)
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[inline]
    pub fn owner(&self) -> &Address {
        &self.ownership.owner
    }

    #[inline]
    pub fn pending_owner(&self) -> Option<&Address> {
        self.ownership.pending_owner.as_ref()
    }
}

impl Serializer for TokenContract {
    fn write(&self, writer: &mut Writer) {
        self.metadata.write(writer);
        self.ledger.write(writer);
        self.ownership.write(writer);
        self.locked.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(TokenContract {
            metadata: reader.read()?,
            ledger: reader.read()?,
            ownership: reader.read()?,
            locked: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        self.metadata.size() + self.ledger.size() + self.ownership.size() + 1
    }
}

/// Move `tokens` from the caller to `destination`.
///
/// Allowed for the owner at any time, for everyone else only while the
/// contract is unlocked. The destination entry is created at zero first if
/// absent.
pub fn transfer(
    contract: &mut TokenContract,
    caller: &Address,
    destination: &Address,
    tokens: u64,
) -> Result<(), TokenError> {
    if contract.locked && !contract.ownership.is_owner(caller) {
        return Err(TokenError::ContractLocked);
    }

    let have = contract.ledger.balance_of(caller);
    let new_source = have
        .checked_sub(tokens)
        .ok_or(TokenError::InsufficientBalance { need: tokens, have })?;

    // Self-transfers must observe the debited entry, not the pre-state
    let destination_balance = if destination == caller {
        new_source
    } else {
        contract.ledger.balance_of(destination)
    };
    let new_destination = destination_balance
        .checked_add(tokens)
        .ok_or(TokenError::BalanceOverflow)?;

    contract.ledger.set_balance(caller.clone(), new_source);
    contract
        .ledger
        .set_balance(destination.clone(), new_destination);
    Ok(())
}

/// Set (overwrite, never add to) the caller's allowance for `spender`
pub fn approve(
    contract: &mut TokenContract,
    caller: &Address,
    spender: &Address,
    tokens: u64,
) -> Result<(), TokenError> {
    contract
        .ledger
        .set_allowance(caller.clone(), spender.clone(), tokens);
    Ok(())
}

/// Move `tokens` out of `from` into `to` on behalf of the caller.
///
/// Authorization paths, checked in order: the caller is the owner; or the
/// contract is unlocked and the caller is `from` itself; or the contract is
/// unlocked and the caller holds a sufficient allowance from `from`. Only
/// the allowance path consumes allowance.
pub fn transfer_from(
    contract: &mut TokenContract,
    caller: &Address,
    from: &Address,
    to: &Address,
    tokens: u64,
) -> Result<(), TokenError> {
    let mut spend_allowance = false;
    if !contract.ownership.is_owner(caller) {
        if contract.locked {
            return Err(TokenError::ContractLocked);
        }
        if caller != from {
            let have = contract.ledger.allowance_of(from, caller);
            if have < tokens {
                return Err(TokenError::InsufficientAllowance { need: tokens, have });
            }
            spend_allowance = true;
        }
    }

    let from_balance = contract.ledger.balance_of(from);
    let new_from = from_balance
        .checked_sub(tokens)
        .ok_or(TokenError::InsufficientBalance {
            need: tokens,
            have: from_balance,
        })?;

    let to_balance = if to == from {
        new_from
    } else {
        contract.ledger.balance_of(to)
    };
    let new_to = to_balance
        .checked_add(tokens)
        .ok_or(TokenError::BalanceOverflow)?;

    let new_allowance = if spend_allowance {
        let have = contract.ledger.allowance_of(from, caller);
        Some(
            have.checked_sub(tokens)
                .ok_or(TokenError::InsufficientAllowance { need: tokens, have })?,
        )
    } else {
        None
    };

    contract.ledger.set_balance(from.clone(), new_from);
    contract.ledger.set_balance(to.clone(), new_to);
    if let Some(remaining) = new_allowance {
        contract
            .ledger
            .set_allowance(from.clone(), caller.clone(), remaining);
    }
    Ok(())
}

/// Freeze all non-owner mutations. Owner only, rejected if already locked.
pub fn lock(contract: &mut TokenContract, caller: &Address) -> Result<(), TokenError> {
    if !contract.ownership.is_owner(caller) {
        return Err(TokenError::Unauthorized);
    }
    if contract.locked {
        return Err(TokenError::InvalidState);
    }
    contract.locked = true;
    Ok(())
}

/// Lift the freeze. Owner only, rejected if not locked.
pub fn unlock(contract: &mut TokenContract, caller: &Address) -> Result<(), TokenError> {
    if !contract.ownership.is_owner(caller) {
        return Err(TokenError::Unauthorized);
    }
    if !contract.locked {
        return Err(TokenError::InvalidState);
    }
    contract.locked = false;
    Ok(())
}

/// Overwrite the token symbol. Owner only, unlocked only.
pub fn set_symbol(
    contract: &mut TokenContract,
    caller: &Address,
    symbol: String,
) -> Result<(), TokenError> {
    if !contract.ownership.is_owner(caller) {
        return Err(TokenError::Unauthorized);
    }
    if contract.locked {
        return Err(TokenError::ContractLocked);
    }
    validate_symbol(&symbol)?;
    contract.metadata.symbol = symbol;
    Ok(())
}

/// Overwrite the token display name. Owner only, unlocked only.
pub fn set_name(
    contract: &mut TokenContract,
    caller: &Address,
    name: String,
) -> Result<(), TokenError> {
    if !contract.ownership.is_owner(caller) {
        return Err(TokenError::Unauthorized);
    }
    if contract.locked {
        return Err(TokenError::ContractLocked);
    }
    validate_name(&name)?;
    contract.metadata.name = name;
    Ok(())
}

/// Designate (or re-designate) a pending owner. Does not change the
/// effective owner; re-invoking overwrites the previous designation.
pub fn transfer_ownership(
    contract: &mut TokenContract,
    caller: &Address,
    new_owner: Address,
) -> Result<(), TokenError> {
    if !contract.ownership.is_owner(caller) {
        return Err(TokenError::Unauthorized);
    }
    contract.ownership.pending_owner = Some(new_owner);
    Ok(())
}

/// Complete the handshake: only the designated pending owner may accept,
/// after which it becomes the owner and the designation is cleared.
pub fn accept_ownership(contract: &mut TokenContract, caller: &Address) -> Result<(), TokenError> {
    match contract.ownership.pending_owner.as_ref() {
        None => Err(TokenError::NoPendingOwner),
        Some(pending) if pending != caller => Err(TokenError::Unauthorized),
        Some(_) => {
            contract.ownership.owner = caller.clone();
            contract.ownership.pending_owner = None;
            Ok(())
        }
    }
}
