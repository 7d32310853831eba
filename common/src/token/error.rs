use thiserror::Error;

/// Call-aborting failures of the token contract.
///
/// Every failed call is atomic: the typed reason is surfaced to the caller
/// and no state written by the call survives.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Caller is not authorized for this operation")]
    Unauthorized,

    #[error("Contract is locked")]
    ContractLocked,

    #[error("Insufficient balance: need {need}, have {have}")]
    InsufficientBalance { need: u64, have: u64 },

    #[error("Insufficient allowance: need {need}, have {have}")]
    InsufficientAllowance { need: u64, have: u64 },

    #[error("Contract is already in the requested state")]
    InvalidState,

    #[error("No pending owner is set")]
    NoPendingOwner,

    #[error("Balance overflow")]
    BalanceOverflow,

    #[error("Name cannot be empty")]
    NameEmpty,

    #[error("Name too long")]
    NameTooLong,

    #[error("Symbol cannot be empty")]
    SymbolEmpty,

    #[error("Symbol too long")]
    SymbolTooLong,

    #[error("Decimals too high")]
    DecimalsTooHigh,
}
