//! Token limits shared by construction-time and setter validation.

/// Maximum length of the token display name (bytes)
pub const MAX_NAME_LENGTH: usize = 64;

/// Maximum length of the token symbol/ticker (bytes)
pub const MAX_SYMBOL_LENGTH: usize = 12;

/// Maximum decimal places
pub const MAX_DECIMALS: u8 = 18;
