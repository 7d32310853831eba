//! Fungible Token Contract
//!
//! An ERC20-style ledger with an owner-controlled freeze switch:
//!
//! - Balance and allowance tables with checked arithmetic (a subtraction
//!   that would go below zero aborts the call, nothing wraps)
//! - Overwrite-style approvals and delegated transfers
//! - A lock flag rejecting every non-owner mutation while set
//! - A two-step ownership handshake (designate, then accept)
//!
//! Execution is transactional per call: each entry point validates every
//! guard before the first state write.

pub mod calls;
pub mod constants;
pub mod contract;
pub mod error;
pub mod types;

pub use calls::*;
pub use constants::*;
pub use contract::*;
pub use error::*;
pub use types::*;
