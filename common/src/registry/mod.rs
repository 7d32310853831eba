//! Access Registry Contract
//!
//! Record-keyed bookkeeping for organizations and datasource access
//! requests: who published which datasource, who asked whom for access to
//! which scope, and the token handed over on grant.

pub mod calls;
pub mod contract;
pub mod error;
pub mod types;

pub use calls::*;
pub use contract::*;
pub use error::*;
pub use types::*;
