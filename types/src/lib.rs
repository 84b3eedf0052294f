//! Fundamental types for the governance dashboard.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, token balances, proposal ids, timestamps and the validation error
//! raised when an upstream payload has the wrong shape.

pub mod address;
pub mod amount;
pub mod error;
pub mod hash;
pub mod time;

pub use address::WalletAddress;
pub use amount::TokenBalance;
pub use error::ValidationError;
pub use hash::ProposalId;
pub use time::{Clock, SystemClock, Timestamp};
