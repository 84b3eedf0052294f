//! Token balance aggregation for the governance dashboard.
//!
//! Looks up one primary-token balance and any number of staked-token balances
//! for a wallet, all concurrently, and reduces them to a single
//! [`BalancePair`]. Sources sit behind the [`BalanceSource`] trait; the real
//! implementation calls ERC-20 `balanceOf` through a shared, read-only
//! JSON-RPC client.

pub mod aggregator;
pub mod display;
pub mod error;
pub mod pair;
pub mod rpc;
pub mod source;

pub use aggregator::{BalanceAggregator, BalanceState, LoadListener};
pub use display::{format_amount, format_percent};
pub use error::BalanceError;
pub use pair::BalancePair;
pub use rpc::{Erc20Balance, EthRpcClient};
pub use source::BalanceSource;
