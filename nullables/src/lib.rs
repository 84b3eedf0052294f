//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the aggregators (clock, token contracts, vote
//! hub, tally service) sits behind a trait. This crate provides in-memory
//! implementations that:
//! - Return configured values
//! - Can fail or stall on demand
//! - Record what they were asked
//! - Never touch the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod balance;
pub mod clock;
pub mod hub;
pub mod listener;

pub use balance::NullBalanceSource;
pub use clock::NullClock;
pub use hub::{fixture_proposal, NullHub, NullTally};
pub use listener::RecordingListener;
