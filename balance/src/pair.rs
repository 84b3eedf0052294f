//! The reduced primary/staked balance pair and its derived figures.

use govdash_types::TokenBalance;
use serde::{Deserialize, Serialize};

/// Primary and staked balances for one wallet.
///
/// `None` means "not loaded yet", which is distinct from a zero balance.
/// Both fields are set together; a pair with only one side present is never
/// published by the aggregator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancePair {
    pub primary: Option<TokenBalance>,
    pub staked: Option<TokenBalance>,
}

impl BalancePair {
    /// The "nothing loaded" pair.
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn loaded(primary: TokenBalance, staked: TokenBalance) -> Self {
        Self {
            primary: Some(primary),
            staked: Some(staked),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.primary.is_some() && self.staked.is_some()
    }

    /// `primary + staked`, defined only when both are present.
    pub fn total(&self) -> Option<TokenBalance> {
        match (&self.primary, &self.staked) {
            (Some(primary), Some(staked)) => Some(primary + staked),
            _ => None,
        }
    }

    /// Share of the total that is staked, in percent (0.0 to 100.0).
    ///
    /// `None` when the pair is not loaded or the total is zero.
    pub fn staked_percent(&self) -> Option<f64> {
        let total = self.total()?;
        let staked = self.staked.as_ref()?;
        staked
            .basis_points_of(&total)
            .map(|bps| bps as f64 / 100.0)
    }

    /// [`staked_percent`](Self::staked_percent), with undefined treated as 0.
    pub fn display_percent(&self) -> f64 {
        self.staked_percent().unwrap_or(0.0)
    }
}
