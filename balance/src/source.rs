//! The read-only balance capability every token contract offers.

use async_trait::async_trait;
use govdash_types::{TokenBalance, WalletAddress};

use crate::error::BalanceError;

/// Something that can answer `balanceOf(owner)` for one token.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Short name used in logs and errors (usually the contract address).
    fn label(&self) -> &str;

    async fn balance_of(&self, owner: &WalletAddress) -> Result<TokenBalance, BalanceError>;
}
