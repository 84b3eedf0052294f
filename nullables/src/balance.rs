//! Nullable token contract returning canned balances, failures and stalls.

use async_trait::async_trait;
use govdash_balance::{BalanceError, BalanceSource};
use govdash_types::{TokenBalance, WalletAddress};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

type Outcome = Result<TokenBalance, String>;

/// An in-memory balance source.
///
/// Answers every owner with a default outcome unless a per-owner outcome was
/// set. Lookups for a held owner wait until the returned [`Notify`] fires.
pub struct NullBalanceSource {
    label: String,
    default: Outcome,
    per_owner: Mutex<HashMap<WalletAddress, Outcome>>,
    holds: Mutex<HashMap<WalletAddress, Arc<Notify>>>,
    calls: AtomicUsize,
}

impl NullBalanceSource {
    fn with_default(label: &str, default: Outcome) -> Self {
        Self {
            label: label.to_string(),
            default,
            per_owner: Mutex::new(HashMap::new()),
            holds: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every lookup returns `balance`.
    pub fn returning(label: &str, balance: impl Into<TokenBalance>) -> Self {
        Self::with_default(label, Ok(balance.into()))
    }

    /// Every lookup fails with an RPC error carrying `message`.
    pub fn failing(label: &str, message: &str) -> Self {
        Self::with_default(label, Err(message.to_string()))
    }

    pub fn set_balance(&self, owner: &WalletAddress, balance: impl Into<TokenBalance>) {
        self.per_owner
            .lock()
            .unwrap()
            .insert(owner.clone(), Ok(balance.into()));
    }

    /// Stall lookups for `owner` until the returned handle is notified.
    pub fn hold(&self, owner: &WalletAddress) -> Arc<Notify> {
        self.holds
            .lock()
            .unwrap()
            .entry(owner.clone())
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    /// Number of `balance_of` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalanceSource for NullBalanceSource {
    fn label(&self) -> &str {
        &self.label
    }

    async fn balance_of(&self, owner: &WalletAddress) -> Result<TokenBalance, BalanceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let hold = self.holds.lock().unwrap().get(owner).cloned();
        if let Some(hold) = hold {
            hold.notified().await;
        }

        let outcome = self
            .per_owner
            .lock()
            .unwrap()
            .get(owner)
            .cloned()
            .unwrap_or_else(|| self.default.clone());
        outcome.map_err(BalanceError::Rpc)
    }
}
