//! Fan out one wallet lookup to every configured token source and reduce the
//! answers to a single [`BalancePair`].

use futures_util::future::try_join_all;
use govdash_types::{TokenBalance, WalletAddress};
use std::sync::Arc;
use tokio::sync::watch;

use crate::error::BalanceError;
use crate::pair::BalancePair;
use crate::source::BalanceSource;

/// Receives "spinner" notifications. Carries no data.
pub trait LoadListener: Send + Sync {
    fn load_started(&self) {}
    fn load_completed(&self) {}
}

impl LoadListener for () {}

/// The last published balance lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceState {
    /// Address of the lookup this state belongs to.
    pub address: Option<WalletAddress>,
    pub pair: BalancePair,
    pub loading: bool,
    /// Bumped by every `aggregate` call. Results are only published while
    /// their request still holds the latest generation.
    pub generation: u64,
}

/// Aggregates one primary-token balance and the sum of all staked-token
/// balances for a wallet.
pub struct BalanceAggregator {
    primary: Arc<dyn BalanceSource>,
    staked: Vec<Arc<dyn BalanceSource>>,
    listener: Arc<dyn LoadListener>,
    state: watch::Sender<BalanceState>,
}

impl BalanceAggregator {
    pub fn new(
        primary: Arc<dyn BalanceSource>,
        staked: Vec<Arc<dyn BalanceSource>>,
    ) -> Result<Self, BalanceError> {
        if staked.is_empty() {
            return Err(BalanceError::NoStakedSources);
        }
        let (state, _) = watch::channel(BalanceState::default());
        Ok(Self {
            primary,
            staked,
            listener: Arc::new(()),
            state,
        })
    }

    pub fn with_listener(mut self, listener: Arc<dyn LoadListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Watch published balance states.
    pub fn subscribe(&self) -> watch::Receiver<BalanceState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> BalanceState {
        self.state.borrow().clone()
    }

    /// Query every source for `owner` concurrently. All-or-none: the first
    /// failing source fails the whole lookup.
    pub async fn query(&self, owner: &WalletAddress) -> Result<BalancePair, BalanceError> {
        let primary = labelled_balance(self.primary.as_ref(), owner);
        let staked = try_join_all(
            self.staked
                .iter()
                .map(|source| labelled_balance(source.as_ref(), owner)),
        );
        let (primary, staked) = tokio::try_join!(primary, staked)?;

        let staked = staked
            .into_iter()
            .fold(None, |acc: Option<TokenBalance>, balance| {
                Some(match acc {
                    None => balance,
                    Some(sum) => sum + balance,
                })
            })
            .ok_or(BalanceError::NoStakedSources)?;

        Ok(BalancePair::loaded(primary, staked))
    }

    /// Look up balances for user input and publish the outcome.
    ///
    /// Blank input resets the state to absent without touching the network.
    /// Failures are logged and published as absent. Returns `None` when a
    /// newer call superseded this one before it finished; its result is
    /// dropped.
    pub async fn aggregate(&self, address: Option<&str>) -> Option<BalancePair> {
        let Some(owner) = WalletAddress::parse_optional(address) else {
            self.state.send_modify(|s| {
                *s = BalanceState {
                    generation: s.generation + 1,
                    ..BalanceState::default()
                };
            });
            return Some(BalancePair::absent());
        };

        let mut generation = 0;
        self.state.send_modify(|s| {
            generation = s.generation + 1;
            *s = BalanceState {
                address: Some(owner.clone()),
                pair: BalancePair::absent(),
                loading: true,
                generation,
            };
        });
        self.listener.load_started();
        tracing::debug!(address = %owner, generation, "balance lookup started");

        let pair = match self.query(&owner).await {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(address = %owner, error = %e, "balance lookup failed");
                BalancePair::absent()
            }
        };

        let published = self.state.send_if_modified(|s| {
            if s.generation != generation {
                return false;
            }
            s.pair = pair.clone();
            s.loading = false;
            true
        });

        if !published {
            tracing::debug!(address = %owner, generation, "discarding superseded balance result");
            return None;
        }
        self.listener.load_completed();
        Some(pair)
    }
}

/// `source.balance_of`, with any error tagged by the source's label.
async fn labelled_balance(
    source: &dyn BalanceSource,
    owner: &WalletAddress,
) -> Result<TokenBalance, BalanceError> {
    source
        .balance_of(owner)
        .await
        .map_err(|error| BalanceError::Source {
            label: source.label().to_string(),
            error: Box::new(error),
        })
}
