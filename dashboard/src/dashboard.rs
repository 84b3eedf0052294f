//! The dashboard orchestrator: one balance feed and one proposal feed.

use govdash_balance::{
    BalanceAggregator, BalancePair, BalanceSource, BalanceState, Erc20Balance, EthRpcClient,
};
use govdash_governance::{
    AggregatorSettings, HubClient, LinkExtractor, ProposalAggregator, ReducedProposal, TallyClient,
};
use govdash_types::{ProposalId, SystemClock, ValidationError, WalletAddress};
use std::sync::Arc;
use tokio::sync::watch;

use crate::config::DashboardConfig;
use crate::prefs::PreferenceStore;
use crate::DashboardError;

/// Published proposal list. `None` until the first successful load.
pub type ProposalFeed = Option<Arc<Vec<ReducedProposal>>>;

pub struct Dashboard {
    balances: BalanceAggregator,
    proposals: Option<ProposalAggregator>,
    feed: watch::Sender<ProposalFeed>,
    prefs: PreferenceStore,
}

impl Dashboard {
    /// Assemble a dashboard from already-built parts. `proposals` is `None`
    /// when no activation service is configured.
    pub fn new(
        balances: BalanceAggregator,
        proposals: Option<ProposalAggregator>,
        prefs: PreferenceStore,
    ) -> Self {
        let (feed, _) = watch::channel(None);
        Self {
            balances,
            proposals,
            feed,
            prefs,
        }
    }

    /// Build the real network clients described by `config`.
    pub fn from_config(config: &DashboardConfig) -> Result<Self, DashboardError> {
        config.validate()?;
        let timeout = config.request_timeout();

        let rpc = Arc::new(EthRpcClient::new(config.rpc_url.clone(), timeout)?);
        let primary: Arc<dyn BalanceSource> =
            Arc::new(Erc20Balance::new(Arc::clone(&rpc), &config.primary_token));
        let staked: Vec<Arc<dyn BalanceSource>> = config
            .staked_tokens
            .iter()
            .map(|token| Arc::new(Erc20Balance::new(Arc::clone(&rpc), token)) as Arc<dyn BalanceSource>)
            .collect();
        let balances = BalanceAggregator::new(primary, staked)?;

        let proposals = match config.tally_url() {
            Some(tally_url) => {
                let hub = HubClient::new(config.hub_url.clone(), config.space.clone(), timeout)?;
                let tally = TallyClient::new(tally_url, config.cors_proxy.as_deref(), timeout)?;
                let settings = AggregatorSettings {
                    name_prefix: config.name_prefix.clone(),
                    proposal_url_base: config.proposal_url_base.clone(),
                    links: LinkExtractor::new(&config.community_domain, &config.github_org)?,
                };
                Some(ProposalAggregator::new(
                    Arc::new(hub),
                    Arc::new(tally),
                    Arc::new(SystemClock),
                    settings,
                ))
            }
            None => {
                tracing::warn!("tally_url is not configured, proposals are unavailable");
                None
            }
        };

        tracing::info!(
            rpc_url = %config.rpc_url,
            staked_contracts = config.staked_tokens.len(),
            hub = %config.hub_url,
            space = %config.space,
            "dashboard configured"
        );
        Ok(Self::new(balances, proposals, PreferenceStore::new(&config.data_dir)))
    }

    /// Look up the saved default address, if any, and load proposals, both at
    /// once. Returns the default address that was used.
    ///
    /// Failures are logged; the corresponding feed stays empty.
    pub async fn start(&self) -> Option<WalletAddress> {
        let default = match self.prefs.default_address() {
            Ok(address) => address,
            Err(e) => {
                tracing::warn!(error = %e, "could not read saved default address");
                None
            }
        };

        let balance = async {
            if let Some(address) = &default {
                self.lookup_balance(Some(address.as_str())).await;
            }
        };
        let (_, proposals) = tokio::join!(balance, self.load_proposals());
        if let Err(e) = proposals {
            tracing::error!(error = %e, "proposal feed unavailable");
        }
        default
    }

    /// Balance lookup for user input. See [`BalanceAggregator::aggregate`].
    pub async fn lookup_balance(&self, address: Option<&str>) -> Option<BalancePair> {
        self.balances.aggregate(address).await
    }

    /// Run the proposal pipeline and publish its result.
    ///
    /// On failure the previously published list (or "no data yet") is kept.
    pub async fn load_proposals(&self) -> Result<Arc<Vec<ReducedProposal>>, DashboardError> {
        let aggregator = self
            .proposals
            .as_ref()
            .ok_or_else(|| {
                DashboardError::Config(
                    "tally_url is not configured; set it in the config file or GOVDASH_TALLY_URL"
                        .into(),
                )
            })?;

        let list = match aggregator.aggregate().await {
            Ok(list) => Arc::new(list),
            Err(e) => {
                tracing::warn!(error = %e, "proposal aggregation failed");
                return Err(e.into());
            }
        };
        self.feed.send_replace(Some(Arc::clone(&list)));
        Ok(list)
    }

    /// Last published proposal list.
    pub fn proposals(&self) -> ProposalFeed {
        self.feed.borrow().clone()
    }

    pub fn subscribe_proposals(&self) -> watch::Receiver<ProposalFeed> {
        self.feed.subscribe()
    }

    pub fn balances(&self) -> watch::Receiver<BalanceState> {
        self.balances.subscribe()
    }

    pub fn balance_state(&self) -> BalanceState {
        self.balances.state()
    }

    pub fn default_address(&self) -> Result<Option<WalletAddress>, DashboardError> {
        self.prefs.default_address()
    }

    /// Remember `address` for the next start. Blank input is rejected.
    pub fn save_default_address(&self, address: &str) -> Result<WalletAddress, DashboardError> {
        let address = WalletAddress::parse_optional(Some(address)).ok_or(
            ValidationError::MissingField {
                what: "default address",
                field: "address",
            },
        )?;
        self.prefs.set_default_address(address.clone())?;
        tracing::info!(%address, "default address saved");
        Ok(address)
    }

    pub fn clear_default_address(&self) -> Result<(), DashboardError> {
        self.prefs.clear_default_address()?;
        tracing::info!("default address cleared");
        Ok(())
    }

    /// Whether `address` voted on `proposal`, per the last published list.
    pub fn has_voted(&self, address: &str, proposal: &ProposalId) -> bool {
        let Some(address) = WalletAddress::parse_optional(Some(address)) else {
            return false;
        };
        self.feed
            .borrow()
            .as_ref()
            .and_then(|list| list.iter().find(|p| &p.id == proposal).map(|p| p.has_voted(&address)))
            .unwrap_or(false)
    }
}
