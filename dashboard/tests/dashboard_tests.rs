//! Dashboard orchestration over nullable balance sources, hub and tally service.

use std::sync::Arc;

use govdash_balance::{BalanceAggregator, BalancePair, BalanceSource};
use govdash_dashboard::{Dashboard, DashboardConfig, DashboardError, PreferenceStore};
use govdash_governance::{
    ActivationSource, AggregatorSettings, LinkExtractor, ProposalAggregator, SnapshotHub, Vote,
};
use govdash_nullables::{fixture_proposal, NullBalanceSource, NullClock, NullHub, NullTally};
use govdash_types::{Clock, ProposalId, TokenBalance, WalletAddress};

const ALICE: &str = "0x00000000000000000000000000000000000a11ce";

struct Fixture {
    primary: Arc<NullBalanceSource>,
    hub: Arc<NullHub>,
    tally: Arc<NullTally>,
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let hub = Arc::new(NullHub::new());
        hub.add_proposal(fixture_proposal("Qm1", "AIP-1", 0, 100));
        hub.add_vote(Vote {
            voter: WalletAddress::new(ALICE),
            proposal_id: ProposalId::new("Qm1"),
            choice: 1,
        });
        Self {
            primary: Arc::new(NullBalanceSource::returning("primary", 40u64)),
            hub,
            tally: Arc::new(NullTally::new()),
            dir: tempfile::tempdir().expect("temp dir"),
        }
    }

    fn dashboard(&self, with_proposals: bool) -> Dashboard {
        let staked: Vec<Arc<dyn BalanceSource>> =
            vec![Arc::new(NullBalanceSource::returning("staked", 60u64))];
        let balances = BalanceAggregator::new(
            Arc::clone(&self.primary) as Arc<dyn BalanceSource>,
            staked,
        )
        .unwrap();

        let proposals = with_proposals.then(|| {
            ProposalAggregator::new(
                Arc::clone(&self.hub) as Arc<dyn SnapshotHub>,
                Arc::clone(&self.tally) as Arc<dyn ActivationSource>,
                Arc::new(NullClock::new(50)) as Arc<dyn Clock>,
                AggregatorSettings {
                    name_prefix: "AIP".into(),
                    proposal_url_base: "https://snapshot.page/#/vote.airswap.eth/proposal/".into(),
                    links: LinkExtractor::new("community.airswap.io", "airswap").unwrap(),
                },
            )
        });

        Dashboard::new(balances, proposals, PreferenceStore::new(self.dir.path()))
    }
}

#[tokio::test]
async fn start_without_default_only_loads_proposals() {
    let f = Fixture::new();
    let dashboard = f.dashboard(true);

    assert_eq!(dashboard.start().await, None);

    assert_eq!(f.primary.calls(), 0);
    assert_eq!(dashboard.balance_state().pair, BalancePair::absent());
    let proposals = dashboard.proposals().expect("proposals published");
    assert_eq!(proposals.len(), 1);
}

#[tokio::test]
async fn start_looks_up_saved_default() {
    let f = Fixture::new();
    let dashboard = f.dashboard(true);
    dashboard.save_default_address(ALICE).unwrap();

    let used = dashboard.start().await;

    assert_eq!(used, Some(WalletAddress::new(ALICE)));
    let state = dashboard.balances().borrow().clone();
    assert_eq!(state.pair.total(), Some(TokenBalance::from(100u64)));
    assert_eq!(state.pair.display_percent(), 60.0);
}

#[tokio::test]
async fn default_address_round_trip() {
    let f = Fixture::new();
    let dashboard = f.dashboard(false);

    assert_eq!(dashboard.default_address().unwrap(), None);
    let saved = dashboard.save_default_address("  0xABC  ").unwrap();
    assert_eq!(saved.as_str(), "0xabc");
    assert_eq!(dashboard.default_address().unwrap(), Some(saved));

    dashboard.clear_default_address().unwrap();
    assert_eq!(dashboard.default_address().unwrap(), None);
}

#[tokio::test]
async fn blank_default_address_is_rejected() {
    let f = Fixture::new();
    let dashboard = f.dashboard(false);
    assert!(matches!(
        dashboard.save_default_address("   "),
        Err(DashboardError::Validation(_))
    ));
}

#[tokio::test]
async fn failed_proposal_load_keeps_no_data() {
    let f = Fixture::new();
    f.tally.fail();
    let dashboard = f.dashboard(true);

    assert!(dashboard.load_proposals().await.is_err());
    assert!(dashboard.proposals().is_none());

    // start() logs the failure instead of returning it.
    dashboard.start().await;
    assert!(dashboard.proposals().is_none());
}

#[tokio::test]
async fn failed_reload_keeps_previous_list() {
    let f = Fixture::new();
    let dashboard = f.dashboard(true);
    dashboard.load_proposals().await.unwrap();

    f.hub.fail_proposals();
    assert!(dashboard.load_proposals().await.is_err());
    assert_eq!(dashboard.proposals().map(|list| list.len()), Some(1));
}

#[tokio::test]
async fn proposals_unavailable_without_tally_service() {
    let f = Fixture::new();
    let dashboard = f.dashboard(false);
    match dashboard.load_proposals().await {
        Err(DashboardError::Config(message)) => {
            assert!(message.contains("tally_url"), "{message}");
            assert!(message.contains("GOVDASH_TALLY_URL"), "{message}");
        }
        other => panic!("expected a config error, got {other:?}"),
    }
    assert!(f.hub.requests().is_empty());
}

#[tokio::test]
async fn voted_marker_follows_published_list() {
    let f = Fixture::new();
    let dashboard = f.dashboard(true);
    let qm1 = ProposalId::new("Qm1");

    assert!(!dashboard.has_voted(ALICE, &qm1), "no list yet");

    dashboard.load_proposals().await.unwrap();
    assert!(dashboard.has_voted(&ALICE.to_uppercase().replace("0X", "0x"), &qm1));
    assert!(!dashboard.has_voted("0xdead", &qm1));
    assert!(!dashboard.has_voted(ALICE, &ProposalId::new("QmOther")));
    assert!(!dashboard.has_voted("", &qm1));
}

#[tokio::test]
async fn proposal_subscribers_see_updates() {
    let f = Fixture::new();
    let dashboard = f.dashboard(true);
    let mut rx = dashboard.subscribe_proposals();

    dashboard.load_proposals().await.unwrap();

    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().as_ref().map(|l| l.len()), Some(1));
}

#[test]
fn from_config_rejects_invalid_settings() {
    let config = DashboardConfig {
        staked_tokens: Vec::new(),
        ..Default::default()
    };
    assert!(matches!(
        Dashboard::from_config(&config),
        Err(DashboardError::Config(_))
    ));
}

#[test]
fn from_config_builds_real_clients() {
    let dir = tempfile::tempdir().unwrap();
    let config = DashboardConfig {
        tally_url: Some("https://tally.example/api".into()),
        data_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let dashboard = Dashboard::from_config(&config).expect("valid config");
    assert!(dashboard.proposals().is_none());
    assert_eq!(dashboard.default_address().unwrap(), None);
}
