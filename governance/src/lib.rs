//! Governance feed aggregation for the dashboard.
//!
//! Pipeline (one run per [`ProposalAggregator::aggregate`] call):
//! proposals + space filters + activation tallies → exclusion pass →
//! naming pass → per-proposal votes → join → reduce → sort by end, newest first.
//!
//! Every upstream payload passes through [`schema`] before use, so a shape
//! mismatch becomes a typed error instead of a half-built view.

pub mod aggregator;
pub mod error;
pub mod forum;
pub mod hub;
pub mod links;
pub mod proposal;
pub mod reduce;
pub mod schema;
pub mod tally;

pub use aggregator::{AggregatorSettings, ProposalAggregator};
pub use error::GovernanceError;
pub use forum::{ForumClient, ForumTopic};
pub use hub::{HubClient, SnapshotHub};
pub use links::LinkExtractor;
pub use proposal::{
    ActivationRecord, ActivationStatus, ChoiceTally, ReducedProposal, SnapshotProposal,
    SpaceConfig, Vote, VoteTally,
};
pub use tally::{ActivationSource, TallyClient};
