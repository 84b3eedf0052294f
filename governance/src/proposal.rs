//! Governance proposals, votes, activation tallies and the joined view model.

use govdash_types::{ProposalId, Timestamp, WalletAddress};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A proposal as published on the vote hub.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotProposal {
    pub id: ProposalId,
    pub name: String,
    /// Free-form markdown, may embed discussion links.
    pub body: String,
    pub start: Timestamp,
    pub end: Timestamp,
    /// Ordered choice labels, e.g. `["Yes", "No"]`.
    pub choices: Vec<String>,
}

/// One address's single choice on one proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter: WalletAddress,
    pub proposal_id: ProposalId,
    /// 1-based index into the proposal's `choices`.
    pub choice: u32,
}

/// Space-level settings. Only the exclusion list matters here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpaceConfig {
    pub invalids: HashSet<ProposalId>,
}

/// Outcome reported by the activation service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationStatus {
    Accepted,
    Rejected,
    NotStarted,
}

impl ActivationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::NotStarted => "NOT_STARTED",
        }
    }
}

/// Weighted tally from the activation service. Present only for proposals
/// that reached tallying.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivationRecord {
    pub proposal_id: ProposalId,
    pub status: ActivationStatus,
    pub yes_points: f64,
    pub no_points: f64,
}

/// Per-choice figures. `points` come from the activation service, never from
/// counting votes; `voters` is the raw one-address-one-vote count.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceTally {
    pub points: Option<f64>,
    pub voters: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
    pub yes: ChoiceTally,
    pub no: ChoiceTally,
}

/// A proposal joined with its votes and activation record, ready to display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReducedProposal {
    pub id: ProposalId,
    pub name: String,
    pub body: String,
    /// `start <= now < end` at reduction time.
    pub active: bool,
    pub start: Timestamp,
    pub end: Timestamp,
    /// `Some` iff an activation record exists for this proposal.
    pub status: Option<ActivationStatus>,
    pub votes: VoteTally,
    pub community_url: Option<String>,
    pub github_url: Option<String>,
    pub proposal_url: String,
    /// Distinct voter addresses, sorted.
    pub voters: Vec<WalletAddress>,
}

impl ReducedProposal {
    /// Does not assume `voters` is sorted.
    pub fn has_voted(&self, address: &WalletAddress) -> bool {
        self.voters.contains(address)
    }

    /// Voting window closed before `now`.
    pub fn is_completed(&self, now: Timestamp) -> bool {
        self.end < now
    }

    /// Yes share of the tallied points (0.0 to 1.0). `None` before tallying or
    /// when no points were cast.
    pub fn yes_share(&self) -> Option<f64> {
        let yes = self.votes.yes.points?;
        let no = self.votes.no.points?;
        let total = yes + no;
        if total > 0.0 {
            Some(yes / total)
        } else {
            None
        }
    }
}
