//! Filtering, joining and reduction steps of the proposal pipeline.
//!
//! All pure: no I/O, `now` passed in.

use govdash_types::{ProposalId, Timestamp, WalletAddress};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::links::LinkExtractor;
use crate::proposal::{ActivationRecord, ChoiceTally, ReducedProposal, SnapshotProposal, Vote, VoteTally};

pub const YES_LABEL: &str = "Yes";
pub const NO_LABEL: &str = "No";

/// Drop every proposal whose id is on the space's exclusion list.
pub fn exclude_invalid(
    proposals: &mut BTreeMap<ProposalId, SnapshotProposal>,
    invalids: &HashSet<ProposalId>,
) {
    proposals.retain(|id, _| !invalids.contains(id));
}

/// Keep only proposals whose name starts with `prefix`.
pub fn retain_named(proposals: &mut BTreeMap<ProposalId, SnapshotProposal>, prefix: &str) {
    proposals.retain(|_, p| p.name.starts_with(prefix));
}

/// `start <= now < end`.
pub fn is_active(start: Timestamp, end: Timestamp, now: Timestamp) -> bool {
    end > now && start <= now
}

/// Sort newest-ending first. Equal ends order by id so output is stable.
pub fn sort_by_end_desc(proposals: &mut [ReducedProposal]) {
    proposals.sort_by(|a, b| b.end.cmp(&a.end).then_with(|| a.id.cmp(&b.id)));
}

/// Turns one proposal plus its joined data into a [`ReducedProposal`].
#[derive(Clone, Debug)]
pub struct Reducer {
    links: LinkExtractor,
    proposal_url_base: String,
}

impl Reducer {
    pub fn new(links: LinkExtractor, proposal_url_base: impl Into<String>) -> Self {
        Self {
            links,
            proposal_url_base: proposal_url_base.into(),
        }
    }

    pub fn proposal_url(&self, id: &ProposalId) -> String {
        format!("{}{}", self.proposal_url_base, id)
    }

    /// Votes for other proposals are ignored.
    pub fn reduce(
        &self,
        proposal: SnapshotProposal,
        votes: &[Vote],
        activation: Option<&ActivationRecord>,
        now: Timestamp,
    ) -> ReducedProposal {
        let votes: Vec<&Vote> = votes.iter().filter(|v| v.proposal_id == proposal.id).collect();

        let voters: Vec<WalletAddress> = votes
            .iter()
            .map(|v| v.voter.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let tally = VoteTally {
            yes: ChoiceTally {
                points: activation.map(|a| a.yes_points),
                voters: count_voters(&proposal.choices, &votes, YES_LABEL),
            },
            no: ChoiceTally {
                points: activation.map(|a| a.no_points),
                voters: count_voters(&proposal.choices, &votes, NO_LABEL),
            },
        };

        ReducedProposal {
            active: is_active(proposal.start, proposal.end, now),
            status: activation.map(|a| a.status),
            votes: tally,
            community_url: self.links.community_url(&proposal.body),
            github_url: self.links.github_url(&proposal.body),
            proposal_url: self.proposal_url(&proposal.id),
            voters,
            id: proposal.id,
            name: proposal.name,
            body: proposal.body,
            start: proposal.start,
            end: proposal.end,
        }
    }
}

/// Distinct voters whose 1-based choice lands on any position labelled `label`.
fn count_voters(choices: &[String], votes: &[&Vote], label: &str) -> usize {
    let positions: HashSet<u32> = choices
        .iter()
        .enumerate()
        .filter(|(_, c)| c.as_str() == label)
        .map(|(i, _)| i as u32 + 1)
        .collect();

    votes
        .iter()
        .filter(|v| positions.contains(&v.choice))
        .map(|v| &v.voter)
        .collect::<HashSet<_>>()
        .len()
}
