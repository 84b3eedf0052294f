//! Nullable vote hub and tally service with in-memory payloads and scripted failures.

use async_trait::async_trait;
use govdash_governance::{
    ActivationRecord, ActivationSource, GovernanceError, SnapshotHub, SnapshotProposal,
    SpaceConfig, Vote,
};
use govdash_types::{ProposalId, Timestamp};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// A two-choice (`Yes`/`No`) proposal for tests.
pub fn fixture_proposal(id: &str, name: &str, start: u64, end: u64) -> SnapshotProposal {
    SnapshotProposal {
        id: ProposalId::new(id),
        name: name.to_string(),
        body: String::new(),
        start: Timestamp::new(start),
        end: Timestamp::new(end),
        choices: vec!["Yes".to_string(), "No".to_string()],
    }
}

fn unavailable(what: &str) -> GovernanceError {
    GovernanceError::Http {
        url: format!("null://{what}"),
        reason: "scripted failure".to_string(),
    }
}

/// An in-memory vote hub that records every request it receives.
#[derive(Default)]
pub struct NullHub {
    proposals: Mutex<BTreeMap<ProposalId, SnapshotProposal>>,
    invalids: Mutex<HashSet<ProposalId>>,
    votes: Mutex<HashMap<ProposalId, Vec<Vote>>>,
    failing_votes: Mutex<HashSet<ProposalId>>,
    fail_proposals: AtomicBool,
    fail_space: AtomicBool,
    requests: Mutex<Vec<String>>,
}

impl NullHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_proposal(&self, proposal: SnapshotProposal) {
        self.proposals
            .lock()
            .unwrap()
            .insert(proposal.id.clone(), proposal);
    }

    /// Put `id` on the space's exclusion list.
    pub fn exclude(&self, id: &str) {
        self.invalids.lock().unwrap().insert(ProposalId::new(id));
    }

    pub fn add_vote(&self, vote: Vote) {
        self.votes
            .lock()
            .unwrap()
            .entry(vote.proposal_id.clone())
            .or_default()
            .push(vote);
    }

    /// Make the vote-list request for `id` fail.
    pub fn fail_votes_for(&self, id: &str) {
        self.failing_votes.lock().unwrap().insert(ProposalId::new(id));
    }

    pub fn fail_proposals(&self) {
        self.fail_proposals.store(true, Ordering::SeqCst);
    }

    pub fn fail_space(&self) {
        self.fail_space.store(true, Ordering::SeqCst);
    }

    /// Requests seen so far: `"proposals"`, `"space"` or `"votes:<id>"`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Ids whose vote lists were requested, sorted.
    pub fn vote_requests(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .requests()
            .into_iter()
            .filter_map(|r| r.strip_prefix("votes:").map(str::to_string))
            .collect();
        ids.sort();
        ids
    }

    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }
}

#[async_trait]
impl SnapshotHub for NullHub {
    async fn proposals(&self) -> Result<BTreeMap<ProposalId, SnapshotProposal>, GovernanceError> {
        self.record("proposals".to_string());
        if self.fail_proposals.load(Ordering::SeqCst) {
            return Err(unavailable("proposals"));
        }
        Ok(self.proposals.lock().unwrap().clone())
    }

    async fn space(&self) -> Result<SpaceConfig, GovernanceError> {
        self.record("space".to_string());
        if self.fail_space.load(Ordering::SeqCst) {
            return Err(unavailable("space"));
        }
        Ok(SpaceConfig {
            invalids: self.invalids.lock().unwrap().clone(),
        })
    }

    async fn votes(&self, proposal: &ProposalId) -> Result<Vec<Vote>, GovernanceError> {
        self.record(format!("votes:{proposal}"));
        if self.failing_votes.lock().unwrap().contains(proposal) {
            return Err(unavailable("votes"));
        }
        Ok(self
            .votes
            .lock()
            .unwrap()
            .get(proposal)
            .cloned()
            .unwrap_or_default())
    }
}

/// An in-memory activation service.
#[derive(Default)]
pub struct NullTally {
    records: Mutex<HashMap<ProposalId, ActivationRecord>>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl NullTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&self, record: ActivationRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.proposal_id.clone(), record);
    }

    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActivationSource for NullTally {
    async fn activations(&self) -> Result<HashMap<ProposalId, ActivationRecord>, GovernanceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable("activations"));
        }
        Ok(self.records.lock().unwrap().clone())
    }
}
