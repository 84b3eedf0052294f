//! Joins hub proposals, space filters, votes and activation tallies into the
//! ordered list of [`ReducedProposal`]s the dashboard shows.

use futures_util::future::try_join_all;
use govdash_types::Clock;
use std::sync::Arc;

use crate::error::GovernanceError;
use crate::hub::SnapshotHub;
use crate::links::LinkExtractor;
use crate::proposal::ReducedProposal;
use crate::reduce::{exclude_invalid, retain_named, sort_by_end_desc, Reducer};
use crate::tally::ActivationSource;

/// Knobs of the reduction that vary per deployment.
#[derive(Clone, Debug)]
pub struct AggregatorSettings {
    /// Names not starting with this are not governance proposals.
    pub name_prefix: String,
    /// Proposal id is appended to build the voting page link.
    pub proposal_url_base: String,
    pub links: LinkExtractor,
}

pub struct ProposalAggregator {
    hub: Arc<dyn SnapshotHub>,
    tally: Arc<dyn ActivationSource>,
    clock: Arc<dyn Clock>,
    name_prefix: String,
    reducer: Reducer,
}

impl ProposalAggregator {
    pub fn new(
        hub: Arc<dyn SnapshotHub>,
        tally: Arc<dyn ActivationSource>,
        clock: Arc<dyn Clock>,
        settings: AggregatorSettings,
    ) -> Self {
        Self {
            hub,
            tally,
            clock,
            name_prefix: settings.name_prefix,
            reducer: Reducer::new(settings.links, settings.proposal_url_base),
        }
    }

    /// Run the whole pipeline once.
    ///
    /// All-or-none: if any upstream request fails (including a single
    /// proposal's vote list) the run fails and no list is produced.
    pub async fn aggregate(&self) -> Result<Vec<ReducedProposal>, GovernanceError> {
        let (mut proposals, space, activations) = tokio::try_join!(
            self.hub.proposals(),
            self.hub.space(),
            self.tally.activations(),
        )?;
        let fetched = proposals.len();

        exclude_invalid(&mut proposals, &space.invalids);
        retain_named(&mut proposals, &self.name_prefix);
        tracing::debug!(
            fetched,
            excluded = space.invalids.len(),
            surviving = proposals.len(),
            tallied = activations.len(),
            "filtered proposals"
        );

        let vote_lists = try_join_all(proposals.keys().map(|id| self.hub.votes(id))).await?;

        let now = self.clock.now();
        let mut reduced: Vec<ReducedProposal> = proposals
            .into_values()
            .zip(vote_lists)
            .map(|(proposal, votes)| {
                let activation = activations.get(&proposal.id);
                self.reducer.reduce(proposal, &votes, activation, now)
            })
            .collect();

        sort_by_end_desc(&mut reduced);
        tracing::info!(count = reduced.len(), "proposal feed aggregated");
        Ok(reduced)
    }
}
