//! The off-chain vote hub: proposal list, space settings and per-proposal votes.

use async_trait::async_trait;
use govdash_types::ProposalId;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::GovernanceError;
use crate::proposal::{SnapshotProposal, SpaceConfig, Vote};
use crate::schema;

/// Read access to one space on a vote hub.
#[async_trait]
pub trait SnapshotHub: Send + Sync {
    async fn proposals(&self) -> Result<BTreeMap<ProposalId, SnapshotProposal>, GovernanceError>;

    async fn space(&self) -> Result<SpaceConfig, GovernanceError>;

    async fn votes(&self, proposal: &ProposalId) -> Result<Vec<Vote>, GovernanceError>;
}

/// GET a URL and decode the body as JSON. Non-2xx responses are errors.
pub(crate) async fn get_json(
    http: &reqwest::Client,
    url: &str,
    headers: &[(&str, &str)],
) -> Result<serde_json::Value, GovernanceError> {
    tracing::trace!(url, "GET");

    let mut request = http.get(url);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    let response = request.send().await.map_err(|e| GovernanceError::Http {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if !response.status().is_success() {
        return Err(GovernanceError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    response.json().await.map_err(|e| GovernanceError::Http {
        url: url.to_string(),
        reason: format!("invalid JSON response: {e}"),
    })
}

pub(crate) fn build_http(timeout: Duration) -> Result<reqwest::Client, GovernanceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| GovernanceError::Other(format!("failed to create HTTP client: {e}")))
}

/// HTTP client for a Snapshot-style hub (`{hub}/api/...`).
#[derive(Clone)]
pub struct HubClient {
    http: reqwest::Client,
    hub_url: String,
    space: String,
}

impl HubClient {
    /// `hub_url` is the hub root (e.g. `https://hub.snapshot.page`); `space`
    /// the namespace (e.g. `vote.airswap.eth`).
    pub fn new(
        hub_url: impl Into<String>,
        space: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GovernanceError> {
        let hub_url: String = hub_url.into();
        Ok(Self {
            http: build_http(timeout)?,
            hub_url: hub_url.trim_end_matches('/').to_string(),
            space: space.into(),
        })
    }

    pub fn proposals_url(&self) -> String {
        format!("{}/api/{}/proposals", self.hub_url, self.space)
    }

    pub fn space_url(&self) -> String {
        format!("{}/api/spaces/{}", self.hub_url, self.space)
    }

    pub fn votes_url(&self, proposal: &ProposalId) -> String {
        format!("{}/api/{}/proposal/{}", self.hub_url, self.space, proposal)
    }
}

#[async_trait]
impl SnapshotHub for HubClient {
    async fn proposals(&self) -> Result<BTreeMap<ProposalId, SnapshotProposal>, GovernanceError> {
        let json = get_json(&self.http, &self.proposals_url(), &[]).await?;
        Ok(schema::parse_proposals(json)?)
    }

    async fn space(&self) -> Result<SpaceConfig, GovernanceError> {
        let json = get_json(&self.http, &self.space_url(), &[]).await?;
        Ok(schema::parse_space(json)?)
    }

    async fn votes(&self, proposal: &ProposalId) -> Result<Vec<Vote>, GovernanceError> {
        let json = get_json(&self.http, &self.votes_url(proposal), &[]).await?;
        Ok(schema::parse_votes(json)?)
    }
}
