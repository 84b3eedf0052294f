//! The external activation / weighted-tally service.

use async_trait::async_trait;
use govdash_types::ProposalId;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::GovernanceError;
use crate::hub::{build_http, get_json};
use crate::proposal::ActivationRecord;
use crate::schema;

/// Source of activation records for the whole space, keyed by proposal id.
#[async_trait]
pub trait ActivationSource: Send + Sync {
    async fn activations(&self) -> Result<HashMap<ProposalId, ActivationRecord>, GovernanceError>;
}

/// HTTP client for the activation service, optionally through a URL-prefix
/// proxy (`https://proxy.example/?quest=` + target).
#[derive(Clone)]
pub struct TallyClient {
    http: reqwest::Client,
    url: String,
}

impl TallyClient {
    pub fn new(
        tally_url: &str,
        proxy: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, GovernanceError> {
        let url = match proxy {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}{tally_url}"),
            _ => tally_url.to_string(),
        };
        Ok(Self {
            http: build_http(timeout)?,
            url,
        })
    }

    /// The URL actually requested, proxy prefix included.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ActivationSource for TallyClient {
    async fn activations(&self) -> Result<HashMap<ProposalId, ActivationRecord>, GovernanceError> {
        let json = get_json(&self.http, &self.url, &[]).await?;
        Ok(schema::parse_activations(json)?)
    }
}
