//! Dashboard configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use govdash_utils::LogFormat;

use crate::DashboardError;

/// Configuration for the governance dashboard.
///
/// Can be loaded from a TOML file via [`DashboardConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so an
/// empty file is valid apart from `tally_url`, which has to be supplied before
/// proposals can be loaded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Ethereum JSON-RPC endpoint used for read-only `eth_call`s.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Contract of the primary (unstaked) token.
    #[serde(default = "default_primary_token")]
    pub primary_token: String,

    /// Staking contracts whose balances are summed into the staked figure.
    #[serde(default = "default_staked_tokens")]
    pub staked_tokens: Vec<String>,

    /// Decimals of the token, used for display only.
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u32,

    /// Vote hub root.
    #[serde(default = "default_hub_url")]
    pub hub_url: String,

    /// Vote hub space.
    #[serde(default = "default_space")]
    pub space: String,

    /// Activation service endpoint. No default.
    #[serde(default)]
    pub tally_url: Option<String>,

    /// URL prefix prepended to `tally_url` (e.g. a CORS proxy).
    #[serde(default)]
    pub cors_proxy: Option<String>,

    /// Base of the voting page link; the proposal id is appended.
    #[serde(default = "default_proposal_url_base")]
    pub proposal_url_base: String,

    /// Only proposals named with this prefix are shown.
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,

    /// Host of the discussion forum links embedded in proposal bodies.
    #[serde(default = "default_community_domain")]
    pub community_domain: String,

    /// GitHub organisation of code links embedded in proposal bodies.
    #[serde(default = "default_github_org")]
    pub github_org: String,

    /// Discourse forum root.
    #[serde(default = "default_forum_url")]
    pub forum_url: String,

    /// Discourse category holding proposal drafts.
    #[serde(default = "default_forum_category")]
    pub forum_category: u32,

    /// Discourse API credentials (from the environment, never from the file).
    #[serde(skip)]
    pub forum_api_key: Option<String>,
    #[serde(skip)]
    pub forum_api_username: Option<String>,

    /// Directory for saved preferences.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Per-request timeout for every upstream call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_rpc_url() -> String {
    "https://cloudflare-eth.com".to_string()
}

fn default_primary_token() -> String {
    "0x27054b13b1b798b345b591a4d22e6562d47ea75a".to_string()
}

fn default_staked_tokens() -> Vec<String> {
    vec!["0x579120871266ccd8de6c85ef59e2ff6743e7cd15".to_string()]
}

fn default_token_decimals() -> u32 {
    4
}

fn default_hub_url() -> String {
    "https://hub.snapshot.page".to_string()
}

fn default_space() -> String {
    "vote.airswap.eth".to_string()
}

fn default_proposal_url_base() -> String {
    "https://snapshot.page/#/vote.airswap.eth/proposal/".to_string()
}

fn default_name_prefix() -> String {
    "AIP".to_string()
}

fn default_community_domain() -> String {
    "community.airswap.io".to_string()
}

fn default_github_org() -> String {
    "airswap".to_string()
}

fn default_forum_url() -> String {
    "https://community.airswap.io".to_string()
}

fn default_forum_category() -> u32 {
    5
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./govdash_data")
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DashboardConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, DashboardError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DashboardError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, DashboardError> {
        toml::from_str(s).map_err(|e| DashboardError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, DashboardError> {
        toml::to_string_pretty(self).map_err(|e| DashboardError::Config(e.to_string()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn log_format(&self) -> Result<LogFormat, DashboardError> {
        LogFormat::from_str(&self.log_format).map_err(DashboardError::Config)
    }

    /// The activation service URL, if one is configured and non-blank.
    pub fn tally_url(&self) -> Option<&str> {
        self.tally_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Reject settings no lookup could work with.
    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.rpc_url.trim().is_empty() {
            return Err(DashboardError::Config("rpc_url must not be empty".into()));
        }
        if !is_contract_address(&self.primary_token) {
            return Err(DashboardError::Config(format!(
                "primary_token {:?} is not a contract address",
                self.primary_token
            )));
        }
        if self.staked_tokens.is_empty() {
            return Err(DashboardError::Config(
                "staked_tokens must list at least one contract".into(),
            ));
        }
        if let Some(bad) = self.staked_tokens.iter().find(|t| !is_contract_address(t)) {
            return Err(DashboardError::Config(format!(
                "staked token {bad:?} is not a contract address"
            )));
        }
        if self.hub_url.trim().is_empty() || self.space.trim().is_empty() {
            return Err(DashboardError::Config("hub_url and space must be set".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(DashboardError::Config(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        self.log_format()?;
        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            primary_token: default_primary_token(),
            staked_tokens: default_staked_tokens(),
            token_decimals: default_token_decimals(),
            hub_url: default_hub_url(),
            space: default_space(),
            tally_url: None,
            cors_proxy: None,
            proposal_url_base: default_proposal_url_base(),
            name_prefix: default_name_prefix(),
            community_domain: default_community_domain(),
            github_org: default_github_org(),
            forum_url: default_forum_url(),
            forum_category: default_forum_category(),
            forum_api_key: None,
            forum_api_username: None,
            data_dir: default_data_dir(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// `0x` followed by exactly 40 hex digits.
fn is_contract_address(s: &str) -> bool {
    s.strip_prefix("0x")
        .map(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = DashboardConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = DashboardConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.hub_url, config.hub_url);
        assert_eq!(parsed.staked_tokens, config.staked_tokens);
        assert_eq!(parsed.request_timeout_secs, 30);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = DashboardConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.space, "vote.airswap.eth");
        assert_eq!(config.name_prefix, "AIP");
        assert_eq!(config.forum_category, 5);
        assert_eq!(config.log_format, "human");
        assert_eq!(config.tally_url(), None);
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            tally_url = "https://tally.example/api/activations"
            cors_proxy = "https://api.codetabs.com/v1/proxy/?quest="
            staked_tokens = [
                "0x579120871266ccd8de6c85ef59e2ff6743e7cd15",
                "0x6d88b09805b90dad911e5c5a512eedd984d6860b",
            ]
        "#;
        let config = DashboardConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.tally_url(), Some("https://tally.example/api/activations"));
        assert_eq!(config.staked_tokens.len(), 2);
        assert_eq!(config.rpc_url, "https://cloudflare-eth.com"); // default
        config.validate().unwrap();
    }

    #[test]
    fn credentials_are_never_read_from_file() {
        let config = DashboardConfig::from_toml_str(r#"forum_api_key = "secret""#).unwrap();
        assert_eq!(config.forum_api_key, None);
        let mut config = DashboardConfig::default();
        config.forum_api_key = Some("secret".into());
        assert!(!config.to_toml_string().unwrap().contains("secret"));
    }

    #[test]
    fn blank_tally_url_counts_as_unset() {
        let config = DashboardConfig {
            tally_url: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(config.tally_url(), None);
    }

    #[test]
    fn validate_rejects_unusable_settings() {
        let no_staked = DashboardConfig {
            staked_tokens: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(no_staked.validate(), Err(DashboardError::Config(_))));

        let bad_primary = DashboardConfig {
            primary_token: "0x1234".into(),
            ..Default::default()
        };
        assert!(bad_primary.validate().is_err());

        let bad_format = DashboardConfig {
            log_format: "xml".into(),
            ..Default::default()
        };
        assert!(bad_format.validate().is_err());

        let zero_timeout = DashboardConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = DashboardConfig::from_toml_str("staked_tokens = 7").unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }
}
