use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("config error: {0}")]
    Config(String),

    #[error("balance error: {0}")]
    Balance(#[from] govdash_balance::BalanceError),

    #[error("governance error: {0}")]
    Governance(#[from] govdash_governance::GovernanceError),

    #[error(transparent)]
    Validation(#[from] govdash_types::ValidationError),

    #[error("preferences file is corrupt: {0}")]
    Preferences(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
