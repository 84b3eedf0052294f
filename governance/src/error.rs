use govdash_types::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid link pattern: {0}")]
    LinkPattern(#[from] regex::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Other(String),
}
