use govdash_types::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("ledger RPC error: {0}")]
    Rpc(String),

    #[error("ledger node error {code}: {message}")]
    Node { code: i64, message: String },

    #[error("contract {0} returned no data for balanceOf")]
    EmptyReturn(String),

    /// A lookup failed at the named source.
    #[error("{label}: {error}")]
    Source {
        label: String,
        #[source]
        error: Box<BalanceError>,
    },

    #[error("at least one staked-token source must be configured")]
    NoStakedSources,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
