//! Shape errors raised at the upstream parse boundary.

use thiserror::Error;

/// An upstream payload did not have the shape the dashboard expects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed {what}: {reason}")]
    Malformed { what: &'static str, reason: String },

    #[error("{what} is missing field `{field}`")]
    MissingField { what: &'static str, field: &'static str },

    #[error("invalid address {0:?}: expected 20 hex-encoded bytes")]
    InvalidAddress(String),

    #[error("invalid quantity {0:?}")]
    InvalidQuantity(String),
}

impl ValidationError {
    pub fn malformed(what: &'static str, reason: impl ToString) -> Self {
        Self::Malformed {
            what,
            reason: reason.to_string(),
        }
    }
}
