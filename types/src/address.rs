//! Case-insensitive wallet address.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A ledger address as typed by the user or reported by the vote hub.
///
/// The address is opaque: nothing checks its format here. It is stored trimmed
/// and lower-cased so that `0xAbC…` and `0xabc…` compare and hash equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Create a wallet address from a raw string, normalising case and whitespace.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_lowercase())
    }

    /// Parse optional user input. Empty or whitespace-only input is `None`.
    pub fn parse_optional(raw: Option<&str>) -> Option<Self> {
        let raw = raw?.trim();
        if raw.is_empty() {
            None
        } else {
            Some(Self::new(raw))
        }
    }

    /// Return the normalised address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for WalletAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<WalletAddress> for String {
    fn from(a: WalletAddress) -> Self {
        a.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_compare_case_insensitively() {
        let upper = WalletAddress::new("0xAbCdEF0000000000000000000000000000000001");
        let lower = WalletAddress::new("0xabcdef0000000000000000000000000000000001");
        assert_eq!(upper, lower);
        assert_eq!(upper.as_str(), "0xabcdef0000000000000000000000000000000001");
    }

    #[test]
    fn blank_input_is_absent() {
        assert_eq!(WalletAddress::parse_optional(None), None);
        assert_eq!(WalletAddress::parse_optional(Some("")), None);
        assert_eq!(WalletAddress::parse_optional(Some("   ")), None);
        assert!(WalletAddress::parse_optional(Some(" 0x01 ")).is_some());
    }

    #[test]
    fn deserialization_normalises() {
        let addr: WalletAddress = serde_json::from_str("\"0xFFEE\"").unwrap();
        assert_eq!(addr.as_str(), "0xffee");
    }
}
