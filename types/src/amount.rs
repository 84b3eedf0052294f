//! Arbitrary-precision token balances.
//!
//! Balances are raw on-chain units (not adjusted for token decimals). They are
//! backed by `BigUint`, so addition never overflows.

use crate::error::ValidationError;
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// A non-negative token balance in raw units.
///
/// Serialized as a base-10 string so that values wider than any JSON number
/// survive a round trip.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenBalance(BigUint);

impl TokenBalance {
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn new(raw: impl Into<BigUint>) -> Self {
        Self(raw.into())
    }

    /// Parse a `0x`-prefixed hex quantity as returned by JSON-RPC.
    ///
    /// `0x` alone is zero. Returns `None` for anything that is not hex.
    pub fn from_hex(quantity: &str) -> Option<Self> {
        let digits = quantity
            .strip_prefix("0x")
            .or_else(|| quantity.strip_prefix("0X"))?;
        if digits.is_empty() {
            return Some(Self::zero());
        }
        BigUint::parse_bytes(digits.as_bytes(), 16).map(Self)
    }

    /// Parse a base-10 integer string.
    pub fn from_decimal(digits: &str) -> Option<Self> {
        BigUint::parse_bytes(digits.as_bytes(), 10).map(Self)
    }

    pub fn raw(&self) -> &BigUint {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `self / total` in basis points, rounded down. `None` when `total` is zero.
    pub fn basis_points_of(&self, total: &TokenBalance) -> Option<u64> {
        if total.is_zero() {
            return None;
        }
        let bps = (&self.0 * 10_000u32) / &total.0;
        Some(bps.to_u64().unwrap_or(u64::MAX))
    }
}

impl From<u64> for TokenBalance {
    fn from(raw: u64) -> Self {
        Self(BigUint::from(raw))
    }
}

impl From<u128> for TokenBalance {
    fn from(raw: u128) -> Self {
        Self(BigUint::from(raw))
    }
}

impl TryFrom<String> for TokenBalance {
    type Error = ValidationError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_decimal(&s).ok_or(ValidationError::InvalidQuantity(s))
    }
}

impl From<TokenBalance> for String {
    fn from(b: TokenBalance) -> Self {
        b.0.to_string()
    }
}

impl Add for TokenBalance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a TokenBalance> for &'a TokenBalance {
    type Output = TokenBalance;
    fn add(self, rhs: &'a TokenBalance) -> TokenBalance {
        TokenBalance(&self.0 + &rhs.0)
    }
}

impl AddAssign for TokenBalance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for TokenBalance {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl fmt::Display for TokenBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
