//! Integer amount newtypes for exact smallest-subunit accounting.
//!
//! Token quantities and payment amounts are `u128` counts of the respective
//! smallest subunit. All arithmetic is checked — an operation that would
//! wrap returns `None` and callers surface [`crate::MarketError::ArithmeticOverflow`]
//! instead of ever truncating a charge. Whole-unit values are a display
//! convenience handled by the registry, never by settlement math.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TokenAmount
// ---------------------------------------------------------------------------

/// A quantity of property tokens, in the token's smallest subunit.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TokenAmount(pub u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// PaymentAmount
// ---------------------------------------------------------------------------

/// An amount of payment currency, in its smallest subunit.
///
/// Also used for per-unit prices: a price is payment subunits per one
/// token subunit, so `price.total_for(quantity)` is the exact charge.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PaymentAmount(pub u128);

impl PaymentAmount {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Exact total for buying `quantity` subunits at this per-subunit price.
    /// Returns `None` if the multiplication would wrap.
    #[must_use]
    pub fn total_for(self, quantity: TokenAmount) -> Option<Self> {
        self.0.checked_mul(quantity.0).map(Self)
    }
}

impl fmt::Display for PaymentAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
