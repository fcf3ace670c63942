//! The listing model: a seller's standing offer to sell a fixed quantity
//! of one property token at a fixed per-subunit price.
//!
//! At most one listing exists per (token, seller) pair; re-publishing
//! replaces the prior listing wholesale. Listings are owned exclusively by
//! the `ListingBook` — the settlement engine mutates them only through it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, MarketError, PaymentAmount, Result, TokenAmount, TokenId};

/// One seller's active sale offer for one token type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// The fungible property token being sold.
    pub token: TokenId,
    /// The party offering tokens.
    pub seller: AccountId,
    /// Payment subunits per token subunit. Immutable for the lifetime of
    /// this listing instance; changing price means replacing the listing.
    pub price_per_unit: PaymentAmount,
    /// Remaining sellable quantity, in token subunits. Advertised only —
    /// settlement re-validates against the live ledger.
    pub available: TokenAmount,
    /// False once withdrawn or exhausted.
    pub active: bool,
    /// Monotonic publish sequence, used to order enumeration results.
    pub sequence: u64,
    /// When this listing instance was published.
    pub published_at: DateTime<Utc>,
}

impl Listing {
    /// Create a fresh, active listing. Argument validation (positive price
    /// and quantity) is the store's responsibility.
    #[must_use]
    pub fn new(
        token: TokenId,
        seller: AccountId,
        price_per_unit: PaymentAmount,
        quantity: TokenAmount,
        sequence: u64,
    ) -> Self {
        Self {
            token,
            seller,
            price_per_unit,
            available: quantity,
            active: true,
            sequence,
            published_at: Utc::now(),
        }
    }

    /// Whether a purchase can currently be attempted against this listing.
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        self.active && !self.available.is_zero()
    }

    /// Decrement the available quantity after a successful settlement.
    /// Deactivates the listing when it reaches zero.
    pub fn fill(&mut self, quantity: TokenAmount) -> Result<()> {
        let remaining = self.available.checked_sub(quantity).ok_or(
            MarketError::InsufficientListingQuantity {
                requested: quantity,
                available: self.available,
            },
        )?;
        self.available = remaining;
        if self.available.is_zero() {
            self.active = false;
        }
        Ok(())
    }

    /// Seller-initiated withdrawal: deactivate and zero out.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.available = TokenAmount::ZERO;
    }

    /// Data-model invariant: inactive implies zero quantity.
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        self.active || self.available.is_zero()
    }
}

impl std::fmt::Display for Listing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Listing[{} by {}] {} units @ {} ({})",
            self.token,
            self.seller,
            self.available,
            self.price_per_unit,
            if self.active { "active" } else { "inactive" },
        )
    }
}
