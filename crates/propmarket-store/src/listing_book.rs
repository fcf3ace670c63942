//! The listing store keyed by (token, seller).
//!
//! A `HashMap<(TokenId, AccountId), Listing>` holds the records; an
//! auxiliary `HashMap<TokenId, Vec<AccountId>>` indexes the *active*
//! sellers per token in publish order. The index is maintained on every
//! publish, withdraw, and exhaustion transition. Withdrawn and exhausted
//! records stay in the map (deactivated) so receipts and queries can still
//! resolve them; only the index forgets them.

use std::collections::HashMap;

use propmarket_types::{
    AccountId, Listing, MarketError, PaymentAmount, Result, TokenAmount, TokenId,
};

/// Store of record for all sale listings.
#[derive(Debug, Default)]
pub struct ListingBook {
    /// All listings, active or not, keyed by (token, seller).
    listings: HashMap<(TokenId, AccountId), Listing>,
    /// Active sellers per token, in publish order.
    by_token: HashMap<TokenId, Vec<AccountId>>,
    /// Monotonic publish counter; orders enumeration results.
    next_sequence: u64,
}

impl ListingBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =================================================================
    // Mutations
    // =================================================================

    /// Publish a listing, replacing any prior (token, seller) listing
    /// wholesale — quantities never accumulate across publishes, and the
    /// seller moves to the back of the token's publish order.
    ///
    /// Deliberately performs no balance or allowance check: publishing
    /// declares intent, settlement re-validates the live ledger.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for a zero price or quantity.
    pub fn publish(
        &mut self,
        token: TokenId,
        seller: AccountId,
        price_per_unit: PaymentAmount,
        quantity: TokenAmount,
    ) -> Result<()> {
        if price_per_unit.is_zero() {
            return Err(MarketError::InvalidArgument {
                reason: "price per unit must be positive".into(),
            });
        }
        if quantity.is_zero() {
            return Err(MarketError::InvalidArgument {
                reason: "listing quantity must be positive".into(),
            });
        }

        // Replacement: forget the prior listing's index position.
        if self.listings.contains_key(&(token, seller)) {
            self.unindex(token, seller);
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.listings.insert(
            (token, seller),
            Listing::new(token, seller, price_per_unit, quantity, sequence),
        );
        self.by_token.entry(token).or_default().push(seller);

        tracing::info!(%token, %seller, %price_per_unit, %quantity, "listing published");
        Ok(())
    }

    /// Withdraw the seller's active listing for `token`.
    ///
    /// # Errors
    /// Returns `ListingNotFound` if no active listing exists for the pair.
    pub fn withdraw(&mut self, token: TokenId, seller: AccountId) -> Result<()> {
        let listing = self
            .listings
            .get_mut(&(token, seller))
            .filter(|l| l.active)
            .ok_or(MarketError::ListingNotFound { token, seller })?;

        listing.deactivate();
        self.unindex(token, seller);

        tracing::info!(%token, %seller, "listing withdrawn");
        Ok(())
    }

    /// Apply a settled fill: decrement the advertised quantity and, on
    /// exhaustion, deactivate and unindex the listing. Called by the
    /// settlement engine only after its preconditions all passed.
    ///
    /// # Errors
    /// `ListingNotFound` if the pair has no active listing;
    /// `InsufficientListingQuantity` if `quantity` exceeds what is left.
    pub fn commit_fill(
        &mut self,
        token: TokenId,
        seller: AccountId,
        quantity: TokenAmount,
    ) -> Result<()> {
        let listing = self
            .listings
            .get_mut(&(token, seller))
            .filter(|l| l.active)
            .ok_or(MarketError::ListingNotFound { token, seller })?;

        listing.fill(quantity)?;
        let exhausted = !listing.active;
        if exhausted {
            self.unindex(token, seller);
            tracing::info!(%token, %seller, "listing exhausted");
        }
        Ok(())
    }

    // =================================================================
    // Queries
    // =================================================================

    /// Look up the (token, seller) listing, active or not.
    pub fn get(&self, token: TokenId, seller: AccountId) -> Result<&Listing> {
        self.listings
            .get(&(token, seller))
            .ok_or(MarketError::ListingNotFound { token, seller })
    }

    /// All active listings for `token`, cloned out in publish order.
    /// A point-in-time copy: safe to consume while later settlements run.
    #[must_use]
    pub fn active_listings_for(&self, token: TokenId) -> Vec<Listing> {
        self.by_token
            .get(&token)
            .map(|sellers| {
                sellers
                    .iter()
                    .filter_map(|seller| self.listings.get(&(token, *seller)))
                    .filter(|listing| listing.is_purchasable())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether at least one active listing exists for `token`.
    #[must_use]
    pub fn is_listed(&self, token: TokenId) -> bool {
        self.by_token
            .get(&token)
            .is_some_and(|sellers| !sellers.is_empty())
    }

    /// Number of retained listing records (including deactivated ones).
    #[must_use]
    pub fn listing_count(&self) -> usize {
        self.listings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Index ↔ records agreement: every indexed seller resolves to an
    /// active listing, every active listing is indexed exactly once, and
    /// inactive records carry zero quantity.
    #[must_use]
    pub fn check_consistency(&self) -> bool {
        for (token, sellers) in &self.by_token {
            for seller in sellers {
                match self.listings.get(&(*token, *seller)) {
                    Some(listing) if listing.active => {}
                    _ => return false,
                }
            }
            if sellers
                .iter()
                .any(|s| sellers.iter().filter(|o| *o == s).count() > 1)
            {
                return false;
            }
        }
        self.listings.iter().all(|((token, seller), listing)| {
            let indexed = self
                .by_token
                .get(token)
                .is_some_and(|sellers| sellers.contains(seller));
            listing.invariants_hold() && (listing.active == indexed)
        })
    }

    fn unindex(&mut self, token: TokenId, seller: AccountId) {
        if let Some(sellers) = self.by_token.get_mut(&token) {
            sellers.retain(|s| *s != seller);
            if sellers.is_empty() {
                self.by_token.remove(&token);
            }
        }
    }
}
