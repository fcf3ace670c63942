//! The marketplace facade: the surface the presentation layer talks to.
//!
//! Bundles the listing book, the ledger handle, and the settlement engine
//! behind one single-writer object. Every mutating operation takes
//! `&mut self`, so a host supplies serialization by wrapping the facade in
//! its lock of choice (one mutex around the facade satisfies the
//! per-(token, seller) requirement); the read-only queries return
//! point-in-time snapshots that may be immediately stale — the settlement
//! path always re-validates.

use propmarket_ledger::{AssetLedger, PaymentLedger};
use propmarket_store::ListingBook;
use propmarket_types::{
    AccountId, Listing, MarketplaceConfig, PaymentAmount, Result, SettlementReceipt, TokenAmount,
    TokenId,
};

use crate::engine::{PurchaseRequest, SettlementEngine};

/// One marketplace over one ledger.
pub struct Marketplace<L> {
    book: ListingBook,
    ledger: L,
    engine: SettlementEngine,
}

impl<L> Marketplace<L>
where
    L: AssetLedger + PaymentLedger,
{
    /// Create a marketplace settling via `marketplace_account`, with
    /// default configuration.
    #[must_use]
    pub fn new(marketplace_account: AccountId, ledger: L) -> Self {
        Self::with_config(marketplace_account, ledger, &MarketplaceConfig::default())
    }

    /// Create a marketplace with explicit configuration.
    #[must_use]
    pub fn with_config(
        marketplace_account: AccountId,
        ledger: L,
        config: &MarketplaceConfig,
    ) -> Self {
        Self {
            book: ListingBook::new(),
            ledger,
            engine: SettlementEngine::with_config(marketplace_account, config),
        }
    }

    // =================================================================
    // Mutations
    // =================================================================

    /// Publish (or wholesale-replace) the seller's listing for `token`.
    pub fn publish(
        &mut self,
        token: TokenId,
        seller: AccountId,
        price_per_unit: PaymentAmount,
        quantity: TokenAmount,
    ) -> Result<()> {
        self.book.publish(token, seller, price_per_unit, quantity)
    }

    /// Withdraw the seller's active listing for `token`.
    pub fn withdraw(&mut self, token: TokenId, seller: AccountId) -> Result<()> {
        self.book.withdraw(token, seller)
    }

    /// Execute a purchase atomically. Idempotent per request id.
    pub fn buy(&mut self, request: &PurchaseRequest) -> Result<SettlementReceipt> {
        self.engine.buy(&mut self.book, &mut self.ledger, request)
    }

    // =================================================================
    // Query surface (read-only, snapshot semantics)
    // =================================================================

    /// The (token, seller) listing, active or not.
    pub fn get(&self, token: TokenId, seller: AccountId) -> Result<Listing> {
        self.book.get(token, seller).cloned()
    }

    /// All active listings for `token`, in publish order.
    #[must_use]
    pub fn active_listings_for(&self, token: TokenId) -> Vec<Listing> {
        self.book.active_listings_for(token)
    }

    /// Whether at least one active listing exists for `token`.
    #[must_use]
    pub fn is_listed(&self, token: TokenId) -> bool {
        self.book.is_listed(token)
    }

    // =================================================================
    // Host access
    // =================================================================

    /// The account sellers grant their allowance to.
    #[must_use]
    pub fn marketplace_account(&self) -> AccountId {
        self.engine.marketplace()
    }

    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable ledger access for the host (deposits, approvals). Never
    /// used by the engine outside a settlement.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }
}
