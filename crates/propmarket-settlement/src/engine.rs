//! The settlement engine: validate-then-commit purchase execution.
//!
//! Every `buy` runs the full precondition ladder against a consistent
//! snapshot (the caller serializes mutating operations), then commits the
//! transfer, the payment, and the listing decrement as one unit. A failed
//! precondition returns a typed error and touches nothing; there is no
//! retry inside the engine — each error names a condition only the caller
//! can remedy.

use chrono::Utc;
use propmarket_ledger::{AssetLedger, PaymentLedger};
use propmarket_store::ListingBook;
use propmarket_types::{
    AccountId, MarketError, MarketplaceConfig, PaymentAmount, RequestId, Result, SettlementId,
    SettlementReceipt, TokenAmount, TokenId,
};
use serde::{Deserialize, Serialize};

use crate::idempotency::IdempotencyCache;

/// One purchase attempt against a specific listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    /// Caller-supplied id; retrying with the same id cannot double-settle.
    pub request_id: RequestId,
    /// The token to buy.
    pub token: TokenId,
    /// The listing's seller.
    pub seller: AccountId,
    /// The purchasing party.
    pub buyer: AccountId,
    /// Token subunits requested.
    pub quantity: TokenAmount,
    /// Payment the buyer puts forward. Any surplus over the exact price
    /// stays with the buyer.
    pub tendered_payment: PaymentAmount,
}

/// Executes purchases against a [`ListingBook`] and an asset ledger.
pub struct SettlementEngine {
    /// The marketplace's own account — the allowance spender sellers grant.
    marketplace: AccountId,
    /// Replay protection for client retries.
    idempotency: IdempotencyCache,
}

impl SettlementEngine {
    /// Create an engine settling via the given marketplace account.
    #[must_use]
    pub fn new(marketplace: AccountId, idempotency_cache_size: usize) -> Self {
        Self {
            marketplace,
            idempotency: IdempotencyCache::new(idempotency_cache_size),
        }
    }

    /// Create an engine from a [`MarketplaceConfig`].
    #[must_use]
    pub fn with_config(marketplace: AccountId, config: &MarketplaceConfig) -> Self {
        Self::new(marketplace, config.idempotency_cache_size)
    }

    /// The account sellers must grant their allowance to.
    #[must_use]
    pub fn marketplace(&self) -> AccountId {
        self.marketplace
    }

    /// Access the idempotency cache.
    #[must_use]
    pub fn idempotency(&self) -> &IdempotencyCache {
        &self.idempotency
    }

    /// Execute a purchase. See the crate docs for the precondition order.
    ///
    /// Replaying an already-settled `request_id` returns the original
    /// receipt without touching any state.
    ///
    /// # Errors
    /// - `InvalidArgument` if buyer and seller are the same account
    /// - `ListingNotFound` if the pair has no active listing
    /// - `InsufficientListingQuantity` if the listing advertises less
    /// - `InsufficientBalanceOrAllowance` if the seller's live balance or
    ///   marketplace allowance fall short
    /// - `ArithmeticOverflow` if `price × quantity` would wrap
    /// - `InsufficientPayment` if the tender is below the exact price, or
    ///   the buyer's payment account cannot cover the tender
    pub fn buy<L>(
        &mut self,
        book: &mut ListingBook,
        ledger: &mut L,
        request: &PurchaseRequest,
    ) -> Result<SettlementReceipt>
    where
        L: AssetLedger + PaymentLedger,
    {
        // Client retry after a timeout: answer from the receipt cache.
        if let Some(receipt) = self.idempotency.lookup(request.request_id) {
            tracing::debug!(request_id = %request.request_id, "replayed settled request");
            return Ok(receipt.clone());
        }

        if request.buyer == request.seller {
            return Err(MarketError::InvalidArgument {
                reason: "buyer and seller are the same account".into(),
            });
        }

        // 1. An active listing must exist for the pair.
        let listing = match book.get(request.token, request.seller) {
            Ok(listing) if listing.is_purchasable() => listing,
            _ => {
                return Err(MarketError::ListingNotFound {
                    token: request.token,
                    seller: request.seller,
                });
            }
        };
        let unit_price = listing.price_per_unit;
        let available = listing.available;

        // 2. The request must fit the advertised quantity.
        if request.quantity.is_zero() || request.quantity > available {
            return Err(MarketError::InsufficientListingQuantity {
                requested: request.quantity,
                available,
            });
        }

        // 3. Re-validate the live ledger. The advertised quantity can go
        //    stale the moment the seller moves tokens or revokes the
        //    allowance, so the stored value is never trusted here.
        let balance = ledger.balance_of(request.seller, request.token);
        let allowance = ledger.allowance(request.seller, self.marketplace, request.token);
        if balance < request.quantity || allowance < request.quantity {
            return Err(MarketError::InsufficientBalanceOrAllowance {
                needed: request.quantity,
                balance,
                allowance,
            });
        }

        // 4. Exact price, rejected rather than wrapped.
        let required = unit_price.total_for(request.quantity).ok_or_else(|| {
            MarketError::ArithmeticOverflow {
                context: "required payment (price per unit x quantity)".into(),
            }
        })?;

        // 5. The tender must cover the exact price...
        if request.tendered_payment < required {
            return Err(MarketError::InsufficientPayment {
                required,
                tendered: request.tendered_payment,
            });
        }
        // ...and the buyer must actually hold what they tendered.
        let buyer_funds = ledger.payment_balance_of(request.buyer);
        if buyer_funds < request.tendered_payment {
            return Err(MarketError::InsufficientPayment {
                required: request.tendered_payment,
                tendered: buyer_funds,
            });
        }

        // Commit. transfer_from is atomic on its own and re-checks balance
        // and allowance at execution time; if it rejects, nothing above
        // has mutated. The steps after it were fully validated against
        // the same snapshot this call exclusively holds.
        ledger.transfer_from(
            request.seller,
            self.marketplace,
            request.buyer,
            request.token,
            request.quantity,
        )?;
        ledger.debit(request.buyer, required)?;
        ledger.credit(request.seller, required);
        book.commit_fill(request.token, request.seller, request.quantity)?;

        // The surplus was never debited; report it as the refund.
        let refund = request
            .tendered_payment
            .checked_sub(required)
            .unwrap_or(PaymentAmount::ZERO);

        let receipt = SettlementReceipt {
            settlement_id: SettlementId::deterministic(request.request_id),
            request_id: request.request_id,
            token: request.token,
            seller: request.seller,
            buyer: request.buyer,
            quantity: request.quantity,
            unit_price,
            total_paid: required,
            refund,
            executed_at: Utc::now(),
        };
        self.idempotency.record(request.request_id, receipt.clone());

        tracing::info!(
            settlement_id = %receipt.settlement_id,
            token = %receipt.token,
            seller = %receipt.seller,
            buyer = %receipt.buyer,
            quantity = %receipt.quantity,
            total_paid = %receipt.total_paid,
            refund = %receipt.refund,
            "purchase settled"
        );
        Ok(receipt)
    }
}
