//! End-to-end tests across the listing store, the ledger, and the
//! settlement engine, driven through the `Marketplace` facade.
//!
//! They exercise the full publish → approve → buy lifecycle in realistic
//! scenarios: exact settlement, overpayment, multi-seller competition for
//! one token, replacement semantics, stale-listing re-validation, retry
//! idempotency, and conservation under concurrent buyers.

use std::sync::{Arc, Mutex};

use propmarket_ledger::{AssetLedger, InMemoryLedger, PaymentLedger};
use propmarket_settlement::{Marketplace, PurchaseRequest};
use propmarket_types::{
    AccountId, MarketError, PaymentAmount, RequestId, TokenAmount, TokenId,
};

const ELM_STREET: TokenId = TokenId([0x11; 20]);
const SELLER: AccountId = AccountId([0xaa; 20]);
const SECOND_SELLER: AccountId = AccountId([0xab; 20]);
const BUYER: AccountId = AccountId([0xbb; 20]);
const MARKET: AccountId = AccountId([0xff; 20]);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Marketplace with one funded seller (100 tokens, full allowance) and one
/// funded buyer (1000 payment subunits).
fn funded_marketplace() -> Marketplace<InMemoryLedger> {
    init_tracing();
    let mut ledger = InMemoryLedger::new();
    ledger.mint(SELLER, ELM_STREET, TokenAmount(100));
    ledger.approve(SELLER, MARKET, ELM_STREET, TokenAmount(100));
    ledger.deposit_payment(BUYER, PaymentAmount(1000));
    Marketplace::new(MARKET, ledger)
}

fn buy_request(
    seller: AccountId,
    buyer: AccountId,
    quantity: u128,
    tendered: u128,
) -> PurchaseRequest {
    PurchaseRequest {
        request_id: RequestId::new(),
        token: ELM_STREET,
        seller,
        buyer,
        quantity: TokenAmount(quantity),
        tendered_payment: PaymentAmount(tendered),
    }
}

// =============================================================================
// Exact settlement and refunds
// =============================================================================

#[test]
fn e2e_exact_settlement_moves_exact_amounts() {
    let mut market = funded_marketplace();
    market
        .publish(ELM_STREET, SELLER, PaymentAmount(2), TokenAmount(100))
        .unwrap();

    let receipt = market.buy(&buy_request(SELLER, BUYER, 30, 60)).unwrap();

    assert_eq!(receipt.quantity, TokenAmount(30));
    assert_eq!(receipt.unit_price, PaymentAmount(2));
    assert_eq!(receipt.total_paid, PaymentAmount(60));
    assert_eq!(receipt.refund, PaymentAmount::ZERO);

    let ledger = market.ledger();
    assert_eq!(ledger.balance_of(SELLER, ELM_STREET), TokenAmount(70));
    assert_eq!(ledger.balance_of(BUYER, ELM_STREET), TokenAmount(30));
    assert_eq!(ledger.payment_balance_of(SELLER), PaymentAmount(60));
    assert_eq!(ledger.payment_balance_of(BUYER), PaymentAmount(940));
}

#[test]
fn e2e_overpayment_surplus_refunded_to_buyer() {
    let mut market = funded_marketplace();
    market
        .publish(ELM_STREET, SELLER, PaymentAmount(2), TokenAmount(100))
        .unwrap();

    // Tender 100 for a 60 purchase: exactly 40 stays with the buyer.
    let receipt = market.buy(&buy_request(SELLER, BUYER, 30, 100)).unwrap();

    assert_eq!(receipt.total_paid, PaymentAmount(60));
    assert_eq!(receipt.refund, PaymentAmount(40));
    assert_eq!(market.ledger().payment_balance_of(BUYER), PaymentAmount(940));
    assert_eq!(market.ledger().payment_balance_of(SELLER), PaymentAmount(60));
}

// =============================================================================
// The concrete scenario from the design discussion: 100 units at 2 each
// =============================================================================

#[test]
fn e2e_partial_fill_then_overrequest() {
    let mut market = funded_marketplace();
    market
        .publish(ELM_STREET, SELLER, PaymentAmount(2), TokenAmount(100))
        .unwrap();

    // First purchase: 30 units for exactly 60.
    let receipt = market.buy(&buy_request(SELLER, BUYER, 30, 60)).unwrap();
    assert_eq!(receipt.total_paid, PaymentAmount(60));
    assert_eq!(
        market.get(ELM_STREET, SELLER).unwrap().available,
        TokenAmount(70)
    );
    assert_eq!(market.ledger().payment_balance_of(SELLER), PaymentAmount(60));
    assert_eq!(market.ledger().balance_of(BUYER, ELM_STREET), TokenAmount(30));

    // Second purchase asks for 80 of the remaining 70: rejected, no change.
    let err = market.buy(&buy_request(SELLER, BUYER, 80, 160)).unwrap_err();
    assert!(matches!(
        err,
        MarketError::InsufficientListingQuantity {
            requested: TokenAmount(80),
            available: TokenAmount(70),
        }
    ));
    assert_eq!(
        market.get(ELM_STREET, SELLER).unwrap().available,
        TokenAmount(70)
    );
    assert_eq!(market.ledger().balance_of(BUYER, ELM_STREET), TokenAmount(30));
}

// =============================================================================
// No partial state on failure
// =============================================================================

#[test]
fn e2e_failed_preconditions_leave_state_identical() {
    let mut market = funded_marketplace();
    market
        .publish(ELM_STREET, SELLER, PaymentAmount(2), TokenAmount(100))
        .unwrap();

    let snapshot = |m: &Marketplace<InMemoryLedger>| {
        (
            m.get(ELM_STREET, SELLER).unwrap().available,
            m.ledger().balance_of(SELLER, ELM_STREET),
            m.ledger().balance_of(BUYER, ELM_STREET),
            m.ledger().payment_balance_of(SELLER),
            m.ledger().payment_balance_of(BUYER),
            m.ledger().allowance(SELLER, MARKET, ELM_STREET),
        )
    };
    let before = snapshot(&market);

    // Short tender.
    assert!(market.buy(&buy_request(SELLER, BUYER, 30, 59)).is_err());
    // Over-request.
    assert!(market.buy(&buy_request(SELLER, BUYER, 101, 202)).is_err());
    // Unknown seller.
    assert!(
        market
            .buy(&buy_request(AccountId([0x01; 20]), BUYER, 1, 2))
            .is_err()
    );

    assert_eq!(snapshot(&market), before);
}

#[test]
fn e2e_allowance_revoked_between_publish_and_buy() {
    let mut market = funded_marketplace();
    market
        .publish(ELM_STREET, SELLER, PaymentAmount(2), TokenAmount(100))
        .unwrap();

    // Seller revokes the marketplace allowance after listing.
    market
        .ledger_mut()
        .approve(SELLER, MARKET, ELM_STREET, TokenAmount::ZERO);

    let err = market.buy(&buy_request(SELLER, BUYER, 30, 60)).unwrap_err();
    assert!(matches!(
        err,
        MarketError::InsufficientBalanceOrAllowance {
            allowance: TokenAmount(0),
            ..
        }
    ));

    // Listing still advertises 100 and remains purchasable once the
    // seller re-approves.
    assert_eq!(
        market.get(ELM_STREET, SELLER).unwrap().available,
        TokenAmount(100)
    );
    market
        .ledger_mut()
        .approve(SELLER, MARKET, ELM_STREET, TokenAmount(100));
    assert!(market.buy(&buy_request(SELLER, BUYER, 30, 60)).is_ok());
}

// =============================================================================
// Exhaustion and replacement
// =============================================================================

#[test]
fn e2e_exhaustion_deactivates_and_blocks_further_buys() {
    let mut market = funded_marketplace();
    market
        .publish(ELM_STREET, SELLER, PaymentAmount(2), TokenAmount(100))
        .unwrap();

    market.buy(&buy_request(SELLER, BUYER, 100, 200)).unwrap();

    assert!(!market.is_listed(ELM_STREET));
    let listing = market.get(ELM_STREET, SELLER).unwrap();
    assert!(!listing.active);
    assert_eq!(listing.available, TokenAmount::ZERO);

    let err = market.buy(&buy_request(SELLER, BUYER, 1, 2)).unwrap_err();
    assert!(matches!(err, MarketError::ListingNotFound { .. }));
}

#[test]
fn e2e_republish_discards_old_price_and_quantity() {
    let mut market = funded_marketplace();
    market
        .publish(ELM_STREET, SELLER, PaymentAmount(2), TokenAmount(100))
        .unwrap();
    // Seller replaces: 40 units at 5 each.
    market
        .publish(ELM_STREET, SELLER, PaymentAmount(5), TokenAmount(40))
        .unwrap();

    // A buy priced at the old 2-per-unit rate no longer covers.
    let err = market.buy(&buy_request(SELLER, BUYER, 30, 60)).unwrap_err();
    assert!(matches!(
        err,
        MarketError::InsufficientPayment {
            required: PaymentAmount(150),
            tendered: PaymentAmount(60),
        }
    ));

    // At the new price it settles, against the new quantity.
    let receipt = market.buy(&buy_request(SELLER, BUYER, 30, 150)).unwrap();
    assert_eq!(receipt.unit_price, PaymentAmount(5));
    assert_eq!(
        market.get(ELM_STREET, SELLER).unwrap().available,
        TokenAmount(10)
    );
}

// =============================================================================
// Multi-seller competition for the same token
// =============================================================================

#[test]
fn e2e_two_sellers_compete_for_one_token() {
    let mut market = funded_marketplace();
    market
        .ledger_mut()
        .mint(SECOND_SELLER, ELM_STREET, TokenAmount(50));
    market
        .ledger_mut()
        .approve(SECOND_SELLER, MARKET, ELM_STREET, TokenAmount(50));

    market
        .publish(ELM_STREET, SELLER, PaymentAmount(2), TokenAmount(100))
        .unwrap();
    market
        .publish(ELM_STREET, SECOND_SELLER, PaymentAmount(1), TokenAmount(50))
        .unwrap();

    // Enumeration lists both, in publish order.
    let listings = market.active_listings_for(ELM_STREET);
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].seller, SELLER);
    assert_eq!(listings[1].seller, SECOND_SELLER);

    // Buying from the cheaper seller leaves the other listing alone.
    market
        .buy(&buy_request(SECOND_SELLER, BUYER, 50, 50))
        .unwrap();
    assert!(market.is_listed(ELM_STREET));
    let listings = market.active_listings_for(ELM_STREET);
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].seller, SELLER);
    assert_eq!(listings[0].available, TokenAmount(100));

    assert_eq!(
        market.ledger().balance_of(BUYER, ELM_STREET),
        TokenAmount(50)
    );
    assert_eq!(
        market.ledger().payment_balance_of(SECOND_SELLER),
        PaymentAmount(50)
    );
}

// =============================================================================
// Retry idempotency
// =============================================================================

#[test]
fn e2e_client_retry_cannot_double_settle() {
    let mut market = funded_marketplace();
    market
        .publish(ELM_STREET, SELLER, PaymentAmount(2), TokenAmount(100))
        .unwrap();

    let request = buy_request(SELLER, BUYER, 30, 60);
    let first = market.buy(&request).unwrap();
    // Client times out and retries the identical request.
    let second = market.buy(&request).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.settlement_id, second.settlement_id);
    assert_eq!(market.ledger().balance_of(BUYER, ELM_STREET), TokenAmount(30));
    assert_eq!(market.ledger().payment_balance_of(SELLER), PaymentAmount(60));
}

// =============================================================================
// Conservation under concurrent buyers
// =============================================================================

#[test]
fn e2e_concurrent_buyers_conserve_supply() {
    init_tracing();
    let mut ledger = InMemoryLedger::new();
    ledger.mint(SELLER, ELM_STREET, TokenAmount(100));
    ledger.approve(SELLER, MARKET, ELM_STREET, TokenAmount(100));

    let buyers: Vec<AccountId> = (0..8u8).map(|i| AccountId([i + 1; 20])).collect();
    for buyer in &buyers {
        ledger.deposit_payment(*buyer, PaymentAmount(1000));
    }
    let initial_payment_supply = ledger.total_payment_supply();

    let mut market = Marketplace::new(MARKET, ledger);
    market
        .publish(ELM_STREET, SELLER, PaymentAmount(2), TokenAmount(100))
        .unwrap();
    let market = Arc::new(Mutex::new(market));

    // 8 buyers, 5 attempts of 5 units each: demand (200) exceeds supply
    // (100), so later attempts must fail cleanly once exhausted.
    let handles: Vec<_> = buyers
        .iter()
        .map(|&buyer| {
            let market = Arc::clone(&market);
            std::thread::spawn(move || {
                let mut bought = 0u128;
                for _ in 0..5 {
                    let request = buy_request(SELLER, buyer, 5, 10);
                    let mut market = market.lock().unwrap();
                    match market.buy(&request) {
                        Ok(receipt) => bought += receipt.quantity.0,
                        Err(
                            MarketError::ListingNotFound { .. }
                            | MarketError::InsufficientListingQuantity { .. },
                        ) => {}
                        Err(other) => panic!("unexpected settlement error: {other}"),
                    }
                }
                bought
            })
        })
        .collect();

    let total_bought: u128 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(total_bought, 100, "exactly the listed supply settled");

    let market = market.lock().unwrap();
    let ledger = market.ledger();

    // Supply conserved across token and payment sides.
    assert_eq!(ledger.total_token_supply(ELM_STREET), TokenAmount(100));
    assert_eq!(ledger.total_payment_supply(), initial_payment_supply);
    assert_eq!(ledger.balance_of(SELLER, ELM_STREET), TokenAmount::ZERO);
    assert_eq!(ledger.payment_balance_of(SELLER), PaymentAmount(200));
    assert!(!market.is_listed(ELM_STREET));
}
