//! Settlement receipts — the immutable record of an executed purchase.
//!
//! A [`SettlementReceipt`] is emitted exactly once per settled purchase
//! request. Retrying a request returns the original receipt, recognizable
//! by its deterministic [`SettlementId`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, PaymentAmount, RequestId, SettlementId, TokenAmount, TokenId};

/// Immutable record of one atomic payment-and-transfer settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReceipt {
    /// Deterministic settlement identity, derived from `request_id`.
    pub settlement_id: SettlementId,
    /// The caller-supplied request id this settlement answered.
    pub request_id: RequestId,
    /// The token that changed hands.
    pub token: TokenId,
    /// The listing's seller.
    pub seller: AccountId,
    /// The purchasing party.
    pub buyer: AccountId,
    /// Token subunits transferred from seller to buyer.
    pub quantity: TokenAmount,
    /// The listing's per-subunit price at execution.
    pub unit_price: PaymentAmount,
    /// Exact payment released to the seller (`unit_price × quantity`).
    pub total_paid: PaymentAmount,
    /// Surplus of the tendered payment over `total_paid`, retained by
    /// the buyer. Zero for an exact tender.
    pub refund: PaymentAmount,
    /// When the settlement committed.
    pub executed_at: DateTime<Utc>,
}

impl SettlementReceipt {
    /// Whether the buyer over-tendered and kept the surplus.
    #[must_use]
    pub fn had_refund(&self) -> bool {
        !self.refund.is_zero()
    }
}

impl std::fmt::Display for SettlementReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Settlement[{}] {} x {} from {} to {} @ {} = {} (refund {})",
            self.settlement_id,
            self.quantity,
            self.token,
            self.seller,
            self.buyer,
            self.unit_price,
            self.total_paid,
            self.refund,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_receipt(refund: u128) -> SettlementReceipt {
        let request_id = RequestId::new();
        SettlementReceipt {
            settlement_id: SettlementId::deterministic(request_id),
            request_id,
            token: TokenId([1u8; 20]),
            seller: AccountId([2u8; 20]),
            buyer: AccountId([3u8; 20]),
            quantity: TokenAmount(30),
            unit_price: PaymentAmount(2),
            total_paid: PaymentAmount(60),
            refund: PaymentAmount(refund),
            executed_at: Utc::now(),
        }
    }

    #[test]
    fn exact_tender_has_no_refund() {
        assert!(!make_receipt(0).had_refund());
        assert!(make_receipt(5).had_refund());
    }

    #[test]
    fn receipt_display_names_parties() {
        let receipt = make_receipt(0);
        let s = format!("{receipt}");
        assert!(s.contains("tok:"));
        assert!(s.contains("acct:"));
        assert!(s.contains("60"));
    }

    #[test]
    fn receipt_serde_roundtrip() {
        let receipt = make_receipt(3);
        let json = serde_json::to_string(&receipt).unwrap();
        let back: SettlementReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(receipt, back);
    }
}
