//! Payment-currency accounts.
//!
//! Settlement releases the exact required payment to the seller and leaves
//! any tendered surplus with the buyer. The engine pre-validates the
//! buyer's funds, so a failed [`PaymentLedger::debit`] after validation
//! indicates a broken invariant, not a caller mistake.

use propmarket_types::{AccountId, PaymentAmount, Result};

/// Per-account payment-currency balances.
pub trait PaymentLedger {
    /// Current payment balance of `account`, in payment subunits.
    fn payment_balance_of(&self, account: AccountId) -> PaymentAmount;

    /// Remove `amount` from `account`.
    ///
    /// Fails with [`propmarket_types::MarketError::InsufficientPayment`]
    /// (carrying the debit amount as `required` and the account's balance
    /// as `tendered`) if the account cannot cover it; the balance is then
    /// unchanged.
    fn debit(&mut self, account: AccountId, amount: PaymentAmount) -> Result<()>;

    /// Add `amount` to `account`.
    fn credit(&mut self, account: AccountId, amount: PaymentAmount);
}
