//! In-memory reference ledger with ERC-20 semantics.
//!
//! Hosts embedding the engine against a real external ledger implement
//! [`AssetLedger`] / [`PaymentLedger`] over their own primitive; this
//! implementation backs tests and single-process deployments.

use std::collections::HashMap;

use propmarket_types::{AccountId, MarketError, PaymentAmount, Result, TokenAmount, TokenId};

use crate::asset_ledger::AssetLedger;
use crate::payments::PaymentLedger;

/// Token balances, spending allowances, and payment accounts in one place.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    /// Per-(owner, token) balances.
    tokens: HashMap<(AccountId, TokenId), TokenAmount>,
    /// Per-(owner, spender, token) allowances.
    allowances: HashMap<(AccountId, AccountId, TokenId), TokenAmount>,
    /// Per-account payment-currency balances.
    payments: HashMap<AccountId, PaymentAmount>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `quantity` of `token` into `owner`'s balance.
    pub fn mint(&mut self, owner: AccountId, token: TokenId, quantity: TokenAmount) {
        let entry = self.tokens.entry((owner, token)).or_default();
        *entry = entry
            .checked_add(quantity)
            .unwrap_or(TokenAmount(u128::MAX));
    }

    /// Set `spender`'s allowance over `owner`'s `token` to exactly
    /// `quantity` (ERC-20 `approve`: a grant overwrites, never accumulates).
    pub fn approve(
        &mut self,
        owner: AccountId,
        spender: AccountId,
        token: TokenId,
        quantity: TokenAmount,
    ) {
        self.allowances.insert((owner, spender, token), quantity);
    }

    /// Fund `account`'s payment balance.
    pub fn deposit_payment(&mut self, account: AccountId, amount: PaymentAmount) {
        let entry = self.payments.entry(account).or_default();
        *entry = entry
            .checked_add(amount)
            .unwrap_or(PaymentAmount(u128::MAX));
    }

    /// Sum of all balances of `token` across owners (conservation checks).
    #[must_use]
    pub fn total_token_supply(&self, token: TokenId) -> TokenAmount {
        TokenAmount(
            self.tokens
                .iter()
                .filter(|((_, t), _)| *t == token)
                .map(|(_, amount)| amount.0)
                .sum(),
        )
    }

    /// Sum of all payment balances across accounts (conservation checks).
    #[must_use]
    pub fn total_payment_supply(&self) -> PaymentAmount {
        PaymentAmount(self.payments.values().map(|amount| amount.0).sum())
    }
}

impl AssetLedger for InMemoryLedger {
    fn balance_of(&self, owner: AccountId, token: TokenId) -> TokenAmount {
        self.tokens.get(&(owner, token)).copied().unwrap_or_default()
    }

    fn allowance(&self, owner: AccountId, spender: AccountId, token: TokenId) -> TokenAmount {
        self.allowances
            .get(&(owner, spender, token))
            .copied()
            .unwrap_or_default()
    }

    fn transfer_from(
        &mut self,
        owner: AccountId,
        spender: AccountId,
        recipient: AccountId,
        token: TokenId,
        quantity: TokenAmount,
    ) -> Result<()> {
        let balance = self.balance_of(owner, token);
        let allowance = self.allowance(owner, spender, token);

        // Validate both preconditions before touching anything.
        if balance < quantity || allowance < quantity {
            return Err(MarketError::InsufficientBalanceOrAllowance {
                needed: quantity,
                balance,
                allowance,
            });
        }

        // Checked subs cannot fail after the guard above.
        let remaining_balance = balance
            .checked_sub(quantity)
            .ok_or_else(|| MarketError::Internal("balance underflow after guard".into()))?;
        let remaining_allowance = allowance
            .checked_sub(quantity)
            .ok_or_else(|| MarketError::Internal("allowance underflow after guard".into()))?;

        self.tokens.insert((owner, token), remaining_balance);
        self.allowances
            .insert((owner, spender, token), remaining_allowance);

        let recipient_balance = self.tokens.entry((recipient, token)).or_default();
        *recipient_balance = recipient_balance
            .checked_add(quantity)
            .ok_or_else(|| MarketError::Internal("recipient balance overflow".into()))?;

        tracing::debug!(
            %owner, %recipient, %token, %quantity,
            "transfer_from executed"
        );
        Ok(())
    }
}

impl PaymentLedger for InMemoryLedger {
    fn payment_balance_of(&self, account: AccountId) -> PaymentAmount {
        self.payments.get(&account).copied().unwrap_or_default()
    }

    fn debit(&mut self, account: AccountId, amount: PaymentAmount) -> Result<()> {
        let balance = self.payment_balance_of(account);
        let remaining = balance
            .checked_sub(amount)
            .ok_or(MarketError::InsufficientPayment {
                required: amount,
                tendered: balance,
            })?;
        self.payments.insert(account, remaining);
        Ok(())
    }

    fn credit(&mut self, account: AccountId, amount: PaymentAmount) {
        let entry = self.payments.entry(account).or_default();
        *entry = entry
            .checked_add(amount)
            .unwrap_or(PaymentAmount(u128::MAX));
    }
}
