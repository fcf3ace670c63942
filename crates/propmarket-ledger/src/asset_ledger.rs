//! The Fungible Asset Ledger collaborator trait.
//!
//! The ledger owns token balances and per-owner spending allowances. The
//! marketplace only ever *requests* a conditional transfer; it relies on
//! the transfer's own atomicity guarantee and never mutates balances by
//! any other path.

use propmarket_types::{AccountId, Result, TokenAmount, TokenId};

/// Balances and allowances for every token type, owned externally.
pub trait AssetLedger {
    /// Current balance of `owner` in `token`, in token subunits.
    fn balance_of(&self, owner: AccountId, token: TokenId) -> TokenAmount;

    /// How much of `owner`'s `token` the `spender` may currently move on
    /// their behalf.
    fn allowance(&self, owner: AccountId, spender: AccountId, token: TokenId) -> TokenAmount;

    /// Move `quantity` of `token` from `owner` to `recipient`, spending
    /// `spender`'s allowance.
    ///
    /// Atomic: fails the whole call with
    /// [`propmarket_types::MarketError::InsufficientBalanceOrAllowance`]
    /// if balance or allowance is insufficient *at execution time*, leaving
    /// all state untouched. On success the allowance decreases by
    /// `quantity`.
    fn transfer_from(
        &mut self,
        owner: AccountId,
        spender: AccountId,
        recipient: AccountId,
        token: TokenId,
        quantity: TokenAmount,
    ) -> Result<()>;
}
