//! # propmarket-settlement
//!
//! **Settlement Plane**: purchase validation, atomic payment-and-transfer
//! execution, and idempotent receipts.
//!
//! ## Purchase flow
//!
//! [`SettlementEngine::buy`] checks, in order, aborting on the first
//! failure with no state change:
//!
//! 1. An active listing exists for (token, seller)
//! 2. The requested quantity fits the listing's advertised quantity
//! 3. The seller's *live* balance and marketplace allowance cover it
//!    (the advertised quantity is never trusted at settlement)
//! 4. `required = price × quantity` computes without overflow
//! 5. The tendered payment covers `required`, and the buyer holds it
//!
//! Then, as one unit: ledger `transfer_from` (atomic on its own), payment
//! debit/credit of exactly `required` (the surplus never leaves the
//! buyer), listing decrement with deactivate-on-exhaustion, and a
//! [`propmarket_types::SettlementReceipt`].
//!
//! Replaying a settled [`propmarket_types::RequestId`] returns the
//! original receipt without re-executing — the safety valve for client
//! retries after a timeout.
//!
//! [`Marketplace`] bundles book + ledger + engine into the single-writer
//! facade the presentation layer talks to.

pub mod engine;
pub mod idempotency;
pub mod market;

pub use engine::{PurchaseRequest, SettlementEngine};
pub use idempotency::IdempotencyCache;
pub use market::Marketplace;
