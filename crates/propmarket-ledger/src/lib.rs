//! # propmarket-ledger
//!
//! **Asset Plane**: the seam to the externally-owned Fungible Asset Ledger,
//! a reference in-memory implementation, and the read-only property
//! registry consumed for display.
//!
//! ## Architecture
//!
//! The settlement engine never mutates balances directly. It talks to two
//! narrow traits:
//!
//! 1. [`AssetLedger`]: `balance_of` / `allowance` / `transfer_from` — the
//!    conditional-transfer primitive whose own atomicity the engine trusts
//! 2. [`PaymentLedger`]: payment-currency accounts (debit / credit)
//!
//! [`InMemoryLedger`] implements both with ERC-20 semantics: a
//! `transfer_from` fails the whole call if balance or allowance is
//! insufficient at execution time, and decrements the allowance on success.
//!
//! [`PropertyRegistry`] is the Property Registry collaborator surface:
//! enumeration of known tokens and their display metadata. Token creation
//! and metadata management live outside this workspace.

pub mod asset_ledger;
pub mod memory;
pub mod payments;
pub mod registry;

pub use asset_ledger::AssetLedger;
pub use memory::InMemoryLedger;
pub use payments::PaymentLedger;
pub use registry::{PropertyRecord, PropertyRegistry};
