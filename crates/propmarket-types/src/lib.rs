//! # propmarket-types
//!
//! Shared types, errors, and configuration for the **Propmarket**
//! listing & settlement engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`TokenId`], [`AccountId`], [`RequestId`], [`SettlementId`]
//! - **Amounts**: [`TokenAmount`], [`PaymentAmount`] — integer smallest-subunit
//!   accounting with checked arithmetic only
//! - **Listing model**: [`Listing`]
//! - **Receipt model**: [`SettlementReceipt`]
//! - **Configuration**: [`MarketplaceConfig`]
//! - **Errors**: [`MarketError`] with `PM_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod amount;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod listing;
pub mod receipt;

// Re-export all primary types at crate root for ergonomic imports:
//   use propmarket_types::{Listing, TokenAmount, MarketError, ...};

pub use amount::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use listing::*;
pub use receipt::*;

// Constants are accessed via `propmarket_types::constants::FOO`
// (not re-exported to avoid name collisions).
