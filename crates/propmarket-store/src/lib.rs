//! # propmarket-store
//!
//! **Listing Plane**: the store of record for all sale listings.
//!
//! [`ListingBook`] keys listings by (token, seller) and keeps a secondary
//! token → sellers index so "all active listings for a token" enumerates in
//! publish order without scanning the whole map. The book is the exclusive
//! owner of every `Listing` record; the settlement engine applies fills
//! through [`ListingBook::commit_fill`], never by direct mutation.
//!
//! Publishing performs no balance or allowance check — a listing is an
//! intent declaration, not a reservation. Reservation happens at
//! settlement, which re-validates the live ledger, so one seller can hold
//! several concurrent listings without double-reserving anything.

pub mod listing_book;

pub use listing_book::ListingBook;
