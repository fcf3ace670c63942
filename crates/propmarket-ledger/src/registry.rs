//! Read-only property registry surface.
//!
//! The Property Registry collaborator owns token creation and metadata
//! management; settlement never depends on it. What the presentation layer
//! consumes from it is the enumeration of known tokens, their display
//! names, and whole-unit formatting of subunit amounts.

use std::collections::HashMap;

use propmarket_types::{MarketError, Result, TokenAmount, TokenId, constants};
use rust_decimal::Decimal;

/// Display metadata for one property token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRecord {
    pub token: TokenId,
    /// Human-readable property name (e.g., "12 Elm Street").
    pub name: String,
    /// Ticker-style symbol.
    pub symbol: String,
    /// Smallest-subunit exponent of the token.
    pub decimals: u32,
    /// Off-system metadata pointer.
    pub metadata_uri: String,
    /// Total minted supply, in subunits.
    pub total_supply: TokenAmount,
}

impl PropertyRecord {
    /// A record with default decimals and empty metadata.
    #[must_use]
    pub fn basic(token: TokenId, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            token,
            name: name.into(),
            symbol: symbol.into(),
            decimals: constants::DEFAULT_TOKEN_DECIMALS,
            metadata_uri: String::new(),
            total_supply: TokenAmount::ZERO,
        }
    }
}

/// In-memory view of the registry, enumerable in registration order.
#[derive(Debug, Default)]
pub struct PropertyRegistry {
    records: HashMap<TokenId, PropertyRecord>,
    order: Vec<TokenId>,
}

impl PropertyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or update a record. Registration order is kept for enumeration;
    /// an update keeps the token's original position.
    pub fn register(&mut self, record: PropertyRecord) {
        if !self.records.contains_key(&record.token) {
            self.order.push(record.token);
        }
        self.records.insert(record.token, record);
    }

    /// Look up one token's record.
    pub fn get(&self, token: TokenId) -> Result<&PropertyRecord> {
        self.records
            .get(&token)
            .ok_or(MarketError::UnknownToken(token))
    }

    /// Whether the token is known to the registry.
    #[must_use]
    pub fn is_known(&self, token: TokenId) -> bool {
        self.records.contains_key(&token)
    }

    /// All records, in registration order.
    pub fn all(&self) -> impl Iterator<Item = &PropertyRecord> {
        self.order.iter().filter_map(|token| self.records.get(token))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Render a subunit amount of `token` in whole units for display.
    pub fn format_units(&self, token: TokenId, amount: TokenAmount) -> Result<String> {
        let record = self.get(token)?;
        Ok(format_subunits(amount.0, record.decimals))
    }
}

/// Whole-unit rendering of a raw subunit count. Falls back to the raw
/// integer when the value exceeds decimal range (display never fails).
#[must_use]
pub fn format_subunits(raw: u128, decimals: u32) -> String {
    if let Ok(signed) = i128::try_from(raw) {
        if let Ok(value) = Decimal::try_from_i128_with_scale(signed, decimals) {
            return value.normalize().to_string();
        }
    }
    raw.to_string()
}
