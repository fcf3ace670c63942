//! Configuration for a Propmarket marketplace instance.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Tunable settings for one marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    /// How many settled request ids the idempotency cache retains before
    /// evicting the oldest.
    pub idempotency_cache_size: usize,
    /// Smallest-subunit exponent of the payment currency. Display only;
    /// settlement math never scales.
    pub payment_decimals: u32,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            idempotency_cache_size: constants::SETTLEMENT_IDEMPOTENCY_CACHE_SIZE,
            payment_decimals: constants::DEFAULT_PAYMENT_DECIMALS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_come_from_constants() {
        let cfg = MarketplaceConfig::default();
        assert_eq!(
            cfg.idempotency_cache_size,
            constants::SETTLEMENT_IDEMPOTENCY_CACHE_SIZE
        );
        assert_eq!(cfg.payment_decimals, 18);
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = MarketplaceConfig {
            idempotency_cache_size: 64,
            payment_decimals: 6,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: MarketplaceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.idempotency_cache_size, back.idempotency_cache_size);
        assert_eq!(cfg.payment_decimals, back.payment_decimals);
    }
}
