//! System-wide constants for the Propmarket engine.

/// Settlement idempotency cache size (number of request ids to remember).
pub const SETTLEMENT_IDEMPOTENCY_CACHE_SIZE: usize = 100_000;

/// Default number of decimals the payment currency carries
/// (smallest-subunit exponent).
pub const DEFAULT_PAYMENT_DECIMALS: u32 = 18;

/// Default number of decimals a property token carries when the registry
/// record does not say otherwise.
pub const DEFAULT_TOKEN_DECIMALS: u32 = 18;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Propmarket";
