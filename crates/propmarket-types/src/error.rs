//! Error types for the Propmarket engine.
//!
//! All errors use the `PM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Listing errors
//! - 2xx: Settlement errors
//! - 3xx: Ledger / registry errors
//! - 9xx: General / internal errors
//!
//! Every variant carries the quantities the caller needs to remedy the
//! condition (re-approve allowance, lower the requested quantity, top up
//! payment). No error is retried inside the engine, and no error leaves
//! partially-applied state behind.

use thiserror::Error;

use crate::{AccountId, PaymentAmount, TokenAmount, TokenId};

/// Central error enum for all Propmarket operations.
#[derive(Debug, Error)]
pub enum MarketError {
    // =================================================================
    // Listing Errors (1xx)
    // =================================================================
    /// No active listing exists for the (token, seller) pair.
    #[error("PM_ERR_100: No active listing for {token} from {seller}")]
    ListingNotFound { token: TokenId, seller: AccountId },

    /// A request failed structural validation (non-positive price or
    /// quantity, buyer equals seller, etc.).
    #[error("PM_ERR_101: Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The listing advertises fewer tokens than requested.
    #[error(
        "PM_ERR_102: Insufficient listing quantity: requested {requested}, available {available}"
    )]
    InsufficientListingQuantity {
        requested: TokenAmount,
        available: TokenAmount,
    },

    // =================================================================
    // Settlement Errors (2xx)
    // =================================================================
    /// Re-validation at settlement found the seller's live balance or
    /// marketplace allowance below the requested quantity.
    #[error(
        "PM_ERR_200: Insufficient seller balance or allowance: need {needed}, balance {balance}, allowance {allowance}"
    )]
    InsufficientBalanceOrAllowance {
        needed: TokenAmount,
        balance: TokenAmount,
        allowance: TokenAmount,
    },

    /// The tendered payment does not cover the exact required payment,
    /// or the buyer's payment account cannot cover the tender.
    #[error("PM_ERR_201: Insufficient payment: required {required}, tendered {tendered}")]
    InsufficientPayment {
        required: PaymentAmount,
        tendered: PaymentAmount,
    },

    /// A payment computation would wrap. The purchase is rejected rather
    /// than charging a truncated amount.
    #[error("PM_ERR_202: Arithmetic overflow computing {context}")]
    ArithmeticOverflow { context: String },

    /// A conflicting writer invalidated this operation's snapshot.
    #[error("PM_ERR_203: Concurrent modification: {reason}")]
    ConcurrentModification { reason: String },

    // =================================================================
    // Ledger / Registry Errors (3xx)
    // =================================================================
    /// The token is not known to the property registry.
    #[error("PM_ERR_300: Unknown token {0}")]
    UnknownToken(TokenId),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("PM_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("PM_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("PM_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (disk, network).
    #[error("PM_ERR_903: I/O error: {0}")]
    Io(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MarketError>;

// Conversion from std::io::Error
impl From<std::io::Error> for MarketError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = MarketError::ListingNotFound {
            token: TokenId([1u8; 20]),
            seller: AccountId([2u8; 20]),
        };
        let msg = format!("{err}");
        assert!(msg.starts_with("PM_ERR_100"), "Got: {msg}");
    }

    #[test]
    fn quantity_error_carries_amounts() {
        let err = MarketError::InsufficientListingQuantity {
            requested: TokenAmount(80),
            available: TokenAmount(70),
        };
        let msg = format!("{err}");
        assert!(msg.contains("PM_ERR_102"));
        assert!(msg.contains("80"));
        assert!(msg.contains("70"));
    }

    #[test]
    fn payment_error_carries_amounts() {
        let err = MarketError::InsufficientPayment {
            required: PaymentAmount(60),
            tendered: PaymentAmount(50),
        };
        let msg = format!("{err}");
        assert!(msg.contains("PM_ERR_201"));
        assert!(msg.contains("60"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn all_errors_have_pm_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(MarketError::InvalidArgument {
                reason: "test".into(),
            }),
            Box::new(MarketError::ArithmeticOverflow {
                context: "required payment".into(),
            }),
            Box::new(MarketError::ConcurrentModification {
                reason: "test".into(),
            }),
            Box::new(MarketError::UnknownToken(TokenId([0u8; 20]))),
            Box::new(MarketError::Internal("test".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("PM_ERR_"),
                "Error missing PM_ERR_ prefix: {msg}"
            );
        }
    }
}
