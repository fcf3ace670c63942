//! Identifiers used throughout Propmarket.
//!
//! Tokens and parties are identified by 20-byte addresses, matching the
//! ledger's addressing scheme. Purchase requests carry a caller-supplied
//! UUIDv7 [`RequestId`]; the resulting [`SettlementId`] is derived from it
//! deterministically so a client retry maps to the same settlement identity.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TokenId
// ---------------------------------------------------------------------------

/// Identifier of one fungible property token type (20-byte address).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TokenId(pub [u8; 20]);

impl TokenId {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tok:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Identifier of a party (seller, buyer, or the marketplace itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 20]);

impl AccountId {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "acct:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// RequestId
// ---------------------------------------------------------------------------

/// Caller-supplied purchase request identifier. Uses UUIDv7 so ids sort by
/// submission time; the settlement engine uses it for replay deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SettlementId
// ---------------------------------------------------------------------------

/// Globally unique settlement identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SettlementId(pub Uuid);

impl SettlementId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Deterministic `SettlementId` from the purchase request id.
    ///
    /// A client retrying a timed-out `buy` with the same [`RequestId`]
    /// produces the **exact same** settlement identity, so replays are
    /// recognizable end to end.
    #[must_use]
    pub fn deterministic(request_id: RequestId) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"propmarket:settlement_id:v1:");
        hasher.update(request_id.0.as_bytes());
        let hash = hasher.finalize();
        let bytes: [u8; 16] = hash[..16].try_into().expect("SHA-256 produces 32 bytes");
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for SettlementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SettlementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stl:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_uniqueness() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn request_id_ordering() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert!(a < b);
    }

    #[test]
    fn settlement_id_deterministic() {
        let req = RequestId::new();
        let a = SettlementId::deterministic(req);
        let b = SettlementId::deterministic(req);
        assert_eq!(a, b);
        let c = SettlementId::deterministic(RequestId::new());
        assert_ne!(a, c);
    }

    #[test]
    fn token_id_display_is_hex_prefixed() {
        let tok = TokenId([0xab; 20]);
        let s = format!("{tok}");
        assert!(s.starts_with("tok:abab"), "Got: {s}");
        assert_eq!(tok.short(), "abababab");
    }

    #[test]
    fn account_id_display_is_hex_prefixed() {
        let acct = AccountId([0x01; 20]);
        assert!(format!("{acct}").starts_with("acct:0101"));
    }

    #[test]
    fn serde_roundtrips() {
        let tok = TokenId([7u8; 20]);
        let json = serde_json::to_string(&tok).unwrap();
        let back: TokenId = serde_json::from_str(&json).unwrap();
        assert_eq!(tok, back);

        let req = RequestId::new();
        let json = serde_json::to_string(&req).unwrap();
        let back: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(req, back);
    }
}
