//! Settlement idempotency cache — double-settlement protection for
//! client retries.
//!
//! Each purchase request carries a caller-supplied `RequestId`. The first
//! successful settlement stores its receipt here; replaying the same id
//! returns that receipt instead of settling again. The cache is bounded
//! with LRU eviction so memory stays predictable in long-running hosts.

use std::collections::{HashMap, VecDeque};

use propmarket_types::{RequestId, SettlementReceipt};

/// Bounded map of settled request ids to their receipts.
pub struct IdempotencyCache {
    /// Receipts of already-settled requests.
    settled: HashMap<RequestId, SettlementReceipt>,
    /// Insertion order for LRU eviction (front = oldest).
    order: VecDeque<RequestId>,
    /// Maximum number of entries before eviction kicks in.
    max_size: usize,
}

impl IdempotencyCache {
    /// Create a cache with the given maximum size.
    ///
    /// # Panics
    /// Panics if `max_size` is zero.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        assert!(max_size > 0, "IdempotencyCache max_size must be > 0");
        Self {
            settled: HashMap::with_capacity(max_size.min(1024)),
            order: VecDeque::with_capacity(max_size.min(1024)),
            max_size,
        }
    }

    /// The receipt of an already-settled request, if any.
    #[must_use]
    pub fn lookup(&self, request_id: RequestId) -> Option<&SettlementReceipt> {
        self.settled.get(&request_id)
    }

    /// Record a freshly settled request. Evicts the oldest entry at
    /// capacity. A duplicate record keeps the original receipt.
    pub fn record(&mut self, request_id: RequestId, receipt: SettlementReceipt) {
        if self.settled.contains_key(&request_id) {
            return;
        }
        if self.settled.len() >= self.max_size {
            if let Some(oldest) = self.order.pop_front() {
                self.settled.remove(&oldest);
            }
        }
        self.settled.insert(request_id, receipt);
        self.order.push_back(request_id);
    }

    /// Whether this request has already settled.
    #[must_use]
    pub fn is_settled(&self, request_id: RequestId) -> bool {
        self.settled.contains_key(&request_id)
    }

    /// Number of requests currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.settled.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settled.is_empty()
    }
}
