//! Generation tokens for discovery invocations.
//!
//! Every discovery invocation snapshots a shared counter. Clearing the
//! visible output bumps the counter, which makes every outstanding token
//! stale; stale invocations stop issuing requests and never write shared
//! state. Taking a token does not move the counter, so concurrent
//! invocations never cancel each other.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared generation counter.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    current: Arc<AtomicU64>,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for the current generation.
    pub fn token(&self) -> GenerationToken {
        let value = self.current.load(Ordering::Acquire);
        GenerationToken {
            value,
            current: Arc::clone(&self.current),
        }
    }

    /// Invalidate all outstanding tokens.
    pub fn bump(&self) {
        self.current.fetch_add(1, Ordering::AcqRel);
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::Acquire)
    }
}

/// Token held by one discovery invocation.
#[derive(Debug, Clone)]
pub struct GenerationToken {
    value: u64,
    current: Arc<AtomicU64>,
}

impl GenerationToken {
    /// Whether the counter has not been bumped since this token was taken.
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::Acquire) == self.value
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}
