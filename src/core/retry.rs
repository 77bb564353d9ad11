//! Fixed-delay retry policy for the outer RPC call.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Total attempts per fetch, the first call included.
pub const MAX_RETRIES: u32 = 3;

/// Wait between two consecutive attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first. Always at least 1.
    pub max_attempts: u32,
    /// Delay before every attempt after the first.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            delay: RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn fixed(delay: Duration, max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    /// Delay to wait before the given 1-based attempt; `None` for the first one.
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt <= 1 {
            None
        } else {
            Some(self.delay)
        }
    }

    pub fn has_attempts_left(&self, attempts_made: u32) -> bool {
        attempts_made < self.max_attempts.max(1)
    }

    /// Upper bound on time spent sleeping between attempts.
    pub fn worst_case_backoff(&self) -> Duration {
        self.delay * self.max_attempts.max(1).saturating_sub(1)
    }
}
