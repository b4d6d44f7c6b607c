// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

/// Per-record write retry: `max_attempts` tries in total, a fixed pause between them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 1000,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}
