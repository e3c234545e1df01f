//! Ledger configuration

use std::time::Duration;

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Commits attempted per operation before surfacing a conflict
    pub max_commit_attempts: u32,
    /// Backoff after the first conflict; doubles per attempt
    pub retry_backoff_base_ms: u64,
    /// Upper bound for a single backoff sleep
    pub retry_backoff_max_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_commit_attempts: 8,
            retry_backoff_base_ms: 5,
            retry_backoff_max_ms: 200,
        }
    }
}

impl LedgerConfig {
    pub fn with_max_commit_attempts(mut self, attempts: u32) -> Self {
        self.max_commit_attempts = attempts.max(1);
        self
    }

    pub fn with_backoff(mut self, base_ms: u64, max_ms: u64) -> Self {
        self.retry_backoff_base_ms = base_ms;
        self.retry_backoff_max_ms = max_ms.max(base_ms);
        self
    }

    /// Sleep before retry number `attempt` (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        let ms = self
            .retry_backoff_base_ms
            .saturating_mul(1u64 << shift)
            .min(self.retry_backoff_max_ms);
        Duration::from_millis(ms)
    }
}
