//! Exponential backoff schedule for the song-generation retry loop.

use std::time::Duration;

/// Retry schedule: `max_attempts` total attempts, with a delay of
/// `base * 2^(n-1)` before 0-indexed attempt `n` and no delay before the
/// first. Deliberately jitter-free; the schedule is part of the observable
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles each attempt after that.
    pub base: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base: Duration::from_secs(1),
        }
    }
}

impl BackoffPolicy {
    /// Delay to sleep before the given 0-indexed attempt, or `None` for the
    /// first attempt.
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 {
            return None;
        }
        Some(self.base * 2u32.saturating_pow(attempt - 1))
    }
}
