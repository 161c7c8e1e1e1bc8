use std::time::Duration;

/// Bounded polling schedule for waiting on a lifecycle state: exponential
/// backoff from `initial_delay`, capped at `max_delay`, giving up after `timeout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: u32,
    pub timeout: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Self::DEFAULT_INITIAL_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            multiplier: 2,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

impl WaitPolicy {
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(10);
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Delay to use after `current`.
    pub fn next_delay(&self, current: Duration) -> Duration {
        current
            .saturating_mul(self.multiplier.max(1))
            .min(self.max_delay)
    }

    /// Sleep before the next poll, clipped to the time left before `timeout`.
    /// `None` once the timeout has been reached.
    pub fn sleep_for(&self, delay: Duration, elapsed: Duration) -> Option<Duration> {
        let remaining = self.timeout.checked_sub(elapsed)?;
        if remaining.is_zero() {
            return None;
        }
        Some(delay.min(remaining))
    }
}
