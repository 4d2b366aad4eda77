use std::time::Duration;

use crate::RetryPolicy;

/// Configures HTTP timeout, retry and pacing behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of attempts per fetch, including the first one.
    pub max_attempts: usize,
    /// Base retry backoff in milliseconds (exponential strategy).
    pub retry_backoff_ms: u64,
    /// Upper bound for a computed backoff delay in milliseconds.
    pub max_backoff_ms: u64,
    /// Sleep after each successful network fetch, in milliseconds.
    pub pacing_ms: u64,
    /// Longest server `Retry-After` hint that is honored as is, in
    /// milliseconds. Larger hints are clamped to this value.
    pub max_retry_after_ms: u64,
}

impl ClientOptions {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_millis(self.retry_backoff_ms),
            max_delay: Duration::from_millis(self.max_backoff_ms),
            max_hint: Duration::from_millis(self.max_retry_after_ms),
        }
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_attempts: 4,
            retry_backoff_ms: 500,
            max_backoff_ms: 30_000,
            pacing_ms: 0,
            max_retry_after_ms: 300_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::ClientOptions;

    #[test]
    fn retry_policy_never_allows_zero_attempts() {
        let opts = ClientOptions {
            max_attempts: 0,
            ..ClientOptions::default()
        };
        assert_eq!(opts.retry_policy().max_attempts, 1);
    }

    #[test]
    fn retry_policy_converts_millis() {
        let policy = ClientOptions::default().retry_policy();
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.base_delay, Duration::from_millis(500));
        assert_eq!(policy.max_delay, Duration::from_secs(30));
        assert_eq!(policy.max_hint, Duration::from_secs(300));
    }
}
