//! Retry bookkeeping for a single fetch.
//!
//! [`RetryState`] is the `ATTEMPT → WAIT → ATTEMPT` loop of a fetch expressed
//! as data: the client records each attempt, reports each failure, and acts
//! on the returned [`RetryDecision`]. No I/O or sleeping happens here.

use std::time::Duration;

use crate::QuoteError;

/// Attempt budget and backoff curve.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts allowed, including the first one.
    pub max_attempts: usize,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Cap applied to computed delays.
    pub max_delay: Duration,
    /// Cap applied to server-supplied `Retry-After` hints.
    pub max_hint: Duration,
}

impl RetryPolicy {
    /// Computed delay before retry number `retry_index` (0 for the first retry):
    /// `base_delay * 2^retry_index`, capped at `max_delay`.
    pub fn backoff(&self, retry_index: usize) -> Duration {
        let exp = retry_index.min(16) as u32;
        let multiplier = 1u32 << exp;
        self.base_delay
            .checked_mul(multiplier)
            .unwrap_or(Duration::MAX)
            .min(self.max_delay)
    }
}

/// What the caller should do after a failed attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryDecision {
    /// Sleep for the given delay, then attempt again.
    Wait(Duration),
    /// The failure is not retriable; surface it as is.
    Abort,
    /// The failure was retriable but the attempt budget is spent.
    Exhausted,
}

/// Mutable retry state of one in-flight fetch.
#[derive(Clone, Debug)]
pub struct RetryState {
    policy: RetryPolicy,
    attempts: usize,
    last_delay: Option<Duration>,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
            last_delay: None,
        }
    }

    /// Records the start of an attempt and returns its 1-based number.
    pub fn begin_attempt(&mut self) -> usize {
        self.attempts += 1;
        self.attempts
    }

    /// Number of attempts started so far.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Delay chosen by the most recent [`RetryDecision::Wait`].
    pub fn last_delay(&self) -> Option<Duration> {
        self.last_delay
    }

    /// Classifies the failure of the current attempt.
    ///
    /// A `Retry-After` hint carried by a rate-limit failure takes precedence
    /// over the computed backoff, clamped to [`RetryPolicy::max_hint`].
    pub fn on_failure(&mut self, err: &QuoteError) -> RetryDecision {
        if !err.is_retriable() {
            return RetryDecision::Abort;
        }
        if self.attempts >= self.policy.max_attempts {
            return RetryDecision::Exhausted;
        }

        let retry_index = self.attempts.saturating_sub(1);
        let delay = err
            .retry_after()
            .map(|hint| hint.min(self.policy.max_hint))
            .unwrap_or_else(|| self.policy.backoff(retry_index));
        self.last_delay = Some(delay);
        RetryDecision::Wait(delay)
    }
}
