//! # Retry Policy and Backoff Strategies
//!
//! Decides whether an outbox entry may be attempted during a drain.
//!
//! - **Max Retries**: after `max_retries` failed attempts an entry is dead and
//!   is never attempted automatically again
//! - **Backoff**: optionally hold back a failed entry until enough time has
//!   passed since its last attempt
//!
//! The default is `BackoffStrategy::Immediate`: a failed entry is retried on
//! the very next drain, however soon that comes.

use crate::shared::booking::PendingAction;
use crate::shared::config::DEFAULT_MAX_RETRIES;
use std::time::Duration;

/// Backoff strategy configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackoffStrategy {
    /// Retry on the next drain
    #[default]
    Immediate,
    /// Wait `base * 2^(retries - 1)`, capped at `max`, after each failure
    Exponential {
        /// Delay after the first failure
        base: Duration,
        /// Upper bound on the delay
        max: Duration,
    },
}

/// What a drain should do with an unsynced entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Send it now
    Attempt,
    /// Still inside its backoff window; stays pending
    Wait,
    /// Out of automatic retries
    Exhausted,
}

/// Retry limits for outbox entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: BackoffStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: BackoffStrategy::Immediate,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    pub fn with_backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Delay required after `retry_count` failures
    pub fn delay_after(&self, retry_count: u32) -> Duration {
        match self.backoff {
            BackoffStrategy::Immediate => Duration::ZERO,
            BackoffStrategy::Exponential { base, max } => {
                if retry_count == 0 {
                    return Duration::ZERO;
                }
                let factor = 1u32.checked_shl(retry_count - 1).unwrap_or(u32::MAX);
                base.saturating_mul(factor).min(max)
            }
        }
    }

    pub fn decide(&self, action: &PendingAction, now_millis: i64) -> RetryDecision {
        if action.retry_count >= self.max_retries {
            return RetryDecision::Exhausted;
        }

        let delay = self.delay_after(action.retry_count);
        match action.last_attempt_at {
            Some(last) if !delay.is_zero() => {
                let elapsed = now_millis.saturating_sub(last);
                if elapsed < delay.as_millis() as i64 {
                    RetryDecision::Wait
                } else {
                    RetryDecision::Attempt
                }
            }
            _ => RetryDecision::Attempt,
        }
    }
}
