//! Retry schedule for remote providers.
//!
//! `RetrySchedule` is a pure state machine: it counts attempts and decides,
//! after each failure, whether to retry and how long to wait. Waiting itself
//! goes through a `Sleeper`, so tests never sleep for real.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::constants::retry as retry_constants;

/// Tunables for one provider's retry loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// Fixed delay after a warm-up status
    pub overload_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: retry_constants::DEFAULT_MAX_ATTEMPTS,
            initial_backoff: Duration::from_millis(retry_constants::INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_secs(retry_constants::MAX_BACKOFF_SECS),
            overload_delay: Duration::from_secs(retry_constants::OVERLOAD_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    /// Exponential delay after the given failed attempt (1-based), capped.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let factor = retry_constants::BACKOFF_FACTOR.saturating_pow(exponent);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// How an attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The service is warming up; retry after the fixed delay
    Overloaded,
    /// Transport failure, timeout, rate limit or server error
    Retryable,
    /// Retrying cannot help (bad request, auth, not found, bad payload)
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter(Duration),
    GiveUp,
}

/// Attempt counter and delay schedule for a single `generate` call
#[derive(Debug, Clone)]
pub struct RetrySchedule {
    policy: RetryPolicy,
    attempts: u32,
}

impl RetrySchedule {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
        }
    }

    /// Mark the start of a request; returns its 1-based attempt number.
    pub fn begin_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn on_failure(&self, kind: FailureKind) -> RetryDecision {
        if kind == FailureKind::Terminal || self.attempts >= self.policy.max_attempts.max(1) {
            return RetryDecision::GiveUp;
        }
        match kind {
            FailureKind::Overloaded => RetryDecision::RetryAfter(self.policy.overload_delay),
            _ => RetryDecision::RetryAfter(self.policy.backoff_for(self.attempts)),
        }
    }
}

/// Clock seam for retry delays
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Records requested delays without waiting
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(duration);
        }
    }
}
