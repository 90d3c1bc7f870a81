//! Retry policy
//!
//! The decision of whether a failed attempt is retried, and how long to wait
//! first, is a pure function of the attempt number and the error. The client
//! loop only executes what [`RetryPolicy::decide`] returns.

use crate::error::{Error, ErrorKind};
use std::time::Duration;

/// Default number of retries after the initial attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for the given duration, then try again
    Retry(Duration),
    /// Surface the error to the caller
    Fail,
}

/// Retry/backoff policy for one logical call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt
    pub max_retries: u32,
    /// Backoff for the first network-level retry; doubles per attempt
    pub initial_backoff: Duration,
    /// Upper bound on a single backoff delay
    pub max_backoff: Duration,
    /// Also retry 5xx responses with exponential backoff
    pub retry_server_errors: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            retry_server_errors: false,
        }
    }
}

impl RetryPolicy {
    /// Policy with the given retry budget and default timings
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Copy of this policy with a different retry budget
    #[must_use]
    pub fn with_max_retries(&self, max_retries: u32) -> Self {
        Self {
            max_retries,
            ..self.clone()
        }
    }

    /// Decide what follows a failed attempt (`attempt` is zero-based)
    pub fn decide(&self, attempt: u32, error: &Error) -> RetryDecision {
        if attempt >= self.max_retries {
            return RetryDecision::Fail;
        }

        match error.kind() {
            ErrorKind::RateLimit => {
                let wait = error.retry_after().unwrap_or(60);
                RetryDecision::Retry(Duration::from_secs(wait))
            }
            ErrorKind::Timeout | ErrorKind::Transport => {
                RetryDecision::Retry(self.backoff(attempt))
            }
            ErrorKind::Api if self.retry_server_errors => match error.status() {
                Some(status) if status >= 500 => RetryDecision::Retry(self.backoff(attempt)),
                _ => RetryDecision::Fail,
            },
            _ => RetryDecision::Fail,
        }
    }

    /// Exponential backoff delay for a given attempt
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        let delay = self
            .initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff);

        std::cmp::min(delay, self.max_backoff)
    }
}

/// Per-call retry bookkeeping; created at call start, dropped at call end
#[derive(Debug, Default)]
pub struct RetryState {
    /// Zero-based attempt counter
    pub attempt: u32,
    /// Error from the most recent failed attempt
    pub last_error: Option<Error>,
}

impl RetryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed attempt that will be retried
    pub fn record(&mut self, error: Error) {
        self.attempt += 1;
        self.last_error = Some(error);
    }

    /// Terminal error once the loop has run out of attempts
    pub fn into_error(self) -> Error {
        self.last_error.unwrap_or(Error::RetriesExhausted {
            attempts: self.attempt,
        })
    }
}
