//! HTTP client module
//!
//! Provides the transport used by every resource call.
//!
//! # Features
//!
//! - **Automatic Retries**: 429 responses, timeouts and connection failures
//! - **Server-Timed Waits**: 429 waits for the `retry-after` header
//! - **Exponential Backoff**: network failures wait `initial * 2^attempt`
//! - **Terminal Errors**: 401, 404 and other non-2xx are surfaced at once

mod client;
mod retry;

pub use client::{
    HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig, API_PREFIX,
    DEFAULT_BASE_URL, DEFAULT_ERROR_MESSAGE, DEFAULT_RETRY_AFTER_SECS, DEFAULT_TIMEOUT,
};

#[cfg(test)]
pub(crate) use client::classify_response;
pub use retry::{RetryDecision, RetryPolicy, RetryState, DEFAULT_MAX_RETRIES};
