//! Error types for the Constitutional SDK
//!
//! Every public API returns `Result<T, Error>`. API failures form a closed
//! taxonomy (see [`ErrorKind`]) and each variant carries the structured
//! fields callers need to log and correlate a failed call without
//! re-reading the HTTP response.

use crate::types::JsonObject;
use serde_json::json;
use thiserror::Error;

/// Classification of an API failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 401, never retried
    Authentication,
    /// 404, never retried
    NotFound,
    /// 429, retried using the server's `retry-after`
    RateLimit,
    /// Any other non-2xx response
    Api,
    /// An attempt exceeded its deadline
    Timeout,
    /// Connection-level failure
    Transport,
    /// Retry budget consumed with nothing else to report
    Exhausted,
    /// Local failures: configuration, decoding, I/O
    Client,
}

/// The main error type for the Constitutional SDK
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // API Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        request_id: Option<String>,
    },

    #[error("{resource} {id} not found")]
    NotFound {
        resource: String,
        id: String,
        request_id: Option<String>,
    },

    #[error("Rate limited, retry after {retry_after_seconds}s: {message}")]
    RateLimited {
        message: String,
        retry_after_seconds: u64,
        request_id: Option<String>,
    },

    #[error("HTTP {status} ({code}): {message}")]
    Api {
        message: String,
        code: String,
        status: u16,
        details: JsonObject,
        request_id: Option<String>,
    },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP request failed: {message}")]
    Transport { message: String },

    #[error("Request failed after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a generic API error with no details
    pub fn api(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            code: code.into(),
            status,
            details: JsonObject::new(),
            request_id: None,
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Authentication { .. } => ErrorKind::Authentication,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::RateLimited { .. } => ErrorKind::RateLimit,
            Error::Api { .. } => ErrorKind::Api,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::RetriesExhausted { .. } => ErrorKind::Exhausted,
            _ => ErrorKind::Client,
        }
    }

    /// HTTP status associated with this error
    ///
    /// Failures without a response report a synthetic status: 408 for
    /// timeouts, 500 for transport failures and exhausted retries.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authentication { .. } => Some(401),
            Error::NotFound { .. } => Some(404),
            Error::RateLimited { .. } => Some(429),
            Error::Api { status, .. } => Some(*status),
            Error::Timeout { .. } => Some(408),
            Error::Transport { .. } | Error::RetriesExhausted { .. } => Some(500),
            _ => None,
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &str {
        match self {
            Error::Authentication { .. } => "AUTHENTICATION_ERROR",
            Error::NotFound { .. } => "NOT_FOUND",
            Error::RateLimited { .. } => "RATE_LIMIT_EXCEEDED",
            Error::Api { code, .. } => code,
            Error::Timeout { .. } => "TIMEOUT",
            Error::Transport { .. } => "HTTP_ERROR",
            Error::RetriesExhausted { .. } => "RETRY_EXHAUSTED",
            Error::Config { .. }
            | Error::MissingConfigField { .. }
            | Error::InvalidConfigValue { .. }
            | Error::InvalidUrl(_) => "CONFIG_ERROR",
            Error::JsonParse(_) | Error::Decode { .. } => "DECODE_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Other(_) => "ERROR",
        }
    }

    /// Human-readable message, without the variant prefix used by `Display`
    pub fn message(&self) -> String {
        match self {
            Error::Authentication { message, .. }
            | Error::RateLimited { message, .. }
            | Error::Api { message, .. }
            | Error::Transport { message }
            | Error::Config { message }
            | Error::Decode { message } => message.clone(),
            Error::Timeout { .. } => "Request timed out".to_string(),
            Error::RetriesExhausted { .. } => "Request failed after retries".to_string(),
            other => other.to_string(),
        }
    }

    /// Structured details attached to this error
    pub fn details(&self) -> JsonObject {
        match self {
            Error::Api { details, .. } => details.clone(),
            Error::NotFound { resource, id, .. } => {
                let mut map = JsonObject::new();
                map.insert("resource".to_string(), json!(resource));
                map.insert("id".to_string(), json!(id));
                map
            }
            Error::RateLimited {
                retry_after_seconds,
                ..
            } => {
                let mut map = JsonObject::new();
                map.insert("retry_after".to_string(), json!(retry_after_seconds));
                map
            }
            _ => JsonObject::new(),
        }
    }

    /// Correlation id from the `x-request-id` response header
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Error::Authentication { request_id, .. }
            | Error::NotFound { request_id, .. }
            | Error::RateLimited { request_id, .. }
            | Error::Api { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// Server-supplied wait time; only present for rate limit errors
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Error::RateLimited {
                retry_after_seconds,
                ..
            } => Some(*retry_after_seconds),
            _ => None,
        }
    }

    /// Check if this error is retryable under the base retry policy
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RateLimit | ErrorKind::Timeout | ErrorKind::Transport
        )
    }
}

/// Result type alias for the Constitutional SDK
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
