//! Client configuration
//!
//! [`ClientConfig`] is the user-facing settings record. It can be built in
//! code, deserialized, or read from `CONSTITUTIONAL_*` environment
//! variables, and resolves into the transport's [`HttpClientConfig`].

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RetryPolicy, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "CONSTITUTIONAL_API_KEY";
/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "CONSTITUTIONAL_BASE_URL";
/// Environment variable selecting a regional host
pub const ENV_REGION: &str = "CONSTITUTIONAL_REGION";
/// Environment variable for the per-attempt timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "CONSTITUTIONAL_TIMEOUT_SECS";
/// Environment variable for the retry budget
pub const ENV_MAX_RETRIES: &str = "CONSTITUTIONAL_MAX_RETRIES";

// ============================================================================
// Client Config
// ============================================================================

/// Settings for a [`crate::Constitutional`] client
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key sent as a bearer token
    pub api_key: String,

    /// Full base URL; wins over `region`
    #[serde(default)]
    pub base_url: Option<String>,

    /// Regional host prefix, e.g. `eu`
    #[serde(default)]
    pub region: Option<String>,

    /// Per-attempt timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Also retry 5xx responses
    #[serde(default)]
    pub retry_server_errors: bool,

    /// Backoff for timeouts and connection failures
    #[serde(default)]
    pub retry_backoff: BackoffConfig,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_retries() -> u32 {
    crate::http::DEFAULT_MAX_RETRIES
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("region", &self.region)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .field("retry_server_errors", &self.retry_server_errors)
            .field("retry_backoff", &self.retry_backoff)
            .finish()
    }
}

/// Exponential backoff bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Upper bound on any single delay, in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    1000
}

fn default_max_ms() -> u64 {
    60000
}

impl ClientConfig {
    /// Config with defaults for everything but the key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            region: None,
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            retry_server_errors: false,
            retry_backoff: BackoffConfig::default(),
        }
    }

    /// Read settings from `CONSTITUTIONAL_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, using the same keys as [`Self::from_env`]
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(ENV_API_KEY).ok_or_else(|| Error::missing_field(ENV_API_KEY))?;
        let mut config = Self::new(api_key);
        config.base_url = non_empty(ENV_BASE_URL);
        config.region = non_empty(ENV_REGION);

        if let Some(raw) = non_empty(ENV_TIMEOUT_SECS) {
            let secs: u64 = parse_number(ENV_TIMEOUT_SECS, &raw)?;
            config.timeout_ms = secs.saturating_mul(1000);
        }
        if let Some(raw) = non_empty(ENV_MAX_RETRIES) {
            config.max_retries = parse_number(ENV_MAX_RETRIES, &raw)?;
        }

        Ok(config)
    }

    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    #[must_use]
    pub fn retry_server_errors(mut self, enabled: bool) -> Self {
        self.retry_server_errors = enabled;
        self
    }

    #[must_use]
    pub fn backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.retry_backoff = BackoffConfig {
            initial_ms: u64::try_from(initial.as_millis()).unwrap_or(u64::MAX),
            max_ms: u64::try_from(max.as_millis()).unwrap_or(u64::MAX),
        };
        self
    }

    /// Base URL after applying the override and region rules
    ///
    /// An explicit `base_url` wins; otherwise a region selects
    /// `https://<region>.api.constitutional.io`; otherwise the default host.
    pub fn resolved_base_url(&self) -> String {
        if let Some(url) = &self.base_url {
            return url.trim_end_matches('/').to_string();
        }
        match &self.region {
            Some(region) => format!("https://{region}.api.constitutional.io"),
            None => DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Check required fields
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::missing_field("api_key"));
        }
        if self.timeout_ms == 0 {
            return Err(Error::invalid_value("timeout_ms", "must be greater than zero"));
        }
        if self.retry_backoff.initial_ms > self.retry_backoff.max_ms {
            return Err(Error::invalid_value(
                "retry_backoff",
                "initial_ms exceeds max_ms",
            ));
        }
        Ok(())
    }

    /// Validate and convert into transport settings
    pub fn into_http_config(self) -> Result<HttpClientConfig> {
        self.validate()?;

        let retry = RetryPolicy {
            max_retries: self.max_retries,
            initial_backoff: Duration::from_millis(self.retry_backoff.initial_ms),
            max_backoff: Duration::from_millis(self.retry_backoff.max_ms),
            retry_server_errors: self.retry_server_errors,
        };

        Ok(HttpClientConfig::builder()
            .base_url(self.resolved_base_url())
            .api_key(self.api_key)
            .timeout(Duration::from_millis(self.timeout_ms))
            .retry_policy(retry)
            .build())
    }
}

fn parse_number<N>(field: &str, raw: &str) -> Result<N>
where
    N: std::str::FromStr,
    N::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: N::Err| Error::invalid_value(field, format!("'{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_case::test_case;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("key");
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.max_retries, 3);
        assert!(!config.retry_server_errors);
        assert_eq!(config.retry_backoff, BackoffConfig::default());
        assert_eq!(config.resolved_base_url(), "https://api.constitutional.io");
    }

    #[test_case(None, None => "https://api.constitutional.io" ; "default host")]
    #[test_case(None, Some("eu") => "https://eu.api.constitutional.io" ; "region host")]
    #[test_case(Some("http://localhost:8080/"), Some("eu") => "http://localhost:8080" ; "explicit url wins")]
    fn test_resolved_base_url(base_url: Option<&str>, region: Option<&str>) -> String {
        let mut config = ClientConfig::new("key");
        config.base_url = base_url.map(str::to_string);
        config.region = region.map(str::to_string);
        config.resolved_base_url()
    }

    #[test]
    fn test_from_lookup_reads_all_keys() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "secret"),
            (ENV_REGION, "us-west"),
            (ENV_TIMEOUT_SECS, "10"),
            (ENV_MAX_RETRIES, " 5 "),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.region.as_deref(), Some("us-west"));
        assert_eq!(config.base_url, None);
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.max_retries, 5);
    }

    #[test]
    fn test_from_lookup_requires_api_key() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_API_KEY, "  ")])).unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == ENV_API_KEY));
    }

    #[test]
    fn test_from_lookup_rejects_bad_numbers() {
        let err = ClientConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "secret"),
            (ENV_MAX_RETRIES, "many"),
        ]))
        .unwrap_err();

        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == ENV_MAX_RETRIES));
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{ "api_key": "k", "retry_backoff": { "initial_ms": 50 } }"#)
                .unwrap();

        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_backoff.initial_ms, 50);
        assert_eq!(config.retry_backoff.max_ms, 60000);
    }

    #[test]
    fn test_into_http_config() {
        let http = ClientConfig::new("key")
            .region("eu")
            .timeout(Duration::from_secs(5))
            .max_retries(1)
            .retry_server_errors(true)
            .backoff(Duration::from_millis(20), Duration::from_secs(2))
            .into_http_config()
            .unwrap();

        assert_eq!(http.base_url, "https://eu.api.constitutional.io");
        assert_eq!(http.api_key, "key");
        assert_eq!(http.timeout, Duration::from_secs(5));
        assert_eq!(http.retry.max_retries, 1);
        assert!(http.retry.retry_server_errors);
        assert_eq!(http.retry.initial_backoff, Duration::from_millis(20));
        assert_eq!(http.retry.max_backoff, Duration::from_secs(2));
    }

    #[test_case(ClientConfig::new("") ; "empty key")]
    #[test_case(ClientConfig::new("k").timeout(Duration::ZERO) ; "zero timeout")]
    #[test_case(ClientConfig::new("k").backoff(Duration::from_secs(5), Duration::from_secs(1)) ; "inverted backoff")]
    fn test_validate_rejects(config: ClientConfig) {
        assert!(config.into_http_config().is_err());
    }

    #[test]
    fn test_sub_second_timeout_is_kept() {
        let http = ClientConfig::new("k")
            .timeout(Duration::from_millis(500))
            .into_http_config()
            .unwrap();

        assert_eq!(http.timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", ClientConfig::new("sk_live_123"));
        assert!(!rendered.contains("sk_live_123"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
