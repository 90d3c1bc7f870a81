//! HTTP client with retry and backoff
//!
//! Provides the transport every resource call goes through. It handles:
//! - Bearer authentication and SDK identification headers
//! - Omission of absent query parameters
//! - Response classification into the SDK error taxonomy
//! - Retries: server-timed waits on 429, exponential backoff on
//!   timeouts and connection failures

use super::retry::{RetryDecision, RetryPolicy, RetryState};
use crate::error::{Error, Result};
use crate::pagination::Page;
use crate::types::{JsonObject, Method};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt::Display;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Production API host
pub const DEFAULT_BASE_URL: &str = "https://api.constitutional.io";

/// Namespace segment prefixed to every request path
pub const API_PREFIX: &str = "/api";

/// Default per-attempt timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Wait used when a 429 carries no usable `retry-after`
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Message used when a failure body carries none
pub const DEFAULT_ERROR_MESSAGE: &str = "Request failed";

const SDK_LANGUAGE: &str = "rust";
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Configuration for the HTTP client
#[derive(Clone)]
pub struct HttpClientConfig {
    /// Base URL, without the API prefix
    pub base_url: String,
    /// API key sent as a bearer token
    pub api_key: String,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Retry and backoff policy
    pub retry: RetryPolicy,
    /// Extra headers sent with every request
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            default_headers: HashMap::new(),
            user_agent: format!("constitutional-sdk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

impl std::fmt::Debug for HttpClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("default_headers", &self.default_headers)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the per-attempt timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.retry.max_retries = retries;
        self
    }

    /// Set backoff timings for network-level retries
    pub fn backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.config.retry.initial_backoff = initial;
        self.config.retry.max_backoff = max;
        self
    }

    /// Also retry 5xx responses
    pub fn retry_server_errors(mut self, enabled: bool) -> Self {
        self.config.retry.retry_server_errors = enabled;
        self
    }

    /// Replace the whole retry policy
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters; `None` values are never sent
    pub query: Vec<(String, Option<String>)>,
    /// Request body (JSON)
    pub body: Option<Value>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
    /// Override max retries for this request
    pub max_retries: Option<u32>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.query.push((key.into(), Some(value.to_string())));
        self
    }

    /// Add a query parameter that is omitted when `None`
    #[must_use]
    pub fn query_opt<V: Display>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.query.push((key.into(), value.map(|v| v.to_string())));
        self
    }

    /// Add a comma-joined list parameter, omitted when `None` or empty
    #[must_use]
    pub fn query_list<V: AsRef<str>>(self, key: impl Into<String>, values: Option<&[V]>) -> Self {
        let joined = values
            .filter(|v| !v.is_empty())
            .map(|v| v.iter().map(<V as AsRef<str>>::as_ref).collect::<Vec<_>>().join(","));
        self.query_opt(key, joined)
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set max retries
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Query parameters that will actually be sent
    pub fn present_query(&self) -> Vec<(&str, &str)> {
        self.query
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
            .collect()
    }
}

/// `{ "data": ... }` success envelope
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Fields of a `{ "error": { message, code, details } }` failure envelope
///
/// Each field is read on its own, so one oddly-typed field does not hide
/// the others.
#[derive(Debug, Default)]
struct ErrorBody {
    message: Option<String>,
    code: Option<String>,
    details: JsonObject,
}

impl ErrorBody {
    fn parse(body: &[u8]) -> Self {
        let Ok(value) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };
        let Some(error) = value.get("error") else {
            return Self::default();
        };

        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        let code = error.get("code").and_then(|code| match code {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        let details = match error.get("details") {
            Some(Value::Object(map)) => map.clone(),
            None | Some(Value::Null) => JsonObject::new(),
            Some(other) => {
                let mut map = JsonObject::new();
                map.insert("details".to_string(), other.clone());
                map
            }
        };

        Self {
            message,
            code,
            details,
        }
    }
}

/// HTTP client with retry and backoff
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        Url::parse(&config.base_url)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(build_headers(&config)?)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Get the retry policy
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.config.retry
    }

    /// Make a GET request
    pub async fn get(&self, path: &str, config: RequestConfig) -> Result<Value> {
        self.request(Method::GET, path, config).await
    }

    /// Make a POST request
    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.request(Method::POST, path, RequestConfig::new().json(body))
            .await
    }

    /// Make a PUT request
    pub async fn put(&self, path: &str, body: Value) -> Result<Value> {
        self.request(Method::PUT, path, RequestConfig::new().json(body))
            .await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::DELETE, path, RequestConfig::new())
            .await
    }

    /// Perform one logical call, retrying according to the retry policy
    pub async fn request(&self, method: Method, path: &str, config: RequestConfig) -> Result<Value> {
        let url = self.build_url(path);
        let policy = match config.max_retries {
            Some(retries) => self.config.retry.with_max_retries(retries),
            None => self.config.retry.clone(),
        };
        let timeout = config.timeout.unwrap_or(self.config.timeout);
        let query = config.present_query();

        let mut state = RetryState::new();

        while state.attempt <= policy.max_retries {
            debug!(
                "{} {} (attempt {}/{})",
                method,
                url,
                state.attempt + 1,
                policy.max_retries + 1
            );

            let result = self
                .send_once(method, &url, path, &query, config.body.as_ref(), timeout)
                .await;

            match result {
                Ok(value) => {
                    debug!("Request succeeded: {} {}", method, url);
                    return Ok(value);
                }
                Err(err) => match policy.decide(state.attempt, &err) {
                    RetryDecision::Retry(delay) => {
                        warn!(
                            "{}, attempt {}/{}, retrying in {:?}",
                            err,
                            state.attempt + 1,
                            policy.max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        state.record(err);
                    }
                    RetryDecision::Fail => return Err(err),
                },
            }
        }

        Err(state.into_error())
    }

    /// Make a request and deserialize the JSON response
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let value = self.request(method, path, config).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Make a GET request and deserialize the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, config: RequestConfig) -> Result<T> {
        self.request_json(Method::GET, path, config).await
    }

    /// Make a request and unwrap the `data` envelope
    pub async fn request_data<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let envelope: DataEnvelope<T> = self.request_json(method, path, config).await?;
        Ok(envelope.data)
    }

    /// Make a GET request and unwrap the `data` envelope
    pub async fn get_data<T: DeserializeOwned>(&self, path: &str, config: RequestConfig) -> Result<T> {
        self.request_data(Method::GET, path, config).await
    }

    /// Fetch one page of a list endpoint
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> Result<Page<T>> {
        self.get_json(path, config).await
    }

    /// Issue a single physical attempt and classify its outcome
    async fn send_once(
        &self,
        method: Method,
        url: &str,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<Value> {
        let mut req = self.client.request(method.into(), url).timeout(timeout);

        if !query.is_empty() {
            req = req.query(query);
        }

        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| network_error(e, timeout))?;

        let status = response.status();
        let request_id = header_str(response.headers(), REQUEST_ID_HEADER).map(str::to_string);
        let retry_after = extract_retry_after(response.headers());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| network_error(e, timeout))?;

        classify_response(status, request_id, retry_after, &bytes, path)
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}{API_PREFIX}/{path}")
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Default headers sent on every request
fn build_headers(config: &HttpClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
        .map_err(|_| Error::invalid_value("api_key", "contains invalid header characters"))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static("x-sdk-version"),
        HeaderValue::from_static(env!("CARGO_PKG_VERSION")),
    );
    headers.insert(
        HeaderName::from_static("x-sdk-language"),
        HeaderValue::from_static(SDK_LANGUAGE),
    );

    for (key, value) in &config.default_headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| Error::invalid_value(key.clone(), e.to_string()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::invalid_value(key.clone(), e.to_string()))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

/// Map a status code and body to the call's result
pub(crate) fn classify_response(
    status: StatusCode,
    request_id: Option<String>,
    retry_after: Option<u64>,
    body: &[u8],
    path: &str,
) -> Result<Value> {
    if status == StatusCode::NO_CONTENT {
        return Ok(json!({}));
    }

    if status.is_success() {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(json!({}));
        }
        return serde_json::from_slice(body)
            .map_err(|e| Error::decode(format!("invalid JSON in {status} response: {e}")));
    }

    let ErrorBody {
        message,
        code,
        details,
    } = ErrorBody::parse(body);

    match status.as_u16() {
        429 => Err(Error::RateLimited {
            message: message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
            retry_after_seconds: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            request_id,
        }),
        401 => Err(Error::Authentication {
            message: message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
            request_id,
        }),
        404 => Err(Error::NotFound {
            resource: "Resource".to_string(),
            id: path.to_string(),
            request_id,
        }),
        _ => Err(Error::Api {
            message: message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
            code: code.unwrap_or_else(|| "ERROR".to_string()),
            status: status.as_u16(),
            details,
            request_id,
        }),
    }
}

/// Map a reqwest failure to a timeout or transport error
fn network_error(err: reqwest::Error, timeout: Duration) -> Error {
    if err.is_timeout() {
        return Error::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        };
    }

    if err.is_builder() {
        return Error::config(format!("Invalid request: {err}"));
    }

    Error::Transport {
        message: err.to_string(),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Extract retry-after header value in seconds
fn extract_retry_after(headers: &HeaderMap) -> Option<u64> {
    header_str(headers, "retry-after").and_then(|s| s.trim().parse().ok())
}
