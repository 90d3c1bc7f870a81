//! Top-level client
//!
//! [`Constitutional`] owns the transport and hands out borrowing resource
//! handles. Clone-free concurrent use works through `&Constitutional`.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::resources::{
    BillsResource, MetricsResource, RegionsResource, SearchResource, VotesResource,
    WebhooksResource,
};

/// Client for the Constitutional governance API
pub struct Constitutional {
    http: HttpClient,
}

impl Constitutional {
    /// Build a client from settings
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = HttpClient::new(config.into_http_config()?)?;
        Ok(Self { http })
    }

    /// Client with default settings for `api_key`
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::new(api_key))
    }

    /// Client configured from `CONSTITUTIONAL_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Wrap an already-built transport
    pub fn from_http(http: HttpClient) -> Self {
        Self { http }
    }

    /// Underlying transport, for endpoints without a typed wrapper
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn bills(&self) -> BillsResource<'_> {
        BillsResource::new(&self.http)
    }

    pub fn votes(&self) -> VotesResource<'_> {
        VotesResource::new(&self.http)
    }

    pub fn regions(&self) -> RegionsResource<'_> {
        RegionsResource::new(&self.http)
    }

    pub fn metrics(&self) -> MetricsResource<'_> {
        MetricsResource::new(&self.http)
    }

    pub fn search(&self) -> SearchResource<'_> {
        SearchResource::new(&self.http)
    }

    pub fn webhooks(&self) -> WebhooksResource<'_> {
        WebhooksResource::new(&self.http)
    }
}

impl std::fmt::Debug for Constitutional {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constitutional")
            .field("config", self.http.config())
            .finish()
    }
}
