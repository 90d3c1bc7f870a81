//! Webhooks resource

use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::types::{JsonObject, Method};
use crate::webhook::{self, WebhookEvent};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A webhook subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,
    pub url: String,
    pub events: Vec<String>,
    /// Signing secret for deliveries
    pub secret: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A delivery attempt for a webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookDelivery {
    pub id: String,
    pub webhook_id: String,
    pub event_id: String,
    pub status: String,
    pub attempts: u32,
    #[serde(default)]
    pub last_attempt_at: Option<String>,
    #[serde(default)]
    pub response: Option<JsonObject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEventInfo {
    pub event: String,
    pub description: String,
}

/// Partial update; `None` fields are left unchanged on the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<WebhookEvent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl WebhookUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn events(mut self, events: impl IntoIterator<Item = WebhookEvent>) -> Self {
        self.events = Some(events.into_iter().collect());
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }
}

/// Webhooks API
#[derive(Debug, Clone, Copy)]
pub struct WebhooksResource<'a> {
    client: &'a HttpClient,
}

impl<'a> WebhooksResource<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Subscribe `url` to `events`; the response carries the signing secret
    pub async fn create(&self, url: &str, events: &[WebhookEvent]) -> Result<Webhook> {
        let body = json!({ "url": url, "events": events });
        self.client
            .request_data(Method::POST, "/v1/webhooks", RequestConfig::new().json(body))
            .await
    }

    pub async fn list(&self) -> Result<Vec<Webhook>> {
        self.client
            .get_data("/v1/webhooks", RequestConfig::new())
            .await
    }

    pub async fn get(&self, webhook_id: &str) -> Result<Webhook> {
        self.client
            .get_data(&format!("/v1/webhooks/{webhook_id}"), RequestConfig::new())
            .await
    }

    pub async fn update(&self, webhook_id: &str, update: &WebhookUpdate) -> Result<Webhook> {
        let body = serde_json::to_value(update)?;
        self.client
            .request_data(
                Method::PUT,
                &format!("/v1/webhooks/{webhook_id}"),
                RequestConfig::new().json(body),
            )
            .await
    }

    pub async fn delete(&self, webhook_id: &str) -> Result<()> {
        self.client
            .delete(&format!("/v1/webhooks/{webhook_id}"))
            .await?;
        Ok(())
    }

    pub async fn enable(&self, webhook_id: &str) -> Result<Webhook> {
        self.update(webhook_id, &WebhookUpdate::new().active(true))
            .await
    }

    pub async fn disable(&self, webhook_id: &str) -> Result<Webhook> {
        self.update(webhook_id, &WebhookUpdate::new().active(false))
            .await
    }

    /// Delivery history for a webhook
    pub async fn deliveries(&self, webhook_id: &str) -> Result<Vec<WebhookDelivery>> {
        self.client
            .get_data(
                &format!("/v1/webhooks/{webhook_id}/deliveries"),
                RequestConfig::new(),
            )
            .await
    }

    /// Event types the server can deliver
    pub async fn list_events(&self) -> Result<Vec<WebhookEventInfo>> {
        self.client
            .get_data("/v1/webhooks/events/list", RequestConfig::new())
            .await
    }

    /// Check an `X-Webhook-Signature` header against the wall clock
    pub fn verify_signature(
        payload: impl AsRef<[u8]>,
        header: &str,
        secret: &str,
        tolerance_secs: u64,
    ) -> bool {
        webhook::verify_signature(payload, header, secret, tolerance_secs)
    }
}
