//! Webhook event catalogue

use serde::{Deserialize, Serialize};
use std::fmt;

/// Event types a webhook subscription can listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "bill.created")]
    BillCreated,
    #[serde(rename = "bill.updated")]
    BillUpdated,
    #[serde(rename = "bill.status_changed")]
    BillStatusChanged,
    #[serde(rename = "bill.submitted")]
    BillSubmitted,
    #[serde(rename = "bill.passed")]
    BillPassed,
    #[serde(rename = "bill.rejected")]
    BillRejected,
    #[serde(rename = "bill.sunset")]
    BillSunset,
    #[serde(rename = "vote.session_created")]
    VoteSessionCreated,
    #[serde(rename = "vote.session_started")]
    VoteSessionStarted,
    #[serde(rename = "vote.session_ended")]
    VoteSessionEnded,
    #[serde(rename = "vote.threshold_reached")]
    VoteThresholdReached,
    #[serde(rename = "region.pod_created")]
    RegionPodCreated,
    #[serde(rename = "region.metrics_updated")]
    RegionMetricsUpdated,
    #[serde(rename = "system.maintenance")]
    SystemMaintenance,
    #[serde(rename = "system.rate_limit_warning")]
    SystemRateLimitWarning,
}

impl WebhookEvent {
    pub const ALL: [WebhookEvent; 15] = [
        WebhookEvent::BillCreated,
        WebhookEvent::BillUpdated,
        WebhookEvent::BillStatusChanged,
        WebhookEvent::BillSubmitted,
        WebhookEvent::BillPassed,
        WebhookEvent::BillRejected,
        WebhookEvent::BillSunset,
        WebhookEvent::VoteSessionCreated,
        WebhookEvent::VoteSessionStarted,
        WebhookEvent::VoteSessionEnded,
        WebhookEvent::VoteThresholdReached,
        WebhookEvent::RegionPodCreated,
        WebhookEvent::RegionMetricsUpdated,
        WebhookEvent::SystemMaintenance,
        WebhookEvent::SystemRateLimitWarning,
    ];

    /// Dotted wire name, e.g. `bill.created`
    pub fn as_str(self) -> &'static str {
        match self {
            WebhookEvent::BillCreated => "bill.created",
            WebhookEvent::BillUpdated => "bill.updated",
            WebhookEvent::BillStatusChanged => "bill.status_changed",
            WebhookEvent::BillSubmitted => "bill.submitted",
            WebhookEvent::BillPassed => "bill.passed",
            WebhookEvent::BillRejected => "bill.rejected",
            WebhookEvent::BillSunset => "bill.sunset",
            WebhookEvent::VoteSessionCreated => "vote.session_created",
            WebhookEvent::VoteSessionStarted => "vote.session_started",
            WebhookEvent::VoteSessionEnded => "vote.session_ended",
            WebhookEvent::VoteThresholdReached => "vote.threshold_reached",
            WebhookEvent::RegionPodCreated => "region.pod_created",
            WebhookEvent::RegionMetricsUpdated => "region.metrics_updated",
            WebhookEvent::SystemMaintenance => "system.maintenance",
            WebhookEvent::SystemRateLimitWarning => "system.rate_limit_warning",
        }
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WebhookEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WebhookEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| format!("unknown webhook event: {s}"))
    }
}
