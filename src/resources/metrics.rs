//! Metrics resource

use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub total_regions: u64,
    pub total_citizens: u64,
    pub active_citizens: u64,
    pub total_bills: u64,
    pub active_bills: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipationOverview {
    pub average_rate: f64,
    pub trend: String,
    pub highest_region: JsonValue,
    pub lowest_region: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegislationOverview {
    pub bills_passed_this_month: u64,
    pub bills_rejected_this_month: u64,
    pub average_time_to_pass: String,
    pub citizen_proposals: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TblOverview {
    pub average_score: f64,
    pub people: f64,
    pub planet: f64,
    pub profit: f64,
}

/// Platform-wide snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformOverview {
    pub timestamp: String,
    pub platform: PlatformStats,
    pub participation: ParticipationOverview,
    pub legislation: LegislationOverview,
    pub tbl: TblOverview,
}

/// One pillar of the Triple Bottom Line with its sub-metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TblComponent {
    pub score: f64,
    pub components: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TblScores {
    pub overall: f64,
    pub people: TblComponent,
    pub planet: TblComponent,
    pub profit: TblComponent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TblTrends {
    pub weekly: Vec<f64>,
    pub monthly: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPerformer {
    pub region_id: String,
    pub name: String,
    pub score: f64,
}

/// Triple Bottom Line report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TblMetrics {
    pub period: String,
    pub region_id: String,
    pub scores: TblScores,
    pub trends: TblTrends,
    pub top_performers: Vec<TopPerformer>,
}

/// Governance health; each group is a free-form map of indicators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceMetrics {
    pub efficiency: JsonObject,
    pub transparency: BTreeMap<String, f64>,
    pub participation: BTreeMap<String, f64>,
    pub accountability: JsonObject,
    pub cost: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonData {
    pub region_id: String,
    pub region_name: String,
    pub values: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub regions: Vec<String>,
    pub metrics: Vec<String>,
    pub data: Vec<ComparisonData>,
}

/// Metrics API
#[derive(Debug, Clone, Copy)]
pub struct MetricsResource<'a> {
    client: &'a HttpClient,
}

impl<'a> MetricsResource<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    pub async fn overview(&self) -> Result<PlatformOverview> {
        self.client
            .get_data("/v1/metrics/overview", RequestConfig::new())
            .await
    }

    /// Triple Bottom Line scores, platform-wide unless `region_id` is set
    pub async fn tbl(&self, region_id: Option<&str>, period: Option<&str>) -> Result<TblMetrics> {
        let config = RequestConfig::new()
            .query_opt("regionId", region_id)
            .query_opt("period", period);
        self.client.get_data("/v1/metrics/tbl", config).await
    }

    pub async fn region_tbl(&self, region_id: &str, period: Option<&str>) -> Result<TblMetrics> {
        self.tbl(Some(region_id), period).await
    }

    pub async fn governance(&self) -> Result<GovernanceMetrics> {
        self.client
            .get_data("/v1/metrics/governance", RequestConfig::new())
            .await
    }

    /// Compare `metrics` (all when `None`) across `regions`
    pub async fn compare(
        &self,
        regions: &[&str],
        metrics: Option<&[&str]>,
    ) -> Result<ComparisonResult> {
        let config = RequestConfig::new()
            .query("regions", regions.join(","))
            .query_list("metrics", metrics);
        self.client.get_data("/v1/metrics/compare", config).await
    }
}
